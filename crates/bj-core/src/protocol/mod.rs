//! Protocol module containing message types and the binary codec.

pub mod codec;
pub mod messages;

pub use codec::{
    decode_decision, decode_offer, decode_payload, decode_request, encode_decision, encode_offer,
    encode_payload, encode_request, ProtocolError,
};
pub use messages::*;
