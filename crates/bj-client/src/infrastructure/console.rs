//! Interactive player on the terminal.
//!
//! Prompts go to stdout; answers are read line by line from any
//! [`AsyncBufRead`] (stdin in the binary, a byte slice in tests).  Input is
//! trimmed and case-insensitive.  Unrecognised answers re-prompt; end of input
//! during a round stands, so a closed stdin can never stall the server.

use std::io::Write;

use async_trait::async_trait;
use bj_core::domain::{Card, Decision, Outcome};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tracing::warn;

use crate::application::play_rounds::{Player, Seat, TableView};

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("console I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("input closed")]
    InputClosed,
}

pub struct ConsolePlayer<R> {
    input: R,
}

impl ConsolePlayer<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin + Send> ConsolePlayer<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }

    /// Asks how many rounds to play, re-prompting until the answer is
    /// between 1 and 255.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::InputClosed`] at end of input.
    pub async fn prompt_rounds(&mut self) -> Result<u8, ConsoleError> {
        loop {
            prompt("How many rounds do you want to play? ");
            let line = self.read_line().await?.ok_or(ConsoleError::InputClosed)?;
            match line.parse::<u8>() {
                Ok(rounds) if rounds > 0 => return Ok(rounds),
                _ => println!("Please enter a number between 1 and 255."),
            }
        }
    }

    async fn read_line(&mut self) -> Result<Option<String>, ConsoleError> {
        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_ascii_lowercase()))
    }
}

fn parse_decision(answer: &str) -> Option<Decision> {
    match answer {
        "h" | "hit" | "y" => Some(Decision::Hit),
        "s" | "stand" | "n" => Some(Decision::Stand),
        _ => None,
    }
}

fn prompt(text: &str) {
    print!("{text}");
    let _ = std::io::stdout().flush();
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> Player for ConsolePlayer<R> {
    async fn decide(&mut self, table: &TableView) -> Decision {
        loop {
            prompt(&format!(
                "Your total is {} against the dealer's {}. Hit or stand? [h/s] ",
                table.player.total(),
                table.dealer.total()
            ));
            match self.read_line().await {
                Ok(Some(answer)) => match parse_decision(&answer) {
                    Some(decision) => return decision,
                    None => println!("Type h to hit or s to stand."),
                },
                Ok(None) => {
                    warn!("input closed mid-round, standing");
                    return Decision::Stand;
                }
                Err(e) => {
                    warn!("reading decision failed, standing: {e}");
                    return Decision::Stand;
                }
            }
        }
    }

    fn card_dealt(&mut self, seat: Seat, card: Card) {
        match seat {
            Seat::Player => println!("You got the {card}."),
            Seat::Dealer => println!("The dealer shows the {card}."),
        }
    }

    fn round_finished(&mut self, outcome: Outcome, table: &TableView) {
        let verdict = match outcome {
            Outcome::Win => "You win!",
            Outcome::Loss => "You lose.",
            Outcome::Tie => "It's a tie.",
        };
        println!(
            "{verdict} (you {}, dealer {})",
            table.player.total(),
            table.dealer.total()
        );
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_prompt_rounds_skips_invalid_answers() {
        let mut console = ConsolePlayer::new(&b"lots\n300\n0\n  3 \n"[..]);
        assert_eq!(console.prompt_rounds().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_prompt_rounds_at_eof_errors() {
        let mut console = ConsolePlayer::new(&b""[..]);
        assert!(matches!(
            console.prompt_rounds().await,
            Err(ConsoleError::InputClosed)
        ));
    }

    #[tokio::test]
    async fn test_decide_accepts_words_and_letters() {
        // Arrange
        let mut console = ConsolePlayer::new(&b"maybe\nHIT\ns\n"[..]);
        let table = TableView::default();

        // Act
        let first = console.decide(&table).await;
        let second = console.decide(&table).await;

        // Assert
        assert_eq!(first, Decision::Hit);
        assert_eq!(second, Decision::Stand);
    }

    #[tokio::test]
    async fn test_decide_stands_when_input_closes() {
        let mut console = ConsolePlayer::new(&b""[..]);
        assert_eq!(console.decide(&TableView::default()).await, Decision::Stand);
    }
}
