use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use tictactoe_rl::board::BoardState;
use tictactoe_rl::config::{AgentConfig, TrainingConfig, NUM_EPISODES};
use tictactoe_rl::ui::{run_session, UiBoundary, UiEvent};
use tictactoe_rl::GameController;
use tracing::{info, Level};

/// Train a Q-learning tic-tac-toe agent against a random opponent, then play it.
#[derive(Parser, Debug)]
#[command(name = "tictactoe", about = "Play tic-tac-toe against a Q-learning agent")]
struct Cli {
    /// Number of training episodes before play starts
    #[arg(long, default_value_t = NUM_EPISODES)]
    episodes: usize,

    /// Seed for a reproducible training run
    #[arg(long)]
    seed: Option<u64>,

    /// Log every agent decision
    #[arg(short, long)]
    verbose: bool,
}

/// Board on stdout, moves from stdin as "row col" with 1-3 numbering.
struct TerminalUi<R, W> {
    input: R,
    output: W,
}

fn parse_command(line: &str) -> Option<UiEvent> {
    match line.trim() {
        "q" | "quit" => return Some(UiEvent::Quit),
        "r" | "reset" => return Some(UiEvent::Reset),
        _ => {}
    }
    let mut parts = line.split_whitespace().map(|p| p.parse::<usize>());
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(row)), Some(Ok(col)), None) if (1..=3).contains(&row) && (1..=3).contains(&col) => {
            Some(UiEvent::CellActivated {
                row: row - 1,
                col: col - 1,
            })
        }
        _ => None,
    }
}

impl<R: BufRead, W: Write> UiBoundary for TerminalUi<R, W> {
    fn render(&mut self, board: &BoardState) -> Result<()> {
        writeln!(self.output, "{}", board.pretty())?;
        Ok(())
    }

    fn show_result(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{text}")?;
        writeln!(self.output, "Type 'r' for a new game or 'q' to quit.")?;
        Ok(())
    }

    fn next_event(&mut self) -> Result<UiEvent> {
        loop {
            write!(self.output, "Your move (row col, 1-3): ")?;
            self.output.flush()?;
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(UiEvent::Quit);
            }
            match parse_command(&line) {
                Some(event) => return Ok(event),
                None => writeln!(
                    self.output,
                    "Unknown input, please enter two numbers 1, 2 or 3 (e.g. \"2 3\")."
                )?,
            }
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let training = TrainingConfig {
        num_episodes: cli.episodes,
        seed: cli.seed,
        ..TrainingConfig::default()
    };
    let (agent, summary) =
        tictactoe_rl::train_agent(AgentConfig::default(), training).context("training the agent")?;
    info!(
        agent_wins = summary.agent_wins,
        opponent_wins = summary.opponent_wins,
        draws = summary.draws,
        "agent ready, you play X"
    );

    let mut controller = GameController::new(agent);
    let mut ui = TerminalUi {
        input: io::stdin().lock(),
        output: io::stdout(),
    };
    run_session(&mut controller, &mut ui).context("running the game session")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_moves_and_commands() {
        assert_eq!(
            parse_command("2 3\n"),
            Some(UiEvent::CellActivated { row: 1, col: 2 })
        );
        assert_eq!(parse_command(" q "), Some(UiEvent::Quit));
        assert_eq!(parse_command("reset"), Some(UiEvent::Reset));
        assert_eq!(parse_command("0 1"), None);
        assert_eq!(parse_command("1 4"), None);
        assert_eq!(parse_command("1 2 3"), None);
        assert_eq!(parse_command("a b"), None);
    }

    #[test]
    fn terminal_ui_reprompts_then_quits_on_eof() {
        let mut ui = TerminalUi {
            input: "oops\n3 1\n".as_bytes(),
            output: Vec::new(),
        };
        assert_eq!(
            ui.next_event().unwrap(),
            UiEvent::CellActivated { row: 2, col: 0 }
        );
        assert_eq!(ui.next_event().unwrap(), UiEvent::Quit);
        let printed = String::from_utf8(ui.output).unwrap();
        assert!(printed.contains("Unknown input"));
    }
}
