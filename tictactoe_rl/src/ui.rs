use crate::board::BoardState;
use crate::controller::GameController;
use crate::error::Error;
use tracing::{debug, info};

/// Intents a front end can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    CellActivated { row: usize, col: usize },
    Reset,
    Quit,
}

/// Whatever draws the board and collects clicks. It never owns game state.
pub trait UiBoundary {
    fn render(&mut self, board: &BoardState) -> anyhow::Result<()>;
    fn show_result(&mut self, text: &str) -> anyhow::Result<()>;
    fn next_event(&mut self) -> anyhow::Result<UiEvent>;
}

/// Pumps UI events into the controller until the UI asks to quit.
///
/// Illegal cells and clicks after the game has ended are ignored.
pub fn run_session<U: UiBoundary + ?Sized>(
    controller: &mut GameController,
    ui: &mut U,
) -> anyhow::Result<()> {
    ui.render(controller.renderable_state())?;
    loop {
        match ui.next_event()? {
            UiEvent::CellActivated { row, col } => match controller.on_cell_activated(row, col) {
                Ok(_) => {
                    ui.render(controller.renderable_state())?;
                    if let Some(text) = controller.result_text() {
                        ui.show_result(&text)?;
                    }
                }
                Err(err @ (Error::InvalidMove { .. } | Error::GameOver)) => {
                    debug!(%err, "ignoring move request");
                }
                Err(err) => return Err(err.into()),
            },
            UiEvent::Reset => {
                controller.reset_session();
                ui.render(controller.renderable_state())?;
            }
            UiEvent::Quit => {
                info!("session closed");
                return Ok(());
            }
        }
    }
}
