use tictactoe_rl::board::GameStatus;
use tictactoe_rl::ui::{run_session, UiBoundary, UiEvent};
use tictactoe_rl::{
    train_agent, AgentConfig, BoardState, Error, GameController, Mark, Phase, QTable,
    TrainingConfig,
};

fn seeded(num_episodes: usize, seed: u64) -> TrainingConfig {
    TrainingConfig {
        num_episodes,
        seed: Some(seed),
        ..TrainingConfig::default()
    }
}

#[test]
fn scenario_top_row() {
    let state: BoardState = "XXX------".parse().unwrap();
    assert!(state.check_win(Mark::Cross));
    assert!(!state.check_win(Mark::Nought));
    assert!(!state.check_draw());
}

#[test]
fn scenario_full_board() {
    let state: BoardState = "OXOOXXXOX".parse().unwrap();
    assert!(state.check_draw());
    assert!(!state.check_win(Mark::Cross));
    assert!(!state.check_win(Mark::Nought));
    assert_eq!(state.status(Mark::Cross), GameStatus::Drawn);
}

#[test]
fn update_into_full_board() {
    let config = AgentConfig {
        learning_rate: 0.5,
        discount_factor: 0.9,
        ..AgentConfig::default()
    };
    let mut agent = tictactoe_rl::QLearningAgent::new(config).unwrap();
    let state: BoardState = "OXOOXXXO-".parse().unwrap();
    agent.update_q_value(&state, None, 0.0).unwrap();
    agent.update_q_value(&state, Some((2, 2)), 1.0).unwrap();
    assert_eq!(agent.q_value(&state, (2, 2)), Some(0.5));
}

#[test]
fn train_then_play() {
    let (agent, summary) = train_agent(AgentConfig::default(), seeded(100, 2024)).unwrap();
    assert_eq!(summary.episodes, 100);
    let states_after_training = agent.q_table().len();
    assert!(states_after_training > 0);

    let mut controller = GameController::new(agent);
    assert!(matches!(
        controller.on_cell_activated(5, 5),
        Err(Error::InvalidMove { row: 5, col: 5 })
    ));
    assert_eq!(
        controller.on_cell_activated(1, 1).unwrap(),
        Phase::AwaitingFirstPlayer
    );
    controller.reset_session();
    assert_eq!(controller.renderable_state(), &BoardState::new());
    assert!(controller.agent().q_table().len() >= states_after_training);
}

#[test]
fn trained_table_survives_codecs() {
    let (agent, _) = train_agent(AgentConfig::default(), seeded(50, 9)).unwrap();
    let table = agent.into_table();
    let json = table.to_json().unwrap();
    assert_eq!(QTable::from_json(&json).unwrap(), table);

    let mut buf = Vec::new();
    table.to_pickle(&mut buf).unwrap();
    let restored = QTable::from_pickle(buf.as_slice()).unwrap();
    assert_eq!(restored.len(), table.len());

    let agent = tictactoe_rl::QLearningAgent::with_table(AgentConfig::default(), restored).unwrap();
    assert!(agent.q_table().contains_key(&BoardState::new().key()));
}

struct Recorder {
    events: Vec<UiEvent>,
    frames: usize,
    result: Option<String>,
}

impl UiBoundary for Recorder {
    fn render(&mut self, _board: &BoardState) -> anyhow::Result<()> {
        self.frames += 1;
        Ok(())
    }
    fn show_result(&mut self, text: &str) -> anyhow::Result<()> {
        self.result = Some(text.to_owned());
        Ok(())
    }
    fn next_event(&mut self) -> anyhow::Result<UiEvent> {
        Ok(if self.events.is_empty() {
            UiEvent::Quit
        } else {
            self.events.remove(0)
        })
    }
}

#[test]
fn session_over_the_ui_boundary() {
    let (agent, _) = train_agent(AgentConfig::default(), seeded(200, 77)).unwrap();
    let mut controller = GameController::new(agent);
    let mut ui = Recorder {
        events: (0..3)
            .flat_map(|row| (0..3).map(move |col| UiEvent::CellActivated { row, col }))
            .collect(),
        frames: 0,
        result: None,
    };
    run_session(&mut controller, &mut ui).unwrap();
    let text = ui.result.expect("game should have finished");
    assert!(["X wins!", "O wins!", "Draw"].contains(&text.as_str()));
    assert!(ui.frames >= 2);
}
