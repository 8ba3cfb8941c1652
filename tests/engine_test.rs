//! Tests for the match engine over the in-memory store.

use std::sync::{Arc, Mutex};

use strictly_matches::{
    Board, Coordinates, ErrorClass, InMemoryMatchStore, Mark, Match, MatchEngine, MatchErrorKind,
    MatchId, MatchLogger, MatchStatus, MatchStore, Movement, StoreError, StoreErrorKind,
};

/// Logger that records every line with its level.
#[derive(Debug, Default)]
struct CapturingLogger {
    lines: Mutex<Vec<(&'static str, String)>>,
}

impl CapturingLogger {
    fn at(&self, level: &str) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    fn push(&self, level: &'static str, message: &str) {
        self.lines.lock().unwrap().push((level, message.to_string()));
    }
}

impl MatchLogger for CapturingLogger {
    fn info(&self, message: &str) {
        self.push("info", message);
    }
    fn warning(&self, message: &str) {
        self.push("warning", message);
    }
    fn error(&self, message: &str) {
        self.push("error", message);
    }
    fn debug(&self, message: &str) {
        self.push("debug", message);
    }
}

/// Store whose every call fails with a connection error.
#[derive(Debug)]
struct BrokenStore;

impl MatchStore for BrokenStore {
    fn get(&self, _id: &MatchId) -> Result<Option<Match>, StoreError> {
        Err(StoreError::new(StoreErrorKind::Connection, "database unreachable"))
    }
    fn create(&self, _record: Match) -> Result<Match, StoreError> {
        Err(StoreError::new(StoreErrorKind::Connection, "database unreachable"))
    }
    fn update(&self, _record: Match) -> Result<Match, StoreError> {
        Err(StoreError::new(StoreErrorKind::Connection, "database unreachable"))
    }
}

fn setup() -> (InMemoryMatchStore, MatchEngine) {
    let store = InMemoryMatchStore::new();
    let engine = MatchEngine::with_tracing(Arc::new(store.clone()));
    (store, engine)
}

fn mv(id: MatchId, player: &str, row: i64, col: i64) -> Movement {
    Movement::new(id, player.to_string(), Some(Coordinates::new(row, col)))
}

/// Seeds a match from a picture like `["XX.", "OO.", "..."]`.
fn seed(store: &InMemoryMatchStore, rows: [&str; 3], turn: Mark) -> MatchId {
    let grid = rows
        .iter()
        .map(|row| {
            row.chars()
                .map(|c| match c {
                    'X' => Some(Mark::X),
                    'O' => Some(Mark::O),
                    _ => None,
                })
                .collect()
        })
        .collect::<Vec<Vec<Option<Mark>>>>();
    let board = Board::try_from(grid).expect("Invalid board picture");
    let id = MatchId::random();
    store
        .create(Match::new(id, board, turn, MatchStatus::Playing, 0))
        .expect("Seed failed");
    id
}

#[test]
fn test_create_starts_empty_with_x() {
    let (store, engine) = setup();
    let created = engine.create().expect("Create failed");

    assert_eq!(*created.turn(), Mark::X);
    assert_eq!(*created.status(), MatchStatus::Playing);
    assert_eq!(created.board().occupied(), 0);
    assert_eq!(store.len().unwrap(), 1);
}

#[test]
fn test_create_gives_distinct_ids() {
    let (store, engine) = setup();
    let a = engine.create().unwrap();
    let b = engine.create().unwrap();
    assert_ne!(a.id(), b.id());
    assert_eq!(store.len().unwrap(), 2);
}

#[test]
fn test_first_move_hands_turn_to_o() {
    let (_store, engine) = setup();
    let id = *engine.create().unwrap().id();

    let message = engine.make_move(&mv(id, "X", 0, 0)).expect("Move failed");
    assert_eq!(message, "Movement performed. Next turn: O");

    let record = engine.get(&id).unwrap();
    assert_eq!(*record.turn(), Mark::O);
    assert_eq!(record.board().get(0, 0).and_then(|c| c.mark()), Some(Mark::X));
}

#[test]
fn test_turns_alternate() {
    let (_store, engine) = setup();
    let id = *engine.create().unwrap().id();

    assert_eq!(
        engine.make_move(&mv(id, "X", 0, 0)).unwrap(),
        "Movement performed. Next turn: O"
    );
    assert_eq!(
        engine.make_move(&mv(id, "O", 1, 1)).unwrap(),
        "Movement performed. Next turn: X"
    );
    assert_eq!(*engine.get(&id).unwrap().turn(), Mark::X);
}

#[test]
fn test_row_win() {
    let (_store, engine) = setup();
    let id = *engine.create().unwrap().id();

    engine.make_move(&mv(id, "X", 0, 0)).unwrap();
    engine.make_move(&mv(id, "O", 1, 0)).unwrap();
    engine.make_move(&mv(id, "X", 0, 1)).unwrap();
    engine.make_move(&mv(id, "O", 1, 1)).unwrap();
    let message = engine.make_move(&mv(id, "X", 0, 2)).unwrap();

    assert_eq!(message, "Player 'X' Wins!!!!");
    assert_eq!(engine.status(&id).unwrap(), MatchStatus::Winner);
}

#[test]
fn test_column_win_for_o() {
    let (store, engine) = setup();
    let id = seed(&store, ["OX.", "OX.", "..X"], Mark::O);

    let message = engine.make_move(&mv(id, "O", 2, 0)).unwrap();
    assert_eq!(message, "Player 'O' Wins!!!!");
    assert_eq!(engine.status(&id).unwrap(), MatchStatus::Winner);
}

#[test]
fn test_diagonal_win() {
    let (store, engine) = setup();
    let id = seed(&store, ["XO.", "OX.", "..."], Mark::X);

    assert_eq!(
        engine.make_move(&mv(id, "X", 2, 2)).unwrap(),
        "Player 'X' Wins!!!!"
    );
}

#[test]
fn test_anti_diagonal_win() {
    let (store, engine) = setup();
    let id = seed(&store, ["XXO", "XO.", "..."], Mark::O);

    assert_eq!(
        engine.make_move(&mv(id, "O", 2, 0)).unwrap(),
        "Player 'O' Wins!!!!"
    );
}

#[test]
fn test_draw_on_full_board() {
    let (store, engine) = setup();
    let id = seed(&store, ["XOX", "XOO", "OX."], Mark::X);

    let message = engine.make_move(&mv(id, "X", 2, 2)).unwrap();
    assert_eq!(message, "Draw!!!");
    assert_eq!(engine.status(&id).unwrap(), MatchStatus::Draw);
}

#[test]
fn test_row_win_on_middle_row() {
    let (store, engine) = setup();
    let id = seed(&store, ["...", "XX.", "..."], Mark::X);

    assert_eq!(
        engine.make_move(&mv(id, "X", 1, 2)).unwrap(),
        "Player 'X' Wins!!!!"
    );
    assert_eq!(engine.status(&id).unwrap(), MatchStatus::Winner);
}

#[test]
fn test_draw_filling_top_right_corner() {
    let (store, engine) = setup();
    let id = seed(&store, ["XO.", "XOO", "OXX"], Mark::X);

    assert_eq!(engine.make_move(&mv(id, "X", 0, 2)).unwrap(), "Draw!!!");
    assert_eq!(engine.status(&id).unwrap(), MatchStatus::Draw);
}

#[test]
fn test_drawn_match_rejects_moves_and_stays_unchanged() {
    let (store, engine) = setup();
    let id = seed(&store, ["XO.", "XOO", "OXX"], Mark::X);
    engine.make_move(&mv(id, "X", 0, 2)).unwrap();
    let finished = engine.get(&id).unwrap();

    let err = engine.make_move(&mv(id, "O", 0, 0)).unwrap_err();
    assert_eq!(err.kind(), MatchErrorKind::MatchAlreadyEnded);
    assert_eq!(err.message(), format!("Match {} has already ended", id));
    assert_eq!(engine.get(&id).unwrap(), finished);
    assert_eq!(engine.status(&id).unwrap(), MatchStatus::Draw);
}

#[test]
fn test_win_on_last_cell_is_not_a_draw() {
    let (store, engine) = setup();
    let id = seed(&store, ["XOX", "OXO", "OX."], Mark::X);

    assert_eq!(
        engine.make_move(&mv(id, "X", 2, 2)).unwrap(),
        "Player 'X' Wins!!!!"
    );
    assert_eq!(engine.status(&id).unwrap(), MatchStatus::Winner);
}

#[test]
fn test_finished_match_rejects_moves_and_stays_unchanged() {
    let (store, engine) = setup();
    let id = seed(&store, ["XX.", "OO.", "..."], Mark::X);
    engine.make_move(&mv(id, "X", 0, 2)).unwrap();
    let finished = engine.get(&id).unwrap();

    let err = engine.make_move(&mv(id, "O", 1, 2)).unwrap_err();
    assert_eq!(err.kind(), MatchErrorKind::MatchAlreadyEnded);
    assert_eq!(err.message(), format!("Match {} has already ended", id));
    assert_eq!(err.class(), ErrorClass::Client);
    assert_eq!(engine.get(&id).unwrap(), finished);
}

#[test]
fn test_wrong_turn_rejected() {
    let (_store, engine) = setup();
    let id = *engine.create().unwrap().id();

    let err = engine.make_move(&mv(id, "O", 0, 0)).unwrap_err();
    assert_eq!(err.kind(), MatchErrorKind::NotYourTurn);
    assert_eq!(err.message(), "Player O, it's not your turn");
    assert_eq!(engine.get(&id).unwrap().board().occupied(), 0);
}

#[test]
fn test_invalid_player_rejected() {
    let (_store, engine) = setup();
    let id = *engine.create().unwrap().id();

    for player in ["Z", "x", ""] {
        let err = engine.make_move(&mv(id, player, 0, 0)).unwrap_err();
        assert_eq!(err.kind(), MatchErrorKind::InvalidPlayer);
        assert_eq!(err.message(), "Player is not valid, must be one of: X, O");
    }
}

#[test]
fn test_missing_square_rejected() {
    let (_store, engine) = setup();
    let id = *engine.create().unwrap().id();

    let err = engine
        .make_move(&Movement::new(id, "X".to_string(), None))
        .unwrap_err();
    assert_eq!(err.kind(), MatchErrorKind::InvalidPosition);
    assert_eq!(err.message(), "Square is not valid, must provide x and y");
}

#[test]
fn test_out_of_bounds_rejected() {
    let (_store, engine) = setup();
    let id = *engine.create().unwrap().id();

    for (row, col) in [(3, 0), (0, 3), (-1, 0), (0, -1)] {
        let err = engine.make_move(&mv(id, "X", row, col)).unwrap_err();
        assert_eq!(err.kind(), MatchErrorKind::PositionOutOfBounds);
        assert_eq!(
            err.message(),
            format!("Square [{}, {}] is out of the board", row, col)
        );
    }
    assert_eq!(*engine.get(&id).unwrap().turn(), Mark::X);
}

#[test]
fn test_occupied_square_rejected() {
    let (_store, engine) = setup();
    let id = *engine.create().unwrap().id();
    engine.make_move(&mv(id, "X", 1, 1)).unwrap();

    let err = engine.make_move(&mv(id, "O", 1, 1)).unwrap_err();
    assert_eq!(err.kind(), MatchErrorKind::PositionNotAvailable);
    assert_eq!(err.message(), "Square [1, 1] is not available");
    assert_eq!(*engine.get(&id).unwrap().turn(), Mark::O);
}

#[test]
fn test_player_checked_before_turn() {
    let (_store, engine) = setup();
    let id = *engine.create().unwrap().id();

    // Invalid mark and out-of-bounds square: the mark is reported.
    let err = engine.make_move(&mv(id, "Q", 9, 9)).unwrap_err();
    assert_eq!(err.kind(), MatchErrorKind::InvalidPlayer);

    // Wrong turn and out-of-bounds square: the turn is reported.
    let err = engine.make_move(&mv(id, "O", 9, 9)).unwrap_err();
    assert_eq!(err.kind(), MatchErrorKind::NotYourTurn);
}

#[test]
fn test_unknown_match() {
    let (_store, engine) = setup();
    let id = MatchId::random();

    let err = engine.make_move(&mv(id, "X", 0, 0)).unwrap_err();
    assert_eq!(err.kind(), MatchErrorKind::MatchNotFound);
    assert_eq!(err.message(), format!("Match {} not found", id));
    assert_eq!(err.class(), ErrorClass::NotFound);

    let err = engine.status(&id).unwrap_err();
    assert_eq!(err.kind(), MatchErrorKind::MatchNotFound);
}

#[test]
fn test_status_is_idempotent() {
    let (_store, engine) = setup();
    let id = *engine.create().unwrap().id();
    let before = engine.get(&id).unwrap();

    assert_eq!(engine.status(&id).unwrap(), MatchStatus::Playing);
    assert_eq!(engine.status(&id).unwrap(), MatchStatus::Playing);
    assert_eq!(engine.get(&id).unwrap(), before);
}

#[test]
fn test_moves_bump_version() {
    let (_store, engine) = setup();
    let id = *engine.create().unwrap().id();
    engine.make_move(&mv(id, "X", 0, 0)).unwrap();
    engine.make_move(&mv(id, "O", 2, 2)).unwrap();

    assert_eq!(*engine.get(&id).unwrap().version(), 2);
}

#[test]
fn test_stale_update_conflicts() {
    let (store, engine) = setup();
    let id = *engine.create().unwrap().id();
    let stale = store.get(&id).unwrap().unwrap();

    engine.make_move(&mv(id, "X", 0, 0)).unwrap();

    let err = store.update(stale).unwrap_err();
    assert_eq!(err.kind, StoreErrorKind::Conflict);
}

#[test]
fn test_store_failure_is_server_class_and_logged() {
    let logger = Arc::new(CapturingLogger::default());
    let engine = MatchEngine::new(Arc::new(BrokenStore), logger.clone());

    let err = engine.create().unwrap_err();
    assert_eq!(err.kind(), MatchErrorKind::Store(StoreErrorKind::Connection));
    assert_eq!(err.class(), ErrorClass::Server);
    assert_eq!(logger.at("error").len(), 1);

    let err = engine.status(&MatchId::random()).unwrap_err();
    assert_eq!(err.class(), ErrorClass::Server);
    assert_eq!(logger.at("error").len(), 2);
}

#[test]
fn test_engine_logs_lifecycle() {
    let store = InMemoryMatchStore::new();
    let logger = Arc::new(CapturingLogger::default());
    let engine = MatchEngine::new(Arc::new(store), logger.clone());

    let id = *engine.create().unwrap().id();
    engine.make_move(&mv(id, "O", 0, 0)).unwrap_err();
    engine.make_move(&mv(id, "X", 0, 0)).unwrap();

    let info = logger.at("info");
    assert!(info.iter().any(|m| m.contains(&format!("Match created: {}", id))));
    assert!(info.iter().any(|m| m.contains("Movement rejected")));
    assert!(info.iter().any(|m| m.contains("Movement performed")));

    let debug = logger.at("debug");
    assert_eq!(debug.len(), 1);
    assert!(debug[0].contains("Movement validated: X at [0, 0]"));
    assert!(logger.at("error").is_empty());
}

#[test]
fn test_matches_are_independent() {
    let (_store, engine) = setup();
    let first = *engine.create().unwrap().id();
    let second = *engine.create().unwrap().id();

    engine.make_move(&mv(first, "X", 0, 0)).unwrap();

    assert_eq!(engine.get(&second).unwrap().board().occupied(), 0);
    assert_eq!(*engine.get(&second).unwrap().turn(), Mark::X);
}
