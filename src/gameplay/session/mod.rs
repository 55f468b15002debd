pub mod session;

pub use session::{
    session_active, GameEnded, GameOutcome, RestartRequested, ScoreChanged, Session,
    SessionPlugin,
};
