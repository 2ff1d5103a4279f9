pub mod api;
pub mod protocol;
pub mod test_service;

pub use api::{GameService, HttpGameService};
pub use protocol::{Ack, Command, GameSnapshot, GameStage, PlayerScore, QuestionStage, RegisterResponse, StageKey};
