use crate::domain::entities::GameStatus;

/// Input rejected before anything reaches the store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Player {position} has an empty name")]
    EmptyName { position: usize },
    #[error("Player name '{name}' is used more than once")]
    DuplicateName { name: String },
    #[error("A game needs between {min} and {max} players, got {actual}")]
    RosterSize { min: usize, max: usize, actual: usize },
    #[error("Color '{0}' is not in the palette")]
    UnknownColor(String),
    #[error("Color '{0}' is assigned to more than one player")]
    DuplicateColor(String),
    #[error("Die value {0} is outside 1..=6")]
    DieOutOfRange(u8),
    #[error("Both dice are required when either is given")]
    MissingDie,
}

/// Turn state machine operation names, for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOperation {
    RecordRoll,
    AdvanceTurn,
    EndGame,
}

impl TurnOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnOperation::RecordRoll => "recordRoll",
            TurnOperation::AdvanceTurn => "advanceTurn",
            TurnOperation::EndGame => "endGame",
        }
    }
}

/// Illegal call into the turn state machine
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error(
        "Invalid transition: {} on a {} game",
        .operation.as_str(),
        .status.as_ref().map_or("missing", GameStatus::as_str)
    )]
    InvalidTransition {
        operation: TurnOperation,
        /// None when the game does not exist
        status: Option<GameStatus>,
    },
    #[error("Player index {index} is out of range for {player_count} players")]
    PlayerIndexOutOfRange { index: usize, player_count: usize },
}
