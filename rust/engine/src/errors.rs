use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum CardError {
    #[error("Empty card token")]
    Empty,
    #[error("Card token {0:?} contains a reserved separator symbol")]
    ReservedSymbol(String),
    #[error("Malformed card token: {0:?}")]
    Malformed(String),
    #[error("Unknown rank: {0:?}")]
    UnknownRank(String),
    #[error("Unknown suit: {0:?}")]
    UnknownSuit(String),
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ComboError {
    #[error("Combo catalogue is empty")]
    EmptyCatalogue,
    #[error("Duplicate combo name in catalogue: {0}")]
    DuplicateName(String),
    #[error("Combo {0} has no conditions or an empty group")]
    EmptyCase(String),
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Invalid blinds: small {small}, big {big}, increment {step}")]
    InvalidBlinds { small: u32, big: u32, step: u32 },
    #[error("Stage {stage} appears {stages} times but {amounts} amounts are configured")]
    AmountsMismatch {
        stage: &'static str,
        stages: usize,
        amounts: usize,
    },
    #[error("Invalid stage sequence: {0}")]
    InvalidStages(String),
    #[error("Deck interval is inverted or empty")]
    InvalidDeckInterval,
    #[error("Deck generator produces no cards")]
    EmptyDeck,
    #[error("Rigged hands must all have the same length")]
    UnevenHands,
    #[error("Unknown preset: {0}")]
    UnknownPreset(String),
    #[error(transparent)]
    Combo(#[from] ComboError),
}

/// Rejected player input. Surfaced to the caller; never crashes the processor.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ActionError {
    #[error("{action} is not legal for player {player} at stage {stage}")]
    NotLegal {
        action: &'static str,
        player: String,
        stage: String,
    },
    #[error("Invalid value {value} for {action}: {reason}")]
    InvalidValue {
        action: &'static str,
        value: u32,
        reason: String,
    },
    #[error("Values for {action} are unavailable at stage {stage}")]
    ValuesUnavailable { action: &'static str, stage: String },
    #[error("Insufficient funds: {needed} needed, {available} available")]
    InsufficientFunds { needed: u32, available: u32 },
    #[error("Unknown player: {0}")]
    UnknownPlayer(String),
    #[error("Host can not leave the game")]
    HostCanNotLeave,
    #[error("Players may join only before a round begins")]
    JoinClosed,
    #[error("Player {0} already joined")]
    AlreadyJoined(String),
}

/// Violated invariants. These abort rather than recover.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConstraintError {
    #[error("Game {game_id} must have exactly one host, found {found}")]
    HostCount { game_id: u64, found: usize },
    #[error("Game {game_id} player positions are not contiguous: {positions:?}")]
    Positions { game_id: u64, positions: Vec<usize> },
    #[error("Continuity violation: {0}")]
    Continuity(String),
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum RepositoryError {
    #[error("Game {0} not found")]
    NotFound(u64),
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

/// Fatal processing failures. A processor that returns one of these must not be reused.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ProcessingError {
    #[error("Queued action became illegal before it was applied: {0}")]
    IllegalQueuedAction(ActionError),
    #[error(transparent)]
    Constraint(#[from] ConstraintError),
    #[error("Deck is exhausted: {needed} cards needed, {available} left")]
    DeckExhausted { needed: usize, available: usize },
    #[error("Too many game round iterations: {rounds} exceeds {ceiling}")]
    TooManyRounds { rounds: u32, ceiling: u32 },
    #[error("Not all caller supplied actions were acted: {0} left")]
    UnconsumedActions(usize),
    #[error("Invalid stop condition: {0}")]
    InvalidStop(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("Round log write failed: {0}")]
    RoundLog(String),
}

/// Why `Processor::add` refused an action.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum AdmissionError {
    /// Ordinary rejected input; the processor stays usable.
    #[error(transparent)]
    Rejected(#[from] ActionError),
    /// The action was built against another game object. Abort the caller.
    #[error(transparent)]
    Fatal(#[from] ProcessingError),
}

impl AdmissionError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, AdmissionError::Fatal(_))
    }
}
