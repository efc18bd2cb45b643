// Service exports
pub mod directory;
pub mod engine;
pub mod interactions;

pub use directory::{DirectoryError, HttpDirectoryClient, MemoryDirectory, UserDirectory};
pub use engine::{EngineError, MatchEngine, DEFAULT_OVERFETCH_FACTOR, MAX_PAGE_SIZE};
pub use interactions::{
    InteractionError, InteractionStore, MatchCreation, MemoryInteractionStore,
    NullInteractionStore, PostgresInteractionStore,
};
