use crate::config::ConfigError;
use crate::occupant::OccupantId;
use crate::scheduler::ActorId;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Occupant not found: {0}")]
    OccupantNotFound(OccupantId),

    #[error("Occupant already registered: {0}")]
    DuplicateOccupant(OccupantId),

    #[error("Actor not found in turn queue: {0}")]
    ActorNotFound(ActorId),

    #[error("No occupant covers point ({x}, {y})")]
    NoCoverage { x: i32, y: i32 },

    #[error("Actor {actor} failed: {source}")]
    ActorFailed {
        actor: ActorId,
        #[source]
        source: anyhow::Error,
    },

    #[error("Compositor lock poisoned")]
    Poisoned,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}
