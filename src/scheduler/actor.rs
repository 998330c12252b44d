use crate::errors::EngineError;
use crate::scheduler::ActorId;
use async_trait::async_trait;

/// Time units until an actor wants to act again.
pub type Delay = u64;

/// Something that takes turns.
///
/// `act` runs to completion before any other actor is dequeued; it may suspend (await timers,
/// host input) without giving up its turn.
#[async_trait]
pub trait Actor<C: Send>: Send {
    fn id(&self) -> ActorId;

    /// Performs one turn and returns the delay until the next one.
    async fn act(&mut self, ctx: &mut C) -> anyhow::Result<Delay>;
}

/// The state actors act on.
pub trait TurnContext: Send {
    /// Called after each completed action, before the next actor is dequeued.
    fn end_turn(&mut self) -> Result<(), EngineError> {
        Ok(())
    }
}

impl TurnContext for () {}
