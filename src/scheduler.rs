//! Turn scheduling.
//!
//! The [`Scheduler`] keeps actors in a [`TurnQueue`] ordered by remaining delay. Each turn it
//! takes the head, awaits its action, and puts it back with the delay the action returned.
//! Exactly one action is in flight at any time; the loop only stops between two turns.
//!
//! ```
//! use async_trait::async_trait;
//! use tileport::scheduler::{Actor, ActorId, Delay, Scheduler};
//!
//! struct Ticker { id: ActorId, ticks: u32 }
//!
//! #[async_trait]
//! impl Actor<()> for Ticker {
//!     fn id(&self) -> ActorId { self.id }
//!
//!     async fn act(&mut self, _ctx: &mut ()) -> anyhow::Result<Delay> {
//!         self.ticks += 1;
//!         Ok(10)
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), tileport::EngineError> {
//! let mut scheduler = Scheduler::<()>::new();
//! scheduler.enqueue(Box::new(Ticker { id: ActorId::new(), ticks: 0 }), 0);
//!
//! let outcome = scheduler.run_turns(&mut (), 5).await?;
//! assert_eq!(outcome.turns(), 5);
//! # Ok(()) }
//! ```

mod actor;
mod queue;

pub use actor::{Actor, Delay, TurnContext};
pub use queue::TurnQueue;

use crate::errors::EngineError;
use crate::tick::RunOutcome;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// A unique identifier for an actor, represented as a UUID.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(Uuid);

impl ActorId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ActorId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Delay-ordered queue of boxed actors acting on a shared context `C`.
pub struct Scheduler<C: Send> {
    queue: TurnQueue<Box<dyn Actor<C>>>,
}

impl<C: Send> Default for Scheduler<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Send> std::fmt::Debug for Scheduler<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler").field("pending", &self.pending()).finish()
    }
}

impl<C: Send> Scheduler<C> {
    pub fn new() -> Self {
        Self { queue: TurnQueue::new() }
    }

    /// Queues `actor` to act after `delay`. The same actor must not be queued twice.
    pub fn enqueue(&mut self, actor: Box<dyn Actor<C>>, delay: Delay) {
        log::trace!("scheduler: enqueue {} at +{}", actor.id(), delay);
        self.queue.push(actor, delay);
    }

    /// Takes a queued actor out of the rotation.
    pub fn dequeue(&mut self, id: ActorId) -> Result<Box<dyn Actor<C>>, EngineError> {
        self.queue
            .remove_by(|a| a.id() == id)
            .map(|(actor, _)| actor)
            .ok_or(EngineError::ActorNotFound(id))
    }

    /// Removes the next actor to act and re-bases the others on it.
    pub fn advance(&mut self) -> Option<Box<dyn Actor<C>>> {
        self.queue.pop().map(|(actor, _)| actor)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Remaining delay of a queued actor.
    pub fn remaining(&self, id: ActorId) -> Option<Delay> {
        self.queue.iter().find(|(a, _)| a.id() == id).map(|(_, d)| d)
    }

    /// Queued actors in the order they will act, with their remaining delays.
    pub fn pending(&self) -> Vec<(ActorId, Delay)> {
        self.queue.iter().map(|(a, d)| (a.id(), d)).collect()
    }
}

impl<C: TurnContext> Scheduler<C> {
    /// Plays turns until `cancel` fires or the queue runs dry.
    ///
    /// The token is only checked between turns: an action that already started is always
    /// awaited to completion and its actor re-queued before the loop returns.
    pub async fn run(&mut self, ctx: &mut C, cancel: &CancellationToken) -> Result<RunOutcome, EngineError> {
        log::info!("scheduler: running with {} actors", self.len());
        let mut turns = 0;

        loop {
            if cancel.is_cancelled() {
                log::info!("scheduler: stopped after {} turns", turns);
                return Ok(RunOutcome::Stopped { turns });
            }
            if !self.turn(ctx).await? {
                log::info!("scheduler: idle after {} turns", turns);
                return Ok(RunOutcome::Idle { turns });
            }
            turns += 1;
            tokio::task::yield_now().await;
        }
    }

    /// Plays at most `limit` turns.
    pub async fn run_turns(&mut self, ctx: &mut C, limit: u64) -> Result<RunOutcome, EngineError> {
        for turns in 0..limit {
            if !self.turn(ctx).await? {
                return Ok(RunOutcome::Idle { turns });
            }
        }
        Ok(RunOutcome::Exhausted { turns: limit })
    }

    /// Plays a single turn. Returns `false` when nobody was queued.
    ///
    /// A failing actor is re-queued with delay 0, behind any actor that is already due, and its
    /// error returned. The host decides whether to resume.
    pub async fn turn(&mut self, ctx: &mut C) -> Result<bool, EngineError> {
        let Some(mut actor) = self.advance() else {
            return Ok(false);
        };

        let id = actor.id();
        match actor.act(ctx).await {
            Ok(delay) => {
                self.enqueue(actor, delay);
                ctx.end_turn()?;
                Ok(true)
            }
            Err(source) => {
                log::warn!("scheduler: actor {} failed: {:#}", id, source);
                self.enqueue(actor, 0);
                Err(EngineError::ActorFailed { actor: id, source })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Duration;

    #[derive(Default)]
    struct Journal {
        acted: Vec<(&'static str, u64)>,
        now: u64,
        turns_ended: u32,
    }

    impl TurnContext for Journal {
        fn end_turn(&mut self) -> Result<(), EngineError> {
            self.turns_ended += 1;
            Ok(())
        }
    }

    /// Acts every `every` units, recording the virtual time it acted at.
    struct Clock {
        id: ActorId,
        name: &'static str,
        every: Delay,
    }

    impl Clock {
        fn boxed(name: &'static str, every: Delay) -> Box<Self> {
            Box::new(Self { id: ActorId::new(), name, every })
        }
    }

    #[async_trait]
    impl Actor<Journal> for Clock {
        fn id(&self) -> ActorId {
            self.id
        }

        async fn act(&mut self, ctx: &mut Journal) -> anyhow::Result<Delay> {
            ctx.acted.push((self.name, ctx.now));
            Ok(self.every)
        }
    }

    /// Sleeps through its turn, then fails on the second one.
    struct Flaky {
        id: ActorId,
        calls: u32,
    }

    #[async_trait]
    impl Actor<Journal> for Flaky {
        fn id(&self) -> ActorId {
            self.id
        }

        async fn act(&mut self, ctx: &mut Journal) -> anyhow::Result<Delay> {
            self.calls += 1;
            tokio::time::sleep(Duration::from_millis(5)).await;
            ctx.acted.push(("flaky", u64::from(self.calls)));
            if self.calls == 2 {
                anyhow::bail!("rudder jammed");
            }
            Ok(1)
        }
    }

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn names(scheduler: &Scheduler<Journal>, ids: &[(ActorId, &'static str)]) -> Vec<(&'static str, Delay)> {
        scheduler
            .pending()
            .into_iter()
            .map(|(id, d)| (ids.iter().find(|(i, _)| *i == id).map(|(_, n)| *n).unwrap_or("?"), d))
            .collect()
    }

    #[test]
    fn equal_delays_keep_insertion_order() {
        let mut scheduler: Scheduler<Journal> = Scheduler::new();
        let (a, b, c) = (Clock::boxed("A", 1), Clock::boxed("B", 1), Clock::boxed("C", 1));
        let ids = [(a.id, "A"), (b.id, "B"), (c.id, "C")];
        scheduler.enqueue(a, 100);
        scheduler.enqueue(b, 50);
        scheduler.enqueue(c, 50);

        let head = scheduler.advance().unwrap();
        assert_eq!(head.id(), ids[1].0);
        assert_eq!(names(&scheduler, &ids), vec![("C", 0), ("A", 50)]);
        assert_eq!(scheduler.remaining(ids[0].0), Some(50));
        assert_eq!(scheduler.remaining(ids[1].0), None);
    }

    #[test]
    fn dequeue_unknown_actor_fails() {
        let mut scheduler: Scheduler<Journal> = Scheduler::new();
        let clock = Clock::boxed("A", 1);
        let id = clock.id;
        scheduler.enqueue(clock, 3);

        assert!(scheduler.dequeue(id).is_ok());
        assert!(scheduler.is_empty());
        assert!(matches!(scheduler.dequeue(id), Err(EngineError::ActorNotFound(i)) if i == id));
    }

    #[tokio::test]
    async fn actors_interleave_by_delay() {
        let mut scheduler: Scheduler<Journal> = Scheduler::new();
        scheduler.enqueue(Clock::boxed("fast", 2), 0);
        scheduler.enqueue(Clock::boxed("slow", 3), 0);

        // Virtual time advances by the delay of each popped head. At time 6 both are due; the
        // slow clock was queued first.
        let mut ctx = Journal::default();
        for _ in 0..6 {
            let (_, delay) = scheduler.queue.peek().map(|(a, d)| (a.id(), d)).unwrap();
            ctx.now += delay;
            assert!(scheduler.turn(&mut ctx).await.unwrap());
        }

        assert_eq!(
            ctx.acted,
            vec![("fast", 0), ("slow", 0), ("fast", 2), ("slow", 3), ("fast", 4), ("slow", 6)]
        );
        assert_eq!(ctx.turns_ended, 6);
    }

    #[tokio::test]
    async fn run_turns_and_idle() {
        let mut scheduler: Scheduler<Journal> = Scheduler::new();
        let mut ctx = Journal::default();
        assert_eq!(scheduler.run_turns(&mut ctx, 3).await.unwrap(), RunOutcome::Idle { turns: 0 });

        scheduler.enqueue(Clock::boxed("A", 5), 0);
        assert_eq!(scheduler.run_turns(&mut ctx, 3).await.unwrap(), RunOutcome::Exhausted { turns: 3 });
        assert_eq!(scheduler.len(), 1);

        let cancel = CancellationToken::new();
        let mut empty: Scheduler<Journal> = Scheduler::new();
        assert_eq!(empty.run(&mut ctx, &cancel).await.unwrap(), RunOutcome::Idle { turns: 0 });
    }

    #[tokio::test]
    async fn cancellation_waits_for_the_action_in_flight() {
        let mut scheduler: Scheduler<Journal> = Scheduler::new();
        let flaky = Box::new(Flaky { id: ActorId::new(), calls: 0 });
        let id = flaky.id;
        scheduler.enqueue(flaky, 0);

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(1)).await;
            trigger.cancel();
        });

        let mut ctx = Journal::default();
        let outcome = scheduler.run(&mut ctx, &cancel).await.unwrap();

        // The first sleep outlasts the trigger, yet the turn completes and the actor is back.
        assert_eq!(outcome, RunOutcome::Stopped { turns: 1 });
        assert_eq!(ctx.acted, vec![("flaky", 1)]);
        assert_eq!(scheduler.remaining(id), Some(1));

        let outcome = scheduler.run(&mut ctx, &cancel).await.unwrap();
        assert_eq!(outcome, RunOutcome::Stopped { turns: 0 });
    }

    #[tokio::test]
    async fn failing_actor_is_requeued_and_reported() {
        init_logging();
        let mut scheduler: Scheduler<Journal> = Scheduler::new();
        let flaky = Box::new(Flaky { id: ActorId::new(), calls: 0 });
        let id = flaky.id;
        scheduler.enqueue(flaky, 0);
        scheduler.enqueue(Clock::boxed("clock", 10), 5);

        let mut ctx = Journal::default();
        let err = scheduler.run(&mut ctx, &CancellationToken::new()).await.unwrap_err();

        match err {
            EngineError::ActorFailed { actor, source } => {
                assert_eq!(actor, id);
                assert_eq!(source.to_string(), "rudder jammed");
            }
            other => panic!("expected ActorFailed, got {:?}", other),
        }
        assert_eq!(scheduler.pending().first(), Some(&(id, 0)));
        assert_eq!(ctx.turns_ended, 1);
    }

    #[tokio::test]
    async fn failed_actor_waits_behind_due_actors() {
        init_logging();
        let mut scheduler: Scheduler<Journal> = Scheduler::new();
        // The next call is the failing one.
        let flaky = Box::new(Flaky { id: ActorId::new(), calls: 1 });
        let clock = Clock::boxed("clock", 4);
        let ids = [(flaky.id, "flaky"), (clock.id, "clock")];
        scheduler.enqueue(flaky, 0);
        scheduler.enqueue(clock, 0);

        let mut ctx = Journal::default();
        assert!(matches!(scheduler.turn(&mut ctx).await, Err(EngineError::ActorFailed { .. })));
        assert_eq!(names(&scheduler, &ids), vec![("clock", 0), ("flaky", 0)]);
        assert_eq!(ctx.turns_ended, 0);
    }
}
