//! Layered tile composition and turn scheduling.
//!
//! Occupants ([`occupant`]) are stacked on layers of a [`render::Compositor`], which forwards
//! the visible datum of every viewport tile to a [`render::sink::TileSink`]. Changing an
//! occupant only repaints the cells it covered before and after the change. Actors queued in a
//! [`scheduler::Scheduler`] mutate occupants one turn at a time.

pub mod config;
pub mod errors;
pub mod geometry;
pub mod occupant;
pub mod render;
pub mod scheduler;
pub mod tick;
pub mod world;

pub use errors::EngineError;
