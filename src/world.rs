//! A world: a background plus a roster of occupants sharing one layer.
//!
//! [`Roster`] registers everything it holds with a [`CompositorHandle`] and answers occupancy
//! queries for movement checks. It is also the context actors act on: every finished turn
//! flushes the compositor's sink.
//!
//! ```
//! use std::sync::Arc;
//! use tileport::config::EngineConfig;
//! use tileport::geometry::Point;
//! use tileport::occupant::{Background, OccupancyQuery};
//! use tileport::render::sinks::null::NullSink;
//! use tileport::render::{Compositor, CompositorHandle, RenderDatum};
//! use tileport::world::Roster;
//!
//! # fn main() -> Result<(), tileport::EngineError> {
//! let config = EngineConfig::default();
//! let compositor = CompositorHandle::new(Compositor::with_config(&config, Box::new(NullSink::new())));
//! let water = Arc::new(Background::solid(RenderDatum::new(0, 0, 99)));
//! let roster = Roster::new(compositor, water, &config)?;
//!
//! assert!(roster.is_empty());
//! assert!(!roster.is_occupied(Point::new(3, 3)));
//! # Ok(()) }
//! ```

use crate::config::{EngineConfig, BACKGROUND_LAYER};
use crate::errors::EngineError;
use crate::geometry::Point;
use crate::occupant::{OccupancyQuery, Occupant, OccupantId};
use crate::render::CompositorHandle;
use crate::scheduler::TurnContext;
use std::sync::Arc;

pub struct Roster {
    compositor: CompositorHandle,
    background: Arc<dyn Occupant>,
    layer: usize,
    members: Vec<Arc<dyn Occupant>>,
}

impl std::fmt::Debug for Roster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Roster")
            .field("background", &self.background.id())
            .field("layer", &self.layer)
            .field("members", &self.members.len())
            .finish()
    }
}

impl Roster {
    /// Registers `background` on the bottom layer. Members go on `config.occupant_layer`.
    pub fn new(
        compositor: CompositorHandle,
        background: Arc<dyn Occupant>,
        config: &EngineConfig,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        compositor.add_occupant(background.clone(), BACKGROUND_LAYER)?;

        Ok(Self {
            compositor,
            background,
            layer: config.occupant_layer,
            members: Vec::new(),
        })
    }

    pub fn compositor(&self) -> &CompositorHandle {
        &self.compositor
    }

    pub fn background(&self) -> &Arc<dyn Occupant> {
        &self.background
    }

    /// Adds a member and paints it.
    ///
    /// The member is kept when painting fails, mirroring the compositor, so a later repaint can
    /// recover. Adding the same id twice, or the background's id, fails with `DuplicateOccupant`.
    pub fn add(&mut self, occupant: Arc<dyn Occupant>) -> Result<(), EngineError> {
        let id = occupant.id();
        if self.contains(id) || id == self.background.id() {
            return Err(EngineError::DuplicateOccupant(id));
        }

        log::debug!("roster: adding {id}");
        let result = self.compositor.add_occupant(occupant.clone(), self.layer);
        if let Err(EngineError::DuplicateOccupant(_)) = result {
            return result;
        }
        self.members.push(occupant);
        result
    }

    /// Removes a member and uncovers what was below it.
    ///
    /// When the compositor refuses the removal the member stays in the roster.
    pub fn remove(&mut self, id: OccupantId) -> Result<Arc<dyn Occupant>, EngineError> {
        let at = self
            .members
            .iter()
            .position(|m| m.id() == id)
            .ok_or(EngineError::OccupantNotFound(id))?;

        self.compositor.remove_occupant(id)?;
        Ok(self.members.remove(at))
    }

    pub fn get(&self, id: OccupantId) -> Option<&Arc<dyn Occupant>> {
        self.members.iter().find(|m| m.id() == id)
    }

    /// The member drawn on top at `point`, if any covers it.
    pub fn occupant_at(&self, point: Point) -> Option<&Arc<dyn Occupant>> {
        self.members.iter().rev().find(|m| m.query(point).is_some())
    }

    pub fn members(&self) -> impl Iterator<Item = &Arc<dyn Occupant>> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl OccupancyQuery for Roster {
    fn contains(&self, id: OccupantId) -> bool {
        self.get(id).is_some()
    }

    /// The background never counts as occupying anything.
    fn is_occupied(&self, point: Point) -> bool {
        self.occupant_at(point).is_some()
    }
}

impl TurnContext for Roster {
    fn end_turn(&mut self) -> Result<(), EngineError> {
        self.compositor.flush()
    }
}
