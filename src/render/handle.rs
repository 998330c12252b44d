use crate::errors::EngineError;
use crate::geometry::Point;
use crate::occupant::{Occupant, OccupantId};
use crate::render::{Compositor, RenderDatum, Viewport, ViewportConfig};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

/// Shared, cloneable access to a [`Compositor`].
///
/// Registering an occupant through the handle also hands the occupant a [`WeakCompositor`],
/// which it uses to report itself dirty when it moves. Occupant callbacks must not be invoked
/// while the compositor lock is held by the same thread.
#[derive(Clone)]
pub struct CompositorHandle {
    inner: Arc<Mutex<Compositor>>,
}

/// Non-owning back-reference from an occupant to the compositor it is registered with.
#[derive(Clone, Default)]
pub struct WeakCompositor {
    inner: Weak<Mutex<Compositor>>,
}

impl std::fmt::Debug for CompositorHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositorHandle")
            .field("strong", &Arc::strong_count(&self.inner))
            .finish()
    }
}

impl std::fmt::Debug for WeakCompositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeakCompositor")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl CompositorHandle {
    pub fn new(compositor: Compositor) -> Self {
        Self {
            inner: Arc::new(Mutex::new(compositor)),
        }
    }

    pub fn downgrade(&self) -> WeakCompositor {
        WeakCompositor {
            inner: Arc::downgrade(&self.inner),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Compositor>, EngineError> {
        self.inner.lock().map_err(|_| EngineError::Poisoned)
    }

    /// Runs `f` with exclusive access to the compositor.
    pub fn with<R>(&self, f: impl FnOnce(&mut Compositor) -> R) -> Result<R, EngineError> {
        let mut guard = self.lock()?;
        Ok(f(&mut guard))
    }

    /// Adds the occupant to `layer` and registers this compositor as its render target.
    pub fn add_occupant(&self, occupant: Arc<dyn Occupant>, layer: usize) -> Result<(), EngineError> {
        let result = self.lock()?.add_occupant(occupant.clone(), layer);
        if let Err(EngineError::DuplicateOccupant(_)) = result {
            return result;
        }

        // The record exists even when painting failed, so the occupant is registered either way.
        occupant.attach(Some(self.downgrade()));
        result
    }

    /// Removes the occupant and detaches it from this compositor. A failed removal leaves it
    /// registered and attached.
    pub fn remove_occupant(&self, id: OccupantId) -> Result<Arc<dyn Occupant>, EngineError> {
        let occupant = self.lock()?.remove_occupant(id)?;
        occupant.attach(None);
        Ok(occupant)
    }

    pub fn mark_dirty(&self, id: OccupantId) -> Result<(), EngineError> {
        self.lock()?.mark_dirty(id)
    }

    pub fn repaint_all(&self) -> Result<(), EngineError> {
        self.lock()?.repaint_all();
        Ok(())
    }

    pub fn resolve_topmost(&self, point: Point) -> Result<RenderDatum, EngineError> {
        self.lock()?.resolve_topmost(point)
    }

    pub fn set_center(&self, center: Point) -> Result<(), EngineError> {
        self.lock()?.set_center(center);
        Ok(())
    }

    pub fn configure(&self, config: ViewportConfig) -> Result<(), EngineError> {
        self.lock()?.configure(config);
        Ok(())
    }

    pub fn viewport(&self) -> Result<Viewport, EngineError> {
        Ok(self.lock()?.viewport())
    }

    pub fn contains(&self, id: OccupantId) -> Result<bool, EngineError> {
        Ok(self.lock()?.contains(id))
    }

    pub fn flush(&self) -> Result<(), EngineError> {
        self.lock()?.flush();
        Ok(())
    }
}

impl WeakCompositor {
    /// Returns a strong handle while the compositor is still alive.
    pub fn upgrade(&self) -> Option<CompositorHandle> {
        self.inner.upgrade().map(|inner| CompositorHandle { inner })
    }
}
