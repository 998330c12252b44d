//! Engine configuration.
//!
//! `EngineConfig` controls the initial viewport of a [`Compositor`](crate::render::Compositor),
//! the layer a [`Roster`](crate::world::Roster) places its members on, and whether draws are
//! coalesced per scheduling tick.
//!
//! `EngineConfig` provides defaults via [`Default`] and a fluent [`EngineConfig::builder()`]
//! with validation.
//!
//! # Examples
//!
//! ## Use defaults
//! ```rust
//! use tileport::config::EngineConfig;
//! let cfg = EngineConfig::default();
//! assert_eq!(cfg.tile_count.width, 81);
//! assert_eq!(cfg.occupant_layer, 1);
//! ```
//!
//! ## Customize with the builder
//! ```rust
//! use tileport::config::EngineConfig;
//! use tileport::geometry::Point;
//! use tileport::render::TileExtent;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = EngineConfig::builder()
//!     .tile_count(TileExtent::new(41, 21))
//!     .center(Point::new(10, -4))
//!     .coalesce_tiles(false)
//!     .build()?; // returns Result<EngineConfig, ConfigError>
//! # Ok(()) }
//! ```
//!
//! # Fields (summary)
//! - `tile_count`: viewport extent in tiles (default: 81x41).
//! - `center`: initial viewport center in world coordinates (default: origin).
//! - `occupant_layer`: layer roster members are registered on (default: 1).
//! - `coalesce_tiles`: hold draws back until the end of each tick (default: `true`).
//!
//! # Errors
//!
//! Builder validation returns [`ConfigError`] when the extent is empty in either axis or the
//! occupant layer would share layer `0` with the background.

use crate::geometry::Point;
use crate::render::TileExtent;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Layer the world background lives on.
pub const BACKGROUND_LAYER: usize = 0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub tile_count: TileExtent,
    pub center: Point,
    pub occupant_layer: usize,
    pub coalesce_tiles: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tile_count: TileExtent::new(81, 41),
            center: Point::ORIGIN,
            occupant_layer: 1,
            coalesce_tiles: true,
        }
    }
}

impl EngineConfig {
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Checks a config that did not come through the builder (e.g. deserialized).
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate(self)
    }
}

/// Builder for [`EngineConfig`].
#[derive(Debug, Clone, Default)]
pub struct EngineConfigBuilder {
    inner: EngineConfig,
}

impl EngineConfigBuilder {
    #[inline]
    fn map(mut self, f: impl FnOnce(&mut EngineConfig)) -> Self {
        f(&mut self.inner);
        self
    }

    pub fn tile_count(self, extent: TileExtent) -> Self { self.map(|c| c.tile_count = extent) }
    pub fn center(self, center: Point) -> Self { self.map(|c| c.center = center) }
    pub fn occupant_layer(self, layer: usize) -> Self { self.map(|c| c.occupant_layer = layer) }
    pub fn coalesce_tiles(self, on: bool) -> Self { self.map(|c| c.coalesce_tiles = on) }

    /// Apply multiple changes in one go.
    pub fn with(self, f: impl FnOnce(&mut EngineConfig)) -> Self { self.map(f) }

    /// Validate and build the final config.
    pub fn build(self) -> Result<EngineConfig, ConfigError> {
        validate(&self.inner)?;
        Ok(self.inner)
    }
}

// ---------- Validation ----------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyExtent(TileExtent),
    OccupantLayerShadowsBackground,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyExtent(extent) =>
                write!(f, "tile_count {}x{} is empty", extent.width, extent.height),
            ConfigError::OccupantLayerShadowsBackground =>
                write!(f, "occupant_layer must be above the background layer {BACKGROUND_LAYER}"),
        }
    }
}
impl std::error::Error for ConfigError {}

fn validate(c: &EngineConfig) -> Result<(), ConfigError> {
    if c.tile_count.is_empty() {
        return Err(ConfigError::EmptyExtent(c.tile_count));
    }
    if c.occupant_layer <= BACKGROUND_LAYER {
        return Err(ConfigError::OccupantLayerShadowsBackground);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = EngineConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.tile_count, TileExtent::new(81, 41));
        assert_eq!(cfg.center, Point::ORIGIN);
        assert!(cfg.coalesce_tiles);
    }

    #[test]
    fn builder_rejects_invalid_values() {
        let err = EngineConfig::builder().tile_count(TileExtent::new(0, 10)).build().unwrap_err();
        assert_eq!(err, ConfigError::EmptyExtent(TileExtent::new(0, 10)));

        let err = EngineConfig::builder().occupant_layer(0).build().unwrap_err();
        assert_eq!(err, ConfigError::OccupantLayerShadowsBackground);
    }

    #[test]
    fn with_applies_several_changes() {
        let cfg = EngineConfig::builder()
            .with(|c| {
                c.occupant_layer = 3;
                c.center = Point::new(1, 2);
            })
            .build()
            .unwrap();
        assert_eq!(cfg.occupant_layer, 3);
        assert_eq!(cfg.center, Point::new(1, 2));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: EngineConfig = serde_json::from_str(r#"{ "center": { "x": 4, "y": -2 } }"#).unwrap();
        assert_eq!(cfg.center, Point::new(4, -2));
        assert_eq!(cfg.tile_count, EngineConfig::default().tile_count);
        assert!(cfg.validate().is_ok());
    }
}
