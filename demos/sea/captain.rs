use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use tileport::geometry::Direction;
use tileport::occupant::{Entity, Placement};
use tileport::scheduler::{Actor, ActorId, Delay};
use tileport::world::Roster;

/// Sails a ship: mostly straight ahead, sometimes a turn to port or starboard.
pub struct Captain {
    id: ActorId,
    ship: Arc<Entity>,
    rng: StdRng,
}

impl Captain {
    pub fn new(ship: Arc<Entity>) -> Self {
        Self {
            id: ActorId::new(),
            ship,
            rng: StdRng::from_os_rng(),
        }
    }
}

#[async_trait]
impl Actor<Roster> for Captain {
    fn id(&self) -> ActorId {
        self.id
    }

    async fn act(&mut self, sea: &mut Roster) -> anyhow::Result<Delay> {
        let current = self.ship.placement();
        let heading = Direction::from_index(current.orientation);

        let next = if self.rng.random_bool(0.7) {
            Placement::new(current.position + heading.delta(), current.orientation)
        } else {
            let diff = if self.rng.random_bool(0.5) { 1 } else { -1 };
            Placement::new(current.position, heading.turn(diff).index())
        };

        if self.ship.fits(&*sea, next) {
            self.ship.place(next)?;
        }

        tokio::time::sleep(Duration::from_millis(10)).await;
        Ok(100)
    }
}
