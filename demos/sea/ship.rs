use std::sync::Arc;
use tileport::geometry::{Cell, Footprint, Point};
use tileport::occupant::{Entity, Placement};
use tileport::render::RenderDatum;

pub const BLUE: u8 = 99;
pub const BROWN_LIGHT: u8 = 179;

/// Bow pointing north-west.
const DIAGONAL: &str = r"
111
1111
11111
 1111
  11
";

/// Bow pointing north.
const STRAIGHT: &str = r"
  1
 111
 111
11111
 111
 111
";

fn hull(template: &str, origin: Point) -> Footprint<Cell> {
    Footprint::from_template(template, origin, |kind| {
        Some(Cell {
            kind,
            datum: RenderDatum::new(0, 0, BROWN_LIGHT),
        })
    })
}

/// A ship with one hull per compass direction, orientation `i` facing `Direction::from_index(i)`.
pub fn ship(position: Point, orientation: usize) -> Arc<Entity> {
    let bases = [hull(DIAGONAL, Point::new(2, 2)), hull(STRAIGHT, Point::new(2, 3))];
    let entity = Entity::new(Footprint::orientations(&bases, 8)).with_placement(Placement::new(position, orientation));
    Arc::new(entity)
}
