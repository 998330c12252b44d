//! Four ships sailing on open water, printed as a glyph map once the captains are done.
//!
//! Usage: `cargo run --example sea [seconds]`

mod captain;
mod ship;

use captain::Captain;
use std::sync::Arc;
use std::time::Duration;
use tileport::config::EngineConfig;
use tileport::geometry::Point;
use tileport::occupant::Background;
use tileport::render::sinks::grid::GridSink;
use tileport::render::{Compositor, CompositorHandle, RenderDatum};
use tileport::scheduler::Scheduler;
use tileport::world::Roster;
use tileport::EngineError;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<(), EngineError> {
    env_logger::init();

    let seconds = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(2);

    let config = EngineConfig::builder()
        .build()
        .expect("Configuration is not valid");
    log::info!("config: {}", serde_json::to_string(&config).unwrap_or_default());

    let compositor = CompositorHandle::new(Compositor::with_config(&config, Box::new(GridSink::new(config.tile_count))));
    let water = Arc::new(Background::solid(RenderDatum::new(0, 0, ship::BLUE)));
    let mut sea = Roster::new(compositor.clone(), water, &config)?;

    let mut scheduler: Scheduler<Roster> = Scheduler::new();
    for i in [-1, 1] {
        for j in [-1, 1] {
            let orientation = rand::random_range(0..8);
            let vessel = ship::ship(Point::new(i * 15, j * 15), orientation);
            sea.add(vessel.clone())?;
            scheduler.enqueue(Box::new(Captain::new(vessel)), 0);
        }
    }

    // Stop the captains after a while; a turn in progress is always finished first.
    let cancel = CancellationToken::new();
    let stop = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(seconds)).await;
        stop.cancel();
    });

    let outcome = scheduler.run(&mut sea, &cancel).await?;
    println!("{} turns played", outcome.turns());

    let map = compositor.with(|c| {
        c.sink_as::<GridSink>()
            .map(|grid| grid.render_glyphs(|d| if d.bg == ship::BROWN_LIGHT { '#' } else { '~' }))
            .unwrap_or_default()
    })?;
    println!("{map}");

    Ok(())
}
