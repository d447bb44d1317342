//! smallnet — smallest runnable example of the linkflow engine.
//!
//! Four stations on a line ship two cargos across a hand-built link
//! network: passengers (symmetric) between the towns, and ore
//! (antisymmetric) from a mine at one end to a mill at the other.  The
//! engine recalculates each cargo's link graph on its scheduled days; the
//! program prints every station's routing tables at the end.
//!
//! Run with `RUST_LOG=debug` to watch jobs spawn and join.

use lf_core::{CargoId, DistributionShape, EngineConfig, FlowResult, TICKS_PER_DAY, Tick};
use lf_engine::DistributionEngine;
use lf_world::{MapPos, World};

// ── Constants ─────────────────────────────────────────────────────────────────

const PASSENGERS: CargoId = CargoId(0);
const ORE: CargoId = CargoId(1);
const SIM_DAYS: u64 = 30;

fn main() -> FlowResult<()> {
    env_logger::init();

    // ── World: four stations on a line, fully linked pairwise hops ────────
    let mut world = World::new(2);
    let towns = [
        world.add_station(MapPos::new(0, 0)),
        world.add_station(MapPos::new(20, 0)),
        world.add_station(MapPos::new(40, 0)),
        world.add_station(MapPos::new(60, 0)),
    ];
    for pair in towns.windows(2) {
        let (here, there) = (pair[0], pair[1]);
        for cargo in [PASSENGERS, ORE] {
            world.set_link(here, there, cargo, 60);
            world.set_link(there, here, cargo, 60);
        }
    }
    for &town in &towns {
        world.set_supply(town, PASSENGERS, 40);
        world.set_acceptance(town, PASSENGERS, true);
    }
    // Ore: produced at the first station, consumed at the last.
    world.set_supply(towns[0], ORE, 100);
    world.set_acceptance(towns[3], ORE, true);

    // ── Engine ────────────────────────────────────────────────────────────
    let mut config = EngineConfig::new(2);
    config.shapes[0] = DistributionShape::Symmetric;
    config.shapes[1] = DistributionShape::Antisymmetric;
    config.settings.accuracy = 4;
    config.settings.recalc_interval = 4;
    let average_length = config.settings.moving_average_length;
    let mut engine = DistributionEngine::new(config)?;

    // ── Host loop ─────────────────────────────────────────────────────────
    for tick in 0..SIM_DAYS * TICKS_PER_DAY as u64 {
        let tick = Tick(tick);
        world.run_link_averages(tick, average_length);
        // Vehicles would refresh link capacities; stand in for them once a
        // day so the averages do not decay to nothing.
        if tick.day_fract() == 0 {
            for pair in towns.windows(2) {
                for cargo in [PASSENGERS, ORE] {
                    world.record_capacity(pair[0], pair[1], cargo, 10);
                    world.record_capacity(pair[1], pair[0], cargo, 10);
                }
            }
        }
        engine.on_tick(tick, &mut world);
    }

    // ── Results ───────────────────────────────────────────────────────────
    for (name, cargo) in [("passengers", PASSENGERS), ("ore", ORE)] {
        println!("== {name} ==");
        for &station in &towns {
            let Some(table) = world.routing_table(station, cargo) else { continue };
            if table.is_empty() {
                continue;
            }
            println!("station {}:", station.0);
            for (source, stats) in table {
                for stat in stats {
                    println!(
                        "  from {:>2}: via {:>2}  planned {:>4}  (length {})",
                        source.0, stat.via.0, stat.planned, stat.length
                    );
                }
            }
        }
    }
    Ok(())
}
