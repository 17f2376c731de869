use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::Vec2;
use tilestep_common::settings::TILE_SIZE;
use tilestep_input::{Direction, InputState};
use tilestep_kernel::{Entity, World, resolve};
use tilestep_sim::{Behavior, SimConfig, Simulation, WalkInCircle};
use tilestep_tools::WorldInspector;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tilestep-cli", about = "Headless driver for tilestep collision and simulation")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print engine version and crate info
    Info,
    /// Resolve one displacement of a 20x20 box against a demo wall at x = 30
    Probe {
        #[arg(long, default_value = "0")]
        x: f32,
        #[arg(long, default_value = "0")]
        y: f32,
        #[arg(long, allow_hyphen_values = true)]
        dx: f32,
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        dy: f32,
    },
    /// Step a player and a patrolling npc through a Tiled map
    Simulate {
        /// Tiled infinite-map JSON file
        #[arg(short, long)]
        map: PathBuf,
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "60")]
        ticks: u64,
        /// Optional simulation config JSON
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("tilestep-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("kernel: {}", tilestep_kernel::crate_info());
            println!("tiles: {}", tilestep_tiles::crate_info());
            println!("sim: {}", tilestep_sim::crate_info());
            println!("tools: {}", tilestep_tools::crate_info());
            println!("tile size: {TILE_SIZE}");
        }
        Commands::Probe { x, y, dx, dy } => probe(Vec2::new(x, y), Vec2::new(dx, dy))?,
        Commands::Simulate { map, ticks, config } => simulate(map, ticks, config)?,
    }

    Ok(())
}

fn probe(position: Vec2, dp: Vec2) -> anyhow::Result<()> {
    let mut world = World::new();
    let mover = world.spawn(Entity::boxed("probe", position, Vec2::splat(20.0)).with_speed(1.0));
    world.spawn(Entity::boxed("wall", Vec2::new(30.0, -100.0), Vec2::new(10.0, 200.0)));

    let resolution = resolve(&world, mover, dp)?;
    let applied = resolution.destination - position;
    println!(
        "Probe: from=({:.2}, {:.2}) requested=({:.2}, {:.2})",
        position.x, position.y, dp.x, dp.y
    );
    println!(
        "Resolved: allowed={:.3}/{:.3} applied=({:.3}, {:.3}) blocked={}",
        resolution.allowed,
        resolution.max_distance(),
        applied.x,
        applied.y,
        resolution.is_blocked()
    );
    Ok(())
}

fn simulate(map: PathBuf, ticks: u64, config: Option<PathBuf>) -> anyhow::Result<()> {
    let config = match config {
        Some(path) => SimConfig::load(&path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => SimConfig::default(),
    };
    let tiles = tilestep_tiles::load_map(&map)
        .with_context(|| format!("loading map {}", map.display()))?;

    let mut world = World::with_tiles(tiles);
    let player = world.spawn(Entity::circle("player", Vec2::new(0.0, 0.0), 6.0).with_speed(60.0));
    let npc = Entity::circle("npc", Vec2::new(4.0 * TILE_SIZE, 0.0), 6.0).with_speed(40.0);
    let patrol = WalkInCircle::around(&npc, 3.0 * TILE_SIZE)?;
    let npc = world.spawn(npc);

    tracing::info!(map = %map.display(), ticks, "starting simulation");
    let mut sim = Simulation::new(world, config);
    sim.set_player(player)?;
    sim.attach(npc, Behavior::WalkInCircle(patrol))?;

    // Walk right for the first half, then head back to the spawn point.
    let mut input = InputState {
        direction: Some(Direction::new(1, 0)),
        target: None,
    };
    let mut moved = 0;
    let mut blocked = 0;
    for tick in 0..ticks {
        if tick == ticks / 2 {
            input = InputState::with_target(Vec2::ZERO);
        }
        let stats = sim.update(&mut input)?;
        moved += stats.moved;
        blocked += stats.blocked;
    }

    println!("Simulated {} ticks: moves={moved} blocked={blocked}", sim.tick());
    println!("{}", WorldInspector::summary(sim.world()));
    for id in WorldInspector::list_entities(sim.world()) {
        if let Some(info) = WorldInspector::inspect_entity(sim.world(), id) {
            println!("  {info}");
        }
    }
    Ok(())
}
