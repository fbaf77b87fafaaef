//! Locomotion Sim - headless controller playground
//!
//! Run with: `cargo run --bin locomotion_sim -- --scenario wallrun`
//!
//! Builds a small arena (floor plus one long wall on the right), drives the
//! controller with scripted input and prints every locomotion event.
//!
//! Scenarios:
//! - run: sprint forward, then let go and brake
//! - jump: run, jump, double jump at the apex, land
//! - wallrun: jump and strafe into the wall, run along it, kick off

use std::cell::Cell;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::rc::Rc;

use clap::{Parser, ValueEnum};
use glam::{Vec2, Vec3};

use wallrun_engine::input::InputFrame;
use wallrun_engine::physics::{CharacterBody, ColliderTags, SimBody, StaticWorld};
use wallrun_engine::player::{ContactBatch, LocomotionConfig, MotionStateMachine};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Scenario {
    Run,
    Jump,
    Wallrun,
}

/// Headless first-person locomotion simulation
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Tuning file (JSON). Missing sections use defaults.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Number of fixed ticks to simulate
    #[arg(long, default_value_t = 300)]
    ticks: u32,

    /// Fixed tick length in seconds
    #[arg(long, default_value_t = 0.02)]
    dt: f32,

    /// Scripted input to run
    #[arg(long, value_enum, default_value_t = Scenario::Wallrun)]
    scenario: Scenario,

    /// Print the default tuning as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

/// Floor at y = 0 and a tall wall along Z at x = 3.
fn build_arena() -> StaticWorld {
    let mut world = StaticWorld::new();
    world.add_floor(0.0, 60.0);
    world.add_box_with(
        Vec3::new(3.0, 0.0, -60.0),
        Vec3::new(4.0, 12.0, 20.0),
        ColliderTags::NONE,
        1,
    );
    // Short pillar nobody may run on
    world.add_box_with(
        Vec3::new(-4.0, 0.0, -10.0),
        Vec3::new(-3.0, 6.0, -9.0),
        ColliderTags {
            no_wallrun: true,
            ..Default::default()
        },
        1,
    );
    world
}

fn scripted_input(scenario: Scenario, tick: u32, config: &LocomotionConfig) -> InputFrame {
    let input = &config.input;
    // (axes, jump, crouch, sprint)
    let (axes, jump, crouch, sprint) = match scenario {
        Scenario::Run => match tick {
            0..100 => (Vec2::Y, false, false, true),
            _ => (Vec2::ZERO, false, false, false),
        },
        Scenario::Jump => match tick {
            0..30 => (Vec2::Y, false, false, true),
            30 => (Vec2::Y, true, false, true),
            75 => (Vec2::new(1.0, 0.0), true, false, false),
            _ => (Vec2::Y, false, false, false),
        },
        Scenario::Wallrun => match tick {
            0..20 => (Vec2::Y, false, false, true),
            20 => (Vec2::Y, true, false, true),
            21..45 => (Vec2::new(1.0, 1.0), false, false, false),
            45..140 => (Vec2::Y, false, false, false),
            140 => (Vec2::Y, true, false, false),
            _ => (Vec2::Y, false, false, false),
        },
    };
    InputFrame::from_axes(axes, 0.0, jump, crouch, sprint, input)
}

fn load_config(path: Option<&PathBuf>) -> LocomotionConfig {
    match path {
        Some(path) => match LocomotionConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => LocomotionConfig::default(),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if cli.dump_config {
        match LocomotionConfig::default().to_json() {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    let config = load_config(cli.config.as_ref());
    if let Err(e) = config.validate() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let world = build_arena();
    let mut body = SimBody::standing_on(
        0.0,
        0.0,
        0.0,
        config.capsule.radius,
        config.capsule.standing_height,
    );
    let mut controller = MotionStateMachine::spawn(config, &world, &body);
    log::info!(
        "scenario {:?}: {} ticks at {}s, starting {}",
        cli.scenario,
        cli.ticks,
        cli.dt,
        controller.mode()
    );

    let max_tilt = Rc::new(Cell::new(0.0f32));
    let sink = Rc::clone(&max_tilt);
    controller
        .events_mut()
        .subscribe_tilt(move |tilt| sink.set(sink.get().max(tilt.abs())));

    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
    let mut contacts = ContactBatch::new();
    let mut top_speed = 0.0f32;

    for tick in 0..cli.ticks {
        let frame = scripted_input(cli.scenario, tick, controller.config());
        let report = controller.tick(&world, &mut body, &frame, &contacts, cli.dt);
        contacts = body.step(&world, cli.dt).into();

        for event in &report.events {
            let p = body.position();
            let v = body.velocity();
            println!(
                "[{:>4}] {:<14} pos=({:6.2}, {:5.2}, {:6.2}) speed={:5.2} mode={}",
                tick,
                event.to_string(),
                p.x,
                p.y,
                p.z,
                v.length(),
                report.mode
            );
            *counts.entry(event.to_string()).or_default() += 1;
        }

        let v = body.velocity();
        top_speed = top_speed.max(Vec3::new(v.x, 0.0, v.z).length());
    }

    let p = body.position();
    println!();
    println!("final mode     {}", controller.mode());
    println!("final position ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z);
    println!("top speed      {:.2} m/s", top_speed);
    println!("max tilt       {:.2}", max_tilt.get());
    for (event, count) in &counts {
        println!("{:<14} {}", event, count);
    }
}
