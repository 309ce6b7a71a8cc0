//! Burrow Headless Simulation Harness
//!
//! Drives a colony through the tick clock with no rendering, prints periodic
//! population stats, then checks the colony invariants on the final state.
//!
//! Usage:
//!   cargo run -p burrow-simtest
//!   cargo run -p burrow-simtest -- --ticks 5000 --creatures 40 --verbose
//!   cargo run -p burrow-simtest -- --json > snapshot.json

use std::collections::HashSet;
use std::path::PathBuf;

use burrow_core::prelude::*;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Run a burrow colony headless and validate it
#[derive(Parser, Debug)]
#[command(name = "burrow-simtest")]
#[command(about = "Run a creature colony headless and check its invariants")]
struct Args {
    /// Random seed for reproducible runs
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 2000)]
    ticks: u64,

    /// Tick rate the clock runs at (ticks per simulated second)
    #[arg(long, default_value_t = 10)]
    rate: u32,

    /// TOML config file; defaults are used for anything it leaves out
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the initial population
    #[arg(long)]
    creatures: Option<usize>,

    /// Print a stats line every N ticks (0 disables)
    #[arg(long, default_value_t = 250)]
    report_every: u64,

    /// Print the final snapshot as JSON instead of the check summary
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Show passing checks too
    #[arg(long, short = 'v', default_value_t = false)]
    verbose: bool,
}

// ── Check harness ───────────────────────────────────────────────────────

struct CheckResult {
    name: String,
    passed: bool,
    detail: String,
}

fn check(name: &str, passed: bool, detail: String) -> CheckResult {
    CheckResult {
        name: name.into(),
        passed,
        detail,
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match SimConfig::load(path) {
            Ok(c) => c,
            Err(e) => {
                error!("Failed to load {}: {}", path.display(), e);
                std::process::exit(2);
            }
        },
        None => SimConfig::default(),
    };
    if let Some(n) = args.creatures {
        config.world.initial_creatures = n;
    }

    let mut env = match Environment::new(config.clone(), args.seed) {
        Ok(env) => env,
        Err(e) => {
            error!("Failed to create colony: {}", e);
            std::process::exit(2);
        }
    };
    env.set_tick_rate(args.rate.max(1));
    info!(
        "Running {} ticks at {} ticks/s, seed {}",
        args.ticks,
        env.tick_rate(),
        args.seed
    );

    run(&mut env, &args);

    if args.json {
        match serde_json::to_string_pretty(&env.snapshot()) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialize snapshot: {}", e);
                std::process::exit(2);
            }
        }
        return;
    }

    println!("=== Burrow Simulation Harness ===\n");
    let mut results = Vec::new();
    results.extend(validate_occupancy(&env));
    results.extend(validate_creatures(&env));
    results.extend(validate_eggs(&env));
    results.extend(validate_zones(&env));
    results.extend(validate_determinism(&config, &args));
    results.extend(validate_pause(&config, args.seed));

    // ── Summary ──
    println!("\n{}", PopulationStats::collect(&env));
    let lifecycle = env.lifecycle();
    println!(
        "births {} | hatched {} | eggs laid {} | deaths {} (old age {}, starvation {}, unknown {}) | removed {}",
        lifecycle.births,
        lifecycle.hatched,
        lifecycle.eggs_laid,
        lifecycle.deaths(),
        lifecycle.deaths_old_age,
        lifecycle.deaths_starvation,
        lifecycle.deaths_unknown,
        lifecycle.removed,
    );

    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.len() - passed;
    println!();
    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || args.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }
    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed,
        results.len(),
        failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

/// Feed the clock fixed frames of wall time until the tick budget is spent.
fn run(env: &mut Environment, args: &Args) {
    let mut clock = TickClock::new();
    let frame = 1.0 / 60.0;
    let mut next_report = args.report_every;

    while env.tick() < args.ticks {
        clock.advance(env, frame);
        if args.report_every > 0 && env.tick() >= next_report {
            info!("{}", PopulationStats::collect(env));
            next_report += args.report_every;
        }
    }
}

// ── 1. Occupancy ────────────────────────────────────────────────────────

fn validate_occupancy(env: &Environment) -> Vec<CheckResult> {
    println!("--- Occupancy ---");
    let mut results = Vec::new();

    let mut cells = HashSet::new();
    let mut collisions = 0;
    let mut mismatches = 0;
    for &e in env.creatures().iter().chain(env.eggs()) {
        let Some(pos) = env.position(e) else {
            mismatches += 1;
            continue;
        };
        if !cells.insert(pos) {
            collisions += 1;
        }
        if env.grid().get(pos) != Some(e) {
            mismatches += 1;
        }
    }

    results.push(check(
        "occupancy_unique_cells",
        collisions == 0,
        format!("{} entities, {} shared cells", cells.len(), collisions),
    ));
    results.push(check(
        "occupancy_grid_matches_arena",
        mismatches == 0 && env.grid().len() == env.creatures().len() + env.eggs().len(),
        format!("{} grid entries, {} mismatches", env.grid().len(), mismatches),
    ));
    results.push(check(
        "occupancy_in_bounds",
        cells.iter().all(|p| env.bounds().contains(*p)),
        format!("grid {}x{}", env.bounds().width, env.bounds().height),
    ));
    results
}

// ── 2. Creatures ────────────────────────────────────────────────────────

fn validate_creatures(env: &Environment) -> Vec<CheckResult> {
    println!("--- Creatures ---");
    let mut results = Vec::new();
    let creatures: Vec<Creature> = env
        .creatures()
        .iter()
        .filter_map(|&e| env.creature(e))
        .collect();

    let out_of_range = creatures
        .iter()
        .filter(|c| {
            [c.health, c.energy, c.hunger, c.happiness]
                .iter()
                .any(|s| !(0.0..=100.0).contains(s))
        })
        .count();
    results.push(check(
        "creature_stats_bounded",
        out_of_range == 0,
        format!("{} creatures, {} out of range", creatures.len(), out_of_range),
    ));

    let bad_dead = creatures
        .iter()
        .filter(|c| c.dead && (c.health != 0.0 || c.death_cause.is_none() || c.food_value < 0.0))
        .count();
    results.push(check(
        "dead_have_cause_and_no_health",
        bad_dead == 0,
        format!("{} inconsistent corpses", bad_dead),
    ));

    let bad_carry = creatures
        .iter()
        .filter(|c| c.carrying_food)
        .filter(|c| {
            !c.target
                .creature()
                .is_some_and(|body| env.creature(body).is_some_and(|b| b.dead))
        })
        .count();
    results.push(check(
        "carriers_hold_corpses",
        bad_carry == 0,
        format!("{} carriers without a corpse", bad_carry),
    ));

    let max_age = env.config().creature.max_max_age;
    let too_old = creatures
        .iter()
        .filter(|c| c.is_alive() && c.age >= max_age)
        .count();
    results.push(check(
        "no_live_creature_past_lifespan",
        too_old == 0,
        format!("{} past {} ticks", too_old, max_age),
    ));
    results
}

// ── 3. Eggs ─────────────────────────────────────────────────────────────

fn validate_eggs(env: &Environment) -> Vec<CheckResult> {
    println!("--- Eggs ---");
    let mut results = Vec::new();

    let mut pending_per_parent = std::collections::HashMap::new();
    let mut bad_timer = 0;
    for egg in env.eggs().iter().filter_map(|&e| env.egg(e)) {
        if egg.timer > egg.hatch_time || egg.ready_to_hatch != (egg.timer >= egg.hatch_time) {
            bad_timer += 1;
        }
        if let (Some(parent), false) = (egg.parent, egg.ready_to_hatch) {
            *pending_per_parent.entry(parent).or_insert(0) += 1;
        }
    }
    results.push(check(
        "egg_timers_consistent",
        bad_timer == 0,
        format!("{} eggs, {} inconsistent", env.eggs().len(), bad_timer),
    ));

    let doubled = pending_per_parent.values().filter(|n| **n > 1).count();
    results.push(check(
        "single_pending_egg_per_parent",
        doubled == 0,
        format!("{} parents with more than one pending egg", doubled),
    ));

    let overdone = env
        .eggs()
        .iter()
        .filter_map(|&e| env.egg(e))
        .filter(|egg| egg.progress() > 100.0)
        .count();
    results.push(check(
        "egg_progress_capped",
        overdone == 0,
        format!("{} eggs past 100%", overdone),
    ));
    results
}

// ── 4. Zones ────────────────────────────────────────────────────────────

fn validate_zones(env: &Environment) -> Vec<CheckResult> {
    println!("--- Zones ---");
    let max = env.config().zones.max_scale;
    ZoneKind::ALL
        .iter()
        .map(|&kind| {
            let scale = env.zones().scale(kind);
            check(
                &format!("zone_{}_scale", kind),
                (1.0..=max).contains(&scale),
                format!("scale {:.3}, radius {:.2}", scale, env.zones().get(kind).radius()),
            )
        })
        .collect()
}

// ── 5. Determinism ──────────────────────────────────────────────────────

fn validate_determinism(config: &SimConfig, args: &Args) -> Vec<CheckResult> {
    println!("--- Determinism ---");
    let ticks = args.ticks.min(300);
    let run_once = || -> Option<String> {
        let mut env = Environment::new(config.clone(), args.seed).ok()?;
        for _ in 0..ticks {
            env.update(0.1);
        }
        serde_json::to_string(&env.snapshot()).ok()
    };

    let a = run_once();
    let b = run_once();
    vec![check(
        "same_seed_same_history",
        a.is_some() && a == b,
        format!("{} ticks replayed twice", ticks),
    )]
}

// ── 6. Pause ────────────────────────────────────────────────────────────

fn validate_pause(config: &SimConfig, seed: u64) -> Vec<CheckResult> {
    println!("--- Pause ---");
    let mut results = Vec::new();
    let Ok(mut env) = Environment::new(config.clone(), seed) else {
        return vec![check("pause_colony", false, "could not create colony".into())];
    };
    let before = serde_json::to_string(&env.snapshot()).ok();

    env.set_tick_rate(0);
    let mut clock = TickClock::new();
    let ran: u32 = (0..120).map(|_| clock.advance(&mut env, 1.0 / 60.0)).sum();
    let after = serde_json::to_string(&env.snapshot()).ok();
    results.push(check(
        "pause_freezes_state",
        ran == 0 && before.is_some() && before == after,
        format!("{} ticks ran while paused", ran),
    ));

    let ages: Vec<u32> = env
        .creatures()
        .iter()
        .filter_map(|&e| env.creature(e))
        .map(|c| c.age)
        .collect();
    env.update(0.1);
    let aged = env
        .creatures()
        .iter()
        .filter_map(|&e| env.creature(e))
        .zip(ages)
        .all(|(c, before)| c.dead || c.age == before + 1);
    results.push(check(
        "single_update_ages_everyone",
        aged,
        format!("{} creatures", env.creatures().len()),
    ));
    results
}
