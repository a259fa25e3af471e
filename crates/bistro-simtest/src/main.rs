//! Bistro Headless Session Harness
//!
//! Validates pure restaurant logic, then plays full sessions with an
//! autopilot waiter. Runs entirely in-process on a virtual clock, no
//! rendering and no real timers.
//!
//! Usage:
//!   cargo run -p bistro-simtest
//!   cargo run -p bistro-simtest -- --verbose
//!   cargo run -p bistro-simtest -- --seed 7 --config data/default_config.json

use bistro_core::config::{config_from_json, load_config};
use bistro_core::persistence::new_slot_name;
use bistro_core::prelude::*;
use bistro_logic::config::{validate_config, GameConfig};
use bistro_logic::economy::{upgrade_cost, Ledger, UpgradeKind, Upgrades};
use bistro_logic::geometry::Point;
use bistro_logic::grid::Cell;
use bistro_logic::interaction::InteractTarget;
use bistro_logic::layout::RestaurantLayout;
use bistro_logic::orders::{Dish, Holding, OrderError, TableOrder};
use bistro_logic::pathfinding::find_path;
use bistro_logic::status::Status;

// ── Default config (same JSON the hosts ship) ───────────────────────────
const DEFAULT_CONFIG_JSON: &str = include_str!("../../../data/default_config.json");

/// Virtual frame length used by session runs.
const FRAME_MS: u64 = 33;
/// Length of an autopilot session.
const SESSION_MS: u64 = 5 * 60 * 1000;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

struct Options {
    verbose: bool,
    seed: u64,
    config: Option<String>,
}

fn parse_args() -> Options {
    let mut options = Options {
        verbose: false,
        seed: rand::random(),
        config: None,
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--verbose" => options.verbose = true,
            "--seed" => match args.next().and_then(|s| s.parse().ok()) {
                Some(seed) => options.seed = seed,
                None => eprintln!("--seed needs a number"),
            },
            "--config" => options.config = args.next(),
            other => eprintln!("Ignoring unknown argument {}", other),
        }
    }
    options
}

fn main() {
    let options = parse_args();
    let level = if options.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    println!("=== Bistro Session Harness ===");
    println!("seed {}\n", options.seed);

    let mut results = Vec::new();

    // 1. Configuration
    let config = match validate_configuration(&options, &mut results) {
        Some(config) => config,
        None => GameConfig::default(),
    };

    // 2. Navigation grid and planner
    results.extend(validate_navigation(&config, options.verbose));

    // 3. Economy and upgrades
    results.extend(validate_economy());

    // 4. Order state machine
    results.extend(validate_order_lifecycle());

    // 5. Save slots on disk
    results.extend(validate_save_slots());

    // 6. Autopilot sessions
    results.extend(validate_sessions(&config, options.seed, options.verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || options.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Configuration ────────────────────────────────────────────────────

fn validate_configuration(options: &Options, results: &mut Vec<TestResult>) -> Option<GameConfig> {
    println!("--- Configuration ---");

    let shipped = config_from_json(DEFAULT_CONFIG_JSON);
    results.push(TestResult {
        name: "config_shipped_parses".into(),
        passed: shipped.is_ok(),
        detail: match &shipped {
            Ok(_) => "data/default_config.json is valid".into(),
            Err(e) => e.to_string(),
        },
    });
    if let Ok(shipped) = &shipped {
        results.push(TestResult {
            name: "config_shipped_matches_defaults".into(),
            passed: *shipped == GameConfig::default(),
            detail: "shipped JSON equals built-in defaults".into(),
        });
    }

    let defaults_valid = validate_config(&GameConfig::default());
    results.push(TestResult {
        name: "config_defaults_valid".into(),
        passed: defaults_valid.is_empty(),
        detail: format!("{} validation errors", defaults_valid.len()),
    });

    let inverted = GameConfig {
        respawn_min_ms: 9_000,
        respawn_max_ms: 1_000,
        ..Default::default()
    };
    results.push(TestResult {
        name: "config_rejects_inverted_window".into(),
        passed: !validate_config(&inverted).is_empty(),
        detail: "respawn 9000..1000 is flagged".into(),
    });

    let mut config = match &options.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                results.push(TestResult {
                    name: "config_file".into(),
                    passed: false,
                    detail: format!("{}: {}", path, e),
                });
                return None;
            }
        },
        None => shipped.ok()?,
    };
    config.seed = Some(options.seed);
    Some(config)
}

// ── 2. Navigation ───────────────────────────────────────────────────────

fn validate_navigation(config: &GameConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Navigation ---");
    let mut results = Vec::new();

    let layout = RestaurantLayout::new(config.world_width, config.world_height);
    let grid = layout.build_grid(config.cell_size);

    results.push(TestResult {
        name: "nav_grid_size".into(),
        passed: grid.cols() > 0 && grid.rows() > 0,
        detail: format!(
            "{}x{} cells, {} blocked",
            grid.cols(),
            grid.rows(),
            grid.blocked_count()
        ),
    });

    let spawn_free = grid.is_free(grid.world_to_cell(layout.spawn));
    results.push(TestResult {
        name: "nav_spawn_walkable".into(),
        passed: spawn_free,
        detail: format!("spawn at ({:.0}, {:.0})", layout.spawn.x, layout.spawn.y),
    });

    let mut unreachable = Vec::new();
    let mut bad_steps = 0;
    for table in 0..layout.table_count() {
        let Some(seat) = layout.seat(table) else { continue };
        match find_path(&grid, layout.spawn, seat) {
            Some(path) => {
                let cells: Vec<Cell> = path.iter().map(|p| grid.world_to_cell(*p)).collect();
                let mut prev = grid.world_to_cell(layout.spawn);
                for cell in &cells {
                    if prev.manhattan(cell) != 1 || grid.is_blocked(*cell) {
                        bad_steps += 1;
                    }
                    prev = *cell;
                }
                if verbose {
                    println!("  table {}: {} waypoints", table + 1, path.len());
                }
            }
            None => unreachable.push(table + 1),
        }
    }
    results.push(TestResult {
        name: "nav_seats_reachable".into(),
        passed: unreachable.is_empty(),
        detail: if unreachable.is_empty() {
            format!("all {} seats reachable from the door", layout.table_count())
        } else {
            format!("unreachable tables: {:?}", unreachable)
        },
    });
    results.push(TestResult {
        name: "nav_paths_step_free_cells".into(),
        passed: bad_steps == 0,
        detail: format!("{} invalid steps", bad_steps),
    });

    let table_centre = find_path(&grid, layout.spawn, layout.tables[0]);
    results.push(TestResult {
        name: "nav_blocked_goal_none".into(),
        passed: table_centre.is_none(),
        detail: "table centre has no path".into(),
    });

    if verbose {
        println!("{}", grid.to_ascii());
    }

    results
}

// ── 3. Economy ──────────────────────────────────────────────────────────

fn validate_economy() -> Vec<TestResult> {
    println!("--- Economy ---");
    let mut results = Vec::new();

    let rising = UpgradeKind::ALL
        .iter()
        .all(|&kind| (0..10).all(|l| upgrade_cost(kind, l + 1) > upgrade_cost(kind, l)));
    results.push(TestResult {
        name: "economy_costs_rise".into(),
        passed: rising,
        detail: "every upgrade costs more at each level".into(),
    });

    let mut ledger = Ledger::new(50, 1.0, Upgrades::default());
    let first = ledger.buy_upgrade(UpgradeKind::EarnRate);
    let second = ledger.buy_upgrade(UpgradeKind::EarnRate);
    results.push(TestResult {
        name: "economy_purchase_then_refusal".into(),
        passed: first.is_ok()
            && second.is_err()
            && ledger.money() == 15
            && ledger.level(UpgradeKind::EarnRate) == 1,
        detail: format!(
            "money {} level {} next cost {}",
            ledger.money(),
            ledger.level(UpgradeKind::EarnRate),
            ledger.next_cost(UpgradeKind::EarnRate)
        ),
    });

    results.push(TestResult {
        name: "economy_reward_tracks_earn_rate".into(),
        passed: ledger.serve_reward() == 25,
        detail: format!("reward {} at earn rate 1", ledger.serve_reward()),
    });

    let mut fast = Ledger::new(1_000, 1.0, Upgrades::default());
    let base = fast.cook_duration_ms();
    let _ = fast.buy_upgrade(UpgradeKind::OvenSpeed);
    results.push(TestResult {
        name: "economy_oven_speed_shortens_cooking".into(),
        passed: fast.cook_duration_ms() < base,
        detail: format!("{:.0} ms -> {:.0} ms", base, fast.cook_duration_ms()),
    });

    results
}

// ── 4. Order lifecycle ──────────────────────────────────────────────────

fn validate_order_lifecycle() -> Vec<TestResult> {
    println!("--- Order Lifecycle ---");
    let mut results = Vec::new();

    let mut order = TableOrder::new();
    let serve_early = {
        let mut o = TableOrder::new();
        let _ = o.post(Dish::Burger, 10_000);
        o.fulfill(0, Dish::Burger, None)
    };
    results.push(TestResult {
        name: "orders_serve_requires_take".into(),
        passed: serve_early == Err(OrderError::NotTaken),
        detail: format!("{:?}", serve_early),
    });

    let posted = order.post(Dish::Salad, 1_000).is_ok();
    let double_post = order.post(Dish::Soup, 1_000);
    let taken = order.take();
    let expired = (0..10).map(|_| order.tick(100)).last();
    results.push(TestResult {
        name: "orders_post_take_expire".into(),
        passed: posted
            && double_post == Err(OrderError::AlreadyPosted)
            && taken == Ok(Dish::Salad)
            && order.order().is_none(),
        detail: format!("last tick {:?}", expired),
    });

    results
}

// ── 5. Save slots ───────────────────────────────────────────────────────

fn validate_save_slots() -> Vec<TestResult> {
    println!("--- Save Slots ---");
    let mut results = Vec::new();

    let root = std::env::temp_dir().join(format!("bistro-simtest-{}", std::process::id()));
    let mut store = match DirStore::open(&root) {
        Ok(store) => store,
        Err(e) => {
            results.push(TestResult {
                name: "slots_open_dir".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };

    let slot = new_slot_name(1_700_000_000_000);
    let data = SlotData {
        money: 123,
        upgrade_patience: 2,
        ..Default::default()
    };
    let roundtrip = store
        .save(&slot, &data)
        .and_then(|_| store.set_current(&slot))
        .and_then(|_| store.load(&slot));
    results.push(TestResult {
        name: "slots_roundtrip".into(),
        passed: matches!(&roundtrip, Ok(Some(loaded)) if *loaded == data),
        detail: format!("{} -> {:?}", slot, roundtrip.as_ref().map(|d| d.is_some())),
    });

    let continued = store.continue_slot(0);
    results.push(TestResult {
        name: "slots_continue_last".into(),
        passed: continued.as_deref().ok() == Some(slot.as_str()),
        detail: format!("{:?}", continued),
    });

    let deleted = store.delete(&slot).and_then(|_| store.last_slot());
    results.push(TestResult {
        name: "slots_delete_forgets_last".into(),
        passed: matches!(deleted, Ok(None)),
        detail: format!("{:?}", deleted),
    });

    let _ = std::fs::remove_dir_all(&root);
    results
}

// ── 6. Sessions ─────────────────────────────────────────────────────────

/// Outcome of one autopilot session.
#[derive(Debug, PartialEq)]
struct SessionReport {
    served: u32,
    earned: u64,
    money: u64,
    expired: u32,
    seating_errors: u32,
    double_respawns: u32,
}

/// Waiter that always works the oldest waiting order.
fn autopilot<S: SaveStore>(engine: &mut GameEngine<S>) {
    let layout = engine.layout().clone();
    let oven = Point::new(layout.oven.x, layout.oven.y - 20.0);
    let player = *engine.player();

    let beside = |table: usize| {
        let t = layout.tables[table];
        Point::new(t.x, t.y - 40.0)
    };

    match (player.holding, player.ticket) {
        (Holding::Food(dish), Some(ticket)) if ticket.dish == dish => {
            engine.teleport_player(beside(ticket.table));
            engine.interact();
        }
        (Holding::Food(_), _) | (Holding::RawIngredient(_), None) => {
            engine.teleport_player(layout.trash_zone.center());
            engine.interact();
        }
        (Holding::RawIngredient(_), Some(_)) => {
            if !engine.oven().is_busy() {
                engine.teleport_player(oven);
                engine.kitchen_interact();
            }
        }
        (Holding::Empty, Some(ticket)) => {
            if !engine.oven().counter.is_empty() {
                engine.teleport_player(oven);
                engine.kitchen_interact();
            } else if !engine.oven().is_busy() {
                engine.teleport_player(layout.fridge_zone.center());
                if engine.interact() == Some(InteractTarget::Fridge) {
                    engine.grab_ingredient(ticket.dish);
                }
            }
        }
        (Holding::Empty, None) => {
            if let Some(line) = engine.order_summary().into_iter().find(|l| !l.taken) {
                engine.teleport_player(beside(line.table));
                engine.interact();
            }
        }
    }
}

fn run_session(config: &GameConfig, verbose: bool) -> SessionReport {
    let mut engine = GameEngine::new(config.clone(), MemoryStore::new(), "simtest");
    engine.start();

    let mut report = SessionReport {
        served: 0,
        earned: 0,
        money: 0,
        expired: 0,
        seating_errors: 0,
        double_respawns: 0,
    };
    let tables = engine.tables().len();

    while engine.clock_ms() < SESSION_MS {
        autopilot(&mut engine);
        engine.update(FRAME_MS, &FrameInput::default());

        for event in engine.drain_events() {
            match event {
                UiEvent::Status(Status::Served { reward, .. }) => {
                    report.served += 1;
                    report.earned += reward;
                }
                UiEvent::FloatingText { text, .. } if text == "Left" => report.expired += 1,
                _ => {}
            }
        }
        if !engine.seating_violations().is_empty() {
            report.seating_errors += 1;
        }
        report.double_respawns += (0..tables)
            .filter(|&t| engine.pending_respawns(t) > 1)
            .count() as u32;
    }

    report.money = engine.ledger().money();
    engine.shutdown();
    if verbose {
        println!("  {:?}", report);
    }
    report
}

fn validate_sessions(config: &GameConfig, seed: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- Sessions ---");
    let mut results = Vec::new();

    let config = GameConfig {
        seed: Some(seed),
        ..config.clone()
    };
    log::info!("Autopilot session: {} s at {} ms frames", SESSION_MS / 1000, FRAME_MS);
    let report = run_session(&config, verbose);

    results.push(TestResult {
        name: "session_serves_customers".into(),
        passed: report.served > 0,
        detail: format!(
            "{} served, {} left unserved in {} s",
            report.served,
            report.expired,
            SESSION_MS / 1000
        ),
    });
    results.push(TestResult {
        name: "session_money_matches_rewards".into(),
        passed: report.money == report.earned,
        detail: format!("money {} earned {}", report.money, report.earned),
    });
    results.push(TestResult {
        name: "session_seating_invariant".into(),
        passed: report.seating_errors == 0,
        detail: format!("{} frames with broken seating", report.seating_errors),
    });
    results.push(TestResult {
        name: "session_single_respawn".into(),
        passed: report.double_respawns == 0,
        detail: format!("{} duplicate respawn timers seen", report.double_respawns),
    });

    let again = run_session(&config, false);
    results.push(TestResult {
        name: "session_deterministic".into(),
        passed: again == report,
        detail: format!("seed {} replays identically", seed),
    });

    results
}
