#![deny(warnings)]

//! Headless CLI for the finance arcade: list games, print the glossary,
//! and drive scripted demo sessions against the persisted snapshot.

use anyhow::Result;
use arcade_core::{
    glossary, ActionPayload, BudgetAction, Direction, ElasticityAction, GameEvent,
    InvestmentDecision, NpvAction, TileAction,
};
use arcade_games::Registry;
use arcade_runtime::{Session, SessionConfig, Store};
use persistence::FileStore;
use rust_decimal::Decimal;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

struct Args {
    game: Option<String>,
    seed: u64,
    save: String,
    list: bool,
    glossary: bool,
    tutorial: bool,
}

fn parse_args() -> Args {
    let mut args = Args {
        game: None,
        seed: 42,
        save: "./saves/arcade.json".to_string(),
        list: false,
        glossary: false,
        tutorial: false,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--game" => args.game = it.next(),
            "--seed" => {
                if let Some(seed) = it.next().and_then(|s| s.parse().ok()) {
                    args.seed = seed;
                }
            }
            "--save" => {
                if let Some(path) = it.next() {
                    args.save = path;
                }
            }
            "--list" => args.list = true,
            "--glossary" => args.glossary = true,
            "--tutorial" => args.tutorial = true,
            _ => {}
        }
    }
    args
}

fn print_games(registry: &Registry) {
    println!("Available games:");
    for game in registry.iter() {
        let meta = game.meta();
        println!(
            "  {} | {} | ~{} min | {} levels",
            meta.id, meta.title, meta.estimated_time_min, meta.levels
        );
    }
}

fn print_glossary() {
    for entry in glossary() {
        println!("{}", entry.term);
        println!("  {}", entry.definition);
        println!("  e.g. {}", entry.example);
    }
}

/// Canned event sequence exercising one game end to end.
fn demo_script(game_id: &str) -> Vec<GameEvent> {
    let mut events = vec![GameEvent::Start];
    match game_id {
        "npv-builder" => {
            events.push(GameEvent::Action(ActionPayload::Npv(
                NpvAction::SetDiscountRate { percent: 10.0 },
            )));
            for i in 0..4u32 {
                events.push(GameEvent::Action(ActionPayload::Npv(
                    NpvAction::PlaceCashFlow {
                        id: format!("cf-project-1-{i}"),
                        year: i,
                    },
                )));
            }
            // Coffee shop at 10% sits inside the indifference band.
            events.push(GameEvent::Action(ActionPayload::Npv(
                NpvAction::MakeDecision {
                    decision: InvestmentDecision::Indifferent,
                },
            )));
            events.push(GameEvent::Complete {
                passed: true,
                score: 0,
            });
        }
        "budget-battle" => {
            events.push(GameEvent::Action(ActionPayload::Budget(
                BudgetAction::Allocate {
                    category_id: "entertainment".to_string(),
                    amount: Decimal::new(100, 0),
                },
            )));
            events.push(GameEvent::Action(ActionPayload::Budget(
                BudgetAction::Allocate {
                    category_id: "savings".to_string(),
                    amount: Decimal::new(900, 0),
                },
            )));
            for _ in 0..3 {
                events.push(GameEvent::Action(ActionPayload::Budget(
                    BudgetAction::SubmitBudget,
                )));
            }
            events.push(GameEvent::Complete {
                passed: true,
                score: 0,
            });
        }
        "elasticity-explorer" => {
            events.push(GameEvent::Action(ActionPayload::Elasticity(
                ElasticityAction::MovePoint {
                    price: 90.0,
                    quantity: 4.0,
                },
            )));
            events.push(GameEvent::Action(ActionPayload::Elasticity(
                ElasticityAction::MovePoint {
                    price: 20.0,
                    quantity: 40.0,
                },
            )));
            events.push(GameEvent::Action(ActionPayload::Elasticity(
                ElasticityAction::DirectionalMove {
                    direction: Direction::Left,
                },
            )));
            events.push(GameEvent::Complete {
                passed: true,
                score: 0,
            });
        }
        _ => {
            for direction in [
                Direction::Left,
                Direction::Up,
                Direction::Right,
                Direction::Down,
                Direction::Left,
                Direction::Up,
            ] {
                events.push(GameEvent::Action(ActionPayload::Tiles(TileAction::Move {
                    direction,
                })));
            }
            events.push(GameEvent::Action(ActionPayload::Tiles(TileAction::Undo)));
            events.push(GameEvent::Complete {
                passed: true,
                score: 0,
            });
        }
    }
    events
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .init();

    let args = parse_args();
    info!(build = env!("GIT_SHA"), "starting arcade CLI");

    let registry = Registry::builtin()?;

    if args.glossary {
        print_glossary();
        return Ok(());
    }
    let Some(game_id) = args.game else {
        print_games(&registry);
        return Ok(());
    };
    if args.list {
        print_games(&registry);
    }

    let Some(game) = registry.get(&game_id) else {
        // Terminal dead-end, not an error.
        println!("Game not found: {game_id}");
        print_games(&registry);
        return Ok(());
    };

    let mut store = Store::open(FileStore::new(&args.save));
    let mut session = Session::start(game, SessionConfig { rng_seed: args.seed }, &mut store);

    if args.tutorial {
        session.show_tutorial();
        let steps = &game.meta().tutorial_steps;
        while session.tutorial().visible() {
            println!("Tutorial {}/{}: {}", session.tutorial().step() + 1, steps.len(),
                steps[session.tutorial().step()]);
            session.tutorial_next();
        }
    }

    for event in demo_script(&game_id) {
        session.dispatch(event, &mut store);
    }

    let view = session.view();
    println!("{} | {}", view.title, view.status);
    for line in &view.lines {
        println!("{line}");
    }

    let stats = session.state().stats();
    let mastered = game.assess_mastery(session.state());
    println!(
        "Session over | game: {} | score: {} | mistakes: {} | time: {}ms | mastered: {}",
        game_id, stats.score, stats.mistakes, stats.time_ms, mastered
    );

    let snapshot = store.snapshot();
    let id = &game.meta().id;
    let plays = snapshot.progress.get(id).map(|p| p.times_played).unwrap_or(0);
    let high = snapshot.high_scores.get(id).copied().unwrap_or(0);
    println!(
        "Profile | xp: {} | level: {} | plays: {} | high score: {}",
        snapshot.profile.xp, snapshot.profile.level, plays, high
    );

    Ok(())
}
