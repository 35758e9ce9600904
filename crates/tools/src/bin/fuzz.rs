use std::collections::BTreeSet;

use anyhow::Result;
use bomber_ai::state::centred_pixel;
use bomber_ai::{
    Action, AgentConfig, Arena, Bomb, CellKind, Controller, EnemyScope, Grid, Player, Pos,
    RouteFinder, ThreatOracle, reverse_moves,
};
use clap::Parser;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use tools::CrossBlastOracle;
use tracing::{Level, debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 500)]
    rounds: u32,
}

fn below(rng: &mut ChaCha8Rng, bound: usize) -> usize {
    rng.next_u64() as usize % bound
}

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = below(rng, slice.len());
    slice[p].clone()
}

fn walk(start: Pos, plan: &[Action]) -> Pos {
    plan.iter().fold(start, |pos, action| pos.step(*action))
}

fn random_arena(rng: &mut ChaCha8Rng, config: &AgentConfig) -> Arena {
    const TERRAIN: [CellKind; 20] = [
        CellKind::Blank,
        CellKind::Blank,
        CellKind::Blank,
        CellKind::Blank,
        CellKind::Blank,
        CellKind::Blank,
        CellKind::Blank,
        CellKind::Blank,
        CellKind::Blank,
        CellKind::Blank,
        CellKind::Soft,
        CellKind::Soft,
        CellKind::Soft,
        CellKind::Solid,
        CellKind::Solid,
        CellKind::Solid,
        CellKind::Hole,
        CellKind::BonusRange,
        CellKind::BonusBomb,
        CellKind::PenaltySpeed,
    ];

    let width = 5 + below(rng, 11);
    let height = 5 + below(rng, 11);
    let mut grid = Grid::new(width, height, CellKind::Blank);
    for pos in grid.positions().collect::<Vec<_>>() {
        grid.set(pos, choose(rng, &TERRAIN));
    }

    let geometry = config.geometry;
    let mut arena = Arena::new(grid, geometry);
    let open: Vec<Pos> =
        arena.grid.positions().filter(|pos| arena.grid.is_directly_passable(*pos)).collect();
    if open.is_empty() {
        return arena;
    }

    let players = 2 + below(rng, 3);
    for idx in 0..players {
        let cell = choose(rng, &open);
        let controller = choose(rng, &[Controller::Autonomous, Controller::Human]);
        let controller = if idx == 0 { Controller::Autonomous } else { controller };
        let mut player = Player::at(&format!("p{idx}"), controller, cell, &geometry);
        player.bomb_range = 1 + below(rng, 4) as u32;
        arena.add_player(player);
    }
    for _ in 0..below(rng, 4) {
        let cell = choose(rng, &open);
        let pixel = centred_pixel(cell, &geometry);
        let fuse_ms = below(rng, 3000) as u32;
        let radius = 1 + below(rng, 4) as u32;
        arena.bombs.push(Bomb { owner: None, pixel, fuse_ms, radius });
    }
    arena
}

fn check_arena(rng: &mut ChaCha8Rng, arena: &Arena, config: &AgentConfig) {
    let Some(agent) = arena.player_named("p0") else {
        return;
    };
    let oracle = CrossBlastOracle::new(arena);
    let finder = RouteFinder::new(arena, agent, &oracle, &config.planner);
    let Some(start) = finder.agent_cell() else {
        return;
    };
    let danger = oracle.tiles_affected_by_bombs();

    if let Some(plan) = finder.escape_from_explosion(&danger) {
        let end = walk(start, &plan);
        assert!(!danger.contains(&end), "Invariant failed: escape ended in danger at {end:?}");
    }

    let goal = Pos::new(below(rng, 16) as i32, below(rng, 16) as i32);
    if let Some(plan) = finder.find_route(Some(start), Some(goal)) {
        let mut pos = start;
        for action in &plan {
            pos = pos.step(*action);
            let passable = arena.grid.is_directly_passable(pos);
            assert!(passable, "Invariant failed: route through {pos:?}");
        }
        assert_eq!(pos, goal, "Invariant failed: route ends off goal");
        assert!(plan.len() as u32 >= start.manhattan(goal));
    }

    for (scope, limit) in [
        (EnemyScope::AllOpponents, config.planner.gate_limit_all),
        (EnemyScope::HumansOnly, config.planner.gate_limit_humans),
    ] {
        if let Some(plan) = finder.can_put_bomb_and_escape(scope) {
            assert!(plan.len() < limit, "Invariant failed: gate accepted a long escape");
        }
    }

    if let Some(plan) = finder.route_to_upgrade() {
        let end = walk(start, &plan);
        let kind = arena.grid.classify(end);
        assert!(kind.is_bonus(), "Invariant failed: upgrade route ends on {kind:?} at {end:?}");
    }

    let enemy = finder.nearest_enemy(EnemyScope::AllOpponents);
    if let Some(plan) = finder.plan_to_enemy(Some(start), enemy) {
        let bombs = plan.iter().filter(|action| **action == Action::PlaceBomb).count();
        let soft = arena.grid.positions().filter(|pos| arena.grid.classify(*pos) == CellKind::Soft);
        assert!(bombs <= soft.count(), "Invariant failed: more bombs than soft blocks");
    }

    let mut wider: BTreeSet<Pos> = danger.clone();
    wider.insert(Pos::new(below(rng, 16) as i32, below(rng, 16) as i32));
    if finder.is_enclosure(&danger, start) {
        assert!(finder.is_enclosure(&wider, start), "Invariant failed: enclosure not monotone");
    }
}

fn check_open_grid_routes(rng: &mut ChaCha8Rng, arena: &Arena, config: &AgentConfig) {
    let Some((agent, _)) = arena.players.iter().next() else {
        return;
    };
    let open = Arena::new(Grid::new(12, 12, CellKind::Blank), arena.geometry);
    let oracle = CrossBlastOracle::new(&open);
    let finder = RouteFinder::new(&open, agent, &oracle, &config.planner);
    let mut cell = || Pos::new(below(rng, 12) as i32, below(rng, 12) as i32);
    let (start, goal) = (cell(), cell());
    let plan = finder.find_route(Some(start), Some(goal)).unwrap_or_default();
    assert_eq!(plan.len() as u32, start.manhattan(goal), "Invariant failed: open route length");
    let twice = reverse_moves(&reverse_moves(&plan));
    assert_eq!(twice, plan, "Invariant failed: reversing twice changed the plan");
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    let args = Args::parse();
    info!(seed = args.seed, rounds = args.rounds, "starting planner fuzz");
    let config = AgentConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    for round in 0..args.rounds {
        let arena = random_arena(&mut rng, &config);
        debug!(round, bounds = ?arena.grid.bounds(), players = arena.players.len(), "round");
        check_arena(&mut rng, &arena, &config);
        check_open_grid_routes(&mut rng, &arena, &config);
    }

    println!("Fuzzing completed successfully.");
    Ok(())
}
