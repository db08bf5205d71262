// ═══════════════════════════════════════════════════════════════════════
// Runner — CLI entry point: control API server, scenario play, self-play
// ═══════════════════════════════════════════════════════════════════════

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use frisk_agents::{run_ai_turns, Agent, DriveLimits, PathfinderAgent, RandomAgent, StopReason};
use frisk_engine::dice::{format_dice_file, generate_standard, DiceQueue, STANDARD_DICE_LEN};
use frisk_engine::setup::{create_random_game, load_scenario, Scenario};
use frisk_engine::types::*;
use frisk_server::ServerConfig;
use rayon::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "frisk", about = "Risk-style game server with a path-finding computer player")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the control API over HTTP
    Serve(ServeArgs),
    /// Play a scenario file to the end with computer players only
    Play {
        scenario: PathBuf,
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value_t = 500)]
        max_turns: usize,
        /// Print the move log afterwards
        #[arg(long)]
        log: bool,
    },
    /// Run a batch of random deals in parallel
    Selfplay {
        #[arg(short, long, default_value_t = 100)]
        games: u64,
        #[arg(short, long, default_value_t = 4)]
        players: usize,
        #[arg(short, long, value_enum, default_value_t = AgentKind::Mixed)]
        agent: AgentKind,
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value_t = 500)]
        max_turns: usize,
    },
    /// Write a standard dice file
    Dice {
        #[arg(short, long, default_value_t = 1)]
        seed: u64,
        #[arg(short, long, default_value_t = STANDARD_DICE_LEN)]
        len: usize,
        /// Output path; stdout when omitted
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct ServeArgs {
    /// JSON server config; flags below override it
    #[arg(long, env = "FRISK_CONFIG")]
    config: Option<PathBuf>,
    #[arg(long, env = "FRISK_BIND")]
    bind: Option<String>,
    #[arg(long, env = "FRISK_DICE_FILE")]
    dice_file: Option<PathBuf>,
    #[arg(long, env = "FRISK_DICE_SEED")]
    dice_seed: Option<u64>,
    #[arg(long, env = "FRISK_AUTO_REPLENISH")]
    auto_replenish: Option<bool>,
    #[arg(long, env = "FRISK_AI_STEP_LIMIT")]
    ai_step_limit: Option<usize>,
    #[arg(long, env = "FRISK_MAX_AI_TURNS")]
    max_ai_turns: Option<usize>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AgentKind {
    Pathfinder,
    Random,
    /// Pathfinders in even seats, random agents in odd ones
    Mixed,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Serve(args) => cmd_serve(args),
        Commands::Play { scenario, seed, max_turns, log } => cmd_play(&scenario, seed, max_turns, log),
        Commands::Selfplay { games, players, agent, seed, max_turns } => {
            cmd_selfplay(games, players, agent, seed, max_turns)
        }
        Commands::Dice { seed, len, out } => cmd_dice(seed, len, out.as_deref()),
    }
}

// ── serve ──────────────────────────────────────────────────────────────

fn server_config(args: ServeArgs) -> anyhow::Result<ServerConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind = bind;
    }
    if args.dice_file.is_some() {
        config.dice_file = args.dice_file;
    }
    if let Some(seed) = args.dice_seed {
        config.dice_seed = seed;
    }
    if let Some(on) = args.auto_replenish {
        config.auto_replenish = on;
    }
    if let Some(n) = args.ai_step_limit {
        config.ai_step_limit = n;
    }
    if let Some(n) = args.max_ai_turns {
        config.max_ai_turns = n;
    }
    Ok(config)
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = server_config(args)?;
    info!(?config, "starting");
    let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
    runtime.block_on(frisk_server::serve(&config)).context("server failed")
}

// ── play / selfplay ────────────────────────────────────────────────────

fn seeded_dice(seed: u64) -> anyhow::Result<DiceQueue> {
    let mut dice = DiceQueue::new();
    dice.set_standard(&generate_standard(seed, STANDARD_DICE_LEN))?;
    dice.reset_to_standard();
    Ok(dice)
}

fn make_agents(kind: AgentKind, seed: u64, players: usize) -> Vec<Box<dyn Agent>> {
    (0..players)
        .map(|i| -> Box<dyn Agent> {
            let random = Box::new(RandomAgent::new(seed.wrapping_add(i as u64)));
            match kind {
                AgentKind::Pathfinder => Box::new(PathfinderAgent::new()),
                AgentKind::Random => random,
                AgentKind::Mixed if i % 2 == 0 => Box::new(PathfinderAgent::new()),
                AgentKind::Mixed => random,
            }
        })
        .collect()
}

struct GameSummary {
    winner: Option<PlayerId>,
    turns: usize,
    alive: usize,
}

fn play_out(state: &mut GameState, agents: &mut [Box<dyn Agent>], seed: u64, max_turns: usize) -> anyhow::Result<GameSummary> {
    for p in state.players.iter_mut() {
        p.is_human = false;
    }
    let mut dice = seeded_dice(seed)?;
    let limits = DriveLimits { max_turns, ..DriveLimits::default() };
    let report = run_ai_turns(state, &mut dice, agents, &limits)?;
    if report.stop == StopReason::TurnLimit {
        warn!(turns = report.turns, "no winner within the turn limit");
    }
    Ok(GameSummary { winner: state.winner, turns: report.turns, alive: state.alive_count() })
}

fn cmd_play(path: &Path, seed: u64, max_turns: usize, print_log: bool) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let scenario = Scenario::from_json(text.trim())?;
    let mut state = load_scenario(&scenario)?;
    state.log.turn_on();
    let mut agents = make_agents(AgentKind::Pathfinder, seed, state.players.len());

    let summary = play_out(&mut state, &mut agents, seed, max_turns)?;
    match summary.winner {
        Some(w) => println!("Winner: player {} ({}) after {} turns", w, state.player(w).color, summary.turns),
        None => println!("No winner after {} turns, {} players alive", summary.turns, summary.alive),
    }
    for p in &state.players {
        println!("  {:>2} {:8} territories: {:>2}", p.id, p.color, state.territory_count(p.id));
    }
    if print_log {
        println!("\n{}", state.log.call_text());
    }
    Ok(())
}

fn cmd_selfplay(games: u64, players: usize, kind: AgentKind, seed: u64, max_turns: usize) -> anyhow::Result<()> {
    if !(2..=6).contains(&players) {
        bail!("player count must be 2..=6, got {players}");
    }
    println!("=== Self-play: {games} games, {players} players ===\n");

    let results: Vec<anyhow::Result<GameSummary>> = (0..games)
        .into_par_iter()
        .map(|g| {
            let game_seed = seed.wrapping_add(g * 1000);
            let mut state = create_random_game(players, game_seed)?;
            let mut agents = make_agents(kind, game_seed, players);
            play_out(&mut state, &mut agents, game_seed, max_turns)
        })
        .collect();

    let mut wins = vec![0u64; players];
    let (mut stalls, mut errors, mut turns) = (0u64, 0u64, 0usize);
    for (g, result) in results.into_iter().enumerate() {
        match result {
            Ok(summary) => {
                turns += summary.turns;
                match summary.winner {
                    Some(w) => wins[w.index()] += 1,
                    None => stalls += 1,
                }
            }
            Err(e) => {
                errors += 1;
                eprintln!("Game {}: ERROR -- {e:#}", g + 1);
            }
        }
    }

    println!("--- Summary ({games} games, {stalls} without winner, {errors} errors) ---");
    for (seat, w) in wins.iter().enumerate() {
        let pct = if games > 0 { *w as f64 / games as f64 * 100.0 } else { 0.0 };
        println!("  seat {seat}: {w:>5} wins ({pct:.1}%)");
    }
    let finished = games - errors;
    if finished > 0 {
        println!("  average turns: {:.1}", turns as f64 / finished as f64);
    }
    Ok(())
}

// ── dice ───────────────────────────────────────────────────────────────

fn cmd_dice(seed: u64, len: usize, out: Option<&Path>) -> anyhow::Result<()> {
    let text = format_dice_file(&generate_standard(seed, len));
    match out {
        Some(path) => std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?,
        None => print!("{text}"),
    }
    Ok(())
}
