mod agents;
mod reports;
mod seeds;
mod util;

use anyhow::{Context, Result, bail};
use boardsim_game::constants::DEFAULT_GAMES;
use boardsim_game::{
    AgentFactory, ProfileBook, RuleDocument, SimulationConfig, SimulationRunner, StrategyId,
};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use agents::AgentChoice;
use reports::{BatchSummary, RunReport};
use seeds::resolve_seed_inputs;
use util::split_csv;

#[derive(Debug, Parser)]
#[command(name = "boardsim-runner", version)]
#[command(about = "Batch simulations of track-and-card board games from a rule document")]
struct Args {
    /// Rule document (YAML, or JSON with a .json extension)
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Strategy or profile id for agent A
    #[arg(long, default_value = "expert")]
    p1: String,

    /// Strategy or profile id for agent B
    #[arg(long, default_value = "random")]
    p2: String,

    /// Agent profiles file (YAML) added to the built-in presets
    #[arg(long)]
    profiles: Option<PathBuf>,

    /// Games per seed
    #[arg(short = 'n', long, default_value_t = DEFAULT_GAMES)]
    games: usize,

    /// Batch seeds (comma-separated; decimal or 0x-hex)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Seats per game; agents alternate around the table
    #[arg(long, default_value_t = 2)]
    players: usize,

    /// Override the rule document's max-turn bound
    #[arg(long)]
    max_turns: Option<u32>,

    /// Worker threads for the batch (default: all cores)
    #[arg(long)]
    threads: Option<usize>,

    /// Play games one after another on the calling thread
    #[arg(long)]
    sequential: bool,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["console", "json", "markdown"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// List the strategies and agent profiles, then exit
    #[arg(long)]
    list_strategies: bool,

    /// Play a single game per seed and print its event log
    #[arg(long)]
    log: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let book = load_profiles(&args)?;
    if maybe_list_strategies(&args, &book)? {
        return Ok(());
    }

    let Some(rules_path) = args.rules.as_ref() else {
        bail!("--rules <path> is required");
    };
    let rules = RuleDocument::from_path(rules_path)
        .with_context(|| format!("failed to load rules from {}", rules_path.display()))?;
    let agent_a = AgentChoice::resolve(&args.p1, &book)?;
    let agent_b = AgentChoice::resolve(&args.p2, &book)?;
    let seeds = resolve_seed_inputs(&split_csv(&args.seeds))?;

    if args.log {
        return write_event_logs(&args, &rules, &seeds, &agent_a, &agent_b);
    }

    if args.report == "console" {
        announce_banner();
    }
    let start_time = Instant::now();
    let mut batches = Vec::with_capacity(seeds.len());
    for seed in seeds {
        let config = build_config(&args, seed);
        let runner = SimulationRunner::new(&rules, config.clone())?;
        let stats = runner.run(&agent_a, &agent_b);
        batches.push(BatchSummary::new(config, stats));
    }
    log::info!("all batches finished in {:?}", start_time.elapsed());

    let report = RunReport {
        game: rules.name(),
        agent_a: agent_a.label(),
        agent_b: agent_b.label(),
        batches: &batches,
    };
    write_report(&args, &report, start_time)
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn load_profiles(args: &Args) -> Result<ProfileBook> {
    let builtin = ProfileBook::builtin();
    let Some(path) = args.profiles.as_ref() else {
        return Ok(builtin);
    };
    let loaded = ProfileBook::from_path(path)
        .with_context(|| format!("failed to load agent profiles from {}", path.display()))?;
    Ok(builtin.merged(loaded))
}

fn maybe_list_strategies(args: &Args, book: &ProfileBook) -> Result<bool> {
    if !args.list_strategies {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available strategies:")?;
    for strategy in StrategyId::ALL {
        writeln!(
            output_target.writer(),
            "  {:14} - {}",
            strategy.label(),
            strategy.description()
        )?;
    }
    writeln!(output_target.writer(), "Agent profiles:")?;
    for profile in book {
        writeln!(
            output_target.writer(),
            "  {:14} - {}",
            profile.id,
            profile.description
        )?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🎲 Boardsim Runner".bright_cyan().bold());
    println!("{}", "==================".cyan());
}

fn build_config(args: &Args, seed: u64) -> SimulationConfig {
    let mut config = SimulationConfig::new(args.games, seed).with_players(args.players);
    if let Some(max_turns) = args.max_turns {
        config = config.with_max_turns(max_turns);
    }
    if let Some(threads) = args.threads {
        config = config.with_threads(threads);
    }
    if args.sequential {
        config = config.sequential();
    }
    config
}

fn write_event_logs(
    args: &Args,
    rules: &RuleDocument,
    seeds: &[u64],
    agent_a: &AgentChoice,
    agent_b: &AgentChoice,
) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;
    for seed in seeds {
        let runner = SimulationRunner::new(rules, build_config(args, *seed))?;
        let (report, events) = runner.run_single(0, agent_a, agent_b)?;
        reports::generate_event_log(output_target.writer(), &report, &events)?;
        writeln!(output_target.writer())?;
    }
    output_target.flush_inner()?;
    Ok(())
}

fn write_report(args: &Args, report: &RunReport<'_>, start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => reports::generate_json_report(output_target.writer(), report)?,
        "markdown" => reports::generate_markdown_report(output_target.writer(), report)?,
        _ => {
            reports::generate_console_report(output_target.writer(), report)?;
            let duration = start_time.elapsed();
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args {
            rules: None,
            p1: "expert".to_string(),
            p2: "random".to_string(),
            profiles: None,
            games: 10,
            seeds: "1337".to_string(),
            players: 2,
            max_turns: None,
            threads: None,
            sequential: false,
            report: "json".to_string(),
            output: None,
            verbose: false,
            list_strategies: false,
            log: false,
        }
    }

    #[test]
    fn config_reflects_cli_flags() {
        let mut args = base_args();
        args.max_turns = Some(50);
        args.threads = Some(2);
        args.sequential = true;
        args.players = 3;
        let config = build_config(&args, 9);
        assert_eq!(config.seed, 9);
        assert_eq!(config.games, 10);
        assert_eq!(config.max_turns, Some(50));
        assert_eq!(config.threads, Some(2));
        assert_eq!(config.players, 3);
        assert!(!config.parallel);
    }

    #[test]
    fn defaults_run_in_parallel() {
        let config = build_config(&base_args(), 1);
        assert!(config.parallel);
        assert_eq!(config.max_turns, None);
    }

    #[test]
    fn profiles_file_extends_the_presets() {
        let path = std::env::temp_dir().join(format!("boardsim-profiles-{}.yaml", std::process::id()));
        std::fs::write(
            &path,
            "profiles:\n  bold:\n    description: plays everything\n    traits: { risk_tolerance: 1.0 }\n",
        )
        .unwrap();
        let mut args = base_args();
        args.profiles = Some(path.clone());
        let book = load_profiles(&args).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert!(book.get_by_id("bold").is_some());
        assert!(book.get_by_id("conservative").is_some());
        assert_eq!(AgentChoice::resolve("bold", &book).unwrap().label(), "bold");

        args.profiles = Some(PathBuf::from("/nonexistent/profiles.yaml"));
        let err = load_profiles(&args).unwrap_err();
        assert!(err.to_string().contains("failed to load agent profiles"));
    }

    #[test]
    fn args_parse_short_flags() {
        let args = Args::parse_from(["boardsim-runner", "--rules", "x.yaml", "-n", "5", "-v"]);
        assert_eq!(args.games, 5);
        assert!(args.verbose);
        assert_eq!(args.rules, Some(PathBuf::from("x.yaml")));
    }
}
