use anyhow::Result;
use boardsim_game::{BatchStats, GameEvent, GameReport, SimulationConfig};
use colored::Colorize;
use serde::Serialize;
use std::io::Write;

/// One finished batch, ready for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub seed: u64,
    pub config: SimulationConfig,
    pub stats: BatchStats,
    pub kpis: Kpis,
}

impl BatchSummary {
    #[must_use]
    pub fn new(config: SimulationConfig, stats: BatchStats) -> Self {
        let kpis = Kpis::from_stats(&stats);
        Self {
            seed: config.seed,
            config,
            stats,
            kpis,
        }
    }
}

/// Derived balance metrics.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Kpis {
    pub avg_turns: f64,
    pub win_rate_a: f64,
    pub win_rate_b: f64,
    pub balance_score: f64,
    pub first_player_advantage: f64,
    pub avg_lead_changes: f64,
    pub early_lead_win_rate: f64,
    pub comeback_rate: f64,
}

impl Kpis {
    #[must_use]
    pub fn from_stats(stats: &BatchStats) -> Self {
        Self {
            avg_turns: stats.avg_turns(),
            win_rate_a: stats.win_rate_a(),
            win_rate_b: stats.win_rate_b(),
            balance_score: stats.balance_score(),
            first_player_advantage: stats.first_player_advantage(),
            avg_lead_changes: stats.avg_lead_changes(),
            early_lead_win_rate: stats.early_lead_win_rate(),
            comeback_rate: stats.comeback_rate(),
        }
    }
}

/// Everything a report needs to know about the run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport<'a> {
    pub game: &'a str,
    /// Strategy label or profile id.
    pub agent_a: &'a str,
    pub agent_b: &'a str,
    pub batches: &'a [BatchSummary],
}

fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

pub fn generate_console_report(out: &mut dyn Write, report: &RunReport<'_>) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Simulation Results".bright_cyan().bold())?;
    writeln!(out, "{}", "=====================".cyan())?;
    writeln!(out, "Game: {}", report.game.bold())?;
    writeln!(
        out,
        "Agents: {} (A) vs {} (B)",
        report.agent_a.green(),
        report.agent_b.yellow()
    )?;

    for batch in report.batches {
        let stats = &batch.stats;
        let kpis = &batch.kpis;
        writeln!(out)?;
        writeln!(
            out,
            "{} seed {} ({} games)",
            "🎲".bold(),
            batch.seed,
            stats.games_played
        )?;
        writeln!(
            out,
            "   Wins: A {} ({}) / B {} ({})",
            stats.wins_a.to_string().green(),
            percent(kpis.win_rate_a),
            stats.wins_b.to_string().yellow(),
            percent(kpis.win_rate_b)
        )?;
        writeln!(out, "   Average turns: {:.1}", kpis.avg_turns)?;
        writeln!(out, "   Balance score: {:.3}", kpis.balance_score)?;
        writeln!(
            out,
            "   First-player advantage: {}",
            percent(kpis.first_player_advantage)
        )?;
        writeln!(out, "   Lead changes per game: {:.2}", kpis.avg_lead_changes)?;
        writeln!(
            out,
            "   Early leader wins: {}",
            percent(kpis.early_lead_win_rate)
        )?;
        writeln!(out, "   Comebacks: {}", percent(kpis.comeback_rate))?;
        if stats.illegal_actions > 0 {
            writeln!(
                out,
                "   Illegal actions: {}",
                stats.illegal_actions.to_string().yellow()
            )?;
        }
        if stats.aborted > 0 {
            writeln!(out, "   Aborted: {}", stats.aborted.to_string().yellow())?;
        }
        if stats.cancelled > 0 {
            writeln!(out, "   Cancelled: {}", stats.cancelled.to_string().yellow())?;
        }
        if stats.failed > 0 {
            writeln!(out, "   Failed: {}", stats.failed.to_string().red())?;
            for (reason, count) in &stats.failures {
                writeln!(out, "     • {} ×{count}", reason.red())?;
            }
        }
        writeln!(out, "   Turn histogram:")?;
        for (bucket, count) in &stats.turn_histogram {
            writeln!(out, "     {bucket:>4}+ {count}")?;
        }
    }
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, report: &RunReport<'_>) -> Result<()> {
    let json_output = serde_json::to_string_pretty(report)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut dyn Write, report: &RunReport<'_>) -> Result<()> {
    writeln!(out, "# {} Simulation Results\n", report.game)?;
    writeln!(
        out,
        "- **Agent A**: {}\n- **Agent B**: {}\n",
        report.agent_a, report.agent_b
    )?;
    writeln!(
        out,
        "| Seed | Games | A wins | B wins | Aborted | Failed | Avg turns | Balance | First player | Comebacks |"
    )?;
    writeln!(out, "|---|---|---|---|---|---|---|---|---|---|")?;
    for batch in report.batches {
        let stats = &batch.stats;
        let kpis = &batch.kpis;
        writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} | {:.1} | {:.3} | {} | {} |",
            batch.seed,
            stats.games_played,
            stats.wins_a,
            stats.wins_b,
            stats.aborted,
            stats.failed,
            kpis.avg_turns,
            kpis.balance_score,
            percent(kpis.first_player_advantage),
            percent(kpis.comeback_rate)
        )?;
    }
    let failures: Vec<_> = report
        .batches
        .iter()
        .flat_map(|batch| {
            batch
                .stats
                .failures
                .iter()
                .map(move |(reason, count)| (batch.seed, reason, count))
        })
        .collect();
    if !failures.is_empty() {
        writeln!(out, "\n## Failures\n")?;
        for (seed, reason, count) in failures {
            writeln!(out, "- seed {seed}: {reason} ({count})")?;
        }
    }
    Ok(())
}

/// Event log of a single replayed game.
pub fn generate_event_log(
    out: &mut dyn Write,
    report: &GameReport,
    events: &[GameEvent],
) -> Result<()> {
    writeln!(out, "{}", "📜 Game log".bright_cyan().bold())?;
    writeln!(out, "Seed: {}", report.seed)?;
    for event in events {
        writeln!(out, "{event}")?;
    }
    let outcome = report
        .outcome
        .as_ref()
        .map_or("unfinished", |outcome| outcome.label());
    writeln!(out)?;
    writeln!(
        out,
        "Outcome: {} after {} turns (lead changes: {}, illegal actions: {})",
        outcome.bold(),
        report.turns,
        report.lead_changes,
        report.illegal_actions
    )?;
    Ok(())
}
