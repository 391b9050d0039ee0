use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use thiserror::Error;

use crate::config::{AgentConfig, AgentKind, BenchmarkConfig};
use crate::tournament::{GameOutcome, SeatResult};

const CONFIDENCE_LEVEL: f64 = 0.95;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("baseline agent '{0}' not present in tournament results")]
    MissingBaseline(String),
    #[error("agent '{0}' defined in results but missing from configuration")]
    UnknownAgent(String),
    #[error("normal distribution unavailable: {0}")]
    Distribution(String),
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

pub struct AnalyticsCollector {
    baseline: String,
    agents: HashMap<String, AgentAccumulator>,
    agent_order: Vec<String>,
    latency_budget_ms: u64,
}

impl AnalyticsCollector {
    pub fn new(config: &BenchmarkConfig) -> Result<Self, AnalyticsError> {
        let baseline = config.baseline.clone();

        let mut agents = HashMap::new();
        let mut order = Vec::new();
        for agent in &config.agents {
            agents.insert(
                agent.name.clone(),
                AgentAccumulator::new(agent.clone(), config.latency_budget_ms),
            );
            order.push(agent.name.clone());
        }

        if !agents.contains_key(&baseline) {
            return Err(AnalyticsError::MissingBaseline(baseline));
        }

        Ok(Self {
            baseline,
            agents,
            agent_order: order,
            latency_budget_ms: config.latency_budget_ms,
        })
    }

    pub fn record_game(&mut self, outcome: &GameOutcome) -> Result<(), AnalyticsError> {
        for seat in &outcome.seat_results {
            let acc = self
                .agents
                .get_mut(&seat.agent_name)
                .ok_or_else(|| AnalyticsError::UnknownAgent(seat.agent_name.clone()))?;
            acc.record_game(seat);
        }
        Ok(())
    }

    pub fn finalize(mut self) -> Result<AnalyticsSummary, AnalyticsError> {
        let normal = Normal::new(0.0, 1.0)
            .map_err(|err| AnalyticsError::Distribution(err.to_string()))?;
        let z = normal.inverse_cdf(0.5 + CONFIDENCE_LEVEL / 2.0);

        let mut reports = Vec::new();
        for name in &self.agent_order {
            if let Some(acc) = self.agents.remove(name) {
                reports.push(acc.into_report(z));
            }
        }

        let baseline = reports
            .iter()
            .find(|report| report.name == self.baseline)
            .map(|report| (report.wins, report.games))
            .ok_or_else(|| AnalyticsError::MissingBaseline(self.baseline.clone()))?;

        let comparisons = reports
            .iter()
            .map(|report| {
                let p_value = if report.name == self.baseline {
                    1.0
                } else {
                    two_proportion_p_value(&normal, (report.wins, report.games), baseline)
                };
                ComparisonReport {
                    agent: report.name.clone(),
                    p_value,
                    sample_size: report.games,
                }
            })
            .collect();

        Ok(AnalyticsSummary {
            baseline: self.baseline,
            agents: reports,
            comparisons,
            latency_budget_ms: self.latency_budget_ms,
        }
        .enrich())
    }
}

struct AgentAccumulator {
    config: AgentConfig,
    games: usize,
    wins: usize,
    eliminations: usize,
    survival_turns: u64,
    total_latency_ms: f64,
    total_decisions: u64,
    latency_budget_ms: u64,
}

impl AgentAccumulator {
    fn new(config: AgentConfig, latency_budget_ms: u64) -> Self {
        Self {
            config,
            games: 0,
            wins: 0,
            eliminations: 0,
            survival_turns: 0,
            total_latency_ms: 0.0,
            total_decisions: 0,
            latency_budget_ms,
        }
    }

    fn record_game(&mut self, seat: &SeatResult) {
        self.games += 1;
        if seat.won {
            self.wins += 1;
        }
        if seat.eliminated {
            self.eliminations += 1;
        }
        self.survival_turns += u64::from(seat.survived_turns);
        self.total_latency_ms += seat.metrics.total_ms;
        self.total_decisions += u64::from(seat.metrics.decisions);
    }

    fn into_report(self, z: f64) -> AgentReport {
        let win_rate = ratio(self.wins as f64, self.games as f64);
        let avg_survival_turns = ratio(self.survival_turns as f64, self.games as f64);
        let avg_latency = ratio(self.total_latency_ms, self.total_decisions as f64);

        AgentReport {
            name: self.config.name,
            kind: self.config.kind,
            seed: self.config.seed,
            games: self.games,
            wins: self.wins,
            eliminations: self.eliminations,
            win_rate,
            ci95: win_rate_interval(self.wins, self.games, z),
            avg_survival_turns,
            average_ms_per_decision: avg_latency,
            delta_vs_baseline: 0.0, // filled in by `enrich`
            over_budget: avg_latency > self.latency_budget_ms as f64,
        }
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Normal-approximation interval for a win rate, clamped to `[0, 1]`.
fn win_rate_interval(wins: usize, games: usize, z: f64) -> (f64, f64) {
    if games == 0 {
        return (0.0, 0.0);
    }
    let n = games as f64;
    let p = wins as f64 / n;
    let margin = z * (p * (1.0 - p) / n).sqrt();
    ((p - margin).max(0.0), (p + margin).min(1.0))
}

/// Two-sided p-value for "same win rate" using the pooled two-proportion z-test.
fn two_proportion_p_value(normal: &Normal, agent: (usize, usize), baseline: (usize, usize)) -> f64 {
    let (wins_a, games_a) = agent;
    let (wins_b, games_b) = baseline;
    if games_a == 0 || games_b == 0 {
        return 1.0;
    }

    let n_a = games_a as f64;
    let n_b = games_b as f64;
    let pooled = (wins_a + wins_b) as f64 / (n_a + n_b);
    let variance = pooled * (1.0 - pooled) * (1.0 / n_a + 1.0 / n_b);
    if variance <= 0.0 {
        return 1.0;
    }

    let z = (wins_a as f64 / n_a - wins_b as f64 / n_b).abs() / variance.sqrt();
    (2.0 * (1.0 - normal.cdf(z))).clamp(0.0, 1.0)
}

#[derive(Debug, Serialize)]
pub struct AnalyticsSummary {
    pub baseline: String,
    pub agents: Vec<AgentReport>,
    pub comparisons: Vec<ComparisonReport>,
    pub latency_budget_ms: u64,
}

impl AnalyticsSummary {
    pub fn enrich(mut self) -> Self {
        let baseline_rate = self
            .agents
            .iter()
            .find(|agent| agent.name == self.baseline)
            .map(|agent| agent.win_rate)
            .unwrap_or(0.0);

        for agent in &mut self.agents {
            agent.delta_vs_baseline = agent.win_rate - baseline_rate;
        }

        self
    }

    pub fn to_markdown(&self) -> String {
        let mut rows = String::new();
        rows.push_str("# Tournament Summary\n\n");
        rows.push_str(&format!("Baseline: `{}`\n\n", self.baseline));
        rows.push_str(&format!(
            "Latency budget: {} ms average per decision\n\n",
            self.latency_budget_ms
        ));
        rows.push_str("| Agent | Kind | Games | Wins | Win % | 95% CI | Δ vs baseline | Avg survival turns | Eliminated | Avg ms/decision | Over Budget | p-value |\n");
        rows.push_str("|-------|------|-------|------|-------|--------|----------------|--------------------|------------|------------------|-------------|---------|\n");

        for agent in &self.agents {
            let p_value = self
                .comparisons
                .iter()
                .find(|c| c.agent == agent.name)
                .map(|c| c.p_value)
                .unwrap_or(1.0);

            rows.push_str(&format!(
                "| {name} | {kind:?} | {games} | {wins} | {win:.1}% | [{ci_low:.1}%, {ci_high:.1}%] | {delta:+.1} pp | {survival:.1} | {eliminated} | {latency:.3} | {over_budget} | {p_value:.3} |\n",
                name = agent.name,
                kind = agent.kind,
                games = agent.games,
                wins = agent.wins,
                win = agent.win_rate * 100.0,
                ci_low = agent.ci95.0 * 100.0,
                ci_high = agent.ci95.1 * 100.0,
                delta = agent.delta_vs_baseline * 100.0,
                survival = agent.avg_survival_turns,
                eliminated = agent.eliminations,
                latency = agent.average_ms_per_decision,
                over_budget = if agent.over_budget { "Yes" } else { "No" },
            ));
        }

        rows
    }

    pub fn write_markdown(&self, path: impl AsRef<Path>) -> Result<(), AnalyticsError> {
        fs::write(path.as_ref(), self.to_markdown()).map_err(|e| AnalyticsError::Io {
            context: "writing summary markdown",
            source: e,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentReport {
    pub name: String,
    pub kind: AgentKind,
    pub seed: u64,
    pub games: usize,
    pub wins: usize,
    pub eliminations: usize,
    pub win_rate: f64,
    pub ci95: (f64, f64),
    pub avg_survival_turns: f64,
    pub average_ms_per_decision: f64,
    #[serde(skip)]
    pub delta_vs_baseline: f64,
    #[serde(skip)]
    pub over_budget: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub agent: String,
    pub p_value: f64,
    pub sample_size: usize,
}
