use super::RoundEvent;
use crate::simulation::{Simulation, StopReason, Winner};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub scenario: String,
    pub seed: u64,
    pub attacker_strategy: String,
    pub defender_strategy: String,
    pub rounds: u64,
    pub winner: Winner,
    pub reason: StopReason,
    pub final_attacker_currency: f64,
    pub final_defender_currency: f64,
    pub peak_bots: u64,
    pub avg_intrusion_rate: f64,
    pub total_attacker_profit: f64,
    pub total_defender_profit: f64,
    pub firewall_upgrades: usize,
    pub firewall_relaxations: usize,
    pub rejected_updates: usize,
}

pub fn analyze(sim: &Simulation) -> AnalysisReport {
    let termination = sim.termination();
    let snapshots = sim.history().snapshots();
    let config = sim.config();

    let avg_intrusion_rate = if sim.history().is_empty() {
        0.0
    } else {
        snapshots.iter().map(|s| s.intrusion_rate).sum::<f64>() / snapshots.len() as f64
    };

    let count = |pred: fn(&RoundEvent) -> bool| {
        sim.history().events().iter().filter(|e| pred(&e.event)).count()
    };

    AnalysisReport {
        scenario: config.name.clone(),
        seed: config.seed,
        attacker_strategy: sim.attacker().strategy_name().to_string(),
        defender_strategy: sim.defender().strategy_name().to_string(),
        rounds: termination.final_round,
        winner: termination.winner,
        reason: termination.reason,
        final_attacker_currency: sim.attacker().currency,
        final_defender_currency: sim.defender().currency,
        peak_bots: snapshots.iter().map(|s| s.num_bots).max().unwrap_or(0),
        avg_intrusion_rate,
        total_attacker_profit: snapshots.iter().map(|s| s.attacker_profit).sum(),
        total_defender_profit: snapshots.iter().map(|s| s.defender_profit).sum(),
        firewall_upgrades: count(|e| matches!(e, RoundEvent::FirewallUpgraded { .. })),
        firewall_relaxations: count(|e| matches!(e, RoundEvent::FirewallRelaxed { .. })),
        rejected_updates: count(|e| matches!(e, RoundEvent::UpdateRejected { .. })),
    }
}

/// Aggregate over many runs of the same scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepSummary {
    pub scenario: String,
    pub runs: usize,
    pub attacker_wins: usize,
    pub defender_wins: usize,
    pub stalemates: usize,
    pub avg_rounds: f64,
    pub avg_final_attacker_currency: f64,
    pub avg_final_defender_currency: f64,
    pub avg_intrusion_rate: f64,
}

pub fn summarize(reports: &[AnalysisReport]) -> SweepSummary {
    let runs = reports.len();
    let n = runs.max(1) as f64;
    let wins = |w: Winner| reports.iter().filter(|r| r.winner == w).count();

    SweepSummary {
        scenario: reports.first().map(|r| r.scenario.clone()).unwrap_or_default(),
        runs,
        attacker_wins: wins(Winner::Attacker),
        defender_wins: wins(Winner::Defender),
        stalemates: wins(Winner::Stalemate),
        avg_rounds: reports.iter().map(|r| r.rounds as f64).sum::<f64>() / n,
        avg_final_attacker_currency: reports.iter().map(|r| r.final_attacker_currency).sum::<f64>() / n,
        avg_final_defender_currency: reports.iter().map(|r| r.final_defender_currency).sum::<f64>() / n,
        avg_intrusion_rate: reports.iter().map(|r| r.avg_intrusion_rate).sum::<f64>() / n,
    }
}
