pub mod config;
pub mod scenario;

pub use config::SimConfig;

use crate::attacker::AttackerState;
use crate::defender::DefenderState;
use crate::error::ConfigError;
use crate::metrics::{RoundSnapshot, RunHistory};
use crate::network::TrafficReport;
use crate::shop::Shop;
use crate::strategies::{FirewallAction, StrategyRegistry};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    Attacker,
    Defender,
    Stalemate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    AttackerBankrupt,
    DefenderBankrupt,
    AttackerExited,
    DefenderExited,
    RoundLimit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Termination {
    pub winner: Winner,
    pub final_round: u64,
    pub final_snapshot: RoundSnapshot,
    pub reason: StopReason,
}

/// Every intermediate number of one round, for callers that want more than
/// the snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundOutcome {
    pub traffic: TrafficReport,
    pub defender_revenue: f64,
    pub attacker_revenue: f64,
    pub attacker_expenses: f64,
    pub defender_loss: f64,
    pub defender_expenses: f64,
    pub attacker_profit: f64,
    pub defender_profit: f64,
    pub attacker_exit: bool,
    pub firewall: FirewallAction,
    pub snapshot: RoundSnapshot,
}

/// One attacker against one defender, advanced a round at a time by the caller.
#[derive(Debug)]
pub struct Simulation {
    config: SimConfig,
    attacker: AttackerState,
    defender: DefenderState,
    shop: Shop,
    good_traffic_fraction: f64,
    rounds: u64,
    attacker_exited: bool,
    rng: ChaCha8Rng,
    history: RunHistory,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let registry = StrategyRegistry::global();
        let attacker_strategy = registry.create_attacker(&config.attacker_strategy).ok_or_else(|| {
            ConfigError::UnknownStrategy { kind: "attacker", name: config.attacker_strategy.clone() }
        })?;
        let defender_strategy = registry.create_defender(&config.defender_strategy).ok_or_else(|| {
            ConfigError::UnknownStrategy { kind: "defender", name: config.defender_strategy.clone() }
        })?;

        let attacker = AttackerState::new(
            config.attacker_currency as f64,
            config.bots_count,
            config.initial_bot_band(),
            config.energy as f64,
            attacker_strategy,
        );
        let defender = DefenderState::new(
            config.defender_currency as f64,
            config.defender_servers,
            config.server_yield as f64,
            config.firewall_type,
            config.defender_tier_costs,
            defender_strategy,
        );
        let shop = Shop::new(
            config.server_cost,
            config.energy_cost,
            config.bot_cost,
            config.server_energy_cost,
            config.catalog_firewall_costs,
        );

        Ok(Self {
            good_traffic_fraction: config.good_traffic_fraction,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            attacker,
            defender,
            shop,
            rounds: 0,
            attacker_exited: false,
            history: RunHistory::new(),
        })
    }

    /// Plays one round. Always completes; whether another round should
    /// follow is the caller's call via `should_continue`.
    pub fn run_round(&mut self) -> RoundOutcome {
        let round = self.rounds;

        let traffic = TrafficReport::compute(
            self.attacker.num_bots(),
            self.attacker.total_bot_band(),
            self.good_traffic_fraction,
            self.defender.firewall_type(),
        );

        let defender_revenue = self.defender.revenue();
        let attacker_revenue = traffic.successful_intrusions.min(defender_revenue) * 1.2;
        let attacker_expenses = self
            .shop
            .botnet_upkeep(self.attacker.num_bots(), self.attacker.total_bot_band());
        let defender_loss = (traffic.successful_intrusions * 1.1).min(defender_revenue);
        let defender_expenses = self.defender.expenses(&self.shop);

        let attacker_profit = attacker_revenue - attacker_expenses;
        let defender_profit = (defender_revenue - defender_loss).max(0.0) - defender_expenses;

        self.attacker.apply_profit(attacker_profit);
        self.defender.apply_profit(defender_profit);

        let attacker_exit = self
            .attacker
            .decision(&self.shop, traffic.intrusion_rate, &mut self.rng);
        if attacker_exit {
            self.attacker_exited = true;
        }
        let firewall = self.defender.process_round(traffic.intrusion_rate);

        let snapshot = self.snapshot(round, traffic.intrusion_rate, attacker_profit, defender_profit);
        debug!(
            "Round {}: intrusion {:.3}, attacker {:+.2} -> {:.2}, defender {:+.2} -> {:.2}",
            round,
            traffic.intrusion_rate,
            attacker_profit,
            snapshot.attacker_currency,
            defender_profit,
            snapshot.defender_currency
        );

        let events = self
            .attacker
            .take_events()
            .into_iter()
            .chain(self.defender.take_events());
        self.history.record_events(round, events);
        self.history.record(snapshot.clone());
        self.rounds += 1;

        RoundOutcome {
            traffic,
            defender_revenue,
            attacker_revenue,
            attacker_expenses,
            defender_loss,
            defender_expenses,
            attacker_profit,
            defender_profit,
            attacker_exit,
            firewall,
            snapshot,
        }
    }

    /// Why the run is over, if it is.
    pub fn stop_reason(&self) -> Option<StopReason> {
        if self.attacker.currency <= 0.0 {
            Some(StopReason::AttackerBankrupt)
        } else if self.defender.currency <= 0.0 {
            Some(StopReason::DefenderBankrupt)
        } else if self.attacker_exited {
            Some(StopReason::AttackerExited)
        } else if self.defender.has_exited() {
            Some(StopReason::DefenderExited)
        } else {
            None
        }
    }

    pub fn should_continue(&self) -> bool {
        self.stop_reason().is_none()
    }

    /// Plays until the run ends on its own or `max_rounds` have been played.
    pub fn run(&mut self, max_rounds: u64) -> Termination {
        info!(
            "Starting simulation: {} (attacker: {}, defender: {}, seed {})",
            self.config.name,
            self.attacker.strategy_name(),
            self.defender.strategy_name(),
            self.config.seed
        );

        while self.should_continue() && self.rounds < max_rounds {
            self.run_round();
        }

        let termination = self.termination();
        info!(
            "Simulation {} ended after {} rounds: {:?} ({:?})",
            self.config.name, termination.final_round, termination.winner, termination.reason
        );
        termination
    }

    pub fn termination(&self) -> Termination {
        let attacker = self.attacker.currency;
        let defender = self.defender.currency;
        let winner = if attacker > defender {
            Winner::Attacker
        } else if defender > attacker {
            Winner::Defender
        } else {
            Winner::Stalemate
        };

        let final_snapshot = match self.history.last() {
            Some(snapshot) => snapshot.clone(),
            None => self.snapshot(0, 0.0, 0.0, 0.0),
        };

        Termination {
            winner,
            final_round: self.rounds,
            final_snapshot,
            reason: self.stop_reason().unwrap_or(StopReason::RoundLimit),
        }
    }

    /// Changes the legitimate share of traffic between rounds.
    pub fn set_good_traffic_fraction(&mut self, fraction: f64) -> Result<(), ConfigError> {
        config::check_fraction(fraction)?;
        self.good_traffic_fraction = fraction;
        Ok(())
    }

    fn snapshot(&self, round: u64, intrusion_rate: f64, attacker_profit: f64, defender_profit: f64) -> RoundSnapshot {
        let attacker_currency = self.attacker.currency;
        let defender_currency = self.defender.currency;
        let (attacker_change, defender_change) = match self.history.last() {
            Some(prev) => (
                attacker_currency - prev.attacker_currency,
                defender_currency - prev.defender_currency,
            ),
            None => (0.0, 0.0),
        };

        RoundSnapshot {
            round,
            attacker_currency,
            defender_currency,
            attacker_change,
            defender_change,
            num_bots: self.attacker.num_bots(),
            total_bot_band: self.attacker.total_bot_band(),
            num_servers: self.defender.num_servers(),
            server_yield: self.defender.server_yield(),
            firewall_type: self.defender.firewall_type(),
            firewall_quality: self.defender.firewall_tier(),
            intrusion_rate,
            attacker_profit,
            defender_profit,
        }
    }

    pub fn attacker(&self) -> &AttackerState {
        &self.attacker
    }

    pub fn defender(&self) -> &DefenderState {
        &self.defender
    }

    pub fn shop(&self) -> &Shop {
        &self.shop
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    pub fn good_traffic_fraction(&self) -> f64 {
        self.good_traffic_fraction
    }

    pub fn history(&self) -> &RunHistory {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_count_from_zero() {
        let mut sim = Simulation::new(SimConfig::default()).unwrap();
        assert_eq!(sim.rounds(), 0);
        let outcome = sim.run_round();
        assert_eq!(outcome.snapshot.round, 0);
        assert_eq!(sim.rounds(), 1);
        assert_eq!(sim.run_round().snapshot.round, 1);
        assert_eq!(sim.history().len(), 2);
    }

    #[test]
    fn change_tracks_previous_snapshot() {
        let mut sim = Simulation::new(SimConfig::default()).unwrap();
        let first = sim.run_round().snapshot;
        let second = sim.run_round().snapshot;
        assert_eq!(first.defender_change, 0.0);
        assert!((second.defender_change - second.defender_profit).abs() < 1e-6);
    }

    #[test]
    fn invalid_config_never_builds() {
        let err = Simulation::new(SimConfig::default().with_good_traffic(-0.1)).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { .. }));
    }

    #[test]
    fn good_traffic_can_be_retuned() {
        let mut sim = Simulation::new(SimConfig::default()).unwrap();
        sim.set_good_traffic_fraction(0.25).unwrap();
        assert_eq!(sim.good_traffic_fraction(), 0.25);
        assert!(sim.set_good_traffic_fraction(2.0).is_err());
        assert_eq!(sim.good_traffic_fraction(), 0.25);
    }

    #[test]
    fn termination_before_any_round_uses_current_state() {
        let sim = Simulation::new(SimConfig::default()).unwrap();
        let t = sim.termination();
        assert_eq!(t.final_round, 0);
        assert_eq!(t.winner, Winner::Stalemate);
        assert_eq!(t.final_snapshot.attacker_currency, 100_000.0);
        assert_eq!(t.reason, StopReason::RoundLimit);
    }
}
