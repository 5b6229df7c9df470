use crate::error::ConfigError;
use crate::firewall::TierTable;
use crate::strategies::StrategyRegistry;
use serde::{Deserialize, Serialize};

/// Everything needed to start a run. The first fourteen fields are the
/// scenario-file values in file order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    pub attacker_currency: i64,
    pub defender_currency: i64,
    pub energy: i64,
    pub defender_servers: u32,
    pub server_yield: i64,
    pub good_traffic_fraction: f64,
    pub bots_count: u64,
    /// Bandwidth per bot; the attacker starts with `bots_count * bot_bandwidth`.
    pub bot_bandwidth: f64,
    pub firewall_type: f64,
    pub server_cost: f64,
    pub energy_cost: f64,
    pub bot_cost: f64,
    /// Carried from the scenario file; running firewall cost comes from
    /// `catalog_firewall_costs`.
    pub firewall_cost: f64,
    pub server_energy_cost: f64,

    pub name: String,
    pub seed: u64,
    pub attacker_strategy: String,
    pub defender_strategy: String,
    pub catalog_firewall_costs: TierTable,
    pub defender_tier_costs: TierTable,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            attacker_currency: 100_000,
            defender_currency: 100_000,
            energy: 100,
            defender_servers: 2,
            server_yield: 100_000,
            good_traffic_fraction: 1.0,
            bots_count: 0,
            bot_bandwidth: 100.0,
            firewall_type: 0.1,
            server_cost: 100.0,
            energy_cost: 30.0,
            bot_cost: 5.0,
            firewall_cost: 1_000_000.0,
            server_energy_cost: 1000.0,
            name: "fair_game".to_string(),
            seed: 42,
            attacker_strategy: "intrusion-rate".to_string(),
            defender_strategy: "tiered".to_string(),
            catalog_firewall_costs: TierTable::catalog_default(),
            defender_tier_costs: TierTable::defender_default(),
        }
    }
}

impl SimConfig {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_attacker_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.attacker_strategy = strategy.into();
        self
    }

    pub fn with_defender_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.defender_strategy = strategy.into();
        self
    }

    pub fn with_good_traffic(mut self, fraction: f64) -> Self {
        self.good_traffic_fraction = fraction;
        self
    }

    pub fn with_botnet(mut self, bots: u64, bandwidth_per_bot: f64) -> Self {
        self.bots_count = bots;
        self.bot_bandwidth = bandwidth_per_bot;
        self
    }

    pub fn with_firewall(mut self, firewall_type: f64) -> Self {
        self.firewall_type = firewall_type;
        self
    }

    pub fn initial_bot_band(&self) -> f64 {
        self.bots_count as f64 * self.bot_bandwidth
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_fraction(self.good_traffic_fraction)?;

        if !(self.firewall_type > 0.0 && self.firewall_type <= 1.0) {
            return Err(out_of_range("firewall_type", format!("{} not in (0, 1]", self.firewall_type)));
        }
        if self.energy <= 0 {
            return Err(out_of_range("energy", format!("{} must be positive", self.energy)));
        }

        for (field, value) in [
            ("bot_bandwidth", self.bot_bandwidth),
            ("server_cost", self.server_cost),
            ("energy_cost", self.energy_cost),
            ("bot_cost", self.bot_cost),
            ("firewall_cost", self.firewall_cost),
            ("server_energy_cost", self.server_energy_cost),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(out_of_range(field, format!("{} must be a non-negative number", value)));
            }
        }

        for (field, table) in [
            ("catalog_firewall_costs", &self.catalog_firewall_costs),
            ("defender_tier_costs", &self.defender_tier_costs),
        ] {
            if !table.is_finite_non_negative() {
                return Err(out_of_range(field, "costs must be non-negative numbers".to_string()));
            }
            if !table.is_monotonic() {
                return Err(out_of_range(field, "a stronger tier may not cost less".to_string()));
            }
        }

        let registry = StrategyRegistry::global();
        if registry.create_attacker(&self.attacker_strategy).is_none() {
            return Err(ConfigError::UnknownStrategy {
                kind: "attacker",
                name: self.attacker_strategy.clone(),
            });
        }
        if registry.create_defender(&self.defender_strategy).is_none() {
            return Err(ConfigError::UnknownStrategy {
                kind: "defender",
                name: self.defender_strategy.clone(),
            });
        }

        Ok(())
    }
}

pub(crate) fn check_fraction(fraction: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&fraction) {
        Ok(())
    } else {
        Err(out_of_range("good_traffic_fraction", format!("{} not in [0, 1]", fraction)))
    }
}

fn out_of_range(field: &'static str, reason: String) -> ConfigError {
    ConfigError::OutOfRange { field, reason }
}
