use crate::firewall::TierTable;
use serde::{Deserialize, Serialize};

/// Per-run price list. Built once from the configuration and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shop {
    pub server_cost: f64,
    /// Cost per bandwidth unit.
    pub bot_energy_cost: f64,
    pub bot_cost: f64,
    pub server_energy_cost: f64,
    firewall_costs: TierTable,
}

impl Shop {
    pub fn new(
        server_cost: f64,
        bot_energy_cost: f64,
        bot_cost: f64,
        server_energy_cost: f64,
        firewall_costs: TierTable,
    ) -> Self {
        Self {
            server_cost,
            bot_energy_cost,
            bot_cost,
            server_energy_cost,
            firewall_costs,
        }
    }

    /// Running cost of keeping a firewall at `firewall_type` for one round.
    pub fn firewall_cost(&self, firewall_type: f64) -> f64 {
        self.firewall_costs.lookup(firewall_type)
    }

    pub fn firewall_costs(&self) -> &TierTable {
        &self.firewall_costs
    }

    /// Price of growing the botnet. Only the positive part of each delta is
    /// charged; shrinking is free and refunds nothing.
    pub fn bot_purchase_cost(&self, delta_bots: i64, delta_band: f64) -> f64 {
        self.bot_cost * delta_bots.max(0) as f64 + self.bot_energy_cost * delta_band.max(0.0)
    }

    /// What the attacker pays per round to keep its botnet running.
    pub fn botnet_upkeep(&self, num_bots: u64, total_bot_band: f64) -> f64 {
        (self.bot_cost * num_bots as f64 + self.bot_energy_cost * total_bot_band) * 0.8
    }
}
