use super::{DefenderStrategy, FirewallAction};
use crate::defender::DefenderState;
use crate::firewall::FirewallTier;

// `0.1 * 1.1 - 0.1` lands a hair above 0.01.
const DEADBAND_EPSILON: f64 = 1e-9;

/// Buys the strongest firewall it can afford while intrusions run hot, and
/// slowly relaxes toward Standard once they have died down.
#[derive(Debug, Clone)]
pub struct TieredFirewall {
    pub upgrade_above: f64,
    pub relax_below: f64,
    pub relax_factor: f64,
    pub relax_ceiling: f64,
    /// Relaxations smaller than this are skipped.
    pub deadband: f64,
}

impl Default for TieredFirewall {
    fn default() -> Self {
        Self {
            upgrade_above: 0.05,
            relax_below: 0.02,
            relax_factor: 1.1,
            relax_ceiling: FirewallTier::Standard.strength(),
            deadband: 0.01,
        }
    }
}

impl TieredFirewall {
    fn best_affordable(&self, defender: &DefenderState) -> Option<(FirewallTier, f64)> {
        let current = defender.firewall_type();
        let costs = defender.tier_costs();
        let current_cost = costs.lookup(current);

        FirewallTier::ALL
            .iter()
            .filter(|tier| tier.strength() < current)
            .map(|tier| (*tier, costs.cost(*tier) - current_cost))
            .find(|(_, cost_delta)| *cost_delta <= defender.currency)
    }
}

impl DefenderStrategy for TieredFirewall {
    fn evaluate(&self, defender: &DefenderState, avg_intrusion_rate: f64) -> FirewallAction {
        let current = defender.firewall_type();

        if avg_intrusion_rate > self.upgrade_above {
            match self.best_affordable(defender) {
                Some((to, cost_delta)) => FirewallAction::Upgrade { to, cost_delta },
                None => FirewallAction::Hold,
            }
        } else if avg_intrusion_rate < self.relax_below && current < self.relax_ceiling {
            let to = (current * self.relax_factor).min(self.relax_ceiling);
            if to - current > self.deadband + DEADBAND_EPSILON {
                FirewallAction::Relax { to }
            } else {
                FirewallAction::Hold
            }
        } else {
            FirewallAction::Hold
        }
    }

    fn name(&self) -> &str {
        "tiered"
    }
}
