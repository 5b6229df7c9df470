use super::{step, AttackerAction, AttackerStrategy};
use crate::attacker::AttackerState;
use rand::RngCore;

/// Scales the botnet with how well it is getting through the firewall, and
/// leaves once a single round swings too much of the war chest.
#[derive(Debug, Clone)]
pub struct IntrusionRate {
    /// |last profit| / currency above which the attacker leaves.
    pub exit_swing: f64,
    pub grow_above: f64,
    pub shrink_below: f64,
    /// Shrinking never happens at or below this many bots.
    pub min_fleet: u64,
    pub heavy_loss: f64,
}

impl Default for IntrusionRate {
    fn default() -> Self {
        Self {
            exit_swing: 0.20,
            grow_above: 0.50,
            shrink_below: 0.30,
            min_fleet: 5,
            heavy_loss: -1000.0,
        }
    }
}

impl AttackerStrategy for IntrusionRate {
    fn evaluate(
        &self,
        attacker: &AttackerState,
        intrusion_rate: f64,
        _rng: &mut dyn RngCore,
    ) -> AttackerAction {
        let currency = attacker.currency;
        let profit = attacker.profit_memory;
        let bots = attacker.num_bots();

        if currency > 0.0 && profit.abs() / currency > self.exit_swing && bots > 0 {
            AttackerAction::Exit
        } else if intrusion_rate > self.grow_above {
            AttackerAction::Adjust { delta: step(intrusion_rate * 10.0, 1, 10) }
        } else if intrusion_rate < self.shrink_below && bots > self.min_fleet {
            AttackerAction::Adjust {
                delta: -step((self.shrink_below - intrusion_rate) * 10.0, 1, 5),
            }
        } else if profit < self.heavy_loss && bots > self.min_fleet {
            AttackerAction::Adjust { delta: -step(profit.abs() / 2000.0, 1, 3) }
        } else {
            AttackerAction::Hold
        }
    }

    fn name(&self) -> &str {
        "intrusion-rate"
    }
}
