use super::{step, AttackerAction, AttackerStrategy};
use crate::attacker::AttackerState;
use rand::{Rng, RngCore};

/// Older attacker heuristic that ignores the intrusion rate and reacts to
/// last round's profit alone. Losing rounds may end the run at random, with
/// odds growing with the size of the loss.
#[derive(Debug, Clone)]
pub struct ProfitThreshold {
    pub heavy_loss: f64,
    pub min_fleet: u64,
}

impl Default for ProfitThreshold {
    fn default() -> Self {
        Self {
            heavy_loss: -1000.0,
            min_fleet: 5,
        }
    }
}

impl ProfitThreshold {
    fn exit_probability(currency: f64, profit: f64) -> f64 {
        if currency <= 0.0 {
            1.0
        } else {
            (profit.abs() / currency).min(1.0)
        }
    }
}

impl AttackerStrategy for ProfitThreshold {
    fn evaluate(
        &self,
        attacker: &AttackerState,
        _intrusion_rate: f64,
        rng: &mut dyn RngCore,
    ) -> AttackerAction {
        let profit = attacker.profit_memory;
        let bots = attacker.num_bots();

        if bots > 0 && profit < 0.0 {
            let p = Self::exit_probability(attacker.currency, profit);
            if rng.gen_bool(p) {
                return AttackerAction::Exit;
            }
        }

        if profit > 0.0 {
            AttackerAction::Adjust { delta: 1 }
        } else if profit < self.heavy_loss && bots > self.min_fleet {
            AttackerAction::Adjust { delta: -step(profit.abs() / 2000.0, 1, 3) }
        } else {
            AttackerAction::Hold
        }
    }

    fn name(&self) -> &str {
        "profit-threshold"
    }
}
