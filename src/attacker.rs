use crate::error::UpdateRejected;
use crate::metrics::RoundEvent;
use crate::shop::Shop;
use crate::strategies::{AttackerAction, AttackerStrategy};
use rand::RngCore;
use std::fmt;
use tracing::{debug, info, warn};

pub struct AttackerState {
    /// Only goes negative between a losing round and the termination check.
    pub currency: f64,
    num_bots: u64,
    total_bot_band: f64,
    energy: f64,
    /// Net profit of the last round.
    pub profit_memory: f64,
    strategy: Box<dyn AttackerStrategy>,
    events: Vec<RoundEvent>,
}

impl AttackerState {
    pub fn new(
        currency: f64,
        num_bots: u64,
        total_bot_band: f64,
        energy: f64,
        strategy: Box<dyn AttackerStrategy>,
    ) -> Self {
        Self {
            currency,
            num_bots,
            total_bot_band,
            energy,
            profit_memory: 0.0,
            strategy,
            events: Vec::new(),
        }
    }

    pub fn num_bots(&self) -> u64 {
        self.num_bots
    }

    pub fn total_bot_band(&self) -> f64 {
        self.total_bot_band
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }

    /// Books one round's net result.
    pub fn apply_profit(&mut self, profit: f64) {
        self.currency += profit;
        self.profit_memory = profit;
    }

    /// Runs the policy and applies what it proposes. Returns true when the
    /// attacker wants out of the market, whether or not the withdrawal itself
    /// went through.
    pub fn decision(&mut self, shop: &Shop, intrusion_rate: f64, rng: &mut dyn RngCore) -> bool {
        let state: &AttackerState = self;
        let action = state.strategy.evaluate(state, intrusion_rate, rng);
        debug!(?action, intrusion_rate, "attacker decision");

        match action {
            AttackerAction::Hold => false,
            AttackerAction::Adjust { delta } => {
                // Rejections land on the event log inside update_attacker.
                let _ = self.update_attacker(shop, delta, delta as f64);
                false
            }
            AttackerAction::Exit => {
                info!(
                    "Attacker leaving the market (profit {:.2}, currency {:.2})",
                    self.profit_memory, self.currency
                );
                self.events.push(RoundEvent::AttackerExited {
                    profit_memory: self.profit_memory,
                    currency: self.currency,
                });
                let (bots, band) = (self.num_bots as i64, self.total_bot_band);
                let _ = self.update_attacker(shop, -bots, -band);
                true
            }
        }
    }

    /// Changes the botnet by the given deltas, all or nothing. Only growth is
    /// charged. On rejection nothing about the attacker changes.
    pub fn update_attacker(
        &mut self,
        shop: &Shop,
        delta_bots: i64,
        delta_band: f64,
    ) -> Result<f64, UpdateRejected> {
        let result = self.check_update(shop, delta_bots, delta_band);

        match &result {
            Ok(cost) => {
                self.num_bots = (self.num_bots as i64 + delta_bots) as u64;
                self.total_bot_band += delta_band;
                self.currency -= cost;
                debug!(
                    "Botnet now {} bots / {:.1} band (delta {}, cost {:.2})",
                    self.num_bots, self.total_bot_band, delta_bots, cost
                );
                self.events.push(RoundEvent::ResourcesAdjusted {
                    delta_bots,
                    delta_band,
                    cost: *cost,
                });
            }
            Err(reason) => {
                warn!("Attacker update rejected: {}", reason);
                self.events.push(RoundEvent::UpdateRejected {
                    delta_bots,
                    delta_band,
                    reason: reason.clone(),
                });
            }
        }

        result
    }

    fn check_update(&self, shop: &Shop, delta_bots: i64, delta_band: f64) -> Result<f64, UpdateRejected> {
        let resulting_bots = self.num_bots as i64 + delta_bots;
        if resulting_bots < 0 {
            return Err(UpdateRejected::NegativeBots { resulting: resulting_bots });
        }

        let resulting_band = self.total_bot_band + delta_band;
        if resulting_band < 0.0 {
            return Err(UpdateRejected::NegativeBandwidth { resulting: resulting_band });
        }

        let cost = shop.bot_purchase_cost(delta_bots, delta_band);
        if cost > self.currency {
            return Err(UpdateRejected::InsufficientFunds { cost, currency: self.currency });
        }

        Ok(cost)
    }

    pub fn take_events(&mut self) -> Vec<RoundEvent> {
        std::mem::take(&mut self.events)
    }
}

impl fmt::Debug for AttackerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttackerState")
            .field("currency", &self.currency)
            .field("num_bots", &self.num_bots)
            .field("total_bot_band", &self.total_bot_band)
            .field("energy", &self.energy)
            .field("profit_memory", &self.profit_memory)
            .field("strategy", &self.strategy.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firewall::TierTable;
    use crate::strategies::intrusion::IntrusionRate;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn shop() -> Shop {
        Shop::new(100.0, 30.0, 5.0, 1000.0, TierTable::catalog_default())
    }

    fn attacker(currency: f64, bots: u64, band: f64) -> AttackerState {
        AttackerState::new(currency, bots, band, 100.0, Box::new(IntrusionRate::default()))
    }

    #[test]
    fn growth_is_charged() {
        let mut a = attacker(1000.0, 2, 20.0);
        let cost = a.update_attacker(&shop(), 3, 3.0).unwrap();
        assert_eq!(cost, 15.0 + 90.0);
        assert_eq!(a.num_bots(), 5);
        assert_eq!(a.total_bot_band(), 23.0);
        assert_eq!(a.currency, 1000.0 - 105.0);
    }

    #[test]
    fn shrinking_is_free() {
        let mut a = attacker(10.0, 8, 80.0);
        assert_eq!(a.update_attacker(&shop(), -2, -2.0), Ok(0.0));
        assert_eq!(a.num_bots(), 6);
        assert_eq!(a.currency, 10.0);
    }

    #[test]
    fn unaffordable_update_changes_nothing() {
        let mut a = attacker(50.0, 2, 20.0);
        let err = a.update_attacker(&shop(), 4, 4.0).unwrap_err();
        assert!(matches!(err, UpdateRejected::InsufficientFunds { .. }));
        assert_eq!(a.num_bots(), 2);
        assert_eq!(a.total_bot_band(), 20.0);
        assert_eq!(a.currency, 50.0);

        let events = a.take_events();
        assert!(matches!(events.as_slice(), [RoundEvent::UpdateRejected { .. }]));
    }

    #[test]
    fn negative_results_are_rejected() {
        let mut a = attacker(1000.0, 2, 1.0);
        assert!(matches!(
            a.update_attacker(&shop(), -3, -3.0),
            Err(UpdateRejected::NegativeBots { resulting: -1 })
        ));
        assert!(matches!(
            a.update_attacker(&shop(), -1, -3.0),
            Err(UpdateRejected::NegativeBandwidth { .. })
        ));
        assert_eq!(a.num_bots(), 2);
        assert_eq!(a.total_bot_band(), 1.0);
    }

    #[test]
    fn forced_exit_withdraws_everything() {
        let mut a = attacker(1000.0, 7, 70.0);
        a.profit_memory = -300.0;
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        assert!(a.decision(&shop(), 0.9, &mut rng));
        assert_eq!(a.num_bots(), 0);
        assert_eq!(a.total_bot_band(), 0.0);
        assert_eq!(a.currency, 1000.0);

        let events = a.take_events();
        assert!(matches!(events[0], RoundEvent::AttackerExited { .. }));
        assert!(matches!(events[1], RoundEvent::ResourcesAdjusted { delta_bots: -7, .. }));
    }

    #[test]
    fn rejected_growth_still_reports_no_exit() {
        let mut a = attacker(1.0, 1, 10.0);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(!a.decision(&shop(), 0.9, &mut rng));
        assert_eq!(a.num_bots(), 1);
    }

    #[test]
    fn profit_lands_in_memory_and_currency() {
        let mut a = attacker(1000.0, 0, 0.0);
        a.apply_profit(-250.0);
        assert_eq!(a.currency, 750.0);
        assert_eq!(a.profit_memory, -250.0);
    }
}
