use crate::firewall::{FirewallTier, TierTable};
use crate::metrics::RoundEvent;
use crate::server::ServerUnit;
use crate::shop::Shop;
use crate::strategies::{DefenderStrategy, FirewallAction};
use std::collections::VecDeque;
use std::fmt;
use tracing::{debug, info};

/// How many recent intrusion rates the defender averages over.
pub const INTRUSION_WINDOW: usize = 5;

pub struct DefenderState {
    pub currency: f64,
    servers: Vec<ServerUnit>,
    server_yield: f64,
    firewall_type: f64,
    pub profit_memory: f64,
    intrusion_history: VecDeque<f64>,
    tier_costs: TierTable,
    strategy: Box<dyn DefenderStrategy>,
    events: Vec<RoundEvent>,
}

impl DefenderState {
    pub fn new(
        currency: f64,
        num_servers: u32,
        server_yield: f64,
        firewall_type: f64,
        tier_costs: TierTable,
        strategy: Box<dyn DefenderStrategy>,
    ) -> Self {
        let servers = (0..num_servers)
            .map(|id| ServerUnit::new(id, server_yield, firewall_type))
            .collect();

        Self {
            currency,
            servers,
            server_yield,
            firewall_type,
            profit_memory: 0.0,
            intrusion_history: VecDeque::with_capacity(INTRUSION_WINDOW),
            tier_costs,
            strategy,
            events: Vec::new(),
        }
    }

    pub fn firewall_type(&self) -> f64 {
        self.firewall_type
    }

    pub fn firewall_tier(&self) -> FirewallTier {
        FirewallTier::from_firewall_type(self.firewall_type)
    }

    pub fn tier_costs(&self) -> &TierTable {
        &self.tier_costs
    }

    pub fn servers(&self) -> &[ServerUnit] {
        &self.servers
    }

    pub fn num_servers(&self) -> usize {
        self.servers.len()
    }

    pub fn server_yield(&self) -> f64 {
        self.server_yield
    }

    pub fn intrusion_history(&self) -> &VecDeque<f64> {
        &self.intrusion_history
    }

    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }

    /// Gross income from every server this round.
    pub fn revenue(&self) -> f64 {
        self.servers.iter().map(ServerUnit::get_defender_yield).sum()
    }

    /// Server upkeep plus the shop's running cost for the current firewall.
    pub fn expenses(&self, shop: &Shop) -> f64 {
        let upkeep: f64 = self
            .servers
            .iter()
            .map(|s| s.upkeep(shop.server_cost, shop.server_energy_cost))
            .sum();
        upkeep + shop.firewall_cost(self.firewall_type)
    }

    pub fn apply_profit(&mut self, profit: f64) {
        self.currency += profit;
        self.profit_memory = profit;
    }

    /// At the weakest tier the defender has effectively given up.
    pub fn has_exited(&self) -> bool {
        self.firewall_type >= FirewallTier::Basic.strength()
    }

    pub fn record_intrusion(&mut self, intrusion_rate: f64) {
        self.intrusion_history.push_back(intrusion_rate);
        while self.intrusion_history.len() > INTRUSION_WINDOW {
            self.intrusion_history.pop_front();
        }
    }

    pub fn average_intrusion_rate(&self) -> f64 {
        if self.intrusion_history.is_empty() {
            return 0.0;
        }
        self.intrusion_history.iter().sum::<f64>() / self.intrusion_history.len() as f64
    }

    /// Records the round's intrusion rate and lets the firewall policy react
    /// to the windowed average. Returns what was applied.
    pub fn process_round(&mut self, intrusion_rate: f64) -> FirewallAction {
        self.record_intrusion(intrusion_rate);
        let avg_rate = self.average_intrusion_rate();

        let state: &DefenderState = self;
        let action = state.strategy.evaluate(state, avg_rate);
        debug!(?action, avg_rate, "defender decision");

        match action {
            FirewallAction::Hold => {}
            FirewallAction::Upgrade { to, cost_delta } => {
                let from = self.firewall_type;
                info!(
                    "Defender upgrading firewall {:.3} -> {} ({:.3}) for {:.2}",
                    from, to, to.strength(), cost_delta
                );
                self.currency -= cost_delta;
                self.set_firewall(to.strength());
                self.events.push(RoundEvent::FirewallUpgraded { from, to, cost: cost_delta });
            }
            FirewallAction::Relax { to } => {
                let from = self.firewall_type;
                debug!("Defender relaxing firewall {:.3} -> {:.3}", from, to);
                self.set_firewall(to);
                self.events.push(RoundEvent::FirewallRelaxed { from, to });
            }
        }

        action
    }

    fn set_firewall(&mut self, firewall_type: f64) {
        self.firewall_type = firewall_type;
        for server in &mut self.servers {
            server.update_quality(firewall_type);
        }
    }

    pub fn take_events(&mut self) -> Vec<RoundEvent> {
        std::mem::take(&mut self.events)
    }
}

impl fmt::Debug for DefenderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefenderState")
            .field("currency", &self.currency)
            .field("servers", &self.servers.len())
            .field("firewall_type", &self.firewall_type)
            .field("profit_memory", &self.profit_memory)
            .field("intrusion_history", &self.intrusion_history)
            .field("strategy", &self.strategy.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::static_strategies::FixedFirewall;
    use crate::strategies::tiered::TieredFirewall;

    fn defender(currency: f64, firewall_type: f64) -> DefenderState {
        DefenderState::new(
            currency,
            3,
            1000.0,
            firewall_type,
            TierTable::defender_default(),
            Box::new(TieredFirewall::default()),
        )
    }

    #[test]
    fn history_keeps_last_five() {
        let mut d = DefenderState::new(0.0, 1, 1.0, 0.5, TierTable::defender_default(), Box::new(FixedFirewall));
        for rate in [0.9, 0.1, 0.2, 0.3, 0.4, 0.5] {
            d.process_round(rate);
        }
        assert_eq!(d.intrusion_history().len(), INTRUSION_WINDOW);
        assert_eq!(d.intrusion_history().front(), Some(&0.1));
        assert!((d.average_intrusion_rate() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn upgrade_moves_exactly_one_affordable_step() {
        let mut d = defender(15_000.0, 0.33);
        for rate in [0.06, 0.07, 0.08, 0.09] {
            d.record_intrusion(rate);
        }

        let action = d.process_round(0.1);

        assert!(matches!(action, FirewallAction::Upgrade { to: FirewallTier::Enterprise, .. }));
        assert_eq!(d.firewall_type(), 0.1);
        assert_eq!(d.currency, 3_000.0);
        assert!(d.servers().iter().all(|s| s.quality() == FirewallTier::Enterprise));
        assert!(matches!(
            d.take_events().as_slice(),
            [RoundEvent::FirewallUpgraded { to: FirewallTier::Enterprise, .. }]
        ));
    }

    #[test]
    fn relaxing_updates_servers() {
        let mut d = defender(1000.0, 0.33);
        d.process_round(0.0);
        assert!((d.firewall_type() - 0.363).abs() < 1e-9);
        assert!(d.servers().iter().all(|s| s.quality() == FirewallTier::Standard));
        assert_eq!(d.currency, 1000.0);
    }

    #[test]
    fn revenue_and_expenses_follow_tier() {
        let d = defender(0.0, 0.1);
        assert_eq!(d.revenue(), 3.0 * 1500.0);

        let shop = Shop::new(100.0, 30.0, 5.0, 1000.0, TierTable::catalog_default());
        let expected = 3.0 * (100.0 * 1.05 + 1000.0) + 100.0;
        assert!((d.expenses(&shop) - expected).abs() < 1e-9);
    }

    #[test]
    fn basic_firewall_means_exit() {
        assert!(defender(0.0, 1.0).has_exited());
        assert!(!defender(0.0, 0.5).has_exited());
    }
}
