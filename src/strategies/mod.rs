pub mod static_strategies;
pub mod intrusion;
pub mod profit;
pub mod tiered;

use crate::attacker::AttackerState;
use crate::defender::DefenderState;
use crate::firewall::FirewallTier;
use rand::RngCore;
use std::collections::HashMap;
use std::fmt;

/// What an attacker policy wants done with the botnet this round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttackerAction {
    Hold,
    /// Grow (positive) or shrink (negative) both bot count and bandwidth.
    Adjust { delta: i64 },
    /// Withdraw everything and leave the market.
    Exit,
}

/// What a defender policy wants done with the firewall this round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FirewallAction {
    Hold,
    Upgrade { to: FirewallTier, cost_delta: f64 },
    Relax { to: f64 },
}

/// Policies only look at state and propose; the owning state applies the result.
pub trait AttackerStrategy: Send + Sync + fmt::Debug {
    fn evaluate(
        &self,
        attacker: &AttackerState,
        intrusion_rate: f64,
        rng: &mut dyn RngCore,
    ) -> AttackerAction;
    fn name(&self) -> &str;
}

pub trait DefenderStrategy: Send + Sync + fmt::Debug {
    fn evaluate(&self, defender: &DefenderState, avg_intrusion_rate: f64) -> FirewallAction;
    fn name(&self) -> &str;
}

/// `clamp(round(x), lo, hi)` as a whole-bot step. Halves go to the even neighbour.
pub(crate) fn step(x: f64, lo: i64, hi: i64) -> i64 {
    (x.round_ties_even() as i64).clamp(lo, hi)
}

type AttackerFactory = Box<dyn Fn() -> Box<dyn AttackerStrategy> + Send + Sync>;
type DefenderFactory = Box<dyn Fn() -> Box<dyn DefenderStrategy> + Send + Sync>;

pub struct StrategyRegistry {
    attackers: HashMap<String, AttackerFactory>,
    defenders: HashMap<String, DefenderFactory>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            attackers: HashMap::new(),
            defenders: HashMap::new(),
        };
        registry.register_builtin();
        registry
    }

    fn register_builtin(&mut self) {
        self.register_attacker("intrusion-rate", || Box::new(intrusion::IntrusionRate::default()));
        self.register_attacker("adaptive", || Box::new(intrusion::IntrusionRate::default()));
        self.register_attacker("profit-threshold", || Box::new(profit::ProfitThreshold::default()));
        self.register_attacker("legacy", || Box::new(profit::ProfitThreshold::default()));
        self.register_attacker("passive", || Box::new(static_strategies::Passive));
        self.register_defender("tiered", || Box::new(tiered::TieredFirewall::default()));
        self.register_defender("fixed", || Box::new(static_strategies::FixedFirewall));
    }

    pub fn register_attacker<F>(&mut self, name: &str, factory: F)
    where
        F: Fn() -> Box<dyn AttackerStrategy> + Send + Sync + 'static,
    {
        self.attackers.insert(name.to_lowercase(), Box::new(factory));
    }

    pub fn register_defender<F>(&mut self, name: &str, factory: F)
    where
        F: Fn() -> Box<dyn DefenderStrategy> + Send + Sync + 'static,
    {
        self.defenders.insert(name.to_lowercase(), Box::new(factory));
    }

    pub fn create_attacker(&self, name: &str) -> Option<Box<dyn AttackerStrategy>> {
        self.attackers.get(&name.to_lowercase()).map(|factory| factory())
    }

    pub fn create_defender(&self, name: &str) -> Option<Box<dyn DefenderStrategy>> {
        self.defenders.get(&name.to_lowercase()).map(|factory| factory())
    }

    pub fn list_attackers(&self) -> Vec<String> {
        let mut names: Vec<String> = self.attackers.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn list_defenders(&self) -> Vec<String> {
        let mut names: Vec<String> = self.defenders.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn global() -> &'static StrategyRegistry {
        use std::sync::OnceLock;
        static REGISTRY: OnceLock<StrategyRegistry> = OnceLock::new();
        REGISTRY.get_or_init(StrategyRegistry::new)
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}
