use serde::{Deserialize, Serialize};
use std::fmt;

/// The five firewall levels a defender can run, strongest first.
///
/// A tier's strength is the fraction of malicious traffic that still gets
/// through, so a lower value means a stronger firewall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FirewallTier {
    Premium,
    Enterprise,
    Business,
    Standard,
    Basic,
}

impl FirewallTier {
    /// Strongest to weakest.
    pub const ALL: [FirewallTier; 5] = [
        FirewallTier::Premium,
        FirewallTier::Enterprise,
        FirewallTier::Business,
        FirewallTier::Standard,
        FirewallTier::Basic,
    ];

    pub fn strength(self) -> f64 {
        match self {
            FirewallTier::Premium => 0.01,
            FirewallTier::Enterprise => 0.1,
            FirewallTier::Business => 0.33,
            FirewallTier::Standard => 0.5,
            FirewallTier::Basic => 1.0,
        }
    }

    /// Classifies a continuous `firewall_type` into the tier whose breakpoint
    /// it falls under. Anything above 0.5 is Basic.
    pub fn from_firewall_type(firewall_type: f64) -> Self {
        if firewall_type <= 0.01 {
            FirewallTier::Premium
        } else if firewall_type <= 0.1 {
            FirewallTier::Enterprise
        } else if firewall_type <= 0.33 {
            FirewallTier::Business
        } else if firewall_type <= 0.5 {
            FirewallTier::Standard
        } else {
            FirewallTier::Basic
        }
    }

    pub fn yield_multiplier(self) -> f64 {
        match self {
            FirewallTier::Premium => 2.0,
            FirewallTier::Enterprise => 1.5,
            FirewallTier::Business => 1.2,
            FirewallTier::Standard => 1.0,
            FirewallTier::Basic => 0.8,
        }
    }

    /// Scales per-server maintenance cost.
    pub fn security_bonus(self) -> f64 {
        match self {
            FirewallTier::Premium => 0.1,
            FirewallTier::Enterprise => 0.05,
            FirewallTier::Business => 0.02,
            FirewallTier::Standard => 0.0,
            FirewallTier::Basic => -0.05,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FirewallTier::Premium => "Premium",
            FirewallTier::Enterprise => "Enterprise",
            FirewallTier::Business => "Business",
            FirewallTier::Standard => "Standard",
            FirewallTier::Basic => "Basic",
        }
    }
}

impl fmt::Display for FirewallTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A monetary amount per firewall tier.
///
/// Used twice with unrelated scales: the shop's running firewall cost and the
/// defender's tier purchase cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierTable {
    pub premium: f64,
    pub enterprise: f64,
    pub business: f64,
    pub standard: f64,
    pub basic: f64,
}

impl TierTable {
    pub fn catalog_default() -> Self {
        Self {
            premium: 1000.0,
            enterprise: 100.0,
            business: 10.0,
            standard: 1.0,
            basic: 0.0,
        }
    }

    pub fn defender_default() -> Self {
        Self {
            premium: 50_000.0,
            enterprise: 20_000.0,
            business: 8_000.0,
            standard: 3_000.0,
            basic: 0.0,
        }
    }

    pub fn cost(&self, tier: FirewallTier) -> f64 {
        match tier {
            FirewallTier::Premium => self.premium,
            FirewallTier::Enterprise => self.enterprise,
            FirewallTier::Business => self.business,
            FirewallTier::Standard => self.standard,
            FirewallTier::Basic => self.basic,
        }
    }

    pub fn lookup(&self, firewall_type: f64) -> f64 {
        self.cost(FirewallTier::from_firewall_type(firewall_type))
    }

    /// Walking Basic -> Premium never gets cheaper.
    pub fn is_monotonic(&self) -> bool {
        FirewallTier::ALL
            .windows(2)
            .all(|pair| self.cost(pair[0]) >= self.cost(pair[1]))
    }

    pub fn is_finite_non_negative(&self) -> bool {
        FirewallTier::ALL
            .iter()
            .all(|t| self.cost(*t).is_finite() && self.cost(*t) >= 0.0)
    }
}
