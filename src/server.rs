use crate::firewall::FirewallTier;
use serde::{Deserialize, Serialize};

/// One unit of defender capacity. Everything except `server_yield` is
/// derived from the defender's firewall and recomputed when it changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerUnit {
    id: u32,
    server_yield: f64,
    firewall_type: f64,
    quality: FirewallTier,
    yield_multiplier: f64,
    security_bonus: f64,
}

impl ServerUnit {
    pub fn new(id: u32, server_yield: f64, firewall_type: f64) -> Self {
        let mut server = Self {
            id,
            server_yield,
            firewall_type,
            quality: FirewallTier::Basic,
            yield_multiplier: 1.0,
            security_bonus: 0.0,
        };
        server.update_quality(firewall_type);
        server
    }

    pub fn update_quality(&mut self, firewall_type: f64) {
        let tier = FirewallTier::from_firewall_type(firewall_type);
        self.firewall_type = firewall_type;
        self.quality = tier;
        self.yield_multiplier = tier.yield_multiplier();
        self.security_bonus = tier.security_bonus();
    }

    pub fn get_defender_yield(&self) -> f64 {
        self.server_yield * self.yield_multiplier
    }

    /// Per-round maintenance: base price scaled by the security bonus, plus power.
    pub fn upkeep(&self, server_cost: f64, server_energy_cost: f64) -> f64 {
        server_cost * (1.0 + self.security_bonus) + server_energy_cost
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn quality(&self) -> FirewallTier {
        self.quality
    }

    pub fn firewall_type(&self) -> f64 {
        self.firewall_type
    }

    pub fn yield_multiplier(&self) -> f64 {
        self.yield_multiplier
    }

    pub fn security_bonus(&self) -> f64 {
        self.security_bonus
    }

    pub fn server_yield(&self) -> f64 {
        self.server_yield
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_follows_firewall() {
        let mut server = ServerUnit::new(0, 1000.0, 0.1);
        assert_eq!(server.quality(), FirewallTier::Enterprise);
        assert_eq!(server.get_defender_yield(), 1500.0);
        assert_eq!(server.security_bonus(), 0.05);

        server.update_quality(0.01);
        assert_eq!(server.quality(), FirewallTier::Premium);
        assert_eq!(server.get_defender_yield(), 2000.0);

        server.update_quality(0.9);
        assert_eq!(server.quality(), FirewallTier::Basic);
        assert_eq!(server.get_defender_yield(), 800.0);
        assert_eq!(server.security_bonus(), -0.05);
    }

    #[test]
    fn upkeep_scales_with_security() {
        let server = ServerUnit::new(0, 1000.0, 0.01);
        assert!((server.upkeep(100.0, 10.0) - 120.0).abs() < 1e-9);

        let basic = ServerUnit::new(1, 1000.0, 1.0);
        assert!((basic.upkeep(100.0, 10.0) - 105.0).abs() < 1e-9);
    }
}
