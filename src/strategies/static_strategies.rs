use super::{AttackerAction, AttackerStrategy, DefenderStrategy, FirewallAction};
use crate::attacker::AttackerState;
use crate::defender::DefenderState;
use rand::RngCore;

/// Keeps whatever botnet it started with.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passive;

impl AttackerStrategy for Passive {
    fn evaluate(&self, _: &AttackerState, _: f64, _: &mut dyn RngCore) -> AttackerAction {
        AttackerAction::Hold
    }

    fn name(&self) -> &str {
        "passive"
    }
}

/// Never touches the firewall.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedFirewall;

impl DefenderStrategy for FixedFirewall {
    fn evaluate(&self, _: &DefenderState, _: f64) -> FirewallAction {
        FirewallAction::Hold
    }

    fn name(&self) -> &str {
        "fixed"
    }
}
