pub mod firewall;
pub mod shop;
pub mod server;
pub mod attacker;
pub mod defender;
pub mod network;
pub mod strategies;
pub mod metrics;
pub mod simulation;
pub mod error;

pub use attacker::AttackerState;
pub use defender::DefenderState;
pub use server::ServerUnit;
pub use shop::Shop;
pub use simulation::{Simulation, SimConfig};
pub use error::{ConfigError, UpdateRejected};

pub mod prelude {
    pub use crate::attacker::AttackerState;
    pub use crate::defender::DefenderState;
    pub use crate::firewall::{FirewallTier, TierTable};
    pub use crate::metrics::{RoundEvent, RoundSnapshot, RunHistory};
    pub use crate::shop::Shop;
    pub use crate::simulation::{RoundOutcome, SimConfig, Simulation, StopReason, Termination, Winner};
    pub use crate::strategies::{AttackerAction, FirewallAction, StrategyRegistry};
}
