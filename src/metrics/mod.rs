pub mod logger;
pub mod analyzer;

use crate::error::UpdateRejected;
use crate::firewall::FirewallTier;
use serde::{Deserialize, Serialize};

/// Externally visible state after one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub round: u64,
    pub attacker_currency: f64,
    pub defender_currency: f64,
    /// Currency movement since the previous snapshot (0 for the first).
    pub attacker_change: f64,
    pub defender_change: f64,
    pub num_bots: u64,
    pub total_bot_band: f64,
    pub num_servers: usize,
    pub server_yield: f64,
    pub firewall_type: f64,
    pub firewall_quality: FirewallTier,
    pub intrusion_rate: f64,
    pub attacker_profit: f64,
    pub defender_profit: f64,
}

/// Something a policy did, or tried to do, during a round.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RoundEvent {
    ResourcesAdjusted {
        delta_bots: i64,
        delta_band: f64,
        cost: f64,
    },
    UpdateRejected {
        delta_bots: i64,
        delta_band: f64,
        reason: UpdateRejected,
    },
    AttackerExited {
        profit_memory: f64,
        currency: f64,
    },
    FirewallUpgraded {
        from: f64,
        to: FirewallTier,
        cost: f64,
    },
    FirewallRelaxed {
        from: f64,
        to: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoggedEvent {
    pub round: u64,
    #[serde(flatten)]
    pub event: RoundEvent,
}

/// Ordered record of a run: one snapshot per round plus the round log.
#[derive(Debug, Clone, Default)]
pub struct RunHistory {
    snapshots: Vec<RoundSnapshot>,
    events: Vec<LoggedEvent>,
}

impl RunHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, snapshot: RoundSnapshot) {
        self.snapshots.push(snapshot);
    }

    pub fn record_events(&mut self, round: u64, events: impl IntoIterator<Item = RoundEvent>) {
        self.events
            .extend(events.into_iter().map(|event| LoggedEvent { round, event }));
    }

    pub fn snapshots(&self) -> &[RoundSnapshot] {
        &self.snapshots
    }

    pub fn events(&self) -> &[LoggedEvent] {
        &self.events
    }

    pub fn last(&self) -> Option<&RoundSnapshot> {
        self.snapshots.last()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn events_in_round(&self, round: u64) -> impl Iterator<Item = &RoundEvent> {
        self.events
            .iter()
            .filter(move |e| e.round == round)
            .map(|e| &e.event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_keep_their_round() {
        let mut history = RunHistory::new();
        history.record_events(0, vec![RoundEvent::FirewallRelaxed { from: 0.33, to: 0.363 }]);
        history.record_events(
            2,
            vec![RoundEvent::AttackerExited { profit_memory: -500.0, currency: 1000.0 }],
        );

        assert_eq!(history.events().len(), 2);
        assert_eq!(history.events_in_round(1).count(), 0);
        assert!(matches!(
            history.events_in_round(2).next(),
            Some(RoundEvent::AttackerExited { .. })
        ));
    }

    #[test]
    fn events_serialize_flat_with_tag() {
        let logged = LoggedEvent {
            round: 3,
            event: RoundEvent::UpdateRejected {
                delta_bots: 4,
                delta_band: 4.0,
                reason: UpdateRejected::InsufficientFunds { cost: 140.0, currency: 10.0 },
            },
        };
        let json = serde_json::to_value(&logged).unwrap();
        assert_eq!(json["round"], 3);
        assert_eq!(json["event"], "update_rejected");
        assert_eq!(json["reason"]["kind"], "insufficient_funds");
    }
}
