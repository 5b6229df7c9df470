use serde::{Deserialize, Serialize};

/// How one round's botnet traffic splits up at the defender's firewall.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrafficReport {
    pub total: f64,
    pub good: f64,
    pub malicious: f64,
    pub successful_intrusions: f64,
    pub blocked_intrusions: f64,
    pub intrusion_rate: f64,
}

impl TrafficReport {
    pub fn compute(
        num_bots: u64,
        total_bot_band: f64,
        good_traffic_fraction: f64,
        firewall_type: f64,
    ) -> Self {
        let total = total_bot_band * num_bots as f64;
        let good = total * good_traffic_fraction;
        let malicious = total * (1.0 - good_traffic_fraction);
        let successful_intrusions = malicious * firewall_type;
        let blocked_intrusions = malicious * (1.0 - firewall_type);

        // No malicious traffic means nothing got through, not NaN.
        let intrusion_rate = if malicious > 0.0 {
            (successful_intrusions / malicious).clamp(0.0, 1.0)
        } else {
            0.0
        };

        Self {
            total,
            good,
            malicious,
            successful_intrusions,
            blocked_intrusions,
            intrusion_rate,
        }
    }
}
