use botmarket::metrics::RoundEvent;
use botmarket::ConfigError;
use botmarket::prelude::*;
use botmarket::simulation::scenario::load_scenario;

fn hostile() -> SimConfig {
    SimConfig::default()
        .with_name("hostile")
        .with_good_traffic(0.2)
        .with_botnet(10, 50.0)
        .with_firewall(0.5)
}

#[test]
fn fair_game_first_round() {
    let mut sim = Simulation::new(SimConfig::default()).unwrap();
    let outcome = sim.run_round();

    assert_eq!(outcome.traffic.intrusion_rate, 0.0);
    assert_eq!(outcome.attacker_expenses, 0.0);
    assert_eq!(outcome.attacker_profit, 0.0);

    // Two Enterprise servers: 1.5x yield, +5% security on upkeep, catalog firewall 100.
    let revenue = 2.0 * 100_000.0 * 1.5;
    let expenses = 2.0 * (100.0 * 1.05 + 1000.0) + 100.0;
    assert_eq!(outcome.defender_revenue, revenue);
    assert!((outcome.defender_expenses - expenses).abs() < 1e-9);
    assert!((outcome.defender_profit - (revenue - expenses)).abs() < 1e-9);

    assert_eq!(outcome.snapshot.round, 0);
    assert_eq!(outcome.snapshot.attacker_currency, 100_000.0);
    assert!(sim.should_continue());
}

#[test]
fn quiet_fair_game_keeps_enterprise_firewall() {
    let mut sim = Simulation::new(SimConfig::default()).unwrap();
    let first = sim.run_round();
    assert_eq!(first.firewall, FirewallAction::Hold);
    assert_eq!(sim.defender().firewall_type(), 0.1);

    sim.run(40);
    assert!(sim
        .history()
        .snapshots()
        .iter()
        .all(|s| s.firewall_type == 0.1 && s.firewall_quality == FirewallTier::Enterprise));
}

#[test]
fn negative_bandwidth_never_reaches_the_attacker() {
    let err = Simulation::new(SimConfig::default().with_botnet(3, -10.0)).unwrap_err();
    assert!(matches!(err, ConfigError::OutOfRange { field: "bot_bandwidth", .. }));
}

#[test]
fn bundled_fair_game_matches_default() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/templates/fair_game.txt");
    let config = load_scenario(path).unwrap();
    let default = SimConfig::default();

    assert_eq!(config.name, "fair_game");
    assert_eq!(config.attacker_currency, default.attacker_currency);
    assert_eq!(config.server_yield, default.server_yield);
    assert_eq!(config.good_traffic_fraction, default.good_traffic_fraction);
    assert_eq!(config.firewall_type, default.firewall_type);
    assert_eq!(config.server_energy_cost, default.server_energy_cost);
}

#[test]
fn every_bundled_scenario_builds() {
    let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/templates");
    let mut count = 0;
    for entry in std::fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        let config = load_scenario(&path).unwrap();
        let mut sim = Simulation::new(config).unwrap();
        sim.run(200);
        count += 1;
    }
    assert!(count >= 4);
}

#[test]
fn currency_hitting_exactly_zero_stops_the_run() {
    let mut config = SimConfig::default().with_firewall(0.5);
    config.defender_currency = 100;
    config.defender_servers = 1;
    config.server_yield = 0;
    config.server_cost = 99.0;
    config.server_energy_cost = 0.0;
    // Standard tier costs 1 in the catalog: 99 + 0 + 1 = 100 per round.

    let mut sim = Simulation::new(config).unwrap();
    assert!(sim.should_continue());

    let outcome = sim.run_round();
    assert_eq!(outcome.defender_profit, -100.0);
    assert_eq!(sim.defender().currency, 0.0);
    assert!(!sim.should_continue());
    assert_eq!(sim.stop_reason(), Some(StopReason::DefenderBankrupt));

    let termination = sim.run(100);
    assert_eq!(termination.final_round, 1);
    assert_eq!(termination.winner, Winner::Attacker);
}

#[test]
fn hostile_attacker_eventually_walks_away() {
    let mut sim = Simulation::new(hostile()).unwrap();
    let termination = sim.run(50);

    assert_eq!(termination.reason, StopReason::AttackerExited);
    assert_eq!(termination.final_snapshot.num_bots, 0);
    assert_eq!(termination.final_snapshot.total_bot_band, 0.0);
    assert!(sim
        .history()
        .events()
        .iter()
        .any(|e| matches!(e.event, RoundEvent::AttackerExited { .. })));
}

#[test]
fn defender_buys_protection_under_attack() {
    let mut sim = Simulation::new(hostile()).unwrap();
    let outcome = sim.run_round();

    assert!((outcome.traffic.intrusion_rate - 0.5).abs() < 1e-12);
    assert!(matches!(
        outcome.firewall,
        FirewallAction::Upgrade { to: FirewallTier::Premium, .. }
    ));
    assert_eq!(outcome.snapshot.firewall_quality, FirewallTier::Premium);
    assert!(sim
        .history()
        .events_in_round(0)
        .any(|e| matches!(e, RoundEvent::FirewallUpgraded { .. })));

    // Next round sees the stronger firewall.
    let next = sim.run_round();
    assert!((next.traffic.intrusion_rate - 0.01).abs() < 1e-12);
}

#[test]
fn fixed_firewall_never_moves() {
    let mut sim = Simulation::new(hostile().with_defender_strategy("fixed")).unwrap();
    sim.run(20);
    assert!(sim.history().snapshots().iter().all(|s| s.firewall_type == 0.5));
}

#[test]
fn weakest_firewall_means_defender_left() {
    let sim = Simulation::new(SimConfig::default().with_firewall(1.0)).unwrap();
    assert!(!sim.should_continue());
    assert_eq!(sim.stop_reason(), Some(StopReason::DefenderExited));
}

#[test]
fn attacker_can_go_broke() {
    let mut config = hostile().with_attacker_strategy("passive");
    config.attacker_currency = 100;

    let mut sim = Simulation::new(config).unwrap();
    let termination = sim.run(10);
    assert_eq!(termination.reason, StopReason::AttackerBankrupt);
    assert_eq!(termination.final_round, 1);
    assert_eq!(termination.winner, Winner::Defender);
}

#[test]
fn round_limit_is_reported() {
    let mut sim = Simulation::new(SimConfig::default()).unwrap();
    let termination = sim.run(25);
    assert_eq!(termination.final_round, 25);
    assert_eq!(termination.reason, StopReason::RoundLimit);
    assert_eq!(sim.history().len(), 25);
}

#[test]
fn same_seed_same_story() {
    let config = hostile().with_attacker_strategy("legacy").with_seed(1234);

    let mut a = Simulation::new(config.clone()).unwrap();
    let mut b = Simulation::new(config).unwrap();
    a.run(100);
    b.run(100);

    assert_eq!(a.history().snapshots(), b.history().snapshots());
    assert_eq!(a.history().events(), b.history().events());
}
