pub mod traffic;

pub use traffic::TrafficReport;
