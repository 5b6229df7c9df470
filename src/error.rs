use serde::Serialize;
use std::path::PathBuf;

/// Anything wrong with a run's inputs. Raised before an engine exists.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("line {line}: missing value for `{field}`")]
    MissingField { line: usize, field: &'static str },

    #[error("line {line}: `{field}` expects {expected}, got {value:?}")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("`{field}` out of range: {reason}")]
    OutOfRange { field: &'static str, reason: String },

    #[error("unknown {kind} strategy: {name}")]
    UnknownStrategy { kind: &'static str, name: String },

    #[error("failed to read scenario {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a botnet resource change was refused. The attacker's state is left
/// untouched whenever one of these is returned.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UpdateRejected {
    #[error("bot count would become {resulting}")]
    NegativeBots { resulting: i64 },

    #[error("bandwidth would become {resulting}")]
    NegativeBandwidth { resulting: f64 },

    #[error("cost {cost:.2} exceeds currency {currency:.2}")]
    InsufficientFunds { cost: f64, currency: f64 },
}
