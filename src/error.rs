use thiserror::Error;

/// Rejected configuration value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a finite number, got {value}")]
    NotFinite { name: &'static str, value: f64 },

    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("alert {0} address is empty")]
    EmptyAddress(&'static str),

    #[error("unknown timeframe {0:?}")]
    UnknownTimeframe(String),
}

/// Failure reported by a [`Notifier`](crate::Notifier).
///
/// Delivery failures are logged and otherwise ignored: alert state is
/// updated whether or not the message got through.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("notification receiver disconnected")]
    Disconnected,

    #[error("notification delivery failed: {0}")]
    Delivery(String),
}
