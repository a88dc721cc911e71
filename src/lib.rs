//! Variable Moving Average (VMA) for Rust.
//!
//! An adaptive moving average driven by Kaufman's efficiency ratio, with
//! per-bar trend classification, optional projection from an upper
//! timeframe, and debounced trend change alerts.
//!
//! Two entry points:
//!
//! - [`Vma`] is a streaming [`Indicator`]: feed bars implementing
//!   [`Ohlcv`] one at a time, same `open_time` repaints the forming bar.
//!   [`new`](Vma::new), [`compute`](Vma::compute), and
//!   [`value`](Vma::value) are inherent methods, so no trait import is
//!   needed. Import [`Indicator`] only for generic code.
//! - [`VarMovAvg`] works over a host's indexed bar history
//!   ([`BarSeries`]), writes one value per base bar into a [`VmaSeries`],
//!   and sends [`Notification`]s through a [`Notifier`] when the trend
//!   flips.
//!
//! Diagnostics go through [`tracing`]; the crate never installs a
//! subscriber.

mod alert;
mod close_window;
mod error;
mod indicator;
mod mapper;
mod ohlcv;
mod output;
mod signal;
mod timeframe;
mod var_mov_avg;
mod vma;

pub use crate::alert::{AlertConfig, AlertDebouncer, LogNotifier, Notification, Notifier};
pub use crate::error::{ConfigError, NotifyError};
pub use crate::indicator::Indicator;
pub use crate::mapper::TimeframeMapper;
pub use crate::ohlcv::{BarSeries, Ohlcv, Price, Timestamp};
pub use crate::output::VmaSeries;
pub use crate::signal::{Signal, SignalDetector, TriggerCandle};
pub use crate::timeframe::Timeframe;
pub use crate::var_mov_avg::{VarMovAvg, VarMovAvgBuilder};
pub use crate::vma::{Vma, VmaConfig, VmaConfigBuilder, VmaValue};

macro_rules! impl_indicator_methods {
    ($type:ty, $config:ty, $output:ty) => {
        impl $type {
            /// See [`Indicator::new`].
            #[must_use]
            pub fn new(config: $config) -> Self {
                <Self as Indicator>::new(config)
            }

            /// See [`Indicator::compute`].
            #[inline]
            pub fn compute(&mut self, kline: &impl Ohlcv) -> Option<$output> {
                <Self as Indicator>::compute(self, kline)
            }

            /// See [`Indicator::value`].
            #[must_use]
            #[inline]
            pub fn value(&self) -> Option<$output> {
                <Self as Indicator>::value(self)
            }
        }
    };
}

impl_indicator_methods!(Vma, VmaConfig, VmaValue);

#[cfg(test)]
mod test_util;
