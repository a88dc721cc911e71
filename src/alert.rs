use std::{
    fmt::{Debug, Display},
    sync::mpsc::Sender,
};

use tracing::{debug, info};

use crate::{ConfigError, NotifyError, Signal, Timeframe, Timestamp, TriggerCandle};

/// Sender and recipient of alert notifications.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct AlertConfig {
    from: String,
    to: String,
}

impl AlertConfig {
    /// # Errors
    ///
    /// [`ConfigError::EmptyAddress`] if either address is blank.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Result<Self, ConfigError> {
        let from = from.into();
        let to = to.into();

        if from.trim().is_empty() {
            return Err(ConfigError::EmptyAddress("sender"));
        }
        if to.trim().is_empty() {
            return Err(ConfigError::EmptyAddress("recipient"));
        }

        Ok(Self { from, to })
    }

    #[inline]
    #[must_use]
    pub fn from(&self) -> &str {
        &self.from
    }

    #[inline]
    #[must_use]
    pub fn to(&self) -> &str {
        &self.to
    }
}

impl Display for AlertConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// A trend change alert, ready for delivery.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Notification {
    from: String,
    to: String,
    symbol: String,
    timeframe: Timeframe,
    signal: Signal,
    open_time: Timestamp,
}

impl Notification {
    pub(crate) fn new(
        config: &AlertConfig,
        symbol: &str,
        timeframe: Timeframe,
        signal: Signal,
        open_time: Timestamp,
    ) -> Self {
        debug_assert!(signal != Signal::Neutral, "neutral signals are never sent");

        Self {
            from: config.from.clone(),
            to: config.to.clone(),
            symbol: symbol.to_owned(),
            timeframe,
            signal,
            open_time,
        }
    }

    #[inline]
    #[must_use]
    pub fn from(&self) -> &str {
        &self.from
    }

    #[inline]
    #[must_use]
    pub fn to(&self) -> &str {
        &self.to
    }

    #[inline]
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Chart timeframe the indicator runs on.
    #[inline]
    #[must_use]
    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    #[inline]
    #[must_use]
    pub fn signal(&self) -> Signal {
        self.signal
    }

    /// Open time of the bar that triggered the alert.
    #[inline]
    #[must_use]
    pub fn open_time(&self) -> Timestamp {
        self.open_time
    }

    /// `VarMovAvg Alert - EURUSD @ M15`
    #[must_use]
    pub fn subject(&self) -> String {
        format!("VarMovAvg Alert - {} @ {}", self.symbol, self.timeframe)
    }

    /// `VarMovAvg: EURUSD - M15 - Up Signal.`
    #[must_use]
    pub fn body(&self) -> String {
        format!(
            "VarMovAvg: {} - {} - {} Signal.",
            self.symbol, self.timeframe, self.signal
        )
    }
}

impl Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.body())
    }
}

/// Outbound delivery of alert notifications (mail, push, a channel...).
///
/// Delivery is fire-and-forget: an error is logged by the caller and does
/// not undo the alert.
pub trait Notifier: Send {
    /// # Errors
    ///
    /// [`NotifyError`] when the notification could not be handed over.
    fn notify(&mut self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Hands notifications to the receiving end of a channel.
impl Notifier for Sender<Notification> {
    fn notify(&mut self, notification: &Notification) -> Result<(), NotifyError> {
        self.send(notification.clone())
            .map_err(|_| NotifyError::Disconnected)
    }
}

/// Emits notifications as `tracing` events at `INFO` level.
#[derive(Clone, Copy, Default, Debug)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, notification: &Notification) -> Result<(), NotifyError> {
        info!(
            from = notification.from(),
            to = notification.to(),
            subject = %notification.subject(),
            "{}",
            notification.body()
        );
        Ok(())
    }
}

/// Turns a stream of detected signals into at most one alert per
/// transition.
///
/// A fresh debouncer is disarmed. It arms the first time the same bar is
/// evaluated twice in a row (a live update of the bar it stopped on),
/// adopting that bar's signal without alerting. History replayed on
/// startup therefore never produces alerts.
#[derive(Clone, Debug)]
pub struct AlertDebouncer {
    trigger: TriggerCandle,
    last_alert_time: Option<Timestamp>,
    last_signal: Signal,
    last_processed_index: Option<usize>,
}

impl AlertDebouncer {
    #[must_use]
    pub fn new(trigger: TriggerCandle) -> Self {
        Self {
            trigger,
            last_alert_time: None,
            last_signal: Signal::Neutral,
            last_processed_index: None,
        }
    }

    /// Open time of the bar that last alerted (or armed the debouncer).
    #[inline]
    #[must_use]
    pub fn last_alert_time(&self) -> Option<Timestamp> {
        self.last_alert_time
    }

    #[inline]
    #[must_use]
    pub fn last_signal(&self) -> Signal {
        self.last_signal
    }

    #[inline]
    #[must_use]
    pub fn last_processed_index(&self) -> Option<usize> {
        self.last_processed_index
    }

    #[inline]
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.last_alert_time.is_some()
    }

    /// Records the evaluation of bar `index` and returns the signal to
    /// alert on, if any.
    pub fn evaluate(
        &mut self,
        index: usize,
        open_time: Timestamp,
        signal: Signal,
    ) -> Option<Signal> {
        let fired = match self.last_alert_time {
            None => {
                if self.last_processed_index == Some(index) {
                    debug!(index, open_time, %signal, "alert debouncer armed");
                    self.last_signal = signal;
                    self.last_alert_time = Some(open_time);
                }
                None
            }
            Some(last_alert_time) => {
                let eligible = match self.trigger {
                    TriggerCandle::Current => true,
                    TriggerCandle::Previous => open_time > last_alert_time,
                };

                if eligible && signal != Signal::Neutral && signal != self.last_signal {
                    self.last_signal = signal;
                    self.last_alert_time = Some(open_time);
                    Some(signal)
                } else {
                    None
                }
            }
        };

        self.last_processed_index = Some(index);
        fired
    }

    /// Back to the disarmed state.
    pub fn reset(&mut self) {
        *self = Self::new(self.trigger);
    }
}
