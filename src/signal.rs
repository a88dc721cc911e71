use std::fmt::{Debug, Display};

use crate::{BarSeries, TimeframeMapper, VmaSeries};

/// Trend classification of a bar, or the direction of an alert.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Default, Debug)]
pub enum Signal {
    /// No qualifying move.
    #[default]
    Neutral,
    /// Average rising faster than the threshold.
    Up,
    /// Average falling faster than the threshold.
    Down,
}

impl Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Which bar a trend change is detected on.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Default, Debug)]
pub enum TriggerCandle {
    /// The still-forming bar. Its classification can change on every
    /// update, so it is compared against the last alerted direction.
    Current,
    /// The last closed bar, compared against the bar before it.
    #[default]
    Previous,
}

impl Display for TriggerCandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Edge detector over the per-bar classification.
///
/// Fires only when the classification changes, never on a sustained state.
#[derive(Clone, Copy, Debug)]
pub struct SignalDetector {
    trigger: TriggerCandle,
}

impl SignalDetector {
    #[must_use]
    pub fn new(trigger: TriggerCandle) -> Self {
        Self { trigger }
    }

    #[inline]
    #[must_use]
    pub fn trigger(&self) -> TriggerCandle {
        self.trigger
    }

    /// Signal for base bar `index`.
    ///
    /// `last_signal` is the direction of the last alert sent; only the
    /// [`Current`](TriggerCandle::Current) policy reads it. Returns `None`
    /// when there is not enough history to look back far enough.
    #[must_use]
    pub fn detect<B, R>(
        &self,
        series: &VmaSeries,
        mapper: &TimeframeMapper<'_, B, R>,
        index: usize,
        last_signal: Signal,
    ) -> Option<Signal>
    where
        B: BarSeries + ?Sized,
        R: BarSeries + ?Sized,
    {
        match self.trigger {
            TriggerCandle::Current => Some(Self::against_last(series, index, last_signal)),
            TriggerCandle::Previous if mapper.is_projected() => {
                // Two latest finished upper timeframe bars.
                let last = index.checked_sub(mapper.run_length(index) + 1)?;
                mapper.reference_index(last)?;
                let penultimate = last.checked_sub(mapper.run_length(last))?;

                Some(Self::edge(series, last, Some(penultimate)))
            }
            TriggerCandle::Previous => {
                let last = index.checked_sub(1)?;

                Some(Self::edge(series, last, last.checked_sub(1)))
            }
        }
    }

    /// `last` is classified and `before` (absent when out of history) is not
    /// classified the same way.
    fn edge(series: &VmaSeries, last: usize, before: Option<usize>) -> Signal {
        let up = series.up(last).is_some() && before.is_none_or(|b| series.up(b).is_none());
        let down =
            series.down(last).is_some() && before.is_none_or(|b| series.down(b).is_none());

        match (up, down) {
            (_, true) => Signal::Down,
            (true, false) => Signal::Up,
            (false, false) => Signal::Neutral,
        }
    }

    fn against_last(series: &VmaSeries, index: usize, last_signal: Signal) -> Signal {
        if series.down(index).is_some() && last_signal != Signal::Down {
            Signal::Down
        } else if series.up(index).is_some() && last_signal != Signal::Up {
            Signal::Up
        } else {
            Signal::Neutral
        }
    }
}
