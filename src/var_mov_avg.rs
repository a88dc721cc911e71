use std::fmt::{Debug, Display};

use tracing::{info, warn};

use crate::{
    AlertConfig, AlertDebouncer, BarSeries, Notification, Notifier, SignalDetector, Timeframe,
    TimeframeMapper, Timestamp, TriggerCandle, Vma, VmaConfig, VmaSeries, VmaValue,
    ohlcv::SeriesBar,
};

/// Variable Moving Average over a host's bar history, with optional
/// projection from an upper timeframe and trend change alerts.
///
/// The host calls [`calculate`](Self::calculate) (or
/// [`calculate_mtf`](Self::calculate_mtf)) once per new or updated base
/// bar, in increasing index order, and reads the result from
/// [`series`](Self::series). Re-delivering an older index is cheap: every
/// reference bar is computed once with its final close and cached. Only
/// the newest reference bar is recomputed as its close changes.
///
/// # Example
///
/// ```
/// use quantedge_vma::{Timeframe, VarMovAvg, VmaConfig};
/// use std::num::NonZero;
/// # use quantedge_vma::{Ohlcv, Price, Timestamp};
/// #
/// # struct Bar(f64, u64);
/// # impl Ohlcv for Bar {
/// #     fn close(&self) -> Price { self.0 }
/// #     fn open_time(&self) -> Timestamp { self.1 }
/// # }
///
/// let config = VmaConfig::builder()
///     .period(NonZero::new(3).unwrap())
///     .tick_size(0.0001)
///     .build();
/// let mut vma = VarMovAvg::builder("EURUSD", Timeframe::M15)
///     .config(config)
///     .build();
///
/// let bars: Vec<Bar> = (0..10u32)
///     .map(|i| Bar(1.1 + f64::from(i) * 0.001, u64::from(i) * 900))
///     .collect();
/// for i in 0..bars.len() {
///     vma.calculate(&bars, i);
/// }
///
/// assert_eq!(vma.series().average(2), None);
/// assert!(vma.series().up(9).is_some());
/// ```
#[derive(Debug)]
pub struct VarMovAvg {
    symbol: String,
    timeframe: Timeframe,
    upper_timeframe: Timeframe,
    projected: bool,
    vma: Vma,
    reference_values: Vec<Option<VmaValue>>,
    fed: usize,
    series: VmaSeries,
    detector: SignalDetector,
    alerts: Option<Alerts>,
}

struct Alerts {
    config: AlertConfig,
    debouncer: AlertDebouncer,
    notifier: Box<dyn Notifier>,
}

impl Debug for Alerts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Alerts")
            .field("config", &self.config)
            .field("debouncer", &self.debouncer)
            .finish_non_exhaustive()
    }
}

impl VarMovAvg {
    /// Starts a builder for `symbol` charted on `timeframe`.
    #[must_use]
    pub fn builder(symbol: impl Into<String>, timeframe: Timeframe) -> VarMovAvgBuilder {
        VarMovAvgBuilder::new(symbol.into(), timeframe)
    }

    /// Computes base bar `index` from `base` alone.
    ///
    /// # Panics
    ///
    /// If `index` is out of range, or the calculator projects from an
    /// upper timeframe (use [`calculate_mtf`](Self::calculate_mtf)).
    pub fn calculate<B>(&mut self, base: &B, index: usize) -> Option<VmaValue>
    where
        B: BarSeries + ?Sized,
    {
        assert!(
            !self.projected,
            "{self} projects from {}: reference bars required",
            self.upper_timeframe
        );
        self.evaluate(base, base, index)
    }

    /// Computes base bar `index`, taking closes from the upper timeframe
    /// `reference` series when projection is active.
    ///
    /// Without projection `reference` is ignored.
    ///
    /// # Panics
    ///
    /// If `index` is out of range for `base`.
    pub fn calculate_mtf<B, R>(
        &mut self,
        base: &B,
        reference: &R,
        index: usize,
    ) -> Option<VmaValue>
    where
        B: BarSeries + ?Sized,
        R: BarSeries + ?Sized,
    {
        if self.projected {
            self.evaluate(base, reference, index)
        } else {
            self.evaluate(base, base, index)
        }
    }

    fn evaluate<B, R>(&mut self, base: &B, reference: &R, index: usize) -> Option<VmaValue>
    where
        B: BarSeries + ?Sized,
        R: BarSeries + ?Sized,
    {
        assert!(
            index < base.len(),
            "base index {index} out of range: len={}",
            base.len()
        );

        let mapper = TimeframeMapper::new(base, reference, self.projected);
        let reference_index = mapper.reference_index(index)?;
        let value = self.reference_value(reference, reference_index)?;

        self.series.project(index, mapper.run_length(index), value);
        self.alert(&mapper, base.open_time(index), index);

        Some(value)
    }

    /// Value of reference bar `index`, computing every bar up to it.
    ///
    /// The last bar computed before is fed again first: its close may have
    /// changed since, and it is final once a later bar exists.
    fn reference_value<R>(&mut self, reference: &R, index: usize) -> Option<VmaValue>
    where
        R: BarSeries + ?Sized,
    {
        if index + 1 < self.fed {
            return self.reference_values[index];
        }

        for i in self.fed.saturating_sub(1)..=index {
            let value = self.vma.compute(&SeriesBar::at(reference, i));
            if i < self.reference_values.len() {
                self.reference_values[i] = value;
            } else {
                self.reference_values.push(value);
            }
        }
        self.fed = self.fed.max(index + 1);

        self.reference_values[index]
    }

    fn alert<B, R>(
        &mut self,
        mapper: &TimeframeMapper<'_, B, R>,
        open_time: Timestamp,
        index: usize,
    ) where
        B: BarSeries + ?Sized,
        R: BarSeries + ?Sized,
    {
        let Some(alerts) = self.alerts.as_mut() else {
            return;
        };

        let last_signal = alerts.debouncer.last_signal();
        let Some(signal) = self.detector.detect(&self.series, mapper, index, last_signal) else {
            return;
        };

        let Some(fired) = alerts.debouncer.evaluate(index, open_time, signal) else {
            return;
        };

        let notification = Notification::new(
            &alerts.config,
            &self.symbol,
            self.timeframe,
            fired,
            open_time,
        );
        info!(
            symbol = %self.symbol,
            timeframe = %self.timeframe,
            signal = %fired,
            open_time,
            "trend alert"
        );

        if let Err(e) = alerts.notifier.notify(&notification) {
            warn!(error = %e, symbol = %self.symbol, "alert not delivered");
        }
    }

    /// Output per base bar.
    #[inline]
    #[must_use]
    pub fn series(&self) -> &VmaSeries {
        &self.series
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &VmaConfig {
        self.vma.config()
    }

    #[inline]
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    #[inline]
    #[must_use]
    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    /// Timeframe closes are taken from: the upper timeframe when projecting,
    /// the chart timeframe otherwise.
    #[inline]
    #[must_use]
    pub fn reference_timeframe(&self) -> Timeframe {
        if self.projected {
            self.upper_timeframe
        } else {
            self.timeframe
        }
    }

    #[inline]
    #[must_use]
    pub fn is_projected(&self) -> bool {
        self.projected
    }

    #[inline]
    #[must_use]
    pub fn trigger_candle(&self) -> TriggerCandle {
        self.detector.trigger()
    }

    /// Alert bookkeeping, `None` when alerts are disabled.
    #[must_use]
    pub fn alert_state(&self) -> Option<&AlertDebouncer> {
        self.alerts.as_ref().map(|a| &a.debouncer)
    }

    /// Forgets all computed values and alert state, as if freshly built.
    pub fn reset(&mut self) {
        self.vma = Vma::new(*self.vma.config());
        self.reference_values.clear();
        self.fed = 0;
        self.series.clear();
        if let Some(alerts) = self.alerts.as_mut() {
            alerts.debouncer.reset();
        }
    }
}

impl Display for VarMovAvg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.projected {
            write!(
                f,
                "VarMovAvg({} {} <- {}, {})",
                self.symbol, self.timeframe, self.upper_timeframe, self.vma
            )
        } else {
            write!(f, "VarMovAvg({} {}, {})", self.symbol, self.timeframe, self.vma)
        }
    }
}

/// Builder for [`VarMovAvg`].
///
/// Defaults: [`VmaConfig::default`], [`TriggerCandle::Previous`], no upper
/// timeframe, alerts disabled.
pub struct VarMovAvgBuilder {
    symbol: String,
    timeframe: Timeframe,
    upper_timeframe: Option<Timeframe>,
    config: VmaConfig,
    trigger: TriggerCandle,
    alerts: Option<(AlertConfig, Box<dyn Notifier>)>,
}

impl VarMovAvgBuilder {
    fn new(symbol: String, timeframe: Timeframe) -> Self {
        Self {
            symbol,
            timeframe,
            upper_timeframe: None,
            config: VmaConfig::default(),
            trigger: TriggerCandle::default(),
            alerts: None,
        }
    }

    #[must_use]
    pub fn config(mut self, config: VmaConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn trigger_candle(mut self, trigger: TriggerCandle) -> Self {
        self.trigger = trigger;
        self
    }

    /// Takes closes from `upper_timeframe` bars and projects each value
    /// onto the base bars it covers. Ignored unless coarser than the chart
    /// timeframe.
    #[must_use]
    pub fn upper_timeframe(mut self, upper_timeframe: Timeframe) -> Self {
        self.upper_timeframe = Some(upper_timeframe);
        self
    }

    /// Enables alerts, delivered through `notifier`.
    #[must_use]
    pub fn alerts(mut self, config: AlertConfig, notifier: impl Notifier + 'static) -> Self {
        self.alerts = Some((config, Box::new(notifier)));
        self
    }

    #[must_use]
    pub fn build(self) -> VarMovAvg {
        let upper_timeframe = self.upper_timeframe.unwrap_or(self.timeframe);
        let projected = upper_timeframe > self.timeframe;

        if self.upper_timeframe.is_some() && !projected {
            warn!(
                symbol = %self.symbol,
                timeframe = %self.timeframe,
                upper_timeframe = %upper_timeframe,
                "upper timeframe not above chart timeframe, ignored"
            );
        }

        VarMovAvg {
            symbol: self.symbol,
            timeframe: self.timeframe,
            upper_timeframe,
            projected,
            vma: Vma::new(self.config),
            reference_values: Vec::new(),
            fed: 0,
            series: VmaSeries::default(),
            detector: SignalDetector::new(self.trigger),
            alerts: self.alerts.map(|(config, notifier)| Alerts {
                config,
                debouncer: AlertDebouncer::new(self.trigger),
                notifier,
            }),
        }
    }
}

impl Debug for VarMovAvgBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VarMovAvgBuilder")
            .field("symbol", &self.symbol)
            .field("timeframe", &self.timeframe)
            .field("upper_timeframe", &self.upper_timeframe)
            .field("config", &self.config)
            .field("trigger", &self.trigger)
            .field("alerts", &self.alerts.as_ref().map(|(config, _)| config))
            .finish()
    }
}
