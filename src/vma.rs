use std::{
    fmt::{Debug, Display},
    num::NonZero,
};

use crate::{ConfigError, Indicator, Ohlcv, Price, Signal, close_window::CloseWindow};

/// Keeps the efficiency ratio defined when the price did not move at all.
pub(crate) const NOISE_FLOOR: Price = 1e-9;

const DEFAULT_PERIOD: NonZero<usize> = NonZero::new(50).unwrap();
const DEFAULT_FAST: NonZero<usize> = NonZero::new(15).unwrap();
const DEFAULT_SLOW: NonZero<usize> = NonZero::new(10).unwrap();

/// Configuration for the Variable Moving Average ([`Vma`]) indicator.
///
/// | parameter         | default | meaning                                        |
/// |-------------------|---------|------------------------------------------------|
/// | `period`          | 50      | efficiency ratio lookback, in bars             |
/// | `fast`            | 15      | period of the smoothing constant at ER = 1     |
/// | `slow`            | 10      | period of the smoothing constant at ER = 0     |
/// | `gamma`           | 1.0     | exponent applied to the smoothing constant     |
/// | `delta_threshold` | 0.1     | minimum per-bar change for a trend, in ticks   |
/// | `tick_size`       | 1.0     | instrument price increment                     |
///
/// # Example
///
/// ```
/// use quantedge_vma::VmaConfig;
/// use std::num::NonZero;
///
/// let config = VmaConfig::builder()
///     .period(NonZero::new(20).unwrap())
///     .tick_size(0.0001)
///     .build();
///
/// assert_eq!(config.period(), 20);
/// assert_eq!(config.fast(), 15);
/// assert!((config.signal_threshold() - 0.00001).abs() < 1e-12);
/// ```
#[derive(PartialEq, Clone, Copy, Debug)]
pub struct VmaConfig {
    period: NonZero<usize>,
    fast: NonZero<usize>,
    slow: NonZero<usize>,
    gamma: f64,
    delta_threshold: f64,
    tick_size: Price,
}

impl VmaConfig {
    /// Returns a new builder with default values.
    #[must_use]
    pub fn builder() -> VmaConfigBuilder {
        VmaConfigBuilder::new()
    }

    /// Efficiency ratio lookback (number of bars).
    #[inline]
    #[must_use]
    pub fn period(&self) -> usize {
        self.period.get()
    }

    #[inline]
    #[must_use]
    pub fn fast(&self) -> usize {
        self.fast.get()
    }

    #[inline]
    #[must_use]
    pub fn slow(&self) -> usize {
        self.slow.get()
    }

    #[inline]
    #[must_use]
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Minimum per-bar change of the average, in ticks.
    #[inline]
    #[must_use]
    pub fn delta_threshold(&self) -> f64 {
        self.delta_threshold
    }

    #[inline]
    #[must_use]
    pub fn tick_size(&self) -> Price {
        self.tick_size
    }

    /// Minimum per-bar change of the average, in price units:
    /// `delta_threshold × tick_size`.
    #[inline]
    #[must_use]
    pub fn signal_threshold(&self) -> Price {
        self.delta_threshold * self.tick_size
    }
}

impl Default for VmaConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Display for VmaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "VmaConfig({}, {}, {}, {}, {})",
            self.period, self.fast, self.slow, self.gamma, self.delta_threshold
        )
    }
}

/// Builder for [`VmaConfig`].
///
/// Every parameter has a default, see [`VmaConfig`].
#[derive(Clone, Copy, Debug)]
pub struct VmaConfigBuilder {
    period: NonZero<usize>,
    fast: NonZero<usize>,
    slow: NonZero<usize>,
    gamma: f64,
    delta_threshold: f64,
    tick_size: Price,
}

impl VmaConfigBuilder {
    fn new() -> Self {
        Self {
            period: DEFAULT_PERIOD,
            fast: DEFAULT_FAST,
            slow: DEFAULT_SLOW,
            gamma: 1.0,
            delta_threshold: 0.1,
            tick_size: 1.0,
        }
    }

    #[inline]
    #[must_use]
    pub fn period(mut self, period: NonZero<usize>) -> Self {
        self.period = period;
        self
    }

    #[inline]
    #[must_use]
    pub fn fast(mut self, fast: NonZero<usize>) -> Self {
        self.fast = fast;
        self
    }

    #[inline]
    #[must_use]
    pub fn slow(mut self, slow: NonZero<usize>) -> Self {
        self.slow = slow;
        self
    }

    #[inline]
    #[must_use]
    pub fn gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    #[inline]
    #[must_use]
    pub fn delta_threshold(mut self, delta_threshold: f64) -> Self {
        self.delta_threshold = delta_threshold;
        self
    }

    #[inline]
    #[must_use]
    pub fn tick_size(mut self, tick_size: Price) -> Self {
        self.tick_size = tick_size;
        self
    }

    /// Builds the config, validating the floating point parameters.
    ///
    /// # Errors
    ///
    /// `gamma` and `tick_size` must be finite and positive,
    /// `delta_threshold` finite and not negative.
    pub fn try_build(self) -> Result<VmaConfig, ConfigError> {
        positive("gamma", self.gamma)?;
        positive("tick_size", self.tick_size)?;
        finite("delta_threshold", self.delta_threshold)?;
        if self.delta_threshold < 0.0 {
            return Err(ConfigError::Negative {
                name: "delta_threshold",
                value: self.delta_threshold,
            });
        }

        Ok(VmaConfig {
            period: self.period,
            fast: self.fast,
            slow: self.slow,
            gamma: self.gamma,
            delta_threshold: self.delta_threshold,
            tick_size: self.tick_size,
        })
    }

    /// Builds the config.
    ///
    /// # Panics
    ///
    /// On any value [`try_build`](Self::try_build) rejects.
    #[must_use]
    pub fn build(self) -> VmaConfig {
        match self.try_build() {
            Ok(config) => config,
            Err(e) => panic!("invalid VmaConfig: {e}"),
        }
    }
}

fn finite(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { name, value })
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

/// One bar of [`Vma`] output.
#[derive(PartialEq, Clone, Copy, Debug)]
pub struct VmaValue {
    average: Price,
    delta: Price,
    efficiency_ratio: f64,
    smoothing_constant: f64,
    signal: Signal,
}

impl VmaValue {
    /// The adaptive moving average.
    #[inline]
    #[must_use]
    pub fn average(&self) -> Price {
        self.average
    }

    /// Change of the average against the previous bar.
    #[inline]
    #[must_use]
    pub fn delta(&self) -> Price {
        self.delta
    }

    /// Net move over total path length across the lookback, in `[0, 1]`.
    #[inline]
    #[must_use]
    pub fn efficiency_ratio(&self) -> f64 {
        self.efficiency_ratio
    }

    /// Smoothing constant before `gamma` is applied.
    #[inline]
    #[must_use]
    pub fn smoothing_constant(&self) -> f64 {
        self.smoothing_constant
    }

    #[inline]
    #[must_use]
    pub fn signal(&self) -> Signal {
        self.signal
    }

    /// The average when the bar trends up, `None` otherwise.
    #[inline]
    #[must_use]
    pub fn up(&self) -> Option<Price> {
        (self.signal == Signal::Up).then_some(self.average)
    }

    /// The average when the bar trends down, `None` otherwise.
    #[inline]
    #[must_use]
    pub fn down(&self) -> Option<Price> {
        (self.signal == Signal::Down).then_some(self.average)
    }

    #[cfg(test)]
    pub(crate) fn with_signal(average: Price, signal: Signal) -> Self {
        Self {
            average,
            delta: 0.0,
            efficiency_ratio: 0.0,
            smoothing_constant: 0.0,
            signal,
        }
    }
}

impl Display for VmaValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.average, self.signal)
    }
}

/// Variable Moving Average (VMA).
///
/// An exponential average whose smoothing constant follows Kaufman's
/// efficiency ratio: trending prices move it at the `fast` rate, choppy
/// prices at the `slow` rate.
///
/// ```text
/// ER    = |close − close[period]| / (ε + Σ |close[k] − close[k+1]|)
/// SC    = ER × (2/(fast+1) − 2/(slow+1)) + 2/(slow+1)
/// delta = SC^gamma × (close − prev_VMA)
/// VMA   = prev_VMA + delta
/// ```
///
/// The first value appears once `period + 1` bars are seen and is seeded
/// with the previous bar's close. A bar trends up (down) when `delta` is
/// above (below minus) `delta_threshold × tick_size`.
///
/// Supports live repainting: feeding a bar with the same `open_time`
/// recomputes from the previous bar's average without advancing state.
///
/// # Example
///
/// ```
/// use quantedge_vma::{Signal, Vma, VmaConfig};
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
///     .period(NonZero::new(2).unwrap())
///     .fast(NonZero::new(1).unwrap())
///     .build();
/// let mut vma = Vma::new(config);
///
/// assert_eq!(vma.compute(&Bar(10.0, 1)), None);
/// assert_eq!(vma.compute(&Bar(11.0, 2)), None);
///
/// // Straight line: ER ≈ 1, SC ≈ 2/(1+1) = 1, seed = 11
/// let value = vma.compute(&Bar(12.0, 3)).unwrap();
/// assert!((value.average() - 12.0).abs() < 1e-6);
/// assert_eq!(value.signal(), Signal::Up);
/// ```
#[derive(Clone, Debug)]
pub struct Vma {
    config: VmaConfig,
    window: CloseWindow,
    slow_sc: f64,
    sc_range: f64,
    threshold: Price,
    previous: Option<Price>,
    current: Option<VmaValue>,
}

impl Indicator for Vma {
    type Config = VmaConfig;
    type Output = VmaValue;

    fn new(config: Self::Config) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let slow_sc = 2.0 / (config.slow() + 1) as f64;
        #[allow(clippy::cast_precision_loss)]
        let fast_sc = 2.0 / (config.fast() + 1) as f64;

        Self {
            config,
            window: CloseWindow::new(config.period()),
            slow_sc,
            sc_range: fast_sc - slow_sc,
            threshold: config.signal_threshold(),
            previous: None,
            current: None,
        }
    }

    #[inline]
    fn compute(&mut self, ohlcv: &impl Ohlcv) -> Option<VmaValue> {
        let is_next_bar = self.window.push(ohlcv);

        if is_next_bar && let Some(value) = self.current {
            self.previous = Some(value.average);
        }

        self.current = self.step();
        self.current
    }

    #[inline]
    fn value(&self) -> Option<VmaValue> {
        self.current
    }
}

impl Vma {
    fn step(&self) -> Option<VmaValue> {
        let displacement = self.window.displacement()?;
        let noise = NOISE_FLOOR + self.window.path_length()?;
        let close = self.window.latest()?;
        let previous = match self.previous {
            Some(previous) => previous,
            None => self.window.previous_close()?,
        };

        let efficiency_ratio = displacement / noise;
        let smoothing_constant = efficiency_ratio.mul_add(self.sc_range, self.slow_sc);
        let delta = smoothing_constant.powf(self.config.gamma) * (close - previous);

        let signal = if delta.abs() <= self.threshold {
            Signal::Neutral
        } else if delta > 0.0 {
            Signal::Up
        } else {
            Signal::Down
        };

        Some(VmaValue {
            average: previous + delta,
            delta,
            efficiency_ratio,
            smoothing_constant,
            signal,
        })
    }

    /// The engine's configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &VmaConfig {
        &self.config
    }
}

impl Display for Vma {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "VMA({}, {}, {}, {})",
            self.config.period, self.config.fast, self.config.slow, self.config.gamma
        )
    }
}
