use crate::Ohlcv;

use std::fmt::{Debug, Display};

/// A streaming technical indicator.
///
/// Indicators maintain internal state and update incrementally on each call to
/// [`compute`](Indicator::compute). Output is `None` until enough data has been
/// received.
///
/// # Example
///
/// ```
/// use quantedge_vma::{Indicator, Vma, VmaConfig};
/// use std::num::NonZero;
/// # use quantedge_vma::{Ohlcv, Price, Timestamp};
/// #
/// # struct Bar(f64, u64);
/// # impl Ohlcv for Bar {
/// #     fn close(&self) -> Price { self.0 }
/// #     fn open_time(&self) -> Timestamp { self.1 }
/// # }
///
/// let config = VmaConfig::builder().period(NonZero::new(2).unwrap()).build();
/// let mut vma = <Vma as Indicator>::new(config);
///
/// assert!(vma.compute(&Bar(10.0, 1)).is_none());
/// assert!(vma.compute(&Bar(11.0, 2)).is_none());
/// assert!(vma.compute(&Bar(12.0, 3)).is_some());
/// ```
pub trait Indicator: Sized + Clone + Display + Debug {
    /// Configuration type for this indicator.
    type Config: Clone + PartialEq + Display + Debug;

    /// Computed output type.
    type Output: Send + Sync + Display + Debug;

    /// Creates a new indicator from the given config.
    fn new(config: Self::Config) -> Self;

    /// Feeds a bar and returns the updated indicator value,
    /// or `None` if not enough bars have been seen yet.
    fn compute(&mut self, kline: &impl Ohlcv) -> Option<Self::Output>;

    /// Returns the last computed indicator value without advancing state,
    /// or `None` if not yet available.
    ///
    /// Cached field read, no computation.
    fn value(&self) -> Option<Self::Output>;
}
