/// A price value.
///
/// Semantic alias for [`f64`]. Documents intent in function signatures
/// without introducing newtype construction overhead.
pub type Price = f64;

/// Bar open timestamp or sequence number.
///
/// Used for bar boundary detection and for aligning bars of different
/// timeframes. Must be strictly increasing along a [`BarSeries`].
pub type Timestamp = u64;

/// A single bar fed to the streaming [`Vma`](crate::Vma).
///
/// Implement this on your own kline/candle type to avoid per-tick
/// conversion. Only the close price and open time take part in the
/// calculation.
///
/// # Bar boundaries
///
/// The indicator detects new bars by comparing
/// [`open_time`](Ohlcv::open_time) values: same timestamp updates (repaints)
/// the current bar, a new timestamp advances the window.
///
/// # Example
///
/// ```
/// use quantedge_vma::{Ohlcv, Price, Timestamp};
///
/// struct MyKline {
///     c: f64,
///     ts: u64,
/// }
///
/// impl Ohlcv for MyKline {
///     fn close(&self) -> Price { self.c }
///     fn open_time(&self) -> Timestamp { self.ts }
/// }
/// ```
pub trait Ohlcv {
    /// Closing (or latest) price of the bar.
    fn close(&self) -> Price;

    /// Bar open timestamp or sequence number.
    ///
    /// Values must be non-decreasing between calls. Behaviour is undefined if
    /// `open_time` decreases.
    fn open_time(&self) -> Timestamp;
}

/// An indexable, time-ordered series of bars as held by the host.
///
/// Index 0 is the oldest bar. Open times must be strictly increasing. The
/// last index is the still-forming bar; every earlier bar is closed.
///
/// Implemented for slices and vectors of any [`Ohlcv`] type. Hosts that store
/// prices column-wise can implement the three required methods directly.
pub trait BarSeries {
    /// Number of bars in the series.
    fn len(&self) -> usize;

    /// Open time of the bar at `index`. Panics if out of range.
    fn open_time(&self, index: usize) -> Timestamp;

    /// Close price of the bar at `index`. Panics if out of range.
    fn close(&self, index: usize) -> Price;

    /// `true` when the series holds no bars.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index of the bar whose interval contains `time`: the greatest index
    /// with `open_time(index) <= time`.
    ///
    /// Returns `None` when `time` precedes the first bar.
    fn index_by_time(&self, time: Timestamp) -> Option<usize> {
        let (mut lo, mut hi) = (0, self.len());
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.open_time(mid) <= time {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        lo.checked_sub(1)
    }
}

impl<T: Ohlcv> BarSeries for [T] {
    #[inline]
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    #[inline]
    fn open_time(&self, index: usize) -> Timestamp {
        self[index].open_time()
    }

    #[inline]
    fn close(&self, index: usize) -> Price {
        self[index].close()
    }

    #[inline]
    fn index_by_time(&self, time: Timestamp) -> Option<usize> {
        self.partition_point(|bar| bar.open_time() <= time)
            .checked_sub(1)
    }
}

impl<T: Ohlcv> BarSeries for Vec<T> {
    #[inline]
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    #[inline]
    fn open_time(&self, index: usize) -> Timestamp {
        self[index].open_time()
    }

    #[inline]
    fn close(&self, index: usize) -> Price {
        self[index].close()
    }

    #[inline]
    fn index_by_time(&self, time: Timestamp) -> Option<usize> {
        self.as_slice().index_by_time(time)
    }
}

/// A bar read out of a [`BarSeries`] by index, used to feed the streaming
/// engine from index-based hosts.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SeriesBar {
    close: Price,
    open_time: Timestamp,
}

impl SeriesBar {
    #[inline]
    pub(crate) fn at<S: BarSeries + ?Sized>(series: &S, index: usize) -> Self {
        Self {
            close: series.close(index),
            open_time: series.open_time(index),
        }
    }
}

impl Ohlcv for SeriesBar {
    #[inline]
    fn close(&self) -> Price {
        self.close
    }

    #[inline]
    fn open_time(&self) -> Timestamp {
        self.open_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::bar;

    /// Column-wise storage exercising the provided search.
    struct Columns {
        times: Vec<Timestamp>,
        closes: Vec<Price>,
    }

    impl BarSeries for Columns {
        fn len(&self) -> usize {
            self.times.len()
        }
        fn open_time(&self, index: usize) -> Timestamp {
            self.times[index]
        }
        fn close(&self, index: usize) -> Price {
            self.closes[index]
        }
    }

    fn columns() -> Columns {
        Columns {
            times: vec![10, 20, 30, 40],
            closes: vec![1.0, 2.0, 3.0, 4.0],
        }
    }

    mod index_by_time {
        use super::*;

        #[test]
        fn exact_match() {
            let bars = vec![bar(1.0, 10), bar(2.0, 20), bar(3.0, 30)];
            assert_eq!(bars.index_by_time(20), Some(1));
            assert_eq!(columns().index_by_time(30), Some(2));
        }

        #[test]
        fn inside_interval_maps_to_covering_bar() {
            let bars = vec![bar(1.0, 10), bar(2.0, 20), bar(3.0, 30)];
            assert_eq!(bars.index_by_time(25), Some(1));
            assert_eq!(columns().index_by_time(25), Some(1));
        }

        #[test]
        fn after_last_bar_maps_to_last() {
            let bars = vec![bar(1.0, 10), bar(2.0, 20)];
            assert_eq!(bars.index_by_time(1_000), Some(1));
            assert_eq!(columns().index_by_time(1_000), Some(3));
        }

        #[test]
        fn before_first_bar_is_none() {
            let bars = vec![bar(1.0, 10), bar(2.0, 20)];
            assert_eq!(bars.index_by_time(5), None);
            assert_eq!(columns().index_by_time(9), None);
        }

        #[test]
        fn empty_series_is_none() {
            let bars: Vec<crate::test_util::Bar> = Vec::new();
            assert!(bars.is_empty());
            assert_eq!(bars.index_by_time(5), None);
        }
    }

    #[test]
    fn series_bar_reads_index() {
        let b = SeriesBar::at(&columns(), 2);
        assert_eq!(b.open_time(), 30);
        assert!((b.close() - 3.0).abs() < f64::EPSILON);
    }
}
