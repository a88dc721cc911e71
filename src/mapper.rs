use crate::BarSeries;

/// Aligns a base series with a coarser reference series.
///
/// Each base bar is covered by the reference bar whose interval contains the
/// base bar's open time. When projection is off the reference series is the
/// base series itself: the mapping is the identity and no search is done.
///
/// # Example
///
/// ```
/// use quantedge_vma::TimeframeMapper;
/// # use quantedge_vma::{Ohlcv, Price, Timestamp};
/// #
/// # struct Bar(f64, u64);
/// # impl Ohlcv for Bar {
/// #     fn close(&self) -> Price { self.0 }
/// #     fn open_time(&self) -> Timestamp { self.1 }
/// # }
///
/// // M15 bars under H1 bars
/// let base: Vec<Bar> = (0..8).map(|i| Bar(1.0, i * 900)).collect();
/// let reference: Vec<Bar> = (0..2).map(|i| Bar(1.0, i * 3_600)).collect();
///
/// let mapper = TimeframeMapper::new(&base, &reference, true);
/// assert_eq!(mapper.reference_index(5), Some(1));
/// assert_eq!(mapper.run_length(5), 2);
/// ```
#[derive(Debug)]
pub struct TimeframeMapper<'a, B: ?Sized, R: ?Sized> {
    base: &'a B,
    reference: &'a R,
    projected: bool,
}

impl<'a, B, R> TimeframeMapper<'a, B, R>
where
    B: BarSeries + ?Sized,
    R: BarSeries + ?Sized,
{
    #[must_use]
    pub fn new(base: &'a B, reference: &'a R, projected: bool) -> Self {
        Self {
            base,
            reference,
            projected,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_projected(&self) -> bool {
        self.projected
    }

    /// Reference bar covering base bar `base_index`.
    ///
    /// `None` when the base bar opens before the first reference bar.
    #[must_use]
    pub fn reference_index(&self, base_index: usize) -> Option<usize> {
        if !self.projected {
            debug_assert!(
                base_index < self.base.len(),
                "base index {base_index} out of range: len={}",
                self.base.len(),
            );
            return Some(base_index);
        }

        self.reference
            .index_by_time(self.base.open_time(base_index))
    }

    /// Number of consecutive base bars ending at `base_index` that share its
    /// reference bar. Always at least 1.
    #[must_use]
    pub fn run_length(&self, base_index: usize) -> usize {
        if !self.projected {
            return 1;
        }

        let Some(reference_index) = self.reference_index(base_index) else {
            // Every earlier bar precedes the reference series too.
            return base_index + 1;
        };

        let start = self.reference.open_time(reference_index);
        let mut run = 1;
        while run <= base_index && self.base.open_time(base_index - run) >= start {
            run += 1;
        }

        run
    }
}
