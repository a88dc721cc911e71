use crate::{Ohlcv, Price, Timestamp};
use std::collections::VecDeque;

/// The last `period + 1` closes, enough to measure `period` bar-to-bar
/// changes.
///
/// Feeding a bar with the same open time as the previous one replaces the
/// newest close (repaint) instead of advancing the window.
#[derive(Clone, Debug)]
pub(crate) struct CloseWindow {
    size: usize,
    window: VecDeque<Price>,
    last_open_time: Option<Timestamp>,
}

impl CloseWindow {
    pub fn new(period: usize) -> Self {
        Self {
            size: period + 1,
            window: VecDeque::with_capacity(period + 1),
            last_open_time: None,
        }
    }

    /// Adds the bar's close. Returns `true` when the bar opened a new slot,
    /// `false` when it repainted the newest one.
    #[inline]
    pub fn push(&mut self, ohlcv: &impl Ohlcv) -> bool {
        debug_assert!(
            self.last_open_time.is_none_or(|t| t <= ohlcv.open_time()),
            "open_time must be non-decreasing: last={}, got={}",
            self.last_open_time.unwrap_or(0),
            ohlcv.open_time(),
        );

        let is_next_bar = self.last_open_time.is_none_or(|t| t < ohlcv.open_time());

        if is_next_bar {
            if self.is_ready() {
                self.window.pop_front();
            }
            self.last_open_time = Some(ohlcv.open_time());
        } else {
            self.window.pop_back();
        }

        self.window.push_back(ohlcv.close());

        is_next_bar
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.window.len() == self.size
    }

    /// Newest close.
    #[inline]
    pub fn latest(&self) -> Option<Price> {
        self.window.back().copied()
    }

    /// Close of the bar before the newest one, once the window is full.
    #[inline]
    pub fn previous_close(&self) -> Option<Price> {
        self.is_ready().then(|| self.window[self.size - 2])
    }

    /// Net move across the window: `|newest − oldest|`.
    #[inline]
    pub fn displacement(&self) -> Option<Price> {
        match (self.is_ready(), self.window.front(), self.window.back()) {
            (true, Some(oldest), Some(newest)) => Some((newest - oldest).abs()),
            _ => None,
        }
    }

    /// Sum of absolute bar-to-bar changes, accumulated newest first.
    #[inline]
    pub fn path_length(&self) -> Option<Price> {
        if !self.is_ready() {
            return None;
        }

        let newer = self.window.iter().rev();
        let older = self.window.iter().rev().skip(1);

        Some(newer.zip(older).map(|(n, o)| (n - o).abs()).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::bar;

    #[allow(clippy::float_cmp)]
    mod filling {
        use super::*;

        #[test]
        fn none_until_period_plus_one_closes() {
            let mut w = CloseWindow::new(2);
            w.push(&bar(10.0, 1));
            w.push(&bar(12.0, 2));
            assert_eq!(w.displacement(), None);
            assert_eq!(w.path_length(), None);
            assert_eq!(w.previous_close(), None);

            w.push(&bar(11.0, 3));
            assert_eq!(w.displacement(), Some(1.0));
            // |11 - 12| + |12 - 10| = 3
            assert_eq!(w.path_length(), Some(3.0));
            assert_eq!(w.previous_close(), Some(12.0));
        }

        #[test]
        fn period_one_holds_two_closes() {
            let mut w = CloseWindow::new(1);
            w.push(&bar(10.0, 1));
            assert!(!w.is_ready());
            w.push(&bar(7.0, 2));
            assert_eq!(w.displacement(), Some(3.0));
            assert_eq!(w.path_length(), Some(3.0));
        }
    }

    #[allow(clippy::float_cmp)]
    mod sliding {
        use super::*;

        #[test]
        fn oldest_close_drops_on_advance() {
            let mut w = CloseWindow::new(2);
            for (i, c) in [10.0, 12.0, 11.0, 15.0].into_iter().enumerate() {
                w.push(&bar(c, i as u64));
            }
            // window [12, 11, 15]
            assert_eq!(w.displacement(), Some(3.0));
            assert_eq!(w.path_length(), Some(5.0));
            assert_eq!(w.latest(), Some(15.0));
        }

        #[test]
        fn reports_advance() {
            let mut w = CloseWindow::new(2);
            assert!(w.push(&bar(10.0, 1)));
            assert!(w.push(&bar(11.0, 2)));
            assert!(!w.push(&bar(12.0, 2)));
            assert!(w.push(&bar(13.0, 3)));
        }
    }

    #[allow(clippy::float_cmp)]
    mod repaint {
        use super::*;

        #[test]
        fn replaces_newest_close_in_unfilled_window() {
            let mut w = CloseWindow::new(2);
            w.push(&bar(10.0, 1));
            w.push(&bar(15.0, 1));
            w.push(&bar(20.0, 2));
            assert!(!w.is_ready());
            w.push(&bar(20.0, 3));
            // window [15, 20, 20]
            assert_eq!(w.displacement(), Some(5.0));
        }

        #[test]
        fn replaces_newest_close_in_full_window() {
            let mut w = CloseWindow::new(2);
            w.push(&bar(10.0, 1));
            w.push(&bar(12.0, 2));
            w.push(&bar(11.0, 3));
            w.push(&bar(18.0, 3));
            // window [10, 12, 18]
            assert_eq!(w.displacement(), Some(8.0));
            assert_eq!(w.path_length(), Some(8.0));
            assert_eq!(w.previous_close(), Some(12.0));
        }
    }

    #[test]
    fn flat_prices_have_zero_path() {
        let mut w = CloseWindow::new(3);
        for i in 0..5 {
            w.push(&bar(1.25, i));
        }
        assert_eq!(w.displacement(), Some(0.0));
        assert_eq!(w.path_length(), Some(0.0));
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "open_time must be non-decreasing")]
    fn panics_on_decreasing_open_time() {
        let mut w = CloseWindow::new(2);
        w.push(&bar(10.0, 2));
        w.push(&bar(20.0, 1));
    }
}
