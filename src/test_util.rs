// src/test_util.rs

use crate::{Ohlcv, Price, Timestamp};
use std::num::NonZero;

/// Asserts that two `f64` values are approximately equal using a
/// relative epsilon of `4 * f64::EPSILON`.
macro_rules! assert_approx {
    ($actual:expr, $expected:expr) => {{
        let (a, e) = ($actual, $expected);
        assert!(
            (a - e).abs() <= e.abs() * 4.0 * f64::EPSILON,
            "assert_approx failed: actual={a}, expected={e}, diff={}",
            (a - e).abs(),
        );
    }};
}

pub(crate) use assert_approx;

#[derive(Clone, Copy, Debug)]
pub struct Bar {
    pub close: f64,
    pub open_time: u64,
}

/// Convenience: bar with a close price and timestamp.
pub fn bar(close: f64, time: u64) -> Bar {
    Bar {
        close,
        open_time: time,
    }
}

/// Bars with the given closes at open times `0, step, 2 * step, ...`.
pub fn bars(closes: &[f64], step: u64) -> Vec<Bar> {
    closes
        .iter()
        .zip(0..)
        .map(|(&close, i)| bar(close, i * step))
        .collect()
}

pub fn nz(n: usize) -> NonZero<usize> {
    NonZero::new(n).unwrap()
}

impl Ohlcv for Bar {
    fn close(&self) -> Price {
        self.close
    }
    fn open_time(&self) -> Timestamp {
        self.open_time
    }
}
