#![allow(dead_code)]

use quantedge_vma::{Ohlcv, Price, Signal, Timestamp, VmaValue};
use serde::{Deserialize, de::DeserializeOwned};

/// Bar parsed from the EURUSD fixtures.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RefBar {
    pub open_time: u64,
    pub close: f64,
}

impl Ohlcv for RefBar {
    fn close(&self) -> Price {
        self.close
    }

    fn open_time(&self) -> Timestamp {
        self.open_time
    }
}

/// Reference VMA output with timestamp.
#[derive(Debug, Deserialize)]
pub struct RefVmaValue {
    pub open_time: u64,
    pub average: f64,
    pub delta: f64,
    pub efficiency_ratio: f64,
    /// -1 down, 0 neutral, 1 up.
    pub signal: i8,
}

impl RefVmaValue {
    pub fn signal(&self) -> Signal {
        match self.signal {
            1 => Signal::Up,
            -1 => Signal::Down,
            _ => Signal::Neutral,
        }
    }
}

/// EURUSD tick size.
pub const TICK_SIZE: Price = 0.0001;

pub const M15_PATH: &str = "tests/fixtures/data/eurusd-m15.csv";
pub const H1_PATH: &str = "tests/fixtures/data/eurusd-h1.csv";
pub const VMA_M15_PATH: &str = "tests/fixtures/data/vma-50-15-10-m15.csv";
pub const VMA_H1_PATH: &str = "tests/fixtures/data/vma-50-15-10-h1.csv";

/// Load EURUSD M15 bars.
pub fn load_m15() -> Vec<RefBar> {
    load_records(M15_PATH, "invalid bar record")
}

/// Load EURUSD H1 bars covering the same period as [`load_m15`].
pub fn load_h1() -> Vec<RefBar> {
    load_records(H1_PATH, "invalid bar record")
}

/// Load VMA(50, 15, 10, 1) reference output.
pub fn load_vma_ref(path: &str) -> Vec<RefVmaValue> {
    load_records(path, "invalid reference record")
}

/// Assert two f64 values are within tolerance.
pub fn assert_near(actual: f64, expected: f64, tolerance: f64, context: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{context}: expected {expected:.12}, got {actual:.12}, diff {diff:.2e} > tolerance {tolerance:.2e}"
    );
}

/// Asserts a computed value against its reference row.
pub fn assert_matches_ref(
    value: &VmaValue,
    reference: &RefVmaValue,
    tolerance: f64,
    context: &str,
) {
    assert_near(value.average(), reference.average, tolerance, context);
    assert_near(value.delta(), reference.delta, tolerance, context);
    assert_near(
        value.efficiency_ratio(),
        reference.efficiency_ratio,
        tolerance,
        context,
    );
    assert_eq!(value.signal(), reference.signal(), "{context}: signal");
}

/// Creates perturbed versions of a bar to simulate live repaints.
///
/// Returns 2 intermediate ticks (close shifted away from the final close)
/// followed by the original bar. All share the same `open_time`.
pub fn repaint_sequence(bar: &RefBar) -> Vec<RefBar> {
    let t = bar.open_time;
    vec![
        RefBar {
            close: bar.close + 0.0012,
            open_time: t,
        },
        RefBar {
            close: bar.close - 0.0007,
            open_time: t,
        },
        *bar,
    ]
}

fn load_records<D>(path: &str, expect_msg: &str) -> Vec<D>
where
    D: DeserializeOwned,
{
    let mut rdr =
        csv::Reader::from_path(path).unwrap_or_else(|e| panic!("failed to open {path}: {e}"));

    rdr.deserialize().map(|r| r.expect(expect_msg)).collect()
}
