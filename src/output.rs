use crate::{Price, VmaValue};

/// Indicator output per base bar: the average and its up/down markers.
///
/// Bars that have not been computed yet (not enough history) read as
/// `None` in every column.
#[derive(Clone, Debug, Default)]
pub struct VmaSeries {
    values: Vec<Option<VmaValue>>,
}

impl VmaSeries {
    /// Number of base bars written so far, including uncomputed gaps.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<VmaValue> {
        self.values.get(index).copied().flatten()
    }

    /// Average at `index`.
    #[inline]
    #[must_use]
    pub fn average(&self, index: usize) -> Option<Price> {
        self.get(index).map(|v| v.average())
    }

    /// Average at `index` when that bar trends up.
    #[inline]
    #[must_use]
    pub fn up(&self, index: usize) -> Option<Price> {
        self.get(index).and_then(|v| v.up())
    }

    /// Average at `index` when that bar trends down.
    #[inline]
    #[must_use]
    pub fn down(&self, index: usize) -> Option<Price> {
        self.get(index).and_then(|v| v.down())
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<VmaValue>> + '_ {
        self.values.iter().copied()
    }

    pub(crate) fn set(&mut self, index: usize, value: VmaValue) {
        if index >= self.values.len() {
            self.values.resize(index + 1, None);
        }
        self.values[index] = Some(value);
    }

    /// Writes `value` to `index` and the `run_length − 1` bars before it.
    pub(crate) fn project(&mut self, index: usize, run_length: usize, value: VmaValue) {
        debug_assert!(
            (1..=index + 1).contains(&run_length),
            "run length {run_length} out of range at index {index}",
        );

        self.set(index, value);
        for i in index + 1 - run_length..index {
            self.values[i] = Some(value);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.values.clear();
    }
}
