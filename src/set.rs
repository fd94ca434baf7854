//! Sorted set of field values with neighbour lookups.

use crate::pattern::FieldValue;
use std::collections::BTreeSet;

/// Strictly ascending, duplicate-free list of values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub(crate) struct ValueSet(Vec<FieldValue>);

impl ValueSet {
    #[inline]
    pub(crate) fn first(&self) -> Option<FieldValue> {
        self.0.first().copied()
    }

    #[inline]
    pub(crate) fn last(&self) -> Option<FieldValue> {
        self.0.last().copied()
    }

    #[inline]
    pub(crate) fn contains(&self, value: FieldValue) -> bool {
        self.0.binary_search(&value).is_ok()
    }

    /// Smallest value greater than or equal to `value`.
    pub(crate) fn ceil(&self, value: FieldValue) -> Option<FieldValue> {
        let index = self.0.partition_point(|&v| v < value);
        self.0.get(index).copied()
    }

    /// Smallest value strictly greater than `value`.
    pub(crate) fn after(&self, value: FieldValue) -> Option<FieldValue> {
        let index = self.0.partition_point(|&v| v <= value);
        self.0.get(index).copied()
    }

    /// Largest value less than or equal to `value`.
    pub(crate) fn floor(&self, value: FieldValue) -> Option<FieldValue> {
        let index = self.0.partition_point(|&v| v <= value);
        self.0.get(index.checked_sub(1)?).copied()
    }

    /// Largest value strictly less than `value`.
    pub(crate) fn before(&self, value: FieldValue) -> Option<FieldValue> {
        let index = self.0.partition_point(|&v| v < value);
        self.0.get(index.checked_sub(1)?).copied()
    }

    #[cfg(test)]
    pub(crate) fn as_slice(&self) -> &[FieldValue] {
        &self.0
    }
}

impl From<BTreeSet<FieldValue>> for ValueSet {
    fn from(values: BTreeSet<FieldValue>) -> Self {
        Self(values.into_iter().collect())
    }
}

impl FromIterator<FieldValue> for ValueSet {
    fn from_iter<I: IntoIterator<Item = FieldValue>>(iter: I) -> Self {
        iter.into_iter().collect::<BTreeSet<_>>().into()
    }
}
