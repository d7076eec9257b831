//! Generic group-by-and-count with percentages.
//!
//! Every "by category" breakdown in the catalogue is [`group_by`] with a
//! different key function, followed by [`Grouping::with_percentage`].

use std::collections::BTreeMap;

use serde::Serialize;

/// Counts per key, iterated in key order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grouping<K: Ord> {
    counts: BTreeMap<K, usize>,
}

impl<K: Ord> Default for Grouping<K> {
    fn default() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }
}

/// One key's count and its share of the grouping total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share<K> {
    pub key: K,
    pub count: usize,
    pub percentage: f64,
}

/// Count `records` by `key`; records whose key is `None` are left out of
/// every group and out of the total.
pub fn group_by<T, K, I, F>(records: I, key: F) -> Grouping<K>
where
    K: Ord,
    I: IntoIterator<Item = T>,
    F: FnMut(&T) -> Option<K>,
{
    Grouping::default().tally(records, key)
}

impl<K: Ord> Grouping<K> {
    /// A grouping that reports every key in `keys`, even at zero.
    pub fn seeded(keys: impl IntoIterator<Item = K>) -> Self {
        Self {
            counts: keys.into_iter().map(|k| (k, 0)).collect(),
        }
    }

    /// Add `records` to the existing counts.
    #[must_use]
    pub fn tally<T, I, F>(mut self, records: I, mut key: F) -> Self
    where
        I: IntoIterator<Item = T>,
        F: FnMut(&T) -> Option<K>,
    {
        for record in records {
            if let Some(k) = key(&record) {
                *self.counts.entry(k).or_insert(0) += 1;
            }
        }
        self
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    #[must_use]
    pub fn count(&self, key: &K) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, usize)> {
        self.counts.iter().map(|(k, v)| (k, *v))
    }

    /// Shares in key order. An empty grouping yields 0% everywhere.
    #[must_use]
    pub fn with_percentage(&self) -> Vec<Share<K>>
    where
        K: Clone,
    {
        let total = self.total();
        self.counts
            .iter()
            .map(|(key, &count)| Share {
                key: key.clone(),
                count,
                percentage: percentage(count, total),
            })
            .collect()
    }
}

/// `count / total × 100`, or 0 when `total` is 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64 * 100.0
}

/// Order shares by count descending, ties by key ascending.
pub fn rank_by_count<K: Ord>(shares: &mut [Share<K>]) {
    shares.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_totals_agree() {
        let words = ["b", "a", "b", "c", "b"];
        let grouping = group_by(words, |w| Some(*w));
        assert_eq!(grouping.total(), 5);
        assert_eq!(grouping.count(&"b"), 3);
        assert_eq!(grouping.count(&"z"), 0);

        let keys: Vec<&str> = grouping.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn none_keys_are_excluded_from_the_total() {
        let values = [Some(1), None, Some(1), None];
        let grouping = group_by(values, |v| *v);
        assert_eq!(grouping.total(), 2);
        let shares = grouping.with_percentage();
        assert_eq!(shares.len(), 1);
        assert!((shares[0].percentage - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_grouping_is_zero_percent() {
        let grouping = Grouping::seeded(["x", "y"]);
        let shares = grouping.with_percentage();
        assert_eq!(shares.len(), 2);
        assert!(shares.iter().all(|s| s.count == 0 && s.percentage == 0.0));
        assert_eq!(percentage(0, 0), 0.0);
    }

    #[test]
    fn seeded_keys_keep_their_order() {
        let grouping = Grouping::seeded([2, 1, 3]).tally([3, 3], |v| Some(*v));
        let shares = grouping.with_percentage();
        let keys: Vec<i32> = shares.iter().map(|s| s.key).collect();
        assert_eq!(keys, vec![1, 2, 3]);
        assert_eq!(shares[2].count, 2);
    }

    #[test]
    fn ranking_breaks_ties_by_key() {
        let grouping = group_by(["b", "a", "c", "c"], |w| Some(*w));
        let mut shares = grouping.with_percentage();
        rank_by_count(&mut shares);
        let keys: Vec<&str> = shares.iter().map(|s| s.key).collect();
        assert_eq!(keys, vec!["c", "a", "b"]);
    }
}
