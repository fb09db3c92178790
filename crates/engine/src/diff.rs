//! Keyed list diffing.
//!
//! Two versions of a collection are compared by identity ([`Entity::key`])
//! and by content (a hash fingerprint of the whole record). The result is a
//! [`ChangeSet`]: which keys appeared, disappeared, changed content, or moved
//! relative to the others. Moves are only reported alongside a content
//! change; the same records in another order are not a change at all.
//!
//! A [`Diff`] is a pure value computed from a [`Snapshot`], so it can be built
//! on a worker thread and handed back to the owner of the store, which swaps
//! it in with a single pointer replacement.
use std::{
    cmp::Ordering,
    collections::{HashMap, HashSet},
    fmt,
    hash::{DefaultHasher, Hash, Hasher},
    sync::Arc,
};

use rust_decimal::Decimal;

/// A record with a stable identity.
///
/// Two values with the same key are the same entity; two values with the same
/// [`fingerprint`] are equivalent for display purposes.
pub trait Entity: Clone + Hash {
    type Key: Clone + Eq + Hash + fmt::Debug;

    fn key(&self) -> Self::Key;

    /// Content hash compared between two versions of the same key.
    ///
    /// Records holding amounts should use [`scaled_fingerprint`]: `Decimal`
    /// hashes `12.5` and `12.50` alike although they display differently.
    fn fingerprint(&self) -> u64 {
        fingerprint(self)
    }
}

/// Orders the whole collection of a sorted store.
pub type Comparator<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// Content hash used to detect changed records.
pub fn fingerprint<T: Hash>(item: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    item.hash(&mut hasher);
    hasher.finish()
}

/// [`fingerprint`] that also tells apart amounts differing only in scale.
pub fn scaled_fingerprint<T: Hash>(item: &T, amounts: &[Decimal]) -> u64 {
    let mut hasher = DefaultHasher::new();
    item.hash(&mut hasher);
    for amount in amounts {
        amount.scale().hash(&mut hasher);
    }
    hasher.finish()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeSet<K> {
    pub inserted: Vec<K>,
    pub removed: Vec<K>,
    pub changed: Vec<K>,
    pub moved: Vec<K>,
}

impl<K> Default for ChangeSet<K> {
    fn default() -> Self {
        Self {
            inserted: Vec::new(),
            removed: Vec::new(),
            changed: Vec::new(),
            moved: Vec::new(),
        }
    }
}

impl<K> ChangeSet<K> {
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty()
            && self.removed.is_empty()
            && self.changed.is_empty()
            && self.moved.is_empty()
    }

    /// Total number of touched keys.
    pub fn len(&self) -> usize {
        self.inserted.len() + self.removed.len() + self.changed.len() + self.moved.len()
    }
}

/// Immutable view of a store at a given version.
#[derive(Debug)]
pub struct Snapshot<T> {
    version: u64,
    items: Arc<Vec<T>>,
    fingerprints: Arc<Vec<u64>>,
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self {
            version: self.version,
            items: Arc::clone(&self.items),
            fingerprints: Arc::clone(&self.fingerprints),
        }
    }
}

impl<T> Snapshot<T> {
    pub(crate) fn empty() -> Self {
        Self {
            version: 0,
            items: Arc::new(Vec::new()),
            fingerprints: Arc::new(Vec::new()),
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn shared_items(&self) -> Arc<Vec<T>> {
        Arc::clone(&self.items)
    }
}

/// A computed but not yet applied reconciliation.
#[derive(Debug)]
pub struct Diff<T: Entity> {
    base_version: u64,
    items: Vec<T>,
    fingerprints: Vec<u64>,
    changes: ChangeSet<T::Key>,
}

impl<T: Entity> Diff<T> {
    /// Diffs `incoming` against `base`.
    ///
    /// `incoming` is first collapsed to unique keys (first position, last
    /// content), then sorted with `sort` when given. The sort is stable.
    ///
    /// When `incoming` holds exactly the records of `base`, the diff keeps
    /// the order of `base` and its change-set is empty.
    pub fn compute(base: &Snapshot<T>, incoming: Vec<T>, sort: Option<&Comparator<T>>) -> Self {
        let mut items = collapse_duplicate_keys(incoming);
        if let Some(cmp) = sort {
            items.sort_by(|a, b| cmp(a, b));
        }
        let mut fingerprints: Vec<u64> = items.iter().map(Entity::fingerprint).collect();

        let previous: HashMap<T::Key, usize> = base
            .items
            .iter()
            .enumerate()
            .map(|(idx, item)| (item.key(), idx))
            .collect();

        let mut changes = ChangeSet::default();
        let mut kept_keys: Vec<T::Key> = Vec::new();
        let mut kept_positions: Vec<usize> = Vec::new();
        let mut seen: HashSet<T::Key> = HashSet::with_capacity(items.len());

        for (item, fp) in items.iter().zip(&fingerprints) {
            let key = item.key();
            seen.insert(key.clone());
            match previous.get(&key) {
                Some(&old_idx) => {
                    if base.fingerprints[old_idx] != *fp {
                        changes.changed.push(key.clone());
                    }
                    kept_positions.push(old_idx);
                    kept_keys.push(key);
                }
                None => changes.inserted.push(key),
            }
        }

        changes.removed = base
            .items
            .iter()
            .map(|item| item.key())
            .filter(|key| !seen.contains(key))
            .collect();

        let same_records = changes.inserted.is_empty()
            && changes.removed.is_empty()
            && changes.changed.is_empty();
        if same_records {
            items = base.items.to_vec();
            fingerprints = base.fingerprints.to_vec();
        } else {
            let stable = longest_increasing_run(&kept_positions);
            changes.moved = kept_keys
                .into_iter()
                .zip(stable)
                .filter_map(|(key, in_place)| (!in_place).then_some(key))
                .collect();
        }

        Self {
            base_version: base.version,
            items,
            fingerprints,
            changes,
        }
    }

    pub fn base_version(&self) -> u64 {
        self.base_version
    }

    pub fn changes(&self) -> &ChangeSet<T::Key> {
        &self.changes
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub(crate) fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Consumes the diff into the snapshot it produces and its change-set.
    pub(crate) fn into_snapshot(self, version: u64) -> (Snapshot<T>, ChangeSet<T::Key>) {
        let snapshot = Snapshot {
            version,
            items: Arc::new(self.items),
            fingerprints: Arc::new(self.fingerprints),
        };
        (snapshot, self.changes)
    }
}

fn collapse_duplicate_keys<T: Entity>(incoming: Vec<T>) -> Vec<T> {
    let mut positions: HashMap<T::Key, usize> = HashMap::with_capacity(incoming.len());
    let mut unique: Vec<T> = Vec::with_capacity(incoming.len());

    for item in incoming {
        let key = item.key();
        match positions.get(&key) {
            Some(&idx) => {
                tracing::warn!("duplicate key {key:?} in submitted list, keeping latest content");
                unique[idx] = item;
            }
            None => {
                positions.insert(key, unique.len());
                unique.push(item);
            }
        }
    }

    unique
}

/// Marks the entries of `seq` that belong to one longest strictly increasing
/// subsequence. Entries outside it are the minimal set of moves.
fn longest_increasing_run(seq: &[usize]) -> Vec<bool> {
    let mut tails: Vec<usize> = Vec::new();
    let mut parent: Vec<Option<usize>> = vec![None; seq.len()];

    for (pos, &value) in seq.iter().enumerate() {
        let slot = tails.partition_point(|&tail| seq[tail] < value);
        if slot > 0 {
            parent[pos] = Some(tails[slot - 1]);
        }
        if slot == tails.len() {
            tails.push(pos);
        } else {
            tails[slot] = pos;
        }
    }

    let mut keep = vec![false; seq.len()];
    let mut cursor = tails.last().copied();
    while let Some(pos) = cursor {
        keep[pos] = true;
        cursor = parent[pos];
    }
    keep
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, Hash, PartialEq)]
    struct Row {
        id: u32,
        label: &'static str,
    }

    impl Entity for Row {
        type Key = u32;

        fn key(&self) -> u32 {
            self.id
        }
    }

    fn row(id: u32, label: &'static str) -> Row {
        Row { id, label }
    }

    fn base(items: Vec<Row>) -> Snapshot<Row> {
        let diff = Diff::compute(&Snapshot::empty(), items, None);
        diff.into_snapshot(1).0
    }

    #[test]
    fn detects_insert_remove_and_change() {
        let old = base(vec![row(1, "a"), row(2, "b"), row(3, "c")]);
        let diff = Diff::compute(&old, vec![row(1, "a"), row(3, "C"), row(4, "d")], None);
        let changes = diff.changes();
        assert_eq!(changes.inserted, vec![4]);
        assert_eq!(changes.removed, vec![2]);
        assert_eq!(changes.changed, vec![3]);
        assert!(changes.moved.is_empty());
    }

    #[test]
    fn rotation_alone_is_not_a_change() {
        let old = base(vec![row(1, "a"), row(2, "b"), row(3, "c")]);
        let diff = Diff::compute(&old, vec![row(3, "c"), row(1, "a"), row(2, "b")], None);
        assert!(diff.changes().is_empty());
        assert_eq!(diff.items(), old.items());
    }

    #[test]
    fn rotation_with_a_change_moves_a_single_key() {
        let old = base(vec![row(1, "a"), row(2, "b"), row(3, "c")]);
        let diff = Diff::compute(&old, vec![row(3, "c"), row(1, "A"), row(2, "b")], None);
        assert_eq!(diff.changes().changed, vec![1]);
        assert_eq!(diff.changes().moved, vec![3]);
        assert_eq!(diff.changes().len(), 2);
        assert_eq!(diff.items()[0], row(3, "c"));
    }

    #[test]
    fn scaled_fingerprint_sees_trailing_zeros() {
        let short = Decimal::new(125, 1);
        let long = Decimal::new(1250, 2);
        assert_eq!(fingerprint(&short), fingerprint(&long));
        assert_ne!(
            scaled_fingerprint(&1u8, &[short]),
            scaled_fingerprint(&1u8, &[long])
        );
    }

    #[test]
    fn duplicates_keep_first_position_and_last_content() {
        let diff = Diff::compute(
            &Snapshot::empty(),
            vec![row(1, "old"), row(2, "b"), row(1, "new")],
            None,
        );
        assert_eq!(diff.items(), &[row(1, "new"), row(2, "b")]);
        assert_eq!(diff.changes().inserted, vec![1, 2]);
    }

    #[test]
    fn sort_is_applied_before_diffing() {
        let by_label: Comparator<Row> = Arc::new(|a: &Row, b: &Row| a.label.cmp(b.label));
        let diff = Diff::compute(
            &Snapshot::empty(),
            vec![row(1, "z"), row(2, "a")],
            Some(&by_label),
        );
        assert_eq!(diff.items(), &[row(2, "a"), row(1, "z")]);
    }

    #[test]
    fn increasing_run_marks_minimal_moves() {
        assert_eq!(longest_increasing_run(&[0, 1, 2]), vec![true, true, true]);
        assert_eq!(longest_increasing_run(&[2, 0, 1]), vec![false, true, true]);
        assert_eq!(
            longest_increasing_run(&[3, 0, 1, 2]).iter().filter(|kept| !**kept).count(),
            1
        );
        assert!(longest_increasing_run(&[]).is_empty());
    }
}
