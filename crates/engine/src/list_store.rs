use std::{fmt, sync::Arc};

use tokio::sync::watch;

use crate::{
    diff::{ChangeSet, Comparator, Diff, Entity, Snapshot},
    error::EngineError,
};

/// When a store re-sorts its collection.
pub enum SortMode<T> {
    /// Keep merge order.
    Unsorted,
    /// Re-sort after `update_by_key` only; submitted lists keep their order.
    AfterUpdate(Comparator<T>),
    /// Re-sort on every publish.
    Always(Comparator<T>),
}

impl<T> SortMode<T> {
    fn for_submit(&self) -> Option<&Comparator<T>> {
        match self {
            Self::Always(cmp) => Some(cmp),
            Self::Unsorted | Self::AfterUpdate(_) => None,
        }
    }

    fn for_update(&self) -> Option<&Comparator<T>> {
        match self {
            Self::Always(cmp) | Self::AfterUpdate(cmp) => Some(cmp),
            Self::Unsorted => None,
        }
    }
}

impl<T> fmt::Debug for SortMode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unsorted => "Unsorted",
            Self::AfterUpdate(_) => "AfterUpdate",
            Self::Always(_) => "Always",
        };
        f.write_str(name)
    }
}

/// What observers of a store receive after every effective change.
pub struct Publication<T: Entity> {
    pub version: u64,
    pub items: Arc<Vec<T>>,
    pub changes: ChangeSet<T::Key>,
}

impl<T: Entity> Clone for Publication<T> {
    fn clone(&self) -> Self {
        Self {
            version: self.version,
            items: Arc::clone(&self.items),
            changes: self.changes.clone(),
        }
    }
}

impl<T: Entity + fmt::Debug> fmt::Debug for Publication<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Publication")
            .field("version", &self.version)
            .field("items", &self.items)
            .field("changes", &self.changes)
            .finish()
    }
}

/// The collection a screen currently displays.
///
/// Keys are unique and every mutation, local or remote, goes through the same
/// diff-and-swap step, so the published change-set always describes exactly
/// the difference between two consecutive stored lists. Mutations take
/// `&mut self`: the store has a single writer and needs no locking.
///
/// Observers get the latest [`Publication`] through [`subscribe`]. Only the
/// most recent one is kept; an observer that sees the version jump by more
/// than one has missed change-sets and should redraw from `items`.
///
/// [`subscribe`]: ListStore::subscribe
pub struct ListStore<T: Entity> {
    snapshot: Snapshot<T>,
    sort: SortMode<T>,
    tx: watch::Sender<Publication<T>>,
}

impl<T: Entity> Default for ListStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity + fmt::Debug> fmt::Debug for ListStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListStore")
            .field("version", &self.snapshot.version())
            .field("items", &self.snapshot.items())
            .field("sort", &self.sort)
            .finish()
    }
}

impl<T: Entity> ListStore<T> {
    pub fn new() -> Self {
        Self::with_sort(SortMode::Unsorted)
    }

    pub fn with_sort(sort: SortMode<T>) -> Self {
        let snapshot = Snapshot::empty();
        let (tx, _rx) = watch::channel(Publication {
            version: snapshot.version(),
            items: snapshot.shared_items(),
            changes: ChangeSet::default(),
        });
        Self { snapshot, sort, tx }
    }

    /// Store that re-sorts by `cmp` after local updates.
    pub fn sorted_after_update(
        cmp: impl Fn(&T, &T) -> std::cmp::Ordering + Send + Sync + 'static,
    ) -> Self {
        Self::with_sort(SortMode::AfterUpdate(Arc::new(cmp)))
    }

    pub fn items(&self) -> &[T] {
        self.snapshot.items()
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    pub fn version(&self) -> u64 {
        self.snapshot.version()
    }

    pub fn get(&self, key: &T::Key) -> Option<&T> {
        self.items().iter().find(|item| item.key() == *key)
    }

    pub fn contains(&self, key: &T::Key) -> bool {
        self.get(key).is_some()
    }

    /// Cheap, immutable view of the current list for background work.
    pub fn snapshot(&self) -> Snapshot<T> {
        self.snapshot.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Publication<T>> {
        self.tx.subscribe()
    }

    /// Replaces the list with `items` and publishes the difference.
    ///
    /// Submitting an unchanged list is a no-op returning an empty change-set.
    pub fn submit(&mut self, items: Vec<T>) -> ChangeSet<T::Key> {
        let diff = Diff::compute(&self.snapshot, items, self.sort.for_submit());
        self.commit(diff)
    }

    /// Adds `item` at the end, as returned by a create call.
    pub fn append(&mut self, item: T) -> ChangeSet<T::Key> {
        let mut next = self.items().to_vec();
        next.push(item);
        self.submit(next)
    }

    /// Drops the element with `key`, keeping the order of the others.
    ///
    /// Unknown keys are a no-op.
    pub fn remove_by_key(&mut self, key: &T::Key) -> ChangeSet<T::Key> {
        if !self.contains(key) {
            tracing::debug!("remove_by_key: {key:?} not in store");
            return ChangeSet::default();
        }
        let next = self
            .items()
            .iter()
            .filter(|item| item.key() != *key)
            .cloned()
            .collect();
        self.submit(next)
    }

    /// Replaces the element with `key` by `merge(element)`.
    ///
    /// Every other element is carried over untouched. Unknown keys are a
    /// no-op. Stores configured with [`SortMode::AfterUpdate`] or
    /// [`SortMode::Always`] re-sort as part of the same publish.
    pub fn update_by_key(
        &mut self,
        key: &T::Key,
        merge: impl FnOnce(T) -> T,
    ) -> ChangeSet<T::Key> {
        let Some(position) = self.items().iter().position(|item| item.key() == *key) else {
            tracing::debug!("update_by_key: {key:?} not in store");
            return ChangeSet::default();
        };

        let mut next = self.items().to_vec();
        let current = next[position].clone();
        next[position] = merge(current);

        let diff = Diff::compute(&self.snapshot, next, self.sort.for_update());
        self.commit(diff)
    }

    /// Swaps in a diff computed elsewhere, typically on a worker thread.
    ///
    /// A diff computed against an older version is recomputed against the
    /// current list, so the published change-set always matches the two
    /// stored lists it sits between.
    pub fn apply(&mut self, diff: Diff<T>) -> ChangeSet<T::Key> {
        if diff.base_version() == self.snapshot.version() {
            return self.commit(diff);
        }

        tracing::debug!(
            "stale diff (base {}, current {}), recomputing",
            diff.base_version(),
            self.snapshot.version()
        );
        let diff = Diff::compute(&self.snapshot, diff.into_items(), self.sort.for_submit());
        self.commit(diff)
    }

    /// [`submit`](Self::submit) with the diff computed on the blocking pool.
    pub async fn submit_offloaded(
        &mut self,
        items: Vec<T>,
    ) -> Result<ChangeSet<T::Key>, EngineError>
    where
        T: Send + Sync + 'static,
        T::Key: Send,
    {
        let base = self.snapshot();
        let sort = self.sort.for_submit().cloned();
        let diff =
            tokio::task::spawn_blocking(move || Diff::compute(&base, items, sort.as_ref())).await?;
        Ok(self.apply(diff))
    }

    fn commit(&mut self, diff: Diff<T>) -> ChangeSet<T::Key> {
        if diff.changes().is_empty() {
            return ChangeSet::default();
        }

        let version = self.snapshot.version() + 1;
        let (snapshot, changes) = diff.into_snapshot(version);
        tracing::debug!(
            version,
            inserted = changes.inserted.len(),
            removed = changes.removed.len(),
            changed = changes.changed.len(),
            moved = changes.moved.len(),
            "list store published"
        );

        self.snapshot = snapshot;
        self.tx.send_replace(Publication {
            version,
            items: self.snapshot.shared_items(),
            changes: changes.clone(),
        });
        changes
    }
}
