use crate::{
    diff::{ChangeSet, Entity},
    list_store::ListStore,
    resource::{AsyncResource, Status},
    runner::ResourceStream,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Transient message a screen shows once (toast / status line).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Consumer-side state of a list screen.
///
/// Feeds terminal resources into the screen's [`ListStore`]. A failed call
/// never clears the list: it only raises an error [`Notice`] and the last
/// known items stay visible.
#[derive(Debug)]
pub struct ListScreen<T: Entity> {
    store: ListStore<T>,
    status: Option<Status>,
    notice: Option<Notice>,
}

impl<T: Entity> Default for ListScreen<T> {
    fn default() -> Self {
        Self::new(ListStore::new())
    }
}

impl<T: Entity> ListScreen<T> {
    pub fn new(store: ListStore<T>) -> Self {
        Self {
            store,
            status: None,
            notice: None,
        }
    }

    pub fn store(&self) -> &ListStore<T> {
        &self.store
    }

    pub fn items(&self) -> &[T] {
        self.store.items()
    }

    /// Status of the last list load, `None` before the first one.
    pub fn status(&self) -> Option<Status> {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == Some(Status::Loading)
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Returns the pending notice and clears it.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub fn on_loaded(&mut self, resource: AsyncResource<Vec<T>>) -> Option<ChangeSet<T::Key>> {
        self.status = Some(resource.status());
        match resource {
            AsyncResource::Loading { .. } => None,
            AsyncResource::Success { data } => Some(self.store.submit(data)),
            AsyncResource::Error { message, .. } => {
                self.fail(message);
                None
            }
        }
    }

    pub fn on_created(&mut self, resource: AsyncResource<T>) -> Option<ChangeSet<T::Key>> {
        match resource {
            AsyncResource::Loading { .. } => None,
            AsyncResource::Success { data } => {
                self.notice = Some(Notice::success("Added."));
                Some(self.store.append(data))
            }
            AsyncResource::Error { message, .. } => {
                self.fail(message);
                None
            }
        }
    }

    pub fn on_updated(
        &mut self,
        key: &T::Key,
        resource: AsyncResource<T>,
    ) -> Option<ChangeSet<T::Key>> {
        match resource {
            AsyncResource::Loading { .. } => None,
            AsyncResource::Success { data } => {
                self.notice = Some(Notice::success("Saved."));
                Some(self.store.update_by_key(key, |_| data))
            }
            AsyncResource::Error { message, .. } => {
                self.fail(message);
                None
            }
        }
    }

    pub fn on_deleted(
        &mut self,
        key: &T::Key,
        resource: AsyncResource<()>,
    ) -> Option<ChangeSet<T::Key>> {
        match resource {
            AsyncResource::Loading { .. } => None,
            AsyncResource::Success { .. } => {
                self.notice = Some(Notice::success("Deleted."));
                Some(self.store.remove_by_key(key))
            }
            AsyncResource::Error { message, .. } => {
                self.fail(message);
                None
            }
        }
    }

    /// Applies every emission of a load run, returning the final change-set.
    pub async fn follow_load(
        &mut self,
        mut stream: ResourceStream<Vec<T>>,
    ) -> Option<ChangeSet<T::Key>> {
        let mut last = None;
        while let Some(resource) = stream.recv().await {
            last = self.on_loaded(resource);
        }
        last
    }

    /// Optimistic local edit, applied before (or without) a server round trip.
    pub fn edit_locally(
        &mut self,
        key: &T::Key,
        merge: impl FnOnce(T) -> T,
    ) -> ChangeSet<T::Key> {
        self.store.update_by_key(key, merge)
    }

    fn fail(&mut self, message: String) {
        tracing::debug!("screen error: {message}");
        self.notice = Some(Notice::error(message));
    }
}
