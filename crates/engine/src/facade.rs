use std::{fmt, sync::Arc};

use async_trait::async_trait;

use crate::{
    diff::Entity,
    period::Period,
    resource::Outcome,
    runner::{AsyncOperationRunner, ResourceStream},
};

/// Network collaborator for one entity type.
///
/// Implementations only translate calls into requests; they never retry,
/// cache or coalesce. A returned `Err` is a client-side fault (connection
/// refused, undecodable body), a `Failure` outcome is a server rejection.
#[async_trait]
pub trait Remote: Send + Sync + 'static {
    type Item: Entity + Send + 'static;
    type Input: Send + 'static;
    type Fault: fmt::Display + Send + 'static;

    async fn list(&self, period: Period) -> Result<Outcome<Vec<Self::Item>>, Self::Fault>;

    async fn create(&self, input: Self::Input) -> Result<Outcome<Self::Item>, Self::Fault>;

    async fn update(
        &self,
        key: <Self::Item as Entity>::Key,
        input: Self::Input,
    ) -> Result<Outcome<Self::Item>, Self::Fault>;

    async fn delete(&self, key: <Self::Item as Entity>::Key)
    -> Result<Outcome<()>, Self::Fault>;
}

/// Per-screen entry point: every call starts an independent run.
pub struct EntityFacade<R: Remote> {
    remote: Arc<R>,
    runner: AsyncOperationRunner,
}

impl<R: Remote> Clone for EntityFacade<R> {
    fn clone(&self) -> Self {
        Self {
            remote: Arc::clone(&self.remote),
            runner: self.runner.clone(),
        }
    }
}

impl<R: Remote> fmt::Debug for EntityFacade<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityFacade")
            .field("remote", &std::any::type_name::<R>())
            .finish()
    }
}

impl<R: Remote> EntityFacade<R>
where
    <R::Item as Entity>::Key: Send + 'static,
{
    pub fn new(remote: R, runner: AsyncOperationRunner) -> Self {
        Self {
            remote: Arc::new(remote),
            runner,
        }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Fetches the full list for `period`.
    pub fn load(&self, period: Period) -> ResourceStream<Vec<R::Item>> {
        let remote = Arc::clone(&self.remote);
        tracing::debug!("load {} for {period}", std::any::type_name::<R::Item>());
        self.runner.run(move || async move { remote.list(period).await })
    }

    /// Reloads while keeping `current` visible during `Loading` and on `Error`.
    pub fn reload(&self, period: Period, current: Vec<R::Item>) -> ResourceStream<Vec<R::Item>> {
        let remote = Arc::clone(&self.remote);
        self.runner
            .run_retaining(Some(current), move || async move { remote.list(period).await })
    }

    /// Creates an entity; on success the screen appends the returned record.
    pub fn create(&self, input: R::Input) -> ResourceStream<R::Item> {
        let remote = Arc::clone(&self.remote);
        self.runner
            .run(move || async move { remote.create(input).await })
    }

    /// Updates an entity; on success the screen merges the returned record.
    pub fn update(
        &self,
        key: <R::Item as Entity>::Key,
        input: R::Input,
    ) -> ResourceStream<R::Item> {
        let remote = Arc::clone(&self.remote);
        self.runner
            .run(move || async move { remote.update(key, input).await })
    }

    /// Deletes an entity; on success the screen removes it locally.
    pub fn delete(&self, key: <R::Item as Entity>::Key) -> ResourceStream<()> {
        let remote = Arc::clone(&self.remote);
        self.runner
            .run(move || async move { remote.delete(key).await })
    }
}
