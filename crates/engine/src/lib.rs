//! Client-side state synchronization for the tracker screens.
//!
//! A screen asks an [`EntityFacade`] for data, which starts an
//! [`AsyncOperationRunner`] run publishing `Loading` and then one terminal
//! [`AsyncResource`]. Successful payloads land in a [`ListStore`], which
//! diffs them against what is on screen and publishes the minimal
//! [`ChangeSet`]. Local edits go through the same store primitives, and the
//! derived views ([`ChartAggregator`], [`Summary`]) are recomputed from the
//! store's current items.
pub use chart::{
    CategoryAmount, ChartAggregator, ChartBucket, ChartConfig, OtherBucket, PALETTE, percentages,
};
pub use diff::{
    ChangeSet, Comparator, Diff, Entity, Snapshot, fingerprint, scaled_fingerprint,
};
pub use entities::{category_amounts, planned_amounts};
pub use error::EngineError;
pub use facade::{EntityFacade, Remote};
pub use list_store::{ListStore, Publication, SortMode};
pub use period::{Period, parse_timezone};
pub use resource::{AsyncResource, Outcome, Status};
pub use runner::{AsyncOperationRunner, ResourceStream};
pub use screen::{ListScreen, Notice, NoticeLevel};
pub use summary::{Amounted, Summary};

mod chart;
mod diff;
mod entities;
mod error;
mod facade;
mod list_store;
pub mod money;
mod period;
mod resource;
mod runner;
mod screen;
mod summary;
