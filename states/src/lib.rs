//! Reactive state runtime for the roster console.
//!
//! - A [`State`] is plain data owned by [`StateCtx`] and mutated by the UI.
//! - A [`Compute`] is a cached value. Derived computes recalculate when one of
//!   their dependencies is marked dirty; command-fed computes are only written
//!   through an [`Updater`].
//! - A [`Command`] is manual-only async work (network IO). It reads a
//!   [`CommandSnapshot`] and publishes results with a [`LatestOnlyUpdater`].

mod basic_state;
mod command;
mod compute;
mod ctx;
mod dep;
mod error;
mod graph;
mod snapshot;
mod state;
mod state_sync_status;
mod task;
mod updater;

pub use basic_state::Time;
pub use command::{Command, CommandFuture};
pub use compute::{Compute, ComputeDeps};
pub use ctx::StateCtx;
pub use dep::Dep;
pub use error::Error;
pub use graph::{DepRoute, Graph, TopologyError};
pub use snapshot::CommandSnapshot;
pub use state::{SnapshotClone, State, assign_impl};
pub use state_sync_status::StateSyncStatus;
pub use task::{TaskHandle, TaskId};
pub use updater::{LatestOnlyUpdater, Updater};
