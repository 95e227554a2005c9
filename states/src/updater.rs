use std::{
    any::{Any, TypeId, type_name},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use flume::Sender;

use crate::State;

pub(crate) type Update = (TypeId, Box<dyn Any + Send>);

/// Sends replacement values back to the owning [`crate::StateCtx`].
///
/// Updates are applied on the next `sync_computes`.
#[derive(Debug, Clone)]
pub struct Updater {
    send: Sender<Update>,
}

impl Updater {
    pub(crate) fn new(send: Sender<Update>) -> Self {
        Self { send }
    }

    pub fn set<T: State>(&self, value: T) {
        if self.send.send((TypeId::of::<T>(), Box::new(value))).is_err() {
            log::warn!(
                "State context is gone, dropping update for {}",
                type_name::<T>()
            );
        }
    }
}

/// An [`Updater`] bound to one command dispatch.
///
/// Once the same command type is dispatched again, every `set` from the older
/// dispatch is discarded.
#[derive(Debug, Clone)]
pub struct LatestOnlyUpdater {
    inner: Updater,
    generation: u64,
    latest: Arc<AtomicU64>,
}

impl LatestOnlyUpdater {
    pub(crate) fn new(inner: Updater, generation: u64, latest: Arc<AtomicU64>) -> Self {
        Self {
            inner,
            generation,
            latest,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::Acquire) == self.generation
    }

    pub fn set<T: State>(&self, value: T) {
        if self.is_current() {
            self.inner.set(value);
        } else {
            log::debug!(
                "Discarding stale {} from generation {}",
                type_name::<T>(),
                self.generation
            );
        }
    }
}
