use std::any::TypeId;

use crate::{Dep, State, Updater};

/// Declared inputs of a [`Compute`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComputeDeps {
    pub states: Vec<TypeId>,
    pub computes: Vec<TypeId>,
}

impl ComputeDeps {
    /// No inputs: the compute is only ever written by commands.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn state<T: State>(mut self) -> Self {
        self.states.push(TypeId::of::<T>());
        self
    }

    pub fn compute<T: Compute>(mut self) -> Self {
        self.computes.push(TypeId::of::<T>());
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.states.iter().chain(self.computes.iter()).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty() && self.computes.is_empty()
    }
}

/// A cached value owned by [`crate::StateCtx`].
///
/// `compute` runs synchronously on the UI thread whenever an input changed.
/// It must not perform IO; results are published through the updater.
pub trait Compute: State {
    fn deps(&self) -> ComputeDeps;

    fn compute(&self, deps: Dep<'_>, updater: Updater);
}
