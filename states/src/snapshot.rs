use std::any::{Any, TypeId, type_name};
use std::collections::BTreeMap;

use crate::{Compute, Error, State};

/// Cloned view of every snapshot-able state and compute at dispatch time.
#[derive(Default)]
pub struct CommandSnapshot {
    inner: BTreeMap<TypeId, Box<dyn Any + Send>>,
}

impl CommandSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_cloned(&mut self, id: TypeId, value: Box<dyn Any + Send>) {
        self.inner.insert(id, value);
    }

    fn lookup<T: 'static>(&self) -> Option<&T> {
        self.inner
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref::<T>())
    }

    pub fn try_state<T: State>(&self) -> Result<&T, Error> {
        self.lookup::<T>()
            .ok_or_else(|| Error::state_not_found(type_name::<T>(), "CommandSnapshot"))
    }

    /// # Panics
    /// Panics if `T` is not registered or does not implement `clone_boxed`.
    pub fn state<T: State>(&self) -> &T {
        self.try_state::<T>().unwrap_or_else(|err| panic!("{err}"))
    }

    /// # Panics
    /// Panics if `T` is not registered or does not implement `clone_boxed`.
    pub fn compute<T: Compute>(&self) -> &T {
        self.lookup::<T>().unwrap_or_else(|| {
            panic!(
                "{}",
                Error::compute_not_found(type_name::<T>(), "CommandSnapshot")
            )
        })
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
