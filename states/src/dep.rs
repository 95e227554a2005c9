use std::any::{TypeId, type_name};

use crate::{Compute, Error, State, ctx::Storage};

/// Read-only view over registered states and computes, handed to
/// [`Compute::compute`].
pub struct Dep<'a> {
    states: &'a Storage<dyn State>,
    computes: &'a Storage<dyn Compute>,
}

impl<'a> Dep<'a> {
    pub(crate) fn new(states: &'a Storage<dyn State>, computes: &'a Storage<dyn Compute>) -> Self {
        Self { states, computes }
    }

    pub fn try_state<T: State>(&self) -> Result<&'a T, Error> {
        self.states
            .get(&TypeId::of::<T>())
            .and_then(|slot| slot.value.as_any().downcast_ref::<T>())
            .ok_or_else(|| Error::state_not_found(type_name::<T>(), "Dep::state"))
    }

    pub fn try_compute<T: Compute>(&self) -> Result<&'a T, Error> {
        self.computes
            .get(&TypeId::of::<T>())
            .and_then(|slot| slot.value.as_any().downcast_ref::<T>())
            .ok_or_else(|| Error::compute_not_found(type_name::<T>(), "Dep::compute"))
    }

    /// # Panics
    /// Panics if `T` was never registered.
    pub fn state<T: State>(&self) -> &'a T {
        self.try_state::<T>().unwrap_or_else(|err| panic!("{err}"))
    }

    /// # Panics
    /// Panics if `T` was never registered.
    pub fn compute<T: Compute>(&self) -> &'a T {
        self.try_compute::<T>().unwrap_or_else(|err| panic!("{err}"))
    }
}
