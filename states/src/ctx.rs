use std::{
    any::{TypeId, type_name},
    collections::{BTreeMap, VecDeque},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use flume::{Receiver, Sender};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::{
    Command, CommandSnapshot, Compute, Dep, Error, Graph, LatestOnlyUpdater, State,
    StateSyncStatus, TaskHandle, TaskId, Updater, updater::Update,
};

pub(crate) struct Slot<T: ?Sized> {
    pub(crate) value: Box<T>,
    pub(crate) status: StateSyncStatus,
}

pub(crate) type Storage<T> = BTreeMap<TypeId, Slot<T>>;

/// Owner of every state, compute and command of the application.
///
/// Frame loop:
/// 1. `sync_computes` applies updates sent by finished commands.
/// 2. UI reads with `state`/`cached` and writes with `update`/`state_mut`.
/// 3. `flush_commands` spawns queued commands.
/// 4. `run_computed` recalculates dirty derived computes.
pub struct StateCtx {
    states: Storage<dyn State>,
    computes: Storage<dyn Compute>,
    compute_order: Vec<TypeId>,
    graph: Graph<TypeId>,

    commands: BTreeMap<TypeId, Arc<dyn Command>>,
    command_queue: VecDeque<TypeId>,
    generations: BTreeMap<TypeId, Arc<AtomicU64>>,
    running: BTreeMap<TypeId, TaskHandle>,
    tasks: JoinSet<()>,

    send: Sender<Update>,
    recv: Receiver<Update>,
}

impl Default for StateCtx {
    fn default() -> Self {
        Self::new()
    }
}

impl StateCtx {
    pub fn new() -> Self {
        let (send, recv) = flume::unbounded();
        Self {
            states: BTreeMap::new(),
            computes: BTreeMap::new(),
            compute_order: Vec::new(),
            graph: Graph::new(),
            commands: BTreeMap::new(),
            command_queue: VecDeque::new(),
            generations: BTreeMap::new(),
            running: BTreeMap::new(),
            tasks: JoinSet::new(),
            send,
            recv,
        }
    }

    pub fn add_state<T: State>(&mut self, state: T) {
        self.states.insert(
            TypeId::of::<T>(),
            Slot {
                value: Box::new(state),
                status: StateSyncStatus::Clean,
            },
        );
        self.mark_dependents_dirty(TypeId::of::<T>());
    }

    pub fn record_compute<T: Compute>(&mut self, compute: T) {
        let id = TypeId::of::<T>();
        for dep in compute.deps().iter() {
            if let Err(err) = self.graph.route_to(dep, id) {
                log::warn!("{}: {err}", type_name::<T>());
            }
        }
        self.computes.insert(
            id,
            Slot {
                value: Box::new(compute),
                status: StateSyncStatus::Init,
            },
        );
        self.reorder_computes();
    }

    pub fn record_command<T: Command>(&mut self, command: T) {
        self.commands.insert(TypeId::of::<T>(), Arc::new(command));
    }

    fn reorder_computes(&mut self) {
        let sorted = match self.graph.topology_sort() {
            Ok(sorted) => sorted,
            Err(err) => {
                log::error!("Compute dependencies are not a DAG: {err}");
                Vec::new()
            }
        };
        let mut order: Vec<TypeId> = sorted
            .into_iter()
            .filter(|id| self.computes.contains_key(id))
            .collect();
        for id in self.computes.keys() {
            if !order.contains(id) {
                order.push(*id);
            }
        }
        self.compute_order = order;
    }

    fn mark_dependents_dirty(&mut self, id: TypeId) {
        for dependent in self.graph.dependents(id) {
            if let Some(slot) = self.computes.get_mut(dependent) {
                slot.status = StateSyncStatus::Dirty;
            }
        }
    }

    pub fn try_state<T: State>(&self) -> Result<&T, Error> {
        self.states
            .get(&TypeId::of::<T>())
            .and_then(|slot| slot.value.as_any().downcast_ref::<T>())
            .ok_or_else(|| Error::state_not_found(type_name::<T>(), "StateCtx::state"))
    }

    /// # Panics
    /// Panics if `T` was never added.
    pub fn state<T: State>(&self) -> &T {
        self.try_state::<T>().unwrap_or_else(|err| panic!("{err}"))
    }

    /// Mutable access. Computes depending on `T` are marked dirty.
    ///
    /// # Panics
    /// Panics if `T` was never added.
    pub fn state_mut<T: State>(&mut self) -> &mut T {
        let id = TypeId::of::<T>();
        self.mark_dependents_dirty(id);
        self.states
            .get_mut(&id)
            .and_then(|slot| slot.value.as_any_mut().downcast_mut::<T>())
            .unwrap_or_else(|| {
                panic!(
                    "{}",
                    Error::state_not_found(type_name::<T>(), "StateCtx::state_mut")
                )
            })
    }

    pub fn update<T: State>(&mut self, f: impl FnOnce(&mut T)) {
        f(self.state_mut::<T>());
    }

    pub fn cached<T: Compute>(&self) -> Option<&T> {
        self.computes
            .get(&TypeId::of::<T>())
            .and_then(|slot| slot.value.as_any().downcast_ref::<T>())
    }

    /// # Panics
    /// Panics if `T` was never recorded.
    pub fn compute<T: Compute>(&self) -> &T {
        self.cached::<T>().unwrap_or_else(|| {
            panic!(
                "{}",
                Error::compute_not_found(type_name::<T>(), "StateCtx::compute")
            )
        })
    }

    pub fn compute_status<T: Compute>(&self) -> Option<StateSyncStatus> {
        self.computes
            .get(&TypeId::of::<T>())
            .map(|slot| slot.status)
    }

    pub fn updater(&self) -> Updater {
        Updater::new(self.send.clone())
    }

    /// Apply every pending update. Returns whether anything changed.
    pub fn sync_computes(&mut self) -> bool {
        let mut changed = false;
        while let Ok((id, value)) = self.recv.try_recv() {
            if let Some(slot) = self.computes.get_mut(&id) {
                slot.value.assign_box(value);
                slot.status = StateSyncStatus::Clean;
            } else if let Some(slot) = self.states.get_mut(&id) {
                slot.value.assign_box(value);
            } else {
                log::warn!("Dropping update for unregistered type {id:?}");
                continue;
            }
            self.mark_dependents_dirty(id);
            changed = true;
        }
        changed
    }

    /// Run every dirty compute in dependency order.
    pub fn run_computed(&mut self) {
        self.sync_computes();
        for index in 0..self.compute_order.len() {
            let id = self.compute_order[index];
            let Some(slot) = self.computes.get(&id) else {
                continue;
            };
            if !slot.status.needs_run() {
                continue;
            }
            slot.value
                .compute(Dep::new(&self.states, &self.computes), self.updater());
            if let Some(slot) = self.computes.get_mut(&id) {
                slot.status = StateSyncStatus::Clean;
            }
            // results of this compute must reach its dependents in the same pass
            self.sync_computes();
        }
    }

    pub fn enqueue_command<T: Command>(&mut self) {
        let id = TypeId::of::<T>();
        if self.commands.contains_key(&id) {
            self.command_queue.push_back(id);
        } else {
            log::error!(
                "{}",
                Error::CommandNotFound {
                    name: type_name::<T>()
                }
            );
        }
    }

    /// Enqueue and flush immediately.
    pub fn dispatch<T: Command>(&mut self) {
        self.enqueue_command::<T>();
        self.flush_commands();
    }

    pub fn has_pending_commands(&self) -> bool {
        !self.command_queue.is_empty()
    }

    fn snapshot(&self) -> CommandSnapshot {
        let mut snap = CommandSnapshot::new();
        let states = self.states.iter().map(|(id, slot)| (id, slot.value.clone_boxed()));
        let computes = self
            .computes
            .iter()
            .map(|(id, slot)| (id, slot.value.clone_boxed()));
        for (id, cloned) in states.chain(computes) {
            if let Some(cloned) = cloned {
                snap.insert_cloned(*id, cloned);
            }
        }
        snap
    }

    /// Spawn every queued command on the task set.
    ///
    /// Must be called inside a tokio runtime.
    pub fn flush_commands(&mut self) {
        self.reap_finished();
        while let Some(id) = self.command_queue.pop_front() {
            let Some(command) = self.commands.get(&id).cloned() else {
                continue;
            };

            let latest = Arc::clone(self.generations.entry(id).or_default());
            let generation = latest.fetch_add(1, Ordering::AcqRel) + 1;

            let token = CancellationToken::new();
            let handle = TaskHandle::new(TaskId::new(id, generation), token.clone());
            if let Some(previous) = self.running.insert(id, handle) {
                previous.cancel();
            }

            let updater = LatestOnlyUpdater::new(self.updater(), generation, latest);
            let future = command.run(self.snapshot(), updater, token);
            self.tasks.spawn(future);
        }
    }

    /// Drop finished tasks from the set. Panicked commands are logged.
    fn reap_finished(&mut self) {
        while let Some(joined) = self.tasks.try_join_next() {
            if let Err(err) = joined
                && err.is_panic()
            {
                log::error!("Command task panicked: {err}");
            }
        }
    }

    pub fn running_task<T: Command>(&self) -> Option<&TaskHandle> {
        self.running.get(&TypeId::of::<T>())
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn task_set_mut(&mut self) -> &mut JoinSet<()> {
        &mut self.tasks
    }

    /// Cancel and abort every task, then drop pending updates.
    pub async fn shutdown(&mut self) {
        for handle in std::mem::take(&mut self.running).into_values() {
            handle.cancel();
        }
        self.command_queue.clear();
        self.tasks.abort_all();
        while self.tasks.join_next().await.is_some() {}
        self.recv.drain().for_each(drop);
    }
}
