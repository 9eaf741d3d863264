use std::sync::Arc;
use std::thread::{self, JoinHandle};

use async_channel::Sender;

use crate::common::{Event, Key};
use crate::error::{PipelineError, WorkerRole};
use crate::normalizer::Normalizer;
use crate::table::{MergeOutcome, Overflow, SharedTable};

pub struct MapperPool {
    handles: Vec<JoinHandle<Vec<Overflow>>>,
}

impl MapperPool {
    /// Spawns one mapper per chunk. If a spawn fails, the mappers that did
    /// start are joined before the error is returned, so no worker outlives
    /// the run.
    pub fn spawn(
        chunks: Vec<Vec<String>>,
        table: &SharedTable,
        events: Sender<Event>,
    ) -> Result<Self, PipelineError> {
        let normalizer = Arc::new(Normalizer::new());
        let mut handles = Vec::with_capacity(chunks.len());

        for (index, chunk) in chunks.into_iter().enumerate() {
            let table = table.clone();
            let normalizer = Arc::clone(&normalizer);
            let events = events.clone();
            let spawned = thread::Builder::new()
                .name(format!("mapper-{index}"))
                .spawn(move || map_chunk(index, chunk, &table, &normalizer, &events));
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(source) => {
                    for handle in handles {
                        let _ = handle.join();
                    }
                    return Err(PipelineError::WorkerSpawn {
                        role: WorkerRole::Mapper,
                        index,
                        source,
                    });
                }
            }
        }
        Ok(Self { handles })
    }

    /// Barrier: returns only once every mapper has fully joined. The table's
    /// key set is frozen after this.
    pub fn join(self) -> Vec<Overflow> {
        let mut overflows = Vec::new();
        for handle in self.handles {
            overflows.extend(handle.join().expect("mapper worker panicked"));
        }
        overflows
    }
}

fn map_chunk(
    mapper: usize,
    chunk: Vec<String>,
    table: &SharedTable,
    normalizer: &Normalizer,
    events: &Sender<Event>,
) -> Vec<Overflow> {
    let mut overflows = Vec::new();
    for token in &chunk {
        let Some(key) = normalizer.normalize(token) else {
            continue;
        };
        // one lock scope per merge; no mapper observes a half-updated entry
        let merged = table.lock().merge(&key);
        match merged {
            Ok(MergeOutcome::Inserted) => {
                let _ = events.send_blocking(Event::KeyInserted { mapper, key });
            }
            Ok(MergeOutcome::Incremented) => {}
            Err(kind) => overflows.push(Overflow { kind, key, mapper }),
        }
    }
    let _ = events.send_blocking(Event::MapperCompleted { mapper });
    overflows
}

/// Reorders the table into its deterministic reporting order and returns the
/// sorted view. Runs concurrently with the reducers; both sides go through
/// the table lock.
pub struct ShuffleWorker {
    handle: JoinHandle<Vec<(Key, usize)>>,
}

impl ShuffleWorker {
    pub fn spawn(table: &SharedTable, events: Sender<Event>) -> Result<Self, PipelineError> {
        let table = table.clone();
        let handle = thread::Builder::new()
            .name("shuffle".to_string())
            .spawn(move || {
                let view = {
                    let mut guard = table.lock();
                    guard.sort_by_key();
                    guard.snapshot()
                };
                let _ = events.send_blocking(Event::ShuffleCompleted);
                view
            })
            .map_err(|source| PipelineError::WorkerSpawn {
                role: WorkerRole::Shuffle,
                index: 0,
                source,
            })?;
        Ok(Self { handle })
    }

    pub fn join(self) -> Vec<(Key, usize)> {
        self.handle.join().expect("shuffle worker panicked")
    }
}

pub struct ReducerPool {
    handles: Vec<JoinHandle<(Key, usize)>>,
}

impl ReducerPool {
    /// Spawns one reducer per distinct key; the slot index is the position of
    /// the key in `keys`. Spawn failure joins the reducers already running
    /// before reporting the failed slot.
    pub fn spawn(keys: Vec<Key>, table: &SharedTable) -> Result<Self, PipelineError> {
        let mut handles = Vec::with_capacity(keys.len());
        for (slot, key) in keys.into_iter().enumerate() {
            let table = table.clone();
            let spawned = thread::Builder::new()
                .name(format!("reducer-{slot}"))
                .spawn(move || {
                    let total = table.lock().total_for(&key);
                    (key, total)
                });
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(source) => {
                    for handle in handles {
                        let _ = handle.join();
                    }
                    return Err(PipelineError::WorkerSpawn {
                        role: WorkerRole::Reducer,
                        index: slot,
                        source,
                    });
                }
            }
        }
        Ok(Self { handles })
    }

    /// Joins every reducer and collects `(key, total)` pairs in slot order.
    pub fn join(self) -> Vec<(Key, usize)> {
        self.handles
            .into_iter()
            .map(|handle| handle.join().expect("reducer worker panicked"))
            .collect()
    }
}
