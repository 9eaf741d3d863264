use uuid::Uuid;

use crate::common::RunLimits;
use crate::error::PipelineError;
use crate::partitioner::Partitioner;
use crate::report::{FinalOutput, RunReport};
use crate::table::SharedTable;

use super::worker_pool::{MapperPool, ReducerPool, ShuffleWorker};

/// Drives one run through its phases: partition, map, shuffle, reduce,
/// output assembly. The coordinator is the only thread that transitions
/// phases; workers never signal each other directly.
pub struct Coordinator {
    limits: RunLimits,
}

impl Coordinator {
    pub fn new(limits: RunLimits) -> Self {
        Self { limits }
    }

    pub fn run(&self, input: &str) -> Result<RunReport, PipelineError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("pipeline_run", %run_id);
        let _guard = span.enter();

        let partitioner = Partitioner::new(self.limits);
        let tokens = partitioner.tokenize(input)?;
        if tokens.is_empty() {
            tracing::info!("no tokens in input, skipping worker phases");
            return Ok(RunReport::empty(run_id));
        }

        let num_mappers = Partitioner::mapper_count(tokens.len());
        let chunks = Partitioner::split_into_chunks(tokens, num_mappers);

        let table = SharedTable::new(self.limits);
        let (events_tx, events_rx) = async_channel::unbounded();

        tracing::info!(mappers = num_mappers, "starting map phase");
        let mappers = MapperPool::spawn(chunks, &table, events_tx.clone())?;
        let overflows = mappers.join();

        // The key set is frozen now that every mapper has joined; reducer
        // slots are assigned from this snapshot.
        let slots = table.lock().keys();

        let shuffle = ShuffleWorker::spawn(&table, events_tx.clone())?;
        tracing::info!(reducers = slots.len(), "starting reduce phase");
        let reducers = match ReducerPool::spawn(slots, &table) {
            Ok(pool) => pool,
            Err(err) => {
                shuffle.join();
                return Err(err);
            }
        };

        let shuffle_view = shuffle.join();
        let output = FinalOutput::new(reducers.join());

        drop(events_tx);
        let mut events = Vec::new();
        while let Ok(event) = events_rx.try_recv() {
            tracing::debug!(?event, "worker progress");
            events.push(event);
        }

        tracing::info!(
            keys = output.len(),
            rejected = overflows.len(),
            "run complete"
        );
        Ok(RunReport {
            run_id,
            shuffle_view,
            output,
            overflows,
            events,
        })
    }
}
