use std::fmt;
use std::io;

use thiserror::Error;

/// Fatal errors for a pipeline run. Capacity overflow is not here: rejected
/// table updates are recorded in the run report instead of aborting the run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("input is {len} characters long, the limit is {max}")]
    InputTooLarge { len: usize, max: usize },

    #[error("a token is {len} characters long, the limit is {max}")]
    TokenTooLong { len: usize, max: usize },

    #[error("failed to spawn {role} worker {index}")]
    WorkerSpawn {
        role: WorkerRole,
        index: usize,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerRole {
    Mapper,
    Shuffle,
    Reducer,
}

impl fmt::Display for WorkerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkerRole::Mapper => "mapper",
            WorkerRole::Shuffle => "shuffle",
            WorkerRole::Reducer => "reducer",
        };
        f.write_str(name)
    }
}
