mod coordinator;
mod worker_pool;

use crate::common::RunLimits;
use crate::error::PipelineError;
use crate::report::RunReport;

use coordinator::Coordinator;

/// Fork-join word-frequency pipeline: partition the input across parallel
/// mappers, merge counts into a shared table, shuffle, then fan out one
/// reducer per distinct key.
pub struct ParallelWordCount {
    limits: RunLimits,
}

impl ParallelWordCount {
    pub fn new(limits: RunLimits) -> Self {
        Self { limits }
    }

    pub fn run(&self, input: &str) -> Result<RunReport, PipelineError> {
        Coordinator::new(self.limits).run(input)
    }
}

impl Default for ParallelWordCount {
    fn default() -> Self {
        Self::new(RunLimits::default())
    }
}
