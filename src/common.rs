/// Canonical lowercase form of a token, used as the counting identity.
pub type Key = String;

/// Capacity limits for a single pipeline run.
#[derive(Debug, Clone, Copy)]
pub struct RunLimits {
    /// Maximum input length in characters.
    pub max_input_len: usize,
    /// Maximum length of a single token in characters.
    pub max_token_len: usize,
    /// Maximum number of distinct keys in the intermediate table.
    pub max_distinct_keys: usize,
    /// Maximum occurrence count recorded for one key.
    pub max_occurrences_per_key: usize,
}

impl Default for RunLimits {
    fn default() -> Self {
        Self {
            max_input_len: 10_000,
            max_token_len: 10_000,
            max_distinct_keys: 5_000,
            max_occurrences_per_key: 5_000,
        }
    }
}

/// Progress records emitted by workers while a run is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A mapper inserted a key that was not in the table before.
    KeyInserted { mapper: usize, key: Key },
    /// A mapper finished its chunk. Emitted exactly once per mapper.
    MapperCompleted { mapper: usize },
    /// The shuffle stage finished reordering the table.
    ShuffleCompleted,
}
