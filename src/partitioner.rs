use regex::Regex;

use crate::common::RunLimits;
use crate::error::PipelineError;

/// Splits raw input into tokens and the tokens into contiguous chunks, one
/// per mapper. Input and token length limits are enforced here, before any
/// worker is spawned.
pub struct Partitioner {
    limits: RunLimits,
    token: Regex,
}

impl Partitioner {
    pub fn new(limits: RunLimits) -> Self {
        Self {
            limits,
            // space, tab, newline, carriage return, vertical tab, form feed
            token: Regex::new(r"[^ \t\n\r\x0B\x0C]+").expect("invalid regex"),
        }
    }

    pub fn tokenize(&self, input: &str) -> Result<Vec<String>, PipelineError> {
        let len = input.chars().count();
        if len > self.limits.max_input_len {
            return Err(PipelineError::InputTooLarge {
                len,
                max: self.limits.max_input_len,
            });
        }

        let mut tokens = Vec::new();
        for found in self.token.find_iter(input) {
            let token = found.as_str();
            let token_len = token.chars().count();
            if token_len > self.limits.max_token_len {
                return Err(PipelineError::TokenTooLong {
                    len: token_len,
                    max: self.limits.max_token_len,
                });
            }
            tokens.push(token.to_string());
        }
        Ok(tokens)
    }

    /// 3 mappers up to 2999 words, one more per extra thousand after that.
    pub fn mapper_count(word_count: usize) -> usize {
        (word_count / 1000 + 1).max(3)
    }

    /// Splits the token sequence into `num_chunks` contiguous chunks; the
    /// first `word_count % num_chunks` chunks get one extra token. Chunks
    /// concatenated in order reproduce the token sequence exactly.
    pub fn split_into_chunks(tokens: Vec<String>, num_chunks: usize) -> Vec<Vec<String>> {
        let base = tokens.len() / num_chunks;
        let extra = tokens.len() % num_chunks;

        let mut chunks = Vec::with_capacity(num_chunks);
        let mut rest = tokens;
        for index in 0..num_chunks {
            let take = base + usize::from(index < extra);
            let tail = rest.split_off(take);
            chunks.push(rest);
            rest = tail;
        }
        chunks
    }
}
