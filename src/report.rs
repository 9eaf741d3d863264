use std::fmt::Write as _;

use uuid::Uuid;

use crate::common::{Event, Key};
use crate::table::Overflow;

/// Key → total count in reducer-slot order. Read-only once assembled.
#[derive(Debug, Clone)]
pub struct FinalOutput {
    entries: Vec<(Key, usize)>,
}

impl FinalOutput {
    pub(crate) fn new(entries: Vec<(Key, usize)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(entry_key, _)| entry_key == key)
            .map(|(_, count)| *count)
    }

    pub fn entries(&self) -> &[(Key, usize)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts; equals the number of tokens that survived
    /// normalization and were accepted by the table.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }
}

/// Everything a run produced: the final totals, the shuffle stage's sorted
/// view, rejected updates, and the progress records workers emitted.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: Uuid,
    pub shuffle_view: Vec<(Key, usize)>,
    pub output: FinalOutput,
    pub overflows: Vec<Overflow>,
    pub events: Vec<Event>,
}

impl RunReport {
    pub(crate) fn empty(run_id: Uuid) -> Self {
        Self {
            run_id,
            shuffle_view: Vec::new(),
            output: FinalOutput::new(Vec::new()),
            overflows: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        if !self.shuffle_view.is_empty() {
            out.push_str("After Shuffle:\n");
            out.push_str("----------------------------\n");
            let _ = writeln!(out, "{:<20}{:<10}", "Key", "Count");
            for (key, count) in &self.shuffle_view {
                let _ = writeln!(out, "{key:<20}{count:<10}");
            }
            out.push('\n');
        }

        out.push_str("Final Output:\n");
        out.push_str("----------------------------\n");
        let _ = writeln!(out, "{:<20}{:<10}", "Key", "Count");
        for (key, count) in self.output.entries() {
            let _ = writeln!(out, "{key:<20}{count:<10}");
        }

        if !self.overflows.is_empty() {
            out.push_str("\nRejected updates:\n");
            out.push_str("----------------------------\n");
            for overflow in &self.overflows {
                let _ = writeln!(out, "{overflow}");
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::{FinalOutput, RunReport};
    use uuid::Uuid;

    #[test]
    fn empty_report_renders_header_without_rows() {
        let report = RunReport::empty(Uuid::new_v4());
        let rendered = report.render();
        assert!(rendered.contains("Final Output:"));
        assert!(rendered.contains("Key"));
        assert!(!rendered.contains("After Shuffle:"));
        assert_eq!(rendered.lines().count(), 3);
    }

    #[test]
    fn final_output_lookup_and_total() {
        let output = FinalOutput::new(vec![("apple".into(), 2), ("dell".into(), 1)]);
        assert_eq!(output.get("apple"), Some(2));
        assert_eq!(output.get("hp"), None);
        assert_eq!(output.total(), 3);
    }
}
