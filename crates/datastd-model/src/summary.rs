use serde::{Deserialize, Serialize};

/// Rows contributed by one source table to one target table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableResult {
    pub source_table: String,
    pub target_schema: String,
    pub target_table: String,
    pub rows_written: usize,
}

/// Outcome of a standardization run, one result per payload entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardizeReport {
    pub results: Vec<TableResult>,
}

impl StandardizeReport {
    pub fn total_rows(&self) -> usize {
        self.results.iter().map(|result| result.rows_written).sum()
    }

    /// Number of distinct target tables touched by the run.
    pub fn target_count(&self) -> usize {
        let mut targets: Vec<(&str, &str)> = self
            .results
            .iter()
            .map(|result| (result.target_schema.as_str(), result.target_table.as_str()))
            .collect();
        targets.sort_unstable();
        targets.dedup();
        targets.len()
    }
}
