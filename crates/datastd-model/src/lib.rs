pub mod error;
pub mod mapping;
pub mod summary;

pub use error::{ConfigError, Result, StandardizeError, StoreError};
pub use mapping::{
    EntryConfig, MappingEntry, MappingMode, MappingPayload, MappingRule, RunDefaults, TargetRef,
    qualified_name,
};
pub use summary::{StandardizeReport, TableResult};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_counts_rows_and_targets() {
        let report = StandardizeReport {
            results: vec![
                TableResult {
                    source_table: "patients".to_string(),
                    target_schema: "std".to_string(),
                    target_table: "person".to_string(),
                    rows_written: 3,
                },
                TableResult {
                    source_table: "visits".to_string(),
                    target_schema: "std".to_string(),
                    target_table: "person".to_string(),
                    rows_written: 2,
                },
            ],
        };
        assert_eq!(report.total_rows(), 5);
        assert_eq!(report.target_count(), 1);
    }

    #[test]
    fn report_serializes() {
        let report = StandardizeReport {
            results: vec![TableResult {
                source_table: "t1".to_string(),
                target_schema: "s".to_string(),
                target_table: "out".to_string(),
                rows_written: 2,
            }],
        };
        let json = serde_json::to_string(&report).expect("serialize report");
        assert_eq!(
            json,
            r#"{"results":[{"source_table":"t1","target_schema":"s","target_table":"out","rows_written":2}]}"#
        );
        let round: StandardizeReport = serde_json::from_str(&json).expect("deserialize report");
        assert_eq!(round, report);
    }
}
