//! Source identifiers as written in mapping payloads.

const FILE_SUFFIXES: [&str; 2] = [".csv", ".xlsx"];

/// Table name for a payload entry name.
///
/// Payload entries are often named after the file the table was loaded
/// from; a trailing `.csv` or `.xlsx` is dropped. Only the end of the name
/// is affected.
pub fn source_table_name(entry_name: &str) -> &str {
    FILE_SUFFIXES
        .iter()
        .find_map(|suffix| entry_name.strip_suffix(suffix))
        .unwrap_or(entry_name)
}
