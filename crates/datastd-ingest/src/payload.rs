//! Mapping payload loading.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde_json::Value;
use serde_json::error::Category;
use tracing::debug;

use datastd_model::{ConfigError, MappingMode, MappingPayload};

use crate::error::{IngestError, Result};

/// Parse a mapping payload from JSON text.
///
/// Entries keep document order. A `relational` option that is neither a
/// boolean nor `"True"`/`"False"` is reported as
/// [`ConfigError::InvalidRelationalFlag`] for its entry; any other problem
/// as [`ConfigError::InvalidPayload`].
pub fn parse_mapping_payload(text: &str) -> std::result::Result<MappingPayload, ConfigError> {
    serde_json::from_str::<MappingPayload>(text).map_err(|error| {
        let flag_error = if is_relational_flag_error(&error) {
            relational_flag_error(text)
        } else {
            None
        };
        flag_error.unwrap_or_else(|| ConfigError::InvalidPayload {
            message: error.to_string(),
        })
    })
}

/// Read and parse the mapping payload stored at `path`.
pub fn load_mapping_payload(path: &Path) -> Result<MappingPayload> {
    let text = fs::read_to_string(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let payload = parse_mapping_payload(&text)?;
    debug!(path = %path.display(), entries = payload.len(), "loaded mapping payload");
    Ok(payload)
}

fn is_relational_flag_error(error: &serde_json::Error) -> bool {
    error.classify() == Category::Data && error.to_string().contains(MappingMode::EXPECTED)
}

/// The first entry, in document order, whose `relational` flag is invalid.
fn relational_flag_error(text: &str) -> Option<ConfigError> {
    let RawEntries(entries) = serde_json::from_str(text).ok()?;
    entries.into_iter().find_map(|(name, entry)| {
        let error = match entry.get("relational")? {
            Value::Bool(_) | Value::Null => return None,
            Value::String(flag) => MappingMode::parse_flag(flag).err()?,
            other => ConfigError::InvalidRelationalFlag {
                value: other.to_string(),
            },
        };
        Some(error.for_entry(&name))
    })
}

/// Top-level payload entries as raw JSON, in document order.
struct RawEntries(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for RawEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct RawEntriesVisitor;

        impl<'de> Visitor<'de> for RawEntriesVisitor {
            type Value = RawEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping payload object")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, Value>()? {
                    entries.push(entry);
                }
                Ok(RawEntries(entries))
            }
        }

        deserializer.deserialize_map(RawEntriesVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_flag_names_the_entry() {
        let error = parse_mapping_payload(r#"{"t1": {"relational": "yes"}}"#).unwrap_err();
        assert_eq!(
            error.root(),
            &ConfigError::InvalidRelationalFlag {
                value: "yes".to_string()
            }
        );
        assert!(error.to_string().starts_with("entry 't1': "));
    }

    #[test]
    fn numeric_flag_is_rejected() {
        let error = parse_mapping_payload(r#"{"t1": {"relational": 1}}"#).unwrap_err();
        assert!(matches!(
            error.root(),
            ConfigError::InvalidRelationalFlag { value } if value == "1"
        ));
    }

    #[test]
    fn first_bad_flag_in_document_order_is_reported() {
        let error = parse_mapping_payload(
            r#"{"zeta": {"relational": "maybe"}, "alpha": {"relational": "nope"}}"#,
        )
        .unwrap_err();
        assert_eq!(
            error,
            ConfigError::InvalidRelationalFlag {
                value: "maybe".to_string()
            }
            .for_entry("zeta")
        );
    }

    #[test]
    fn unrelated_error_is_not_reported_as_a_flag() {
        let error = parse_mapping_payload(
            r#"{"t1": {"mapping": "not a list"}, "t2": {"relational": "yes"}}"#,
        )
        .unwrap_err();
        assert!(matches!(error, ConfigError::InvalidPayload { .. }));
    }

    #[test]
    fn malformed_json_is_invalid_payload() {
        let error = parse_mapping_payload("{not json").unwrap_err();
        assert!(matches!(error, ConfigError::InvalidPayload { .. }));
    }

    #[test]
    fn non_object_is_invalid_payload() {
        let error = parse_mapping_payload("[1, 2]").unwrap_err();
        assert!(matches!(error, ConfigError::InvalidPayload { .. }));
    }
}
