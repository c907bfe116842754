//! Mapping payload types.
//!
//! A mapping payload is a JSON object keyed by source table identifier. Each
//! entry names where the mapped data goes and lists the column rules:
//!
//! ```json
//! {
//!   "patients.csv": {
//!     "schema": "std",
//!     "tablename": "person",
//!     "relational": "True",
//!     "mapping": [
//!       {"source_column": "pid", "target_column": "person_id",
//!        "source_key": "pid", "target_key": "person_id"}
//!     ]
//!   }
//! }
//! ```
//!
//! Entry order is significant (it fixes summary order and merge precedence),
//! so [`MappingPayload`] keeps entries in document order.

use std::fmt;

use serde::de::{self, MapAccess, Unexpected, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ConfigError;

/// Binds one source column to one target column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRule {
    pub source_column: String,
    pub target_column: String,
    /// Source-side join column, only meaningful for relational entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_key: Option<String>,
    /// Target-side join column, only meaningful for relational entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_key: Option<String>,
}

impl MappingRule {
    pub fn new(source_column: impl Into<String>, target_column: impl Into<String>) -> Self {
        Self {
            source_column: source_column.into(),
            target_column: target_column.into(),
            source_key: None,
            target_key: None,
        }
    }

    /// Tag the rule with the join key pair.
    #[must_use]
    pub fn with_keys(mut self, source_key: impl Into<String>, target_key: impl Into<String>) -> Self {
        self.source_key = Some(source_key.into());
        self.target_key = Some(target_key.into());
        self
    }
}

/// How an entry's mapped rows combine with other entries for the same target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MappingMode {
    /// Rows are stacked under rows from other entries.
    #[default]
    Independent,
    /// Rows are outer-joined with other entries on a shared key.
    Relational,
}

impl MappingMode {
    /// What a `relational` flag may hold, as quoted in deserialization errors.
    pub const EXPECTED: &'static str = "a boolean or the string \"True\" or \"False\"";

    /// Parse the textual `relational` flag (`"True"` / `"False"`, any case).
    pub fn parse_flag(value: &str) -> Result<Self, ConfigError> {
        match value.trim() {
            v if v.eq_ignore_ascii_case("true") => Ok(Self::Relational),
            v if v.eq_ignore_ascii_case("false") => Ok(Self::Independent),
            other => Err(ConfigError::InvalidRelationalFlag {
                value: other.to_string(),
            }),
        }
    }

    pub fn is_relational(self) -> bool {
        matches!(self, Self::Relational)
    }
}

impl From<bool> for MappingMode {
    fn from(relational: bool) -> Self {
        if relational {
            Self::Relational
        } else {
            Self::Independent
        }
    }
}

impl fmt::Display for MappingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Independent => f.write_str("independent"),
            Self::Relational => f.write_str("relational"),
        }
    }
}

impl Serialize for MappingMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(self.is_relational())
    }
}

struct MappingModeVisitor;

impl Visitor<'_> for MappingModeVisitor {
    type Value = MappingMode;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(MappingMode::EXPECTED)
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
        Ok(MappingMode::from(value))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        MappingMode::parse_flag(value).map_err(|_| E::invalid_value(Unexpected::Str(value), &self))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(MappingMode::Independent)
    }
}

impl<'de> Deserialize<'de> for MappingMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MappingModeVisitor)
    }
}

/// Options for one source table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryConfig {
    /// Schema the source table is read from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_schema: Option<String>,
    /// Target schema override.
    #[serde(default, rename = "schema", skip_serializing_if = "Option::is_none")]
    pub target_schema: Option<String>,
    /// Target table override.
    #[serde(default, rename = "tablename", skip_serializing_if = "Option::is_none")]
    pub target_table: Option<String>,
    #[serde(default, rename = "relational")]
    pub mode: MappingMode,
    #[serde(default)]
    pub mapping: Vec<MappingRule>,
}

/// One named entry of a [`MappingPayload`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    /// Source identifier as written in the payload (may carry a file suffix).
    pub name: String,
    pub config: EntryConfig,
}

/// The full mapping document, entries in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingPayload {
    entries: Vec<MappingEntry>,
}

impl MappingPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. A repeated name replaces the earlier config in place.
    pub fn insert(&mut self, name: impl Into<String>, config: EntryConfig) {
        let name = name.into();
        match self.entries.iter_mut().find(|entry| entry.name == name) {
            Some(existing) => existing.config = config,
            None => self.entries.push(MappingEntry { name, config }),
        }
    }

    /// Builder form of [`Self::insert`].
    #[must_use]
    pub fn with_entry(mut self, name: impl Into<String>, config: EntryConfig) -> Self {
        self.insert(name, config);
        self
    }

    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &MappingEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for MappingPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.name, &entry.config)?;
        }
        map.end()
    }
}

struct PayloadVisitor;

impl<'de> Visitor<'de> for PayloadVisitor {
    type Value = MappingPayload;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object mapping source tables to mapping entries")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut payload = MappingPayload::new();
        while let Some((name, config)) = access.next_entry::<String, EntryConfig>()? {
            payload.insert(name, config);
        }
        Ok(payload)
    }
}

impl<'de> Deserialize<'de> for MappingPayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(PayloadVisitor)
    }
}

/// Run-level fallbacks for entries that omit their target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunDefaults {
    pub schema: Option<String>,
    pub table: Option<String>,
}

impl RunDefaults {
    pub fn new(schema: Option<String>, table: Option<String>) -> Self {
        Self { schema, table }
    }

    /// Resolve where an entry's rows go. Empty overrides fall back to the defaults.
    pub fn resolve(&self, config: &EntryConfig) -> Result<TargetRef, ConfigError> {
        let schema = non_empty(config.target_schema.as_deref()).or(non_empty(self.schema.as_deref()));
        let table = non_empty(config.target_table.as_deref()).or(non_empty(self.table.as_deref()));
        match (schema, table) {
            (Some(schema), Some(table)) => Ok(TargetRef::new(schema, table)),
            _ => Err(ConfigError::MissingTarget),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// A destination table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetRef {
    pub schema: String,
    pub table: String,
}

impl TargetRef {
    pub fn new(schema: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
        }
    }

    /// Batch key, `"{schema}.{table}"`.
    pub fn key(&self) -> String {
        format!("{}.{}", self.schema, self.table)
    }
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.table)
    }
}

/// Display name of a relation, schema-qualified when a schema is given.
pub fn qualified_name(schema: Option<&str>, table: &str) -> String {
    match schema {
        Some(schema) if !schema.is_empty() => format!("{schema}.{table}"),
        _ => table.to_string(),
    }
}
