use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};

use datastd_map::{JoinKeys, attach_join_key, extract_join_keys};
use datastd_model::{ConfigError, MappingRule, StandardizeError};

fn keyed(source: &str, target: &str, source_key: &str, target_key: &str) -> MappingRule {
    MappingRule::new(source, target).with_keys(source_key, target_key)
}

#[test]
fn single_key_pair_is_returned() {
    let rules = vec![
        keyed("pid", "person_id", "pid", "person_id"),
        MappingRule::new("nm", "name"),
        keyed("age", "age", "pid", "person_id"),
    ];

    let keys = extract_join_keys(&rules).unwrap();

    assert_eq!(
        keys,
        JoinKeys {
            source_key: "pid".to_string(),
            target_key: "person_id".to_string(),
        }
    );
}

#[test]
fn same_name_on_both_sides() {
    let rules = vec![keyed("id", "id", "id", "id")];
    let keys = extract_join_keys(&rules).unwrap();
    assert_eq!(keys.source_key, "id");
    assert_eq!(keys.target_key, "id");
}

#[test]
fn multiple_source_keys_are_ambiguous() {
    let rules = vec![keyed("a", "a", "id", "id"), keyed("b", "b", "uid", "id")];

    let error = extract_join_keys(&rules).unwrap_err();

    assert_eq!(
        error,
        ConfigError::AmbiguousJoinKeys {
            source_keys: vec!["id".to_string(), "uid".to_string()],
            target_keys: vec!["id".to_string()],
        }
    );
}

#[test]
fn multiple_target_keys_are_ambiguous() {
    let rules = vec![keyed("a", "a", "id", "id"), keyed("b", "b", "id", "uid")];
    assert!(matches!(
        extract_join_keys(&rules),
        Err(ConfigError::AmbiguousJoinKeys { .. })
    ));
}

#[test]
fn missing_or_empty_keys_fail() {
    let rules = vec![MappingRule::new("a", "a"), keyed("b", "b", "", "")];
    assert_eq!(
        extract_join_keys(&rules),
        Err(ConfigError::AmbiguousJoinKeys {
            source_keys: vec![],
            target_keys: vec![],
        })
    );
    assert!(extract_join_keys(&[]).is_err());
}

#[test]
fn attach_copies_source_key_when_unmapped() {
    let source = DataFrame::new(vec![
        Series::new("pid".into(), vec![1i64, 2]).into_column(),
        Series::new("nm".into(), vec!["a", "b"]).into_column(),
    ])
    .unwrap();
    let mapped = DataFrame::new(vec![
        Series::new("name".into(), vec!["a", "b"]).into_column(),
    ])
    .unwrap();
    let keys = JoinKeys {
        source_key: "pid".to_string(),
        target_key: "person_id".to_string(),
    };

    let attached = attach_join_key(mapped, &source, &keys, "patients").unwrap();

    let names: Vec<String> = attached
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    assert_eq!(names, vec!["name", "person_id"]);
    let ids = attached.column("person_id").unwrap().i64().unwrap();
    assert_eq!(ids.get(1), Some(2));
}

#[test]
fn attach_keeps_mapped_key() {
    let source = DataFrame::new(vec![Series::new("pid".into(), vec![1i64]).into_column()]).unwrap();
    let mapped =
        DataFrame::new(vec![Series::new("person_id".into(), vec![9i64]).into_column()]).unwrap();
    let keys = JoinKeys {
        source_key: "pid".to_string(),
        target_key: "person_id".to_string(),
    };

    let attached = attach_join_key(mapped, &source, &keys, "patients").unwrap();

    assert_eq!(attached.width(), 1);
    assert_eq!(
        attached.column("person_id").unwrap().i64().unwrap().get(0),
        Some(9)
    );
}

#[test]
fn attach_fails_without_source_key() {
    let source = DataFrame::new(vec![Series::new("other".into(), vec![1i64]).into_column()]).unwrap();
    let mapped = DataFrame::new(vec![Series::new("x".into(), vec![1i64]).into_column()]).unwrap();
    let keys = JoinKeys {
        source_key: "pid".to_string(),
        target_key: "person_id".to_string(),
    };

    let error = attach_join_key(mapped, &source, &keys, "patients").unwrap_err();

    assert!(matches!(
        error,
        StandardizeError::Config(ConfigError::MissingSourceKey { ref source_key, ref source_table })
            if source_key == "pid" && source_table == "patients"
    ));
}
