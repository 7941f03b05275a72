//! Merge configuration: merged class name -> original category ids.

use log::warn;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::path::Path;

use crate::error::Error;

/// A merge configuration loaded from a JSON object like
/// `{"Plastique": [1, 2, 3], "Verre": [4]}`. Groups keep their file order.
#[derive(Debug, Clone)]
pub struct MergeConfig {
    groups: Vec<(String, Vec<i64>)>,
}

impl MergeConfig {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let file = File::open(path).map_err(|source| Error::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_reader(file).map_err(|source| Error::ParseJson {
            path: path.to_path_buf(),
            source,
        })
    }

    /// All configured class names, in configuration order. Groups with no
    /// members are included; they produce empty datasets.
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(name, _)| name.as_str())
    }

    /// Build the lookup from original category id to merged class name.
    /// An id claimed by more than one group is a configuration problem;
    /// the later group wins and both are named in a warning.
    pub fn resolve(&self) -> HashMap<i64, String> {
        let mut merged_map: HashMap<i64, String> = HashMap::new();
        for (name, ids) in &self.groups {
            for &id in ids {
                if let Some(previous) = merged_map.insert(id, name.clone()) {
                    warn!(
                        "category id {} is claimed by both {:?} and {:?}; using {:?}",
                        id, previous, name, name
                    );
                }
            }
        }
        merged_map
    }
}

// Deserialized through a map visitor rather than a HashMap so that a
// duplicate group name fails the parse instead of silently overwriting.
impl<'de> Deserialize<'de> for MergeConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct GroupsVisitor;

        impl<'de> Visitor<'de> for GroupsVisitor {
            type Value = Vec<(String, Vec<i64>)>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of merged class name to a list of category ids")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut groups: Vec<(String, Vec<i64>)> = Vec::new();
                while let Some((name, ids)) = map.next_entry::<String, Vec<i64>>()? {
                    if groups.iter().any(|(existing, _)| *existing == name) {
                        return Err(de::Error::custom(format!(
                            "duplicate merge group name: {name:?}"
                        )));
                    }
                    groups.push((name, ids));
                }
                Ok(groups)
            }
        }

        let groups = deserializer.deserialize_map(GroupsVisitor)?;
        Ok(MergeConfig { groups })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_each_id_to_its_group() {
        let config: MergeConfig =
            serde_json::from_str(r#"{"Plastique": [1, 2, 3], "Verre": [4], "Vide": []}"#).unwrap();
        let merged_map = config.resolve();

        assert_eq!(merged_map.get(&1).map(String::as_str), Some("Plastique"));
        assert_eq!(merged_map.get(&3).map(String::as_str), Some("Plastique"));
        assert_eq!(merged_map.get(&4).map(String::as_str), Some("Verre"));
        assert_eq!(merged_map.get(&5), None);
        assert_eq!(config.class_names().count(), 3);
    }

    #[test]
    fn overlapping_ids_are_last_write_wins() {
        let config: MergeConfig =
            serde_json::from_str(r#"{"Metal": [5, 10], "Papier": [10]}"#).unwrap();
        let merged_map = config.resolve();

        assert_eq!(merged_map.get(&10).map(String::as_str), Some("Papier"));
        assert_eq!(merged_map.get(&5).map(String::as_str), Some("Metal"));
    }

    #[test]
    fn duplicate_group_name_fails_parse() {
        let result: Result<MergeConfig, _> =
            serde_json::from_str(r#"{"Bois": [0], "Bois": [11]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn non_numeric_id_fails_parse() {
        let result: Result<MergeConfig, _> = serde_json::from_str(r#"{"Bois": ["zero"]}"#);
        assert!(result.is_err());
    }
}
