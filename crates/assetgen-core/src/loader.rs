//! Loading tag groups and thing classes from JSON files
//!
//! A definition file holds either one definition or an array of them.
//! Directory loads scan `*.json` files (non-recursive, sorted by file
//! name); a file that cannot be read or parsed is logged and skipped.

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

use crate::iot::{TagGroup, ThingClass};
use crate::registry::{TagGroupRegistry, ThingClassRegistry};

/// Errors raised while loading definition files.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid definition in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Outcome of a directory load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Definitions registered
    pub loaded: usize,
    /// Files skipped because they failed to load
    pub failed: Vec<PathBuf>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

fn read_definitions<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let parse_err = |source: serde_json::Error| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    };

    let value: serde_json::Value = serde_json::from_str(&content).map_err(parse_err)?;
    if value.is_array() {
        serde_json::from_value(value).map_err(parse_err)
    } else {
        Ok(vec![serde_json::from_value(value).map_err(parse_err)?])
    }
}

/// `*.json` files directly inside `dir`, sorted by path.
pub fn json_files(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    if !dir.is_dir() {
        return Err(LoadError::NotADirectory(dir.to_path_buf()));
    }
    let io_err = |source: std::io::Error| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn load_dir<T: DeserializeOwned>(
    dir: &Path,
    what: &str,
    mut register: impl FnMut(T),
) -> Result<LoadReport, LoadError> {
    let mut report = LoadReport::default();
    for path in json_files(dir)? {
        tracing::info!("Loading {}: {}", what, path.display());
        match read_definitions::<T>(&path) {
            Ok(definitions) => {
                report.loaded += definitions.len();
                definitions.into_iter().for_each(&mut register);
            }
            Err(e) => {
                tracing::error!("Unable to load {}: {}", what, e);
                report.failed.push(path);
            }
        }
    }
    Ok(report)
}

/// Register every tag group in one file.
pub fn load_tag_groups_from_file(
    registry: &TagGroupRegistry,
    path: &Path,
) -> Result<usize, LoadError> {
    let groups: Vec<TagGroup> = read_definitions(path)?;
    let count = groups.len();
    for group in groups {
        registry.register_tag_group(group);
    }
    Ok(count)
}

/// Register every thing class in one file.
pub fn load_thing_classes_from_file(
    registry: &ThingClassRegistry,
    path: &Path,
) -> Result<usize, LoadError> {
    let classes: Vec<ThingClass> = read_definitions(path)?;
    let count = classes.len();
    for class in classes {
        registry.register_thing_class(class);
    }
    Ok(count)
}

/// Register the tag groups of every `*.json` file in `dir`.
pub fn load_tag_groups_from_dir(
    registry: &TagGroupRegistry,
    dir: &Path,
) -> Result<LoadReport, LoadError> {
    load_dir(dir, "tag group", |group: TagGroup| {
        registry.register_tag_group(group)
    })
}

/// Register the thing classes of every `*.json` file in `dir`.
pub fn load_thing_classes_from_dir(
    registry: &ThingClassRegistry,
    dir: &Path,
) -> Result<LoadReport, LoadError> {
    load_dir(dir, "thing class", |class: ThingClass| {
        registry.register_thing_class(class)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TagGroupSource;
    use std::fs;

    const TEMPERATURE: &str = r#"{
        "name": "Temperature", "context": "ctx", "version": "v1",
        "tags": [{"name": "value", "kind": "FLOAT32", "unit": "C"}]
    }"#;

    #[test]
    fn test_single_and_array_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.json"), TEMPERATURE).unwrap();
        fs::write(
            dir.path().join("b.json"),
            r#"[
                {"name": "Pressure", "context": "ctx", "version": "v1", "tags": []},
                {"name": "Flow", "context": "ctx", "version": "v1", "tags": []}
            ]"#,
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let registry = TagGroupRegistry::new();
        let report = load_tag_groups_from_dir(&registry, dir.path()).unwrap();
        assert_eq!(report.loaded, 3);
        assert!(report.is_clean());
        assert!(registry.find_tag_group("Flow:ctx:v1").is_ok());
    }

    #[test]
    fn test_bad_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
        fs::write(dir.path().join("good.json"), TEMPERATURE).unwrap();

        let registry = TagGroupRegistry::new();
        let report = load_tag_groups_from_dir(&registry, dir.path()).unwrap();
        assert_eq!(report.loaded, 1);
        assert_eq!(report.failed, vec![dir.path().join("broken.json")]);
    }

    #[test]
    fn test_thing_classes_sorted_by_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("2-valve.json"),
            r#"{"name": "Valve", "context": "plant"}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("1-pump.json"),
            r#"{"name": "Pump", "context": "plant", "outputs": [{"name": "t", "tagGroupId": "T:ctx:v1"}]}"#,
        )
        .unwrap();

        let registry = ThingClassRegistry::new();
        load_thing_classes_from_dir(&registry, dir.path()).unwrap();
        let names: Vec<String> = registry.list().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Pump", "Valve"]);
    }

    #[test]
    fn test_missing_directory() {
        let registry = TagGroupRegistry::new();
        let err = load_tag_groups_from_dir(&registry, Path::new("/nonexistent/assetgen")).unwrap_err();
        assert!(matches!(err, LoadError::NotADirectory(_)));
    }

    #[test]
    fn test_tag_groups_from_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("temperature.json");
        fs::write(&path, TEMPERATURE).unwrap();

        let registry = TagGroupRegistry::new();
        assert_eq!(load_tag_groups_from_file(&registry, &path).unwrap(), 1);
        let group = registry.find_tag_group("Temperature:ctx:v1").unwrap();
        assert_eq!(group.tags()[0].name, "value");

        let err = load_tag_groups_from_file(&registry, &dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_single_file_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("thing.json");
        fs::write(&path, r#"{"context": "missing name"}"#).unwrap();
        let registry = ThingClassRegistry::new();
        let err = load_thing_classes_from_file(&registry, &path).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }
}
