//! Writing asset model documents
//!
//! Each thing class produces `<root>/<context>/<name>.json`. Things are
//! mapped independently: a hard failure for one thing is recorded in the
//! summary and the run carries on with the next.

use std::path::{Component, Path, PathBuf};

use crate::document::{AssetModel, DocumentError};
use crate::iot::ThingClass;
use crate::mapper::{MapperConfig, MappingError, ThingMapper};
use crate::registry::{TagGroupSource, ThingClassSource};

/// Errors raised while exporting a document.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Unsafe output path for thing class '{thing}': {path}")]
    UnsafePath { thing: String, path: String },

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Output location of a thing class document below `root`.
///
/// The context is treated as a relative namespace path; absolute paths and
/// `..` components are rejected, as are names containing separators.
pub fn export_path(root: &Path, thing: &ThingClass) -> Result<PathBuf, ExportError> {
    let unsafe_path = || ExportError::UnsafePath {
        thing: thing.name.clone(),
        path: format!("{}/{}.json", thing.context, thing.name),
    };

    let context = Path::new(&thing.context);
    if !context
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return Err(unsafe_path());
    }
    if thing.name.is_empty() || thing.name.contains(['/', '\\']) || thing.name == ".." {
        return Err(unsafe_path());
    }

    Ok(root.join(context).join(format!("{}.json", thing.name)))
}

/// Write a document for `thing`, creating parent directories as needed.
pub fn write_asset_model(
    root: &Path,
    thing: &ThingClass,
    model: &AssetModel,
    pretty: bool,
) -> Result<PathBuf, ExportError> {
    let path = export_path(root, thing)?;
    let json = model.to_json(pretty)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ExportError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(&path, json).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;

    tracing::info!("Wrote asset model {} to {}", model.name, path.display());
    Ok(path)
}

/// Result of exporting one thing class.
#[derive(Debug)]
pub struct ExportOutcome {
    pub thing: String,
    pub result: Result<PathBuf, ExportError>,
}

/// Summary of an export run.
#[derive(Debug, Default)]
pub struct ExportSummary {
    pub outcomes: Vec<ExportOutcome>,
}

impl ExportSummary {
    pub fn written(&self) -> impl Iterator<Item = &PathBuf> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &ExportError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.thing.as_str(), e)))
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}

/// Options for [`generate_all`].
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub mapper: MapperConfig,
    pub pretty: bool,
}

/// Map and write every thing class in `things`.
pub fn generate_all<T, S>(
    things: &T,
    tag_groups: &S,
    root: &Path,
    options: &ExportOptions,
) -> ExportSummary
where
    T: ThingClassSource + ?Sized,
    S: TagGroupSource + ?Sized,
{
    let mapper = ThingMapper::with_config(tag_groups, options.mapper);
    let mut summary = ExportSummary::default();

    for thing in things.thing_classes() {
        let result = mapper
            .map_thing(&thing)
            .map_err(ExportError::from)
            .and_then(|model| write_asset_model(root, &thing, &model, options.pretty));
        if let Err(e) = &result {
            tracing::error!("Failed to export thing class {}: {}", thing.name, e);
        }
        summary.outcomes.push(ExportOutcome {
            thing: thing.name,
            result,
        });
    }
    summary
}
