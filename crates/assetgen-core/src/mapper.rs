//! Thing class to asset model mapping
//!
//! Every document starts with two fixed attributes (`contextId`,
//! `description`), followed by one measurement per tag of each resolved
//! output tag group, in declaration order. Measurement names are
//! `{output name}_{tag name}`.

use crate::document::{AssetModel, ModelProperty};
use crate::iot::{OutputTagGroup, Tag, ThingClass};
use crate::projection::{project, OutputDataType};
use crate::registry::{RegistryError, TagGroupSource};
use crate::resolver::{RetryPolicy, TagGroupResolver};

/// Property names always present at the head of a document.
pub const FIXED_ATTRIBUTES: [&str; 2] = ["contextId", "description"];

/// What to do with tags whose native type has no output type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnsupportedTagPolicy {
    /// Leave the tag out of the document
    #[default]
    Drop,
    /// Emit the measurement with a null `dataType`
    Keep,
}

/// Mapper settings: tag group retry budget and unsupported tag handling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MapperConfig {
    pub retry: RetryPolicy,
    pub unsupported: UnsupportedTagPolicy,
}

impl MapperConfig {
    /// Replace the tag group lookup policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replace the unsupported tag policy.
    pub fn with_unsupported(mut self, unsupported: UnsupportedTagPolicy) -> Self {
        self.unsupported = unsupported;
        self
    }
}

/// Mapping failures. Only hard registry errors end up here; tag groups that
/// never resolve are skipped.
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    #[error("Failed to resolve tag group '{tag_group}' for thing class '{thing}': {source}")]
    Registry {
        thing: String,
        tag_group: String,
        #[source]
        source: RegistryError,
    },
}

/// Map one tag onto a measurement named `{prefix}{tag name}`.
///
/// The measurement is built even when the native type is unsupported; its
/// `data_type` is then `None`.
pub fn map_tag(prefix: &str, tag: &Tag) -> ModelProperty {
    ModelProperty::measurement(
        format!("{}{}", prefix, tag.name),
        project(tag.kind),
        tag.unit.clone(),
    )
}

fn fixed_attributes() -> Vec<ModelProperty> {
    FIXED_ATTRIBUTES
        .iter()
        .map(|name| {
            ModelProperty::attribute(*name, OutputDataType::String, Some(String::new()), "")
        })
        .collect()
}

/// Maps thing classes against a tag group registry.
pub struct ThingMapper<'a, S: TagGroupSource + ?Sized> {
    resolver: TagGroupResolver<'a, S>,
    unsupported: UnsupportedTagPolicy,
}

impl<'a, S: TagGroupSource + ?Sized> ThingMapper<'a, S> {
    pub fn new(tag_groups: &'a S) -> Self {
        Self::with_config(tag_groups, MapperConfig::default())
    }

    pub fn with_config(tag_groups: &'a S, config: MapperConfig) -> Self {
        Self {
            resolver: TagGroupResolver::new(tag_groups, config.retry),
            unsupported: config.unsupported,
        }
    }

    /// Measurements contributed by one output tag group.
    ///
    /// Returns an empty list when the tag group never resolves.
    pub fn map_output_tag_group(
        &self,
        output: &OutputTagGroup,
    ) -> Result<Vec<ModelProperty>, RegistryError> {
        let tag_group = match self.resolver.resolve(&output.tag_group_id)? {
            Some(tag_group) => tag_group,
            None => return Ok(Vec::new()),
        };

        let prefix = format!("{}_", output.name);
        let mut properties = Vec::with_capacity(tag_group.tags().len());
        for tag in tag_group.tags() {
            let property = map_tag(&prefix, tag);
            if !property.is_supported() && self.unsupported == UnsupportedTagPolicy::Drop {
                tracing::warn!(
                    tag_group = %output.tag_group_id,
                    tag = %tag.name,
                    kind = %tag.kind,
                    "Dropping tag with unsupported type"
                );
                continue;
            }
            properties.push(property);
        }
        Ok(properties)
    }

    /// Build the asset model for a thing class.
    pub fn map_thing(&self, thing: &ThingClass) -> Result<AssetModel, MappingError> {
        let mut properties = fixed_attributes();
        for output in &thing.outputs {
            let mapped = self
                .map_output_tag_group(output)
                .map_err(|source| MappingError::Registry {
                    thing: thing.name.clone(),
                    tag_group: output.tag_group_id.clone(),
                    source,
                })?;
            properties.extend(mapped);
        }

        tracing::debug!(
            thing_class = %thing.name,
            properties = properties.len(),
            "Mapped thing class"
        );

        Ok(AssetModel {
            name: thing.name.clone(),
            description: thing.description.clone(),
            properties,
            hierarchies: Vec::new(),
        })
    }
}

/// Map a thing class with the default configuration.
pub fn map_thing<S: TagGroupSource + ?Sized>(
    thing: &ThingClass,
    tag_groups: &S,
) -> Result<AssetModel, MappingError> {
    ThingMapper::new(tag_groups).map_thing(thing)
}
