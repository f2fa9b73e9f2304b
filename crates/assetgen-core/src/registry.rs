//! Metadata registries
//!
//! Lookup interfaces for tag groups and thing classes, plus thread-safe
//! in-memory implementations. Registries are passed explicitly to the
//! mapper so independent runs never share state.
//!
//! A discovery process may keep registering definitions from another
//! thread while a mapping pass reads the registry:
//! ```rust
//! use std::sync::Arc;
//! use assetgen_core::{IotType, Tag, TagGroup, TagGroupRegistry, TagGroupSource};
//!
//! let registry = Arc::new(TagGroupRegistry::new());
//! let writer = Arc::clone(&registry);
//! std::thread::spawn(move || {
//!     writer.register_tag_group(
//!         TagGroup::new("Temperature", "com.example", "v1.0")
//!             .with_tag(Tag::new("value", IotType::Float32)),
//!     );
//! })
//! .join()
//! .unwrap();
//!
//! assert!(registry.find_tag_group("Temperature:com.example:v1.0").is_ok());
//! ```

use parking_lot::RwLock;
use std::collections::HashMap;

use crate::iot::{TagGroup, ThingClass};

/// Source of tag group definitions.
pub trait TagGroupSource: Send + Sync {
    /// Find a tag group by its `name:context:version` identifier.
    ///
    /// Fails with [`RegistryError::InvalidReference`] when the tag group
    /// has not been discovered (yet).
    fn find_tag_group(&self, id: &str) -> Result<TagGroup, RegistryError>;
}

/// Source of discovered thing classes.
pub trait ThingClassSource: Send + Sync {
    /// All thing classes in discovery order.
    fn thing_classes(&self) -> Vec<ThingClass>;
}

impl<T: TagGroupSource + ?Sized> TagGroupSource for std::sync::Arc<T> {
    fn find_tag_group(&self, id: &str) -> Result<TagGroup, RegistryError> {
        (**self).find_tag_group(id)
    }
}

impl<T: ThingClassSource + ?Sized> ThingClassSource for std::sync::Arc<T> {
    fn thing_classes(&self) -> Vec<ThingClass> {
        (**self).thing_classes()
    }
}

/// Registry lookup errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The referenced definition is not known to the registry
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// The registry cannot serve lookups right now
    #[error("Registry unavailable: {0}")]
    Unavailable(String),

    #[error("Registry error: {0}")]
    Other(String),
}

impl RegistryError {
    /// Whether the lookup may succeed later once discovery catches up.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::InvalidReference(_))
    }
}

/// In-memory tag group registry keyed by tag group identifier.
#[derive(Debug, Default)]
pub struct TagGroupRegistry {
    tag_groups: RwLock<HashMap<String, TagGroup>>,
}

impl TagGroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tag group, replacing any previous definition with the same id.
    pub fn register_tag_group(&self, tag_group: TagGroup) {
        let id = tag_group.id();
        tracing::debug!(tag_group = %id, "Registered tag group");
        self.tag_groups.write().insert(id, tag_group);
    }

    pub fn get(&self, id: &str) -> Option<TagGroup> {
        self.tag_groups.read().get(id).cloned()
    }

    /// All tag groups, sorted by identifier.
    pub fn list(&self) -> Vec<TagGroup> {
        let mut groups: Vec<TagGroup> = self.tag_groups.read().values().cloned().collect();
        groups.sort_by_key(|g| g.id());
        groups
    }

    pub fn len(&self) -> usize {
        self.tag_groups.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tag_groups.read().is_empty()
    }
}

impl TagGroupSource for TagGroupRegistry {
    fn find_tag_group(&self, id: &str) -> Result<TagGroup, RegistryError> {
        self.get(id)
            .ok_or_else(|| RegistryError::InvalidReference(id.to_string()))
    }
}

/// In-memory thing class registry preserving registration order.
#[derive(Debug, Default)]
pub struct ThingClassRegistry {
    thing_classes: RwLock<Vec<ThingClass>>,
}

impl ThingClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a thing class. A class with the same name and context is
    /// replaced in place.
    pub fn register_thing_class(&self, thing_class: ThingClass) {
        let mut classes = self.thing_classes.write();
        match classes
            .iter_mut()
            .find(|c| c.name == thing_class.name && c.context == thing_class.context)
        {
            Some(existing) => *existing = thing_class,
            None => {
                tracing::debug!(thing_class = %thing_class.name, "Registered thing class");
                classes.push(thing_class);
            }
        }
    }

    /// Find a thing class by name.
    pub fn find(&self, name: &str) -> Option<ThingClass> {
        self.thing_classes
            .read()
            .iter()
            .find(|c| c.name == name)
            .cloned()
    }

    pub fn list(&self) -> Vec<ThingClass> {
        self.thing_classes.read().clone()
    }

    pub fn len(&self) -> usize {
        self.thing_classes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.thing_classes.read().is_empty()
    }
}

impl ThingClassSource for ThingClassRegistry {
    fn thing_classes(&self) -> Vec<ThingClass> {
        self.list()
    }
}
