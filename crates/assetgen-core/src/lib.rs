//! Asset Model Generation Crate
//!
//! Converts thing classes discovered in an IoT metadata registry into asset
//! model documents for a cloud asset-modeling service.
//!
//! ## Architecture
//!
//! - **projection**: native tag type -> output data type (or unsupported)
//! - **resolver**: tag group lookup with bounded fixed-delay retry
//! - **mapper**: tag -> measurement, thing class -> asset model
//! - **document**: asset model document and its JSON encoding
//! - **registry** / **loader**: in-memory registries and JSON file loading
//! - **export**: writes one document per thing class
//!
//! ```rust
//! use assetgen_core::{
//!     IotType, MapperConfig, RetryPolicy, Tag, TagGroup, TagGroupRegistry, ThingClass,
//!     ThingMapper,
//! };
//!
//! let tag_groups = TagGroupRegistry::new();
//! tag_groups.register_tag_group(
//!     TagGroup::new("Temperature", "com.example", "v1.0")
//!         .with_tag(Tag::new("value", IotType::Float32).with_unit("C")),
//! );
//!
//! let thing = ThingClass::new("Pump1", "plant")
//!     .with_description("A pump")
//!     .with_output("temperature", "Temperature:com.example:v1.0");
//!
//! let config = MapperConfig::default().with_retry(RetryPolicy::immediate(1));
//! let model = ThingMapper::with_config(&tag_groups, config).map_thing(&thing).unwrap();
//! assert_eq!(model.properties[2].name, "temperature_value");
//! ```

pub mod config;
pub mod document;
pub mod export;
pub mod iot;
pub mod loader;
pub mod mapper;
pub mod projection;
pub mod registry;
pub mod resolver;

pub use document::{
    AssetModel, DocumentError, MetricWindow, ModelHierarchy, ModelProperty, ModelVariable,
    PropertyType, VariableValue,
};
pub use export::{
    export_path, generate_all, write_asset_model, ExportError, ExportOptions, ExportOutcome,
    ExportSummary,
};
pub use iot::{IotType, OutputTagGroup, Tag, TagGroup, ThingClass, TypeDefinition};
pub use loader::{
    load_tag_groups_from_dir, load_tag_groups_from_file, load_thing_classes_from_dir,
    load_thing_classes_from_file, LoadError, LoadReport,
};
pub use mapper::{
    map_tag, map_thing, MapperConfig, MappingError, ThingMapper, UnsupportedTagPolicy,
    FIXED_ATTRIBUTES,
};
pub use projection::{project, OutputDataType};
pub use registry::{
    RegistryError, TagGroupRegistry, TagGroupSource, ThingClassRegistry, ThingClassSource,
};
pub use resolver::{resolve, RetryPolicy, TagGroupResolver};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
