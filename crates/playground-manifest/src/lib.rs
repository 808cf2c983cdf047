//! Component manifest model for the playground.
//!
//! The manifest is a YAML description of a custom element: its tag name,
//! display metadata, attributes, events, functions and a usage example.
//! Every page the playground serves is derived from it.

pub mod loader;
pub mod model;
pub mod names;
pub mod placeholders;

pub use loader::{load, ManifestLoadError};
pub use model::{
    Attribute, AttributeSchema, Documentation, Event, Example, Function, Manifest, Publisher,
};
pub use names::{is_attribute_name, is_custom_element_name};
pub use placeholders::{substitute_placeholders, Endpoints};
