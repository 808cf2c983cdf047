//! Manifest data model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::names::is_attribute_name;

/// A parsed component manifest.
///
/// Optional sections distinguish "absent" from "present but empty" at the
/// data level, but the `has_*` accessors treat both the same way: a section
/// with nothing in it is never rendered.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Manifest {
    /// Custom element name used to instantiate the component (required)
    pub tag: String,

    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Short description of the component
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Maintainer contact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<Publisher>,

    /// Source repository URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,

    /// Whether a documentation page exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<Documentation>,

    /// Usage example
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Example>,

    /// Attributes accepted by the element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<Attribute>>,

    /// Events dispatched by the element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<Event>>,

    /// Functions exposed on the element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub functions: Option<Vec<Function>>,
}

/// Maintainer of the component.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Publisher {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// The `documentation` field is either a flag or a URL.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Documentation {
    Flag(bool),
    Url(String),
}

impl Documentation {
    /// Whether the landing page should link to the documentation page.
    pub fn is_enabled(&self) -> bool {
        match self {
            Self::Flag(enabled) => *enabled,
            Self::Url(url) => !url.trim().is_empty(),
        }
    }
}

/// Example usage of the component.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Example {
    /// Attribute name to example value, in declaration order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Map<String, Value>>,
}

/// A single attribute of the element.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Attribute {
    pub name: String,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub schema: AttributeSchema,

    #[serde(default)]
    pub description: String,
}

/// Type information for an attribute.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct AttributeSchema {
    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub variants: Option<Vec<Value>>,
}

/// An event dispatched by the element.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Event {
    pub name: String,

    /// JSON-schema-like payload description
    #[serde(default)]
    pub schema: Value,

    #[serde(default)]
    pub description: String,
}

impl Event {
    /// The part of the schema shown in the payload viewer.
    ///
    /// Object schemas show their `properties`; anything else is shown whole.
    pub fn payload(&self) -> &Value {
        self.schema.get("properties").unwrap_or(&self.schema)
    }
}

/// A function exposed on the element.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Function {
    pub name: String,

    /// JSON-schema-like parameter description
    #[serde(default)]
    pub parameters: Value,

    #[serde(default)]
    pub description: String,
}

impl Function {
    /// The part of the description shown in the payload viewer.
    pub fn payload(&self) -> &Value {
        &self.parameters
    }
}

impl Manifest {
    /// Parse a manifest from YAML source.
    pub fn from_yaml(source: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(source)
    }

    /// Heading shown for the component: its name, falling back to the tag.
    pub fn title(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.tag)
    }

    /// Attributes, or an empty slice when absent.
    pub fn attributes(&self) -> &[Attribute] {
        self.attributes.as_deref().unwrap_or_default()
    }

    /// Events, or an empty slice when absent.
    pub fn events(&self) -> &[Event] {
        self.events.as_deref().unwrap_or_default()
    }

    /// Functions, or an empty slice when absent.
    pub fn functions(&self) -> &[Function] {
        self.functions.as_deref().unwrap_or_default()
    }

    pub fn has_attributes(&self) -> bool {
        !self.attributes().is_empty()
    }

    pub fn has_events(&self) -> bool {
        !self.events().is_empty()
    }

    pub fn has_functions(&self) -> bool {
        !self.functions().is_empty()
    }

    pub fn has_example(&self) -> bool {
        self.example
            .as_ref()
            .and_then(|e| e.attributes.as_ref())
            .is_some_and(|attrs| !attrs.is_empty())
    }

    /// Whether the landing page links to `/documentation`.
    pub fn links_documentation(&self) -> bool {
        self.documentation
            .as_ref()
            .is_some_and(Documentation::is_enabled)
    }

    /// Example attributes as `(name, value)` text pairs, in declaration order.
    ///
    /// String values are used verbatim; other JSON values are rendered as
    /// their JSON text. Names that are not valid attribute names are skipped.
    pub fn example_attributes(&self) -> Vec<(String, String)> {
        let Some(attrs) = self.example.as_ref().and_then(|e| e.attributes.as_ref()) else {
            return Vec::new();
        };

        attrs
            .iter()
            .filter(|(name, _)| {
                let valid = is_attribute_name(name);
                if !valid {
                    tracing::warn!("Skipping example attribute with invalid name {:?}", name);
                }
                valid
            })
            .map(|(name, value)| (name.clone(), value_to_text(value)))
            .collect()
    }
}

/// Render a JSON value as display text.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
