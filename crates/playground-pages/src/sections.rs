//! View-models for the landing page sections.
//!
//! Each section is built from the manifest and is empty when the backing
//! data is absent or empty, in which case the templates omit it entirely.

use serde::Serialize;
use serde_json::Value;

use playground_manifest::model::value_to_text;
use playground_manifest::{Attribute, Event, Function, Manifest};

/// Suffix appended to the name of a required attribute.
pub const REQUIRED_MARKER: &str = " *";

/// Everything the landing page shows.
#[derive(Debug, Clone, Serialize)]
pub struct LandingSections {
    pub title: TitleBlock,
    pub example: Option<ExampleSnippet>,
    pub attributes: Vec<AttributeRow>,
    pub events: Vec<PayloadRow>,
    pub functions: Vec<PayloadRow>,
}

impl LandingSections {
    pub fn from_manifest(manifest: &Manifest) -> Self {
        Self {
            title: TitleBlock::from_manifest(manifest),
            example: ExampleSnippet::from_manifest(manifest),
            attributes: manifest.attributes().iter().map(AttributeRow::from).collect(),
            events: manifest.events().iter().map(PayloadRow::from).collect(),
            functions: manifest.functions().iter().map(PayloadRow::from).collect(),
        }
    }
}

/// Heading and metadata rows of the title block.
#[derive(Debug, Clone, Serialize)]
pub struct TitleBlock {
    pub heading: String,
    pub tag: String,
    pub rows: Vec<TitleRow>,
}

/// A `label: value` row in the title block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleRow {
    pub label: &'static str,
    pub value: String,
    /// Link target, when the value is a link
    pub href: Option<String>,
    /// Open the link in a new tab
    pub external: bool,
}

impl TitleBlock {
    pub fn from_manifest(manifest: &Manifest) -> Self {
        let mut rows = Vec::new();

        if let Some(description) = non_blank(manifest.description.as_deref()) {
            rows.push(TitleRow::text("Description", description));
        }

        if let Some(publisher) = &manifest.publisher {
            if let Some(name) = non_blank(publisher.name.as_deref()) {
                rows.push(TitleRow::text("Maintainer", name));
            }
            if let Some(email) = non_blank(publisher.email.as_deref()) {
                rows.push(TitleRow::text("Contact", email));
            }
        }

        if let Some(repository) = non_blank(manifest.repository.as_deref()) {
            rows.push(TitleRow {
                label: "Repository",
                value: repository.to_string(),
                href: Some(repository.to_string()),
                external: true,
            });
        }

        if manifest.links_documentation() {
            rows.push(TitleRow {
                label: "Documentation",
                value: "Link".to_string(),
                href: Some("/documentation".to_string()),
                external: false,
            });
        }

        Self {
            heading: manifest.title().to_string(),
            tag: manifest.tag.clone(),
            rows,
        }
    }
}

impl TitleRow {
    fn text(label: &'static str, value: &str) -> Self {
        Self {
            label,
            value: value.to_string(),
            href: None,
            external: false,
        }
    }
}

/// Sample usage of the element built from the example attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExampleSnippet {
    pub tag: String,
    pub attributes: Vec<ExampleAttribute>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExampleAttribute {
    pub name: String,
    pub value: String,
}

impl ExampleSnippet {
    /// `None` when the manifest has no example attributes.
    pub fn from_manifest(manifest: &Manifest) -> Option<Self> {
        if !manifest.has_example() {
            return None;
        }

        Some(Self {
            tag: manifest.tag.clone(),
            attributes: manifest
                .example_attributes()
                .into_iter()
                .map(|(name, value)| ExampleAttribute { name, value })
                .collect(),
        })
    }

    /// Plain-text markup of the snippet, as a user would paste it.
    pub fn to_markup(&self) -> String {
        let mut markup = String::new();
        markup.push_str("<!-- Load the frontend bundle -->\n");
        markup.push_str("<script type=\"module\" src=\"path/to/index.js\"></script>\n\n");
        markup.push_str("<!-- Use the component's tag -->\n");
        markup.push('<');
        markup.push_str(&self.tag);
        for attr in &self.attributes {
            markup.push_str(&format!("\n  {}=\"{}\"", attr.name, attr.value));
        }
        markup.push_str(&format!("\n></{}>", self.tag));
        markup
    }
}

/// A row of the attributes table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeRow {
    pub name: String,
    pub required: bool,
    /// Name as displayed, with the required marker when applicable
    pub label: String,
    pub kind: String,
    pub variants: Vec<String>,
    pub description: String,
}

impl From<&Attribute> for AttributeRow {
    fn from(attr: &Attribute) -> Self {
        let label = if attr.required {
            format!("{}{}", attr.name, REQUIRED_MARKER)
        } else {
            attr.name.clone()
        };

        Self {
            name: attr.name.clone(),
            required: attr.required,
            label,
            kind: attr.schema.kind.clone(),
            variants: attr
                .schema
                .variants
                .iter()
                .flatten()
                .map(value_to_text)
                .collect(),
            description: attr.description.clone(),
        }
    }
}

/// A row of the events or functions table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayloadRow {
    pub name: String,
    /// Pretty-printed JSON shown in the collapsible payload cell
    pub payload: String,
    pub description: String,
}

impl PayloadRow {
    fn new(name: &str, payload: &Value, description: &str) -> Self {
        Self {
            name: name.to_string(),
            payload: pretty_json(payload),
            description: description.to_string(),
        }
    }
}

impl From<&Event> for PayloadRow {
    fn from(event: &Event) -> Self {
        Self::new(&event.name, event.payload(), &event.description)
    }
}

impl From<&Function> for PayloadRow {
    fn from(function: &Function) -> Self {
        Self::new(&function.name, function.payload(), &function.description)
    }
}

fn pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
