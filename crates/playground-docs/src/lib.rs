//! Markdown documentation renderer.
//!
//! Converts a component's documentation source into embeddable HTML:
//! fenced code blocks are syntax highlighted and every heading receives a
//! stable anchor so sections can be deep-linked.

pub mod codeblock;
pub mod renderer;

pub use codeblock::{highlight, render_code_block, DocRenderError};
pub use renderer::{render_docs, render_document, slugify, RenderedDoc, TocEntry};
