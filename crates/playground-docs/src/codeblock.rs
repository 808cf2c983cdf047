//! Code block highlighting.

use std::sync::OnceLock;

use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

/// Class prefix for highlighted tokens, shared with the page stylesheet.
const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hljs-" };

static SYNTAXES: OnceLock<SyntaxSet> = OnceLock::new();

fn syntax_set() -> &'static SyntaxSet {
    SYNTAXES.get_or_init(SyntaxSet::load_defaults_newlines)
}

/// Errors raised while highlighting a single code block.
///
/// These never escape the renderer: the block falls back to plain text.
#[derive(Debug, thiserror::Error)]
pub enum DocRenderError {
    #[error("Unknown code block language: {0}")]
    UnknownLanguage(String),

    #[error("Failed to highlight {language} block: {message}")]
    Highlight { language: String, message: String },
}

/// Extract the language from a code fence info string.
///
/// Only the first word counts: `ts title="x"` is TypeScript.
pub fn language_from_info(info: &str) -> Option<&str> {
    info.split_whitespace().next()
}

/// Map common aliases onto tokens the bundled syntax set understands.
fn syntax_token(language: &str) -> String {
    match language.to_lowercase().as_str() {
        "ts" | "typescript" | "tsx" | "jsx" | "mjs" | "cjs" | "javascript" => "js".to_string(),
        "shell" | "console" | "zsh" => "sh".to_string(),
        "yml" => "yaml".to_string(),
        "htm" | "svelte" | "vue" => "html".to_string(),
        other => other.to_string(),
    }
}

/// Highlight `source` as `language`, producing class-annotated HTML.
pub fn highlight(source: &str, language: &str) -> Result<String, DocRenderError> {
    let syntaxes = syntax_set();
    let syntax = syntaxes
        .find_syntax_by_token(&syntax_token(language))
        .ok_or_else(|| DocRenderError::UnknownLanguage(language.to_string()))?;

    let mut generator = ClassedHTMLGenerator::new_with_class_style(syntax, syntaxes, CLASS_STYLE);
    for line in LinesWithEndings::from(source) {
        generator
            .parse_html_for_line_which_includes_newline(line)
            .map_err(|e| DocRenderError::Highlight {
                language: language.to_string(),
                message: e.to_string(),
            })?;
    }

    Ok(generator.finalize())
}

/// Render a fenced code block to HTML.
///
/// Blocks with a recognized language are highlighted. Anything else, including
/// a block whose highlighting fails, is emitted as escaped plain text.
pub fn render_code_block(source: &str, info: &str) -> String {
    let Some(language) = language_from_info(info) else {
        return plain_block(source, None);
    };

    match highlight(source, language) {
        Ok(html) => format!(
            r#"<pre><code class="hljs language-{}">{}</code></pre>"#,
            html_escape::encode_double_quoted_attribute(language),
            html
        ),
        Err(e) => {
            tracing::debug!("Rendering code block as plain text: {}", e);
            plain_block(source, Some(language))
        }
    }
}

fn plain_block(source: &str, language: Option<&str>) -> String {
    let class = match language {
        Some(lang) => format!(
            "hljs language-{}",
            html_escape::encode_double_quoted_attribute(lang)
        ),
        None => "hljs".to_string(),
    };

    format!(
        r#"<pre><code class="{}">{}</code></pre>"#,
        class,
        html_escape::encode_text(source)
    )
}
