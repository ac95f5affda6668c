//! Lightweight HTML-to-plain-text cleaning.
//!
//! Not a sanitizer for untrusted rendering: it turns markup snippets (feed
//! items, API descriptions) into readable plain text before display.

use std::sync::LazyLock;

use regex::Regex;

/// Named entities decoded by [`clean`]. `&amp;` is decoded last so that
/// escaped entities such as `&amp;lt;` come out as `&lt;`.
const ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&apos;", "'"),
    ("&amp;", "&"),
];

#[derive(Debug, thiserror::Error)]
enum HtmlError {
    #[error("cleaning pattern failed to compile: {0}")]
    Pattern(#[from] regex::Error),
}

struct Patterns {
    script: Regex,
    style: Regex,
    line_break: Regex,
    block_end: Regex,
    tag: Regex,
    blank_lines: Regex,
}

impl Patterns {
    fn compile() -> Result<Self, HtmlError> {
        Ok(Self {
            script: Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>")?,
            style: Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>")?,
            line_break: Regex::new(r"(?i)<br\s*/?>")?,
            block_end: Regex::new(r"(?i)</(?:p|div|li|h[1-6])\s*>")?,
            tag: Regex::new(r"<[^>]*>")?,
            blank_lines: Regex::new(r"\n{3,}")?,
        })
    }
}

static PATTERNS: LazyLock<Result<Patterns, HtmlError>> = LazyLock::new(Patterns::compile);

fn try_clean(raw: &str) -> Result<String, &'static HtmlError> {
    let patterns = PATTERNS.as_ref()?;

    let text = raw.replace("\r\n", "\n");
    let text = patterns.script.replace_all(&text, "");
    let text = patterns.style.replace_all(&text, "");
    let text = patterns.line_break.replace_all(&text, "\n");
    let text = patterns.block_end.replace_all(&text, "\n");
    let text = patterns.tag.replace_all(&text, "");

    let mut decoded = text.into_owned();
    for (entity, replacement) in ENTITIES {
        if decoded.contains(entity) {
            decoded = decoded.replace(entity, replacement);
        }
    }

    let collapsed = patterns.blank_lines.replace_all(&decoded, "\n\n");
    Ok(collapsed.trim().to_string())
}

/// Convert an HTML fragment to plain text.
///
/// Drops `<script>` and `<style>` blocks, turns `<br>` and closing block
/// tags into line breaks, strips the remaining tags, decodes a small set of
/// named entities, collapses runs of three or more newlines to two, and
/// trims. Never fails: if cleaning cannot run, `raw` is returned unchanged.
///
/// # Examples
///
/// ```
/// use readmore_core::html::clean;
///
/// assert_eq!(clean("<p>Fish &amp; chips</p><p>Tea</p>"), "Fish & chips\nTea");
/// ```
pub fn clean(raw: &str) -> String {
    match try_clean(raw) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("HTML cleaning failed, using raw input: {}", e);
            raw.to_string()
        }
    }
}
