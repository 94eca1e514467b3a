//! Tag-level cleanup of the free text shown above the table.
//!
//! `script` and `style` elements are dropped with their contents. Any other
//! tag outside [`SAFE_TAGS`] is escaped so it shows up as literal text and
//! cannot open or close table structure around it. Whitelisted tags pass
//! through with their attributes untouched, but only when they are complete.
//!
//! This is not an HTML parser. Event-handler attributes on whitelisted tags
//! and malformed nesting are not handled.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

pub const SAFE_TAGS: &[&str] = &[
    "strong", "em", "b", "i", "u", "a", "p", "br", "hr", "ul", "ol", "li", "h1", "h2", "h3", "h4",
    "h5", "h6",
];

static RE_SCRIPT_STYLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<\s*script\b.*?</\s*script\s*>|<\s*style\b.*?</\s*style\s*>")
        .expect("valid regex")
});

// Every `<` up to the next bracket. A closing `>` is optional so a tag the
// text never finishes is caught too; the wrapper markup would complete it.
static RE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<(/?)\s*([a-zA-Z0-9]*)([^<>]*)(>?)").expect("valid regex"));

pub fn is_safe_tag(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    SAFE_TAGS.contains(&name.as_str())
}

fn escape_brackets(tag: &str) -> String {
    tag.replace('<', "&lt;").replace('>', "&gt;")
}

// Kept only when complete: a whitelisted name, a closing `>`, and no junk
// after the name of an end tag. `<!`, `<?` and bare `<` have no name.
fn keep_or_escape(caps: &Captures) -> String {
    let whole = &caps[0];
    let closing = !caps[1].is_empty();
    let name = &caps[2];
    let terminated = !caps[4].is_empty();
    let clean_end = !closing || caps[3].trim().is_empty();
    if !name.is_empty() && is_safe_tag(name) && terminated && clean_end {
        whole.to_string()
    } else {
        escape_brackets(whole)
    }
}

pub fn sanitize(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let out = RE_SCRIPT_STYLE.replace_all(raw, "");
    let out = RE_TAG.replace_all(&out, keep_or_escape);
    out.into_owned()
}

/// Sanitizes only when `protect` is set; otherwise the text is trusted as is.
pub fn protect(raw: &str, protect: bool) -> String {
    if protect {
        sanitize(raw)
    } else {
        raw.to_string()
    }
}
