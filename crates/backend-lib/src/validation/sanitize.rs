// ============================
// crates/backend-lib/src/validation/sanitize.rs
// ============================
//! Markup stripping for free-text fields.
use regex::Regex;
use std::sync::LazyLock;

/// Elements whose content is dropped along with the tags
const NON_TEXT_ELEMENTS: [&str; 5] = ["script", "style", "textarea", "noscript", "option"];

static COMMENT_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?(?:-->|\z)").unwrap());

// An unclosed element swallows the rest of the input
static NON_TEXT_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    NON_TEXT_ELEMENTS
        .iter()
        .map(|name| Regex::new(&format!(r"(?is)<{name}\b[^>]*>.*?(?:</{name}\s*>|\z)")).unwrap())
        .collect()
});

// Start/end tags, doctype, processing instructions; a tag left open at the end is dropped too
static TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<(?:/?[A-Za-z]|!|\?)[^>]*(?:>|\z)").unwrap());

// A `<` that would still open a tag; only the bracket is dropped
static TAG_OPEN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<([A-Za-z/!?])").unwrap());

/// Upper bound on strip passes; every productive pass shortens the text
const MAX_PASSES: usize = 16;

/// Strip every tag and attribute from `input`, returning trimmed plain text
///
/// Removing one tag can join its neighbours into a new one (`<<b>script>`),
/// so the passes repeat until the text stops changing.
pub fn sanitize_text(input: &str) -> String {
    let mut text = input.to_string();
    for _ in 0..MAX_PASSES {
        let stripped = strip_pass(&text);
        if stripped == text {
            break;
        }
        text = stripped;
    }
    TAG_OPEN_REGEX.replace_all(&text, "$1").trim().to_string()
}

fn strip_pass(input: &str) -> String {
    let mut text = COMMENT_REGEX.replace_all(input, "").into_owned();
    for regex in NON_TEXT_REGEXES.iter() {
        text = regex.replace_all(&text, "").into_owned();
    }
    TAG_REGEX.replace_all(&text, "").into_owned()
}
