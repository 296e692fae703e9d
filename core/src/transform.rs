//! Diff-style rewriting of raw plan output.
//!
//! The tool's human-readable plan has no documented grammar, so the
//! rendering is an ordered pipeline of regex rewrites over semi-structured
//! text. Order is significant: ANSI stripping precedes body extraction
//! (escape codes can straddle the delimiter matches), dedenting precedes
//! marker relocation (markers are matched relative to leading spaces), and
//! the attribute-level `~a = b -> c` rewrite precedes the generic `~`
//! rewrite or the specific case is lost to the generic one.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::TransformError;

/// Terminal escape sequences (CSI and OSC), as matched by the stripansi
/// pattern.
static ANSI_ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"[\x1b\x9b][\[\]()#;?]*(?:(?:[a-zA-Z\d]*(?:;[a-zA-Z\d]*)*)?\x07|(?:\d{1,4}(?:;\d{0,4})*)?[\dA-PRZcf-ntqry=><~])",
    )
    .expect("valid pattern")
});

/// Plan body: everything between a divider line (a run of dashes) and the
/// fixed-shape trailing summary sentence.
static PLAN_BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ms)^-{4,}\n(.*?)^Plan: \d+ to add, \d+ to change, \d+ to destroy\.$")
        .expect("valid pattern")
});

/// One two-space indentation level.
static INDENT_LEVEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^ {2}").expect("valid pattern"));

/// A change marker still preceded by spaces.
static INDENTED_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^( +)([+~-])").expect("valid pattern"));

/// Resource/attribute header lines.
static HEADER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#(.*)").expect("valid pattern"));

/// Attribute-level change of the shape `~attr = old -> new`.
static ATTRIBUTE_CHANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^~(.*) = (.*) -> (.*)").expect("valid pattern"));

/// Any remaining line-leading change marker.
static CHANGE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^~").expect("valid pattern"));

/// Line-leading replace marker.
static REPLACE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^-/\+").expect("valid pattern"));

/// Rewrite raw plan output into its diff-style rendering.
///
/// Fails with [`TransformError::PlanBodyNotFound`] when the divider/summary
/// delimiters cannot be located; the unfiltered text is never returned.
pub fn process_output(raw: &str) -> Result<String, TransformError> {
    let text = strip_ansi(raw);
    let body = extract_plan_body(&text)?;
    let body = dedent(&dedent(&body));
    let body = relocate_markers(&body);
    let body = emphasize_headers(&body);
    let body = split_attribute_changes(&body);
    let body = mark_changes(&body);
    Ok(mark_replacements(&body))
}

/// Normalize captured error text: strip escapes, trim surrounding blank
/// space. Error text is otherwise passed through verbatim.
pub fn process_error(raw: &str) -> String {
    strip_ansi(raw).trim().to_string()
}

fn strip_ansi(text: &str) -> String {
    ANSI_ESCAPE.replace_all(text, "").into_owned()
}

fn extract_plan_body(text: &str) -> Result<String, TransformError> {
    let captures = PLAN_BODY
        .captures(text)
        .ok_or(TransformError::PlanBodyNotFound)?;
    Ok(captures[1].trim_matches('\n').to_string())
}

fn dedent(text: &str) -> String {
    INDENT_LEVEL.replace_all(text, "").into_owned()
}

/// Move a `+`/`-`/`~` marker that is preceded by spaces to column 0,
/// keeping the displaced spaces after it so the line reads as a diff
/// prefix rather than an indented annotation.
fn relocate_markers(text: &str) -> String {
    INDENTED_MARKER.replace_all(text, "${2}${1}").into_owned()
}

/// Wrap `#` header lines in patch-hunk-style emphasis.
fn emphasize_headers(text: &str) -> String {
    HEADER_LINE.replace_all(text, "@@ #${1} @@").into_owned()
}

/// Turn `~attr = old -> new` into an explicit removal/addition pair.
fn split_attribute_changes(text: &str) -> String {
    ATTRIBUTE_CHANGE
        .replace_all(text, "-${1} = ${2}\n+${1} = ${3}")
        .into_owned()
}

/// Remaining `~` markers (block-level changes) become the generic `!`.
fn mark_changes(text: &str) -> String {
    CHANGE_MARKER.replace_all(text, "!").into_owned()
}

/// `-/+` replace markers also become `!`.
fn mark_replacements(text: &str) -> String {
    REPLACE_MARKER.replace_all(text, "!").into_owned()
}
