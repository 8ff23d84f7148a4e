//! Post-processing for reasoning models that inline their chain of thought.

use std::sync::LazyLock;

use regex::Regex;

static THINK_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<think>.*?</think>").expect("valid think-span pattern"));

/// Removes `<think>…</think>` spans, then trims every line and drops blank ones.
///
/// Spans may cross line breaks. An opening tag without a closing tag is left alone.
///
/// # Examples
///
/// ```
/// use model_handler::handler::clean::strip_think_tags;
///
/// assert_eq!(strip_think_tags("A<think>ignored</think>B"), "AB");
/// assert_eq!(strip_think_tags("<think>\nplan\n</think>\n\n  Answer  \n"), "Answer");
/// ```
pub fn strip_think_tags(content: &str) -> String {
    let without_spans = THINK_SPAN.replace_all(content, "");
    without_spans
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
