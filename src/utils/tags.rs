use regex::Regex;
use std::sync::LazyLock;

// One level of brackets; an opening bracket with no closing partner on the
// line never matches and stays in the text.
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\[\]]*)\]").expect("valid regex"));

/// Pulls every bracketed tag body out of `line` and returns them together with
/// the line minus all bracket spans.
///
/// Removal repeats until no span is left, so `[[a]]` yields `a` and an empty
/// tag, and stripping the result again is a no-op.
pub fn extract_tags(line: &str) -> (Vec<String>, String) {
    let mut tags = Vec::new();
    let mut text = line.to_string();

    while TAG_RE.is_match(&text) {
        tags.extend(TAG_RE.captures_iter(&text).map(|caps| caps[1].to_string()));
        text = TAG_RE.replace_all(&text, "").into_owned();
    }

    (tags, text.trim().to_string())
}

pub fn strip_tags(line: &str) -> String {
    extract_tags(line).1
}
