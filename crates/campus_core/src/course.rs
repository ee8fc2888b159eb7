use std::sync::OnceLock;

use regex::Regex;

/// Pieces split out of a raw portal course label.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CourseDetails {
    /// Course name with code, instructor and bracketed tails removed.
    pub name: String,
    /// Registration code, e.g. `HBXX0000`.
    pub code: Option<String>,
    /// Standalone Hangul token of 2-4 syllables, taken as the instructor name.
    pub instructor: Option<String>,
}

fn code_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b[A-Z]{2,4}\d{4}\b").expect("course code pattern"))
}

fn instructor_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Require a free-standing token so Korean course names are not clipped.
    RE.get_or_init(|| Regex::new(r"(?:^|\s)([가-힣]{2,4})(?:\s|$)").expect("instructor pattern"))
}

fn bracket_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[[^\]]*\]").expect("bracket pattern"))
}

/// Splits a portal course label like `"ABCD1234 홍길동 Course Name (Section)"`
/// into its code, instructor and trimmed name parts.
pub fn split_course_label(raw: &str) -> CourseDetails {
    let mut name = raw.to_string();

    let code = code_pattern().find(&name).map(|m| m.as_str().to_string());
    if let Some(code) = &code {
        name = name.replacen(code.as_str(), "", 1);
    }

    let instructor = instructor_pattern()
        .captures(&name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());
    if let Some(instructor) = &instructor {
        name = name.replacen(instructor.as_str(), "", 1);
    }

    name = bracket_pattern().replace_all(&name, "").into_owned();
    // Section markers and anything after them are display noise.
    if let Some(idx) = name.find('(') {
        name.truncate(idx);
    }

    CourseDetails {
        name: collapse_whitespace(&name),
        code,
        instructor,
    }
}

/// Collapses whitespace runs (including newlines) into single spaces.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
