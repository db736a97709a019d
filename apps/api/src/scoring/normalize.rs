/// Spelling variants that name the same skill. Left side is matched after
/// lowercasing and whitespace collapsing; right side is the canonical form.
const SKILL_ALIASES: &[(&str, &str)] = &[
    ("js", "javascript"),
    ("ecmascript", "javascript"),
    ("java script", "javascript"),
    ("ts", "typescript"),
    ("reactjs", "react"),
    ("react.js", "react"),
    ("react js", "react"),
    ("node", "nodejs"),
    ("node.js", "nodejs"),
    ("node js", "nodejs"),
    ("vuejs", "vue"),
    ("vue.js", "vue"),
    ("golang", "go"),
    ("k8s", "kubernetes"),
    ("postgres", "postgresql"),
    ("amazon web services", "aws"),
    ("gcp", "google cloud"),
    ("ml", "machine learning"),
];

/// Lowercases, trims and collapses inner whitespace.
pub fn normalize_text(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Normalizes a skill name and maps known aliases onto one canonical spelling,
/// so "ReactJS", " react " and "React.js" compare equal.
pub fn normalize_skill(raw: &str) -> String {
    let text = normalize_text(raw);
    SKILL_ALIASES
        .iter()
        .find(|(alias, _)| *alias == text)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(text)
}
