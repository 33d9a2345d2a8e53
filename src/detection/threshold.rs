use std::sync::LazyLock;

use regex::Regex;

/// A confidence value is a digit followed by at least one more character.
static THRESHOLD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9].+$").expect("threshold pattern is valid"));

/// How the threshold field's input mask classifies a candidate value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    /// Full match, ready to hand to the detector.
    Acceptable,
    /// Not a match yet, but typing can still produce one.
    Intermediate,
    Invalid,
}

impl Validity {
    /// Whether the field should take a keystroke producing this value.
    pub fn allows_edit(self) -> bool {
        !matches!(self, Validity::Invalid)
    }
}

pub fn validate(candidate: &str) -> Validity {
    if THRESHOLD_PATTERN.is_match(candidate) {
        return Validity::Acceptable;
    }
    let mut chars = candidate.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Validity::Intermediate,
        (Some(first), None) if first.is_ascii_digit() => Validity::Intermediate,
        _ => Validity::Invalid,
    }
}
