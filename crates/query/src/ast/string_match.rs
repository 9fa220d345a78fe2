//! String match parameters.

use alloc::string::String;
use tessera_core::fold;

/// How a string candidate is compared against a field value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MatchMode {
    /// Case-sensitive equality.
    #[default]
    Exact,
    /// Case and diacritic insensitive prefix match.
    BeginningWith,
    /// Case and diacritic insensitive substring match.
    Contains,
}

impl MatchMode {
    /// Textual operator used when rendering predicates.
    pub const fn operator(self) -> &'static str {
        match self {
            MatchMode::Exact => "==",
            MatchMode::BeginningWith => "BEGINSWITH[cd]",
            MatchMode::Contains => "CONTAINS[cd]",
        }
    }
}

/// A string candidate together with its match mode.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StringMatch {
    pub candidate: String,
    pub mode: MatchMode,
}

impl StringMatch {
    pub fn new(candidate: impl Into<String>, mode: MatchMode) -> Self {
        Self {
            candidate: candidate.into(),
            mode,
        }
    }

    pub fn exact(candidate: impl Into<String>) -> Self {
        Self::new(candidate, MatchMode::Exact)
    }

    pub fn beginning_with(candidate: impl Into<String>) -> Self {
        Self::new(candidate, MatchMode::BeginningWith)
    }

    pub fn contains(candidate: impl Into<String>) -> Self {
        Self::new(candidate, MatchMode::Contains)
    }

    /// Returns true if `value` satisfies this match.
    pub fn matches(&self, value: &str) -> bool {
        match self.mode {
            MatchMode::Exact => value == self.candidate,
            MatchMode::BeginningWith => fold::starts_with_folded(value, &self.candidate),
            MatchMode::Contains => fold::contains_folded(value, &self.candidate),
        }
    }
}

impl From<&str> for StringMatch {
    fn from(candidate: &str) -> Self {
        Self::exact(candidate)
    }
}

impl From<String> for StringMatch {
    fn from(candidate: String) -> Self {
        Self::exact(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mode_is_exact() {
        assert_eq!(MatchMode::default(), MatchMode::Exact);
        assert_eq!(StringMatch::from("Dave").mode, MatchMode::Exact);
    }

    #[test]
    fn test_exact_is_case_sensitive() {
        let m = StringMatch::exact("Dave");
        assert!(m.matches("Dave"));
        assert!(!m.matches("dave"));
        assert!(!m.matches("Dave "));
    }

    #[test]
    fn test_beginning_with() {
        let m = StringMatch::beginning_with("Da");
        assert!(m.matches("Dave"));
        assert!(m.matches("daVE"));
        assert!(m.matches("Dàve"));
        assert!(!m.matches("Nash"));
    }

    #[test]
    fn test_contains() {
        let m = StringMatch::contains("av");
        assert!(m.matches("Dave"));
        assert!(m.matches("DÄVE"));
        assert!(!m.matches("Nash"));
    }

    #[test]
    fn test_operators() {
        assert_eq!(MatchMode::Exact.operator(), "==");
        assert_eq!(MatchMode::BeginningWith.operator(), "BEGINSWITH[cd]");
        assert_eq!(MatchMode::Contains.operator(), "CONTAINS[cd]");
    }
}
