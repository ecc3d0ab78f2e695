use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The persona the Brain service uses to shape its answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// General answers.
    #[default]
    Basic,

    /// Pros, cons, and a final suggestion.
    Decision,

    /// Study plans and explanations.
    Study,

    /// Money and investing.
    Money,

    /// Root causes and an action plan.
    Problem,

    /// Blunt answers without padding.
    NoBullshit,
}

impl Mode {
    /// Every mode, in menu order.
    pub const ALL: [Mode; 6] = [
        Mode::Basic,
        Mode::Decision,
        Mode::Study,
        Mode::Money,
        Mode::Problem,
        Mode::NoBullshit,
    ];

    /// Normalizes a raw mode tag.
    ///
    /// Returns the matching mode for a known tag and [`Mode::Basic`] for
    /// anything else.  Never fails.
    pub fn normalize(raw: &str) -> Mode {
        raw.parse().unwrap_or_default()
    }

    /// The tag sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Basic => "basic",
            Mode::Decision => "decision",
            Mode::Study => "study",
            Mode::Money => "money",
            Mode::Problem => "problem",
            Mode::NoBullshit => "nobullshit",
        }
    }

    /// Menu label shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Basic => "Basic Brain",
            Mode::Decision => "Decision Brain",
            Mode::Study => "Study Brain",
            Mode::Money => "Money Brain",
            Mode::Problem => "Problem Breaker",
            Mode::NoBullshit => "No Bullsh*t Mode",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned by strict parsing of an unrecognized mode tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMode(pub String);

impl fmt::Display for UnknownMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown mode: {}", self.0)
    }
}

impl std::error::Error for UnknownMode {}

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| UnknownMode(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_known_and_unknown() {
        assert_eq!(Mode::normalize("study"), Mode::Study);
        assert_eq!(Mode::normalize("nobullshit"), Mode::NoBullshit);
        assert_eq!(Mode::normalize("bogus"), Mode::Basic);
        assert_eq!(Mode::normalize(""), Mode::Basic);
        assert_eq!(Mode::normalize("Study"), Mode::Basic);
    }

    #[test]
    fn normalize_is_identity_on_tags() {
        for mode in Mode::ALL {
            assert_eq!(Mode::normalize(mode.as_str()), mode);
        }
    }

    #[test]
    fn strict_parse_rejects_unknown() {
        assert_eq!("money".parse::<Mode>(), Ok(Mode::Money));
        assert_eq!(
            "creator".parse::<Mode>(),
            Err(UnknownMode("creator".to_string()))
        );
    }

    #[test]
    fn serializes_as_wire_tag() {
        let json = serde_json::to_string(&Mode::NoBullshit).unwrap();
        assert_eq!(json, r#""nobullshit""#);

        let mode: Mode = serde_json::from_str(r#""problem""#).unwrap();
        assert_eq!(mode, Mode::Problem);
    }

    #[test]
    fn default_is_basic() {
        assert_eq!(Mode::default(), Mode::Basic);
        assert_eq!(Mode::Money.label(), "Money Brain");
    }
}
