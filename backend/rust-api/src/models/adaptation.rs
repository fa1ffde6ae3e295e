use serde::{Deserialize, Serialize};

/// Diagnostic and pedagogical notes attached to a student record.
///
/// The front end stores this blob either as a JSON-encoded string or as an
/// already-parsed object, so the parse boundary accepts both (see
/// `services::classifier::parse_adaptation_details`). All fields are
/// optional arrays; anything else in the blob is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdaptationDetails {
    #[serde(default)]
    pub diagnosis: Vec<String>,
    #[serde(default)]
    pub difficulties: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Closed set of adaptation categories derived from `AdaptationDetails`.
///
/// `Intellectual` doubles as the safe fallback when no keyword matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdaptationCategory {
    Tea,
    Tdah,
    Down,
    Intellectual,
    Visual,
    Motor,
}

impl AdaptationCategory {
    pub const ALL: [AdaptationCategory; 6] = [
        AdaptationCategory::Tea,
        AdaptationCategory::Tdah,
        AdaptationCategory::Down,
        AdaptationCategory::Intellectual,
        AdaptationCategory::Visual,
        AdaptationCategory::Motor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdaptationCategory::Tea => "tea",
            AdaptationCategory::Tdah => "tdah",
            AdaptationCategory::Down => "down",
            AdaptationCategory::Intellectual => "intellectual",
            AdaptationCategory::Visual => "visual",
            AdaptationCategory::Motor => "motor",
        }
    }
}

impl std::fmt::Display for AdaptationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
