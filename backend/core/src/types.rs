use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name given to a profile whose join request carried no usable display name.
pub const DEFAULT_DISPLAY_NAME: &str = "Anonymous";

/// Name attached to relayed chat when the sender has no profile on record.
pub const FALLBACK_SENDER_NAME: &str = "Stranger";

/// Opaque identifier of one live transport session. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnId(pub Uuid);

impl ConnId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ConnId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for ConnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Self-declared gender tag. Anything unrecognised deserializes as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenderTag {
    Male,
    Female,
    #[default]
    #[serde(other)]
    Other,
}

impl fmt::Display for GenderTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GenderTag::Male => "male",
            GenderTag::Female => "female",
            GenderTag::Other => "other",
        };
        write!(f, "{}", s)
    }
}

/// Profile a connection declares when it asks to be matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub display_name: String,
    pub gender_tag: GenderTag,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            display_name: DEFAULT_DISPLAY_NAME.to_string(),
            gender_tag: GenderTag::Other,
        }
    }
}

impl Profile {
    /// Build a profile from untrusted join input.
    ///
    /// Control characters are stripped, surrounding whitespace trimmed and
    /// the name cut to `max_name_chars` characters. An empty result falls
    /// back to [`DEFAULT_DISPLAY_NAME`].
    pub fn sanitized(display_name: Option<&str>, gender_tag: Option<GenderTag>, max_name_chars: usize) -> Self {
        let cleaned: String = display_name
            .unwrap_or_default()
            .chars()
            .filter(|c| !c.is_control())
            .collect();
        let name: String = cleaned.trim().chars().take(max_name_chars).collect();
        let name = name.trim_end();

        Self {
            display_name: if name.is_empty() {
                DEFAULT_DISPLAY_NAME.to_string()
            } else {
                name.to_string()
            },
            gender_tag: gender_tag.unwrap_or_default(),
        }
    }
}
