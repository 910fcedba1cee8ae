use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The participant an assignment points at, as shown to administrators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub has_revealed: bool,
    pub created_at: DateTime<Utc>,
    pub assigned_to: Option<TargetRef>,
}

/// How a target is chosen among the open candidates on first reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawPolicy {
    /// Uniform pick over every open candidate. Can leave the last gifter
    /// with nobody to draw.
    Greedy,
    /// Uniform pick over the candidates that keep the rest of the draw
    /// completable.
    #[default]
    Guarded,
}

impl DrawPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            DrawPolicy::Greedy => "greedy",
            DrawPolicy::Guarded => "guarded",
        }
    }
}

impl fmt::Display for DrawPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown draw policy '{0}' (expected 'greedy' or 'guarded')")]
pub struct UnknownPolicy(pub String);

impl FromStr for DrawPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "greedy" => Ok(DrawPolicy::Greedy),
            "guarded" => Ok(DrawPolicy::Guarded),
            other => Err(UnknownPolicy(other.to_string())),
        }
    }
}
