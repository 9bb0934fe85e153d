use serde::{Deserialize, Serialize};

/// Risk category derived from an indicator's latest reading. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalState {
    Nominal,
    Warning,
    NoData,
}

impl SignalState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalState::Nominal => "NOMINAL",
            SignalState::Warning => "WARNING",
            SignalState::NoData => "NO_DATA",
        }
    }
}

impl std::fmt::Display for SignalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
