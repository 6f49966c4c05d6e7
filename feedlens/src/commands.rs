//! Externally triggered commands and their acknowledgements.
//!
//! Commands arrive as loosely typed JSON messages with a `type` field.
//! Anything that does not decode into a known command becomes
//! [`Command::Unknown`] and is acknowledged with
//! [`AckStatus::UnknownMessage`]; decoding never fails past this boundary.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// A command sent by the UI or background surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    /// Switch the active lens.
    ActivateLens {
        /// Lens identifier.
        lens: String,
    },
    /// Switch the active persona.
    ActivatePersona {
        /// Persona identifier.
        persona: String,
    },
    /// Analyse the page now (still subject to throttling).
    AnalyzeFeed,
    /// Apply actions chosen by the rule engine.
    ExecuteActions {
        /// Raw action objects; each is decoded on its own.
        #[serde(default)]
        actions: Vec<serde_json::Value>,
    },
    /// The user asked to step outside the current feed.
    TriggerBreach,
    /// Anything unrecognised or malformed.
    #[serde(other)]
    Unknown,
}

impl Command {
    /// Decodes a JSON message. Malformed input yields [`Command::Unknown`].
    #[must_use]
    pub fn from_value(value: serde_json::Value) -> Self {
        serde_json::from_value(value).unwrap_or_else(|e| {
            debug!(error = %e, "Undecodable command");
            Self::Unknown
        })
    }

    /// Decodes a JSON string. Malformed input yields [`Command::Unknown`].
    #[must_use]
    pub fn from_json_str(json: &str) -> Self {
        serde_json::from_str(json).unwrap_or_else(|e| {
            debug!(error = %e, "Undecodable command");
            Self::Unknown
        })
    }

    /// The wire name of the command.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ActivateLens { .. } => "ACTIVATE_LENS",
            Self::ActivatePersona { .. } => "ACTIVATE_PERSONA",
            Self::AnalyzeFeed => "ANALYZE_FEED",
            Self::ExecuteActions { .. } => "EXECUTE_ACTIONS",
            Self::TriggerBreach => "TRIGGER_BREACH",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// Status token returned for every command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AckStatus {
    /// Lens switched.
    LensActivated,
    /// Persona switched.
    PersonaActivated,
    /// Analysis request handled.
    AnalysisComplete,
    /// Actions applied.
    ActionsExecuted,
    /// Breach started.
    BreachInitiated,
    /// Command not recognised.
    UnknownMessage,
}

impl fmt::Display for AckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LensActivated => write!(f, "lens_activated"),
            Self::PersonaActivated => write!(f, "persona_activated"),
            Self::AnalysisComplete => write!(f, "analysis_complete"),
            Self::ActionsExecuted => write!(f, "actions_executed"),
            Self::BreachInitiated => write!(f, "breach_initiated"),
            Self::UnknownMessage => write!(f, "unknown_message"),
        }
    }
}

/// Response to a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    /// Outcome token.
    pub status: AckStatus,
}

impl Acknowledgement {
    /// Creates an acknowledgement.
    #[must_use]
    pub const fn new(status: AckStatus) -> Self {
        Self { status }
    }
}

impl From<AckStatus> for Acknowledgement {
    fn from(status: AckStatus) -> Self {
        Self::new(status)
    }
}

/// An action chosen by the external rule engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SuggestedAction {
    /// Suggest stepping outside the feed through a lens.
    SuggestBreach {
        /// Lens to use.
        lens: String,
    },
    /// Switch the active lens.
    ActivateLens {
        /// Lens identifier.
        lens: String,
        /// Why the engine chose it.
        #[serde(default)]
        reason: String,
    },
    /// Show a message to the user.
    ShowNotification {
        /// Message text.
        message: String,
    },
    /// Anything unrecognised.
    #[serde(other)]
    Unknown,
}

impl SuggestedAction {
    /// Decodes actions, logging and skipping the ones that are unknown or
    /// malformed.
    #[must_use]
    pub fn decode_all(actions: &[serde_json::Value]) -> Vec<Self> {
        actions
            .iter()
            .filter_map(|raw| match serde_json::from_value::<Self>(raw.clone()) {
                Ok(Self::Unknown) => {
                    warn!(action_type = ?raw.get("type"), "Unknown action type");
                    None
                }
                Ok(action) => Some(action),
                Err(e) => {
                    warn!(error = %e, "Malformed action");
                    None
                }
            })
            .collect()
    }
}
