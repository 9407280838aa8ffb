//! Memory kinds and durations.
//!
//! Kinds are recorded in memory metadata under `memory_type`, durations under
//! `memory_duration`. Both serialize to snake_case, which is also the form
//! search filters match against.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::error::{WrenError, WrenResult};

/// How long a memory is expected to stay relevant.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MemoryDuration {
    /// Tied to a single session or conversation.
    ShortTerm,
    /// Persists across sessions.
    LongTerm,
}

/// Structural kind of a memory.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MemoryKind {
    /// Content and context of an ongoing dialogue.
    Conversation,
    /// Information being actively processed.
    Working,
    /// Information that needs focus right now.
    Attention,
    /// Specific events and experiences.
    Episodic,
    /// Facts and preferences.
    Semantic,
    /// Skills and habits.
    Procedural,
}

impl MemoryKind {
    /// Duration implied by this kind.
    pub fn duration(self) -> MemoryDuration {
        match self {
            Self::Conversation | Self::Working | Self::Attention => MemoryDuration::ShortTerm,
            Self::Episodic | Self::Semantic | Self::Procedural => MemoryDuration::LongTerm,
        }
    }

    /// Whether this kind is session-scoped.
    pub fn is_short_term(self) -> bool {
        self.duration() == MemoryDuration::ShortTerm
    }

    /// Metadata key holding the kind-specific detail, if the kind has one.
    pub fn detail_field(self) -> Option<&'static str> {
        match self {
            Self::Episodic => Some("event_date"),
            Self::Semantic => Some("category"),
            Self::Procedural => Some("skill_area"),
            _ => None,
        }
    }

    /// Names of all short-term kinds, in declaration order.
    pub fn short_term_names() -> Vec<&'static str> {
        Self::iter()
            .filter(|k| k.is_short_term())
            .map(|k| k.into())
            .collect()
    }

    /// Parse a short-term kind, rejecting long-term and unknown names.
    pub fn parse_short_term(name: &str) -> WrenResult<Self> {
        match name.parse::<Self>() {
            Ok(kind) if kind.is_short_term() => Ok(kind),
            _ => Err(WrenError::invalid_memory_type(
                name,
                &Self::short_term_names(),
            )),
        }
    }
}
