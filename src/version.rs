//! Prompt DSL versions
//!
//! The supported versions form a closed set. Each one owns its own
//! [`SchemaContract`]; a new version adds a variant here, a contract, and a
//! migration hop in [`crate::registry`].

use once_cell::sync::Lazy;
use serde_json::Value;
use std::fmt;

use crate::schema::{SchemaContract, UnknownKeys};

static V1_CONTRACT: Lazy<SchemaContract> = Lazy::new(|| {
    SchemaContract::compile(1, UnknownKeys::Reject).expect("prompt schema v1 is well-formed")
});

static V2_CONTRACT: Lazy<SchemaContract> = Lazy::new(|| {
    SchemaContract::compile(2, UnknownKeys::Strip).expect("prompt schema v2 is well-formed")
});

/// A supported Prompt DSL version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PromptVersion {
    /// Legacy documents; strict about unknown keys
    V1,
    /// Current version; unknown keys are dropped
    V2,
}

impl PromptVersion {
    pub const LATEST: PromptVersion = PromptVersion::V2;

    /// Version assumed when a document carries no `version` tag
    pub const UNTAGGED: PromptVersion = PromptVersion::V1;

    pub fn number(&self) -> u32 {
        match self {
            PromptVersion::V1 => 1,
            PromptVersion::V2 => 2,
        }
    }

    pub fn from_number(number: u64) -> Option<Self> {
        match number {
            1 => Some(PromptVersion::V1),
            2 => Some(PromptVersion::V2),
            _ => None,
        }
    }

    /// Interpret a `version` field value; integral floats (`2.0`) count as integers
    pub fn from_tag(tag: &Value) -> Option<Self> {
        let number = tag.as_u64().or_else(|| {
            tag.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0)
                .map(|f| f as u64)
        })?;
        Self::from_number(number)
    }

    pub fn contract(&self) -> &'static SchemaContract {
        match self {
            PromptVersion::V1 => &V1_CONTRACT,
            PromptVersion::V2 => &V2_CONTRACT,
        }
    }

    /// The version a document at `self` migrates to next
    pub fn next(&self) -> Option<PromptVersion> {
        match self {
            PromptVersion::V1 => Some(PromptVersion::V2),
            PromptVersion::V2 => None,
        }
    }

    pub fn is_latest(&self) -> bool {
        *self == Self::LATEST
    }
}

impl fmt::Display for PromptVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.number())
    }
}
