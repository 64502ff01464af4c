//! Prompt DSL
//!
//! Validation, migration and stable re-serialization of versioned prompt
//! documents kept as YAML front matter in Markdown files.
//!
//! ## Features
//!
//! - **Versioned Schemas**: every version is a self-contained contract with its own unknown-key policy
//! - **Forward Migration**: older documents are upgraded to the latest version on parse
//! - **Stable Output**: content-equal documents serialize byte-for-byte identically
//! - **Consistency Lint**: template placeholders are checked against declared inputs
//!
//! ## Flow
//!
//! ```text
//! raw text / document
//!   └─ registry::parse_prompt ── detect version → validate → migrate
//!        └─ PromptDefinition (latest)
//!             ├─ lint::check_consistency   (read-only diagnostics)
//!             └─ serializer::dump_prompt   (stable YAML text)
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod front_matter;
pub mod lint;
pub mod loader;
pub mod primitives;
pub mod registry;
pub mod schema;
pub mod serializer;
pub mod version;
pub mod walk;

pub use config::PromptConfig;
pub use error::{PromptError, Result, Violation, ViolationKind};
pub use lint::{check_consistency, Consistency};
pub use registry::{latest_version, parse_prompt, RawPrompt};
pub use schema::{InputType, PromptDefinition, PromptInput};
pub use serializer::{dump_prompt, dump_value};
pub use version::PromptVersion;
