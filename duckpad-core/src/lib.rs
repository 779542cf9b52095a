//! Core of duckpad: the change-triggered annotation workflow.
//!
//! - [`document`]: typed document tree and size/text accessors.
//! - [`monitor`]: dead-band throttling and the published comment set.
//! - [`requester`]: the chat-completions client and response parsing.
//! - [`config`]: TOML configuration with defaults.
//!
//! Nothing in this crate touches the terminal; the `duckpad` binary hosts it.

pub mod config;
pub mod document;
pub mod error;
pub mod monitor;
pub mod requester;
pub mod types;

pub use config::{AnnotatorConfig, Config, FailurePolicy, MonitorConfig};
pub use document::{BlockKind, Document, Node, NodeVisitor};
pub use error::{AnnotateError, ConfigError};
pub use monitor::{ChangeMonitor, MonitorState};
pub use requester::{Annotator, Requester};
pub use types::{AnalysisRequest, AnnotationOutcome, AnnotationResult, Comment};
