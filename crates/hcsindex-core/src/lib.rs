//! hcsindex Core Library
//!
//! Core types, configuration, manifest persistence, viewer links and error
//! handling shared by the hcsindex builder, search and CLI.

pub mod config;
pub mod error;
pub mod link;
pub mod manifest;
pub mod section;

pub use config::{Config, FrameworkConfig, PatternConfig, default_patterns};
pub use error::{CoreError, Result};
pub use link::{LinkBuilder, LinkError};
pub use manifest::{MANIFEST_VERSION, Manifest, ValidationReport};
pub use section::{DocumentInfo, SectionRecord};
