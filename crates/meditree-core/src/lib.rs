//! Core types for meditree.
//!
//! This crate provides the data structures shared by the scanner and the
//! HTTP server: the media tree and its nodes, the file-name classifier,
//! build configuration and errors, and the JSON listing serializer.

mod classify;
mod config;
mod error;
mod listing;
mod node;
mod tree;

pub use classify::{Classifier, Classify};
pub use config::{BuildConfig, BuildConfigBuilder};
pub use error::{BuildError, BuildWarning, PatternError, WarningKind};
pub use listing::{FILE_PATH_KEY, FILE_SIZE_KEY, FILE_TYPE_KEY, Listing, render_listing};
pub use node::{NodeKind, TreeNode, join_relative};
pub use tree::{MediaTree, TreeStats};
