//! Directory walker for meditree.
//!
//! This crate turns a directory on disk into an immutable
//! [`MediaTree`](meditree_core::MediaTree). The walk is a single-threaded,
//! depth-first traversal driven by jwalk:
//!
//! - **Classification** of every file name through a [`Classify`] impl;
//!   excluded files never enter the tree
//! - **Pruning** of directories that end up with no classified descendants
//! - **Partial-failure tolerance**: unreadable subdirectories and files are
//!   recorded as omissions instead of aborting the build
//!
//! # Example
//!
//! ```rust,no_run
//! use meditree_scan::{BuildConfig, Classifier, TreeBuilder};
//!
//! let classifier = Classifier::new([("*.mp4", "video"), ("*.flac", "audio")]).unwrap();
//! let config = BuildConfig::new("/srv/media");
//! let tree = TreeBuilder::new().build(&config, &classifier).unwrap();
//!
//! println!("Indexed {} files", tree.total_files());
//! for omission in &tree.omissions {
//!     println!("skipped {}: {}", omission.path.display(), omission.message);
//! }
//! ```

mod scanner;

pub use scanner::TreeBuilder;

// Re-export core types for convenience
pub use meditree_core::{
    BuildConfig, BuildError, BuildWarning, Classifier, Classify, MediaTree, NodeKind, TreeNode,
    TreeStats, WarningKind,
};
