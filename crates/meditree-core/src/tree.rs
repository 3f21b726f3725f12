//! Media tree container and statistics.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::error::BuildWarning;
use crate::node::TreeNode;

/// Summary statistics for a built tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    /// Classified files kept in the tree.
    pub total_files: u64,
    /// Directories kept in the tree (root excluded).
    pub total_dirs: u64,
    /// Sum of the sizes of all kept files.
    pub total_size: u64,
    /// Deepest level at which a file was kept.
    pub max_depth: u32,
    /// Files skipped because no pattern matched.
    pub excluded_files: u64,
    /// Directories dropped because nothing below them was kept.
    pub pruned_dirs: u64,
}

impl TreeStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a kept file.
    pub fn record_file(&mut self, size: u64, depth: u32) {
        self.total_files += 1;
        self.total_size += size;
        self.max_depth = self.max_depth.max(depth);
    }

    /// Record a kept directory.
    pub fn record_dir(&mut self) {
        self.total_dirs += 1;
    }

    /// Record a file the classifier excluded.
    pub fn record_excluded(&mut self) {
        self.excluded_files += 1;
    }

    /// Record a pruned directory.
    pub fn record_pruned(&mut self) {
        self.pruned_dirs += 1;
    }
}

/// Complete, immutable media tree with build metadata.
#[derive(Debug, Clone)]
pub struct MediaTree {
    /// Root node of the tree, always a directory.
    pub root: TreeNode,

    /// Canonical root path that was indexed.
    pub root_path: PathBuf,

    /// When this tree was built.
    pub built_at: SystemTime,

    /// Duration of the build.
    pub build_duration: Duration,

    /// Summary statistics.
    pub stats: TreeStats,

    /// Subtrees and files omitted because of filesystem errors.
    pub omissions: Vec<BuildWarning>,
}

impl MediaTree {
    /// Create a new media tree.
    pub fn new(
        root: TreeNode,
        root_path: PathBuf,
        stats: TreeStats,
        build_duration: Duration,
        omissions: Vec<BuildWarning>,
    ) -> Self {
        Self {
            root,
            root_path,
            built_at: SystemTime::now(),
            build_duration,
            stats,
            omissions,
        }
    }

    /// Resolve path segments to a file node.
    pub fn resolve<I>(&self, segments: I) -> Option<&TreeNode>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.root.resolve(segments)
    }

    /// Resolve a `/`-separated relative path to a file node.
    pub fn resolve_path(&self, path: &str) -> Option<&TreeNode> {
        self.root.resolve(path.split('/'))
    }

    /// Get the total number of indexed files.
    pub fn total_files(&self) -> u64 {
        self.stats.total_files
    }

    /// Get the total size of all indexed files.
    pub fn total_size(&self) -> u64 {
        self.stats.total_size
    }

    /// Check if any subtree or file was omitted.
    pub fn has_omissions(&self) -> bool {
        !self.omissions.is_empty()
    }
}
