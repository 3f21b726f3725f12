//! File and directory node types.

use std::path::{Path, PathBuf};

use compact_str::CompactString;
use indexmap::IndexMap;

/// Type of tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Classified file.
    File {
        /// Classification result, never empty.
        type_tag: CompactString,
        /// Size in bytes, captured at build time.
        size: u64,
        /// Host path used to stream the file.
        local_path: PathBuf,
    },
    /// Directory.
    Directory {
        /// Children keyed by name, in walk order.
        children: IndexMap<CompactString, TreeNode>,
    },
}

impl NodeKind {
    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, NodeKind::Directory { .. })
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        matches!(self, NodeKind::File { .. })
    }
}

/// A single directory or classified file in the media tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// Base name, unique among siblings.
    pub name: CompactString,

    /// `/`-joined path from the tree root. Empty for the root itself.
    pub relative_path: String,

    /// Node type and associated data.
    pub kind: NodeKind,
}

impl TreeNode {
    /// Create a new file node.
    pub fn new_file(
        name: impl Into<CompactString>,
        relative_path: impl Into<String>,
        type_tag: impl Into<CompactString>,
        size: u64,
        local_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            relative_path: relative_path.into(),
            kind: NodeKind::File {
                type_tag: type_tag.into(),
                size,
                local_path: local_path.into(),
            },
        }
    }

    /// Create a new, empty directory node.
    pub fn new_directory(name: impl Into<CompactString>, relative_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            relative_path: relative_path.into(),
            kind: NodeKind::Directory {
                children: IndexMap::new(),
            },
        }
    }

    /// Check if this node is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// Check if this node is a file.
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    /// Type tag of a file node.
    pub fn type_tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::File { type_tag, .. } => Some(type_tag.as_str()),
            NodeKind::Directory { .. } => None,
        }
    }

    /// Size of a file node.
    pub fn size(&self) -> Option<u64> {
        match &self.kind {
            NodeKind::File { size, .. } => Some(*size),
            NodeKind::Directory { .. } => None,
        }
    }

    /// Host path of a file node.
    pub fn local_path(&self) -> Option<&Path> {
        match &self.kind {
            NodeKind::File { local_path, .. } => Some(local_path.as_path()),
            NodeKind::Directory { .. } => None,
        }
    }

    /// Children of a directory node.
    pub fn children(&self) -> Option<&IndexMap<CompactString, TreeNode>> {
        match &self.kind {
            NodeKind::Directory { children } => Some(children),
            NodeKind::File { .. } => None,
        }
    }

    /// Look up a direct child by name.
    pub fn child(&self, name: &str) -> Option<&TreeNode> {
        self.children().and_then(|children| children.get(name))
    }

    /// Get the number of direct children.
    pub fn child_count(&self) -> usize {
        self.children().map_or(0, IndexMap::len)
    }

    /// Insert a child into a directory node, keyed by the child's name.
    ///
    /// Returns the child back if this node is a file.
    pub fn insert_child(&mut self, child: TreeNode) -> Result<(), TreeNode> {
        match &mut self.kind {
            NodeKind::Directory { children } => {
                children.insert(child.name.clone(), child);
                Ok(())
            }
            NodeKind::File { .. } => Err(child),
        }
    }

    /// Resolve a sequence of path segments to a file node.
    ///
    /// Each segment must name an existing child of the current directory.
    /// Walking through a file, a missing segment, or ending on a directory
    /// all yield `None`.
    pub fn resolve<I>(&self, segments: I) -> Option<&TreeNode>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut current = self;
        for segment in segments {
            current = current.child(segment.as_ref())?;
        }
        current.is_file().then_some(current)
    }

    /// Count file nodes in this subtree.
    pub fn file_count(&self) -> u64 {
        match &self.kind {
            NodeKind::File { .. } => 1,
            NodeKind::Directory { children } => children.values().map(TreeNode::file_count).sum(),
        }
    }

    /// Visit every file node in this subtree, depth first.
    pub fn for_each_file<F: FnMut(&TreeNode)>(&self, f: &mut F) {
        match &self.kind {
            NodeKind::File { .. } => f(self),
            NodeKind::Directory { children } => {
                for child in children.values() {
                    child.for_each_file(f);
                }
            }
        }
    }
}

/// Join a parent's relative path and a child name with `/`.
///
/// Children of the root (empty path) get just their name.
pub fn join_relative(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}
