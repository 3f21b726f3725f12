//! JWalk-based depth-first tree builder.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use compact_str::CompactString;
use jwalk::{Parallelism, WalkDir};
use tracing::{debug, info, warn};

use meditree_core::{
    BuildConfig, BuildError, BuildWarning, Classify, MediaTree, TreeNode, TreeStats, WarningKind,
    join_relative,
};

/// Builds a [`MediaTree`] by walking a directory once.
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeBuilder;

impl TreeBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self
    }

    /// Walk `config.root` and build the tree.
    ///
    /// Only a problem with the root itself fails the build. Unreadable
    /// subdirectories and files are left out and reported in
    /// [`MediaTree::omissions`].
    pub fn build<C>(&self, config: &BuildConfig, classifier: &C) -> Result<MediaTree, BuildError>
    where
        C: Classify + ?Sized,
    {
        let start = Instant::now();
        let root_path = config
            .root
            .canonicalize()
            .map_err(|e| BuildError::io(&config.root, e))?;

        // Verify root is a listable directory
        if !root_path.is_dir() {
            return Err(BuildError::NotADirectory { path: root_path });
        }
        std::fs::read_dir(&root_path).map_err(|e| BuildError::io(&root_path, e))?;

        let mut stats = TreeStats::new();
        let mut warnings = Vec::new();

        let entries = self.collect_entries(config, &root_path, classifier, &mut stats, &mut warnings);

        let root_name = root_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| root_path.to_string_lossy().to_string());
        let root = self.build_tree(&root_path, root_name, entries, &mut stats);

        let build_duration = start.elapsed();
        info!(
            root = %root_path.display(),
            files = stats.total_files,
            dirs = stats.total_dirs,
            excluded = stats.excluded_files,
            omitted = warnings.len(),
            elapsed_ms = build_duration.as_millis() as u64,
            "built media tree"
        );

        Ok(MediaTree::new(root, root_path, stats, build_duration, warnings))
    }

    /// Collect classified files and directories, grouped by parent path.
    fn collect_entries<C>(
        &self,
        config: &BuildConfig,
        root_path: &Path,
        classifier: &C,
        stats: &mut TreeStats,
        warnings: &mut Vec<BuildWarning>,
    ) -> HashMap<PathBuf, Vec<EntryInfo>>
    where
        C: Classify + ?Sized,
    {
        let walker = WalkDir::new(root_path)
            .parallelism(Parallelism::Serial)
            .sort(true)
            .skip_hidden(!config.include_hidden)
            .follow_links(config.follow_symlinks)
            .min_depth(1)
            .max_depth(config.depth_limit());

        let mut entries_by_parent: HashMap<PathBuf, Vec<EntryInfo>> = HashMap::new();

        for entry_result in walker {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    omit(warnings, warning_from_walk_error(&err));
                    continue;
                }
            };

            let path = entry.path();
            let file_name = entry.file_name().to_string_lossy().to_string();
            let file_type = entry.file_type();

            if file_type.is_dir() {
                if let Some(err) = &entry.read_children_error {
                    omit(warnings, warning_from_walk_error(err));
                }

                if let Some(parent) = path.parent() {
                    entries_by_parent
                        .entry(parent.to_path_buf())
                        .or_default()
                        .push(EntryInfo {
                            name: file_name.into(),
                            path: path.clone(),
                            kind: EntryKind::Directory,
                        });
                }
            } else if file_type.is_file() {
                let Some(type_tag) = classifier.classify(&file_name) else {
                    stats.record_excluded();
                    continue;
                };

                match entry.metadata() {
                    Ok(metadata) => {
                        push_file(&mut entries_by_parent, path, file_name, type_tag, metadata.len())
                    }
                    Err(err) => omit(warnings, BuildWarning::metadata_error(&path, err)),
                }
            } else if file_type.is_symlink() {
                // Links jwalk did not follow. File targets are indexed, directory
                // targets stay unfollowed.
                match std::fs::metadata(&path) {
                    Ok(target) if target.is_file() => match classifier.classify(&file_name) {
                        Some(type_tag) => push_file(
                            &mut entries_by_parent,
                            path,
                            file_name,
                            type_tag,
                            target.len(),
                        ),
                        None => stats.record_excluded(),
                    },
                    Ok(_) => debug!(path = %path.display(), "skipping link to non-file"),
                    Err(err) if classifier.classify(&file_name).is_some() => {
                        omit(warnings, BuildWarning::metadata_error(&path, err))
                    }
                    Err(_) => debug!(path = %path.display(), "skipping dangling link"),
                }
            } else {
                debug!(path = %path.display(), "skipping non-regular entry");
            }
        }

        entries_by_parent
    }

    /// Build tree structure from collected entries.
    fn build_tree(
        &self,
        root_path: &Path,
        root_name: String,
        mut entries_by_parent: HashMap<PathBuf, Vec<EntryInfo>>,
        stats: &mut TreeStats,
    ) -> TreeNode {
        self.build_node(root_path, root_name.into(), String::new(), 0, &mut entries_by_parent, stats)
    }

    /// Recursively build a directory node, dropping empty subdirectories.
    fn build_node(
        &self,
        path: &Path,
        name: CompactString,
        relative_path: String,
        depth: u32,
        entries_by_parent: &mut HashMap<PathBuf, Vec<EntryInfo>>,
        stats: &mut TreeStats,
    ) -> TreeNode {
        let mut node = TreeNode::new_directory(name, relative_path);
        let children_entries = entries_by_parent.remove(path).unwrap_or_default();

        for entry in children_entries {
            let child_path = join_relative(&node.relative_path, &entry.name);
            let child = match entry.kind {
                EntryKind::Directory => {
                    let child = self.build_node(
                        &entry.path,
                        entry.name,
                        child_path,
                        depth + 1,
                        entries_by_parent,
                        stats,
                    );
                    if child.child_count() == 0 {
                        debug!(path = %entry.path.display(), "pruning directory without media");
                        stats.record_pruned();
                        continue;
                    }
                    stats.record_dir();
                    child
                }
                EntryKind::File { type_tag, size } => {
                    stats.record_file(size, depth + 1);
                    TreeNode::new_file(entry.name, child_path, type_tag, size, entry.path)
                }
            };
            // Children of a directory node always insert
            let _ = node.insert_child(child);
        }

        node
    }
}

/// Temporary struct for collecting entry information.
struct EntryInfo {
    name: CompactString,
    path: PathBuf,
    kind: EntryKind,
}

enum EntryKind {
    Directory,
    File { type_tag: CompactString, size: u64 },
}

fn push_file(
    entries_by_parent: &mut HashMap<PathBuf, Vec<EntryInfo>>,
    path: PathBuf,
    name: String,
    type_tag: CompactString,
    size: u64,
) {
    if let Some(parent) = path.parent() {
        entries_by_parent
            .entry(parent.to_path_buf())
            .or_default()
            .push(EntryInfo {
                name: name.into(),
                path,
                kind: EntryKind::File { type_tag, size },
            });
    }
}

fn omit(warnings: &mut Vec<BuildWarning>, warning: BuildWarning) {
    warn!(path = %warning.path.display(), kind = ?warning.kind, "{}", warning.message);
    warnings.push(warning);
}

fn warning_from_walk_error(err: &jwalk::Error) -> BuildWarning {
    let path = err.path().map(Path::to_path_buf).unwrap_or_default();
    if let Some(ancestor) = err.loop_ancestor() {
        return BuildWarning::symlink_loop(path, ancestor);
    }
    match err.io_error() {
        Some(io) => BuildWarning::read_error(path, io),
        None => BuildWarning::new(path, err.to_string(), WarningKind::ReadError),
    }
}
