//! JSON listing of a media tree.
//!
//! Directories serialize to objects keyed by child name. Files serialize to
//! `{"type": <tag>, "size": <bytes>, "path": <relative path>}`. Key order is
//! the walk order but carries no meaning.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::node::{NodeKind, TreeNode};
use crate::tree::MediaTree;

/// Key holding a file's type tag.
pub const FILE_TYPE_KEY: &str = "type";
/// Key holding a file's size in bytes.
pub const FILE_SIZE_KEY: &str = "size";
/// Key holding a file's relative path.
pub const FILE_PATH_KEY: &str = "path";

impl Serialize for TreeNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.kind {
            NodeKind::Directory { children } => {
                let mut map = serializer.serialize_map(Some(children.len()))?;
                for (name, child) in children {
                    map.serialize_entry(name.as_str(), child)?;
                }
                map.end()
            }
            NodeKind::File { type_tag, size, .. } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry(FILE_TYPE_KEY, type_tag.as_str())?;
                map.serialize_entry(FILE_SIZE_KEY, size)?;
                map.serialize_entry(FILE_PATH_KEY, &self.relative_path)?;
                map.end()
            }
        }
    }
}

impl TreeNode {
    /// Convert this subtree into a JSON value.
    pub fn to_json(&self) -> Value {
        match &self.kind {
            NodeKind::Directory { children } => {
                let map: Map<String, Value> = children
                    .iter()
                    .map(|(name, child)| (name.to_string(), child.to_json()))
                    .collect();
                Value::Object(map)
            }
            NodeKind::File { type_tag, size, .. } => {
                let mut map = Map::new();
                map.insert(FILE_TYPE_KEY.to_string(), Value::from(type_tag.as_str()));
                map.insert(FILE_SIZE_KEY.to_string(), Value::from(*size));
                map.insert(FILE_PATH_KEY.to_string(), Value::from(self.relative_path.as_str()));
                Value::Object(map)
            }
        }
    }
}

/// Body of the `/list` endpoint.
#[derive(Debug, serde::Serialize)]
pub struct Listing<'a> {
    /// Display name of this server.
    pub name: &'a str,
    /// The tree, starting at the root's children.
    pub files: &'a TreeNode,
}

impl<'a> Listing<'a> {
    /// Create a listing for a tree.
    pub fn new(name: &'a str, tree: &'a MediaTree) -> Self {
        Self {
            name,
            files: &tree.root,
        }
    }
}

/// Render the listing once into its cached byte form.
pub fn render_listing(name: &str, tree: &MediaTree) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec_pretty(&Listing::new(name, tree))
}
