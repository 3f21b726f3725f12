//! Process-scoped server state, built once before serving.

use axum::body::Bytes;
use meditree_core::{Classifier, MediaTree, render_listing};
use meditree_scan::TreeBuilder;
use tracing::info;

use crate::config::AppConfig;
use crate::error::InitError;

/// Immutable state shared by every request.
///
/// Holds the tree used to resolve file requests and the listing rendered
/// from it. Nothing here changes after [`AppState::init`].
#[derive(Debug)]
pub struct AppState {
    name: String,
    classifier: Classifier,
    tree: MediaTree,
    listing: Bytes,
}

impl AppState {
    /// Build the tree described by `config` and render its listing.
    pub fn init(config: &AppConfig) -> Result<Self, InitError> {
        let classifier = config.classifier()?;
        let tree = TreeBuilder::new().build(&config.build_config(), &classifier)?;
        let state = Self::from_tree(config.name.clone(), classifier, tree)?;
        info!(bytes = state.listing.len(), "rendered listing snapshot");
        Ok(state)
    }

    /// Wrap an already built tree.
    pub fn from_tree(
        name: impl Into<String>,
        classifier: Classifier,
        tree: MediaTree,
    ) -> Result<Self, serde_json::Error> {
        let name = name.into();
        let listing = Bytes::from(render_listing(&name, &tree)?);
        Ok(Self {
            name,
            classifier,
            tree,
            listing,
        })
    }

    /// Display name of this server.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rules the tree was classified with.
    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// The media tree.
    pub fn tree(&self) -> &MediaTree {
        &self.tree
    }

    /// Cached listing bytes. Cloning only bumps a reference count.
    pub fn listing(&self) -> Bytes {
        self.listing.clone()
    }
}
