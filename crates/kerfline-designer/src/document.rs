//! Shape documents: parameters of every shape and toolpath as JSON.
//!
//! Only parameters are stored; cached paths are rebuilt after loading.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

use kerfline_core::{EngineConfig, Error, Result};

use crate::model::ShapeEntity;
use crate::store::{ShapeStore, ToolpathEntity};

/// Document format version
pub const DOCUMENT_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub name: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeDocument {
    pub version: String,
    pub metadata: DocumentMetadata,
    #[serde(default)]
    pub shapes: Vec<ShapeEntity>,
    #[serde(default)]
    pub toolpaths: Vec<ToolpathEntity>,
}

impl ShapeDocument {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            version: DOCUMENT_VERSION.to_string(),
            metadata: DocumentMetadata {
                name: name.into(),
                created: now,
                modified: now,
            },
            shapes: Vec::new(),
            toolpaths: Vec::new(),
        }
    }

    /// Snapshot of a store's shapes and toolpaths in insertion order.
    pub fn from_store(name: impl Into<String>, store: &ShapeStore) -> Self {
        let mut document = Self::new(name);
        document.shapes = store.shapes().cloned().collect();
        document.toolpaths = store.toolpaths().cloned().collect();
        document
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        debug!("Saved document to {}", path.as_ref().display());
        Ok(())
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let document: ShapeDocument = serde_json::from_str(&content)?;
        if document.version != DOCUMENT_VERSION {
            warn!(
                "Document version {} differs from {}, loading anyway",
                document.version, DOCUMENT_VERSION
            );
        }
        debug!(
            "Loaded document '{}' with {} shapes and {} toolpaths",
            document.metadata.name,
            document.shapes.len(),
            document.toolpaths.len()
        );
        Ok(document)
    }

    /// Builds a store. Fails if a shape is invalid or a toolpath names a
    /// shape the document does not contain.
    pub fn into_store(self, config: EngineConfig) -> Result<ShapeStore> {
        let mut store = ShapeStore::with_config(config);
        for shape in self.shapes {
            shape.kind().validate().map_err(Error::from)?;
            store.add(shape);
        }
        for toolpath in self.toolpaths {
            store.insert_toolpath(toolpath)?;
        }
        Ok(store)
    }

    pub fn touch(&mut self) {
        self.metadata.modified = Utc::now();
    }
}
