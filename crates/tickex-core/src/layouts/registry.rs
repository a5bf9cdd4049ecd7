//! Layout parser registry.
//!
//! An explicit object built once at startup and shared read-only by all
//! extractions. No global mutable state, no register-on-import side
//! effects.

use std::sync::Arc;

use crate::models::document::DocumentType;

use super::LayoutParser;
use super::manifest::ManifestLayout1;
use super::weighing::{WeighingLayout1, WeighingLayout2};

/// Read-only registry of layout parsers, in registration order.
pub struct LayoutRegistry {
    parsers: Vec<Arc<dyn LayoutParser>>,
}

impl LayoutRegistry {
    /// Start building a registry.
    pub fn builder() -> LayoutRegistryBuilder {
        LayoutRegistryBuilder {
            parsers: Vec::new(),
        }
    }

    /// All registered parsers, in registration order.
    pub fn all(&self) -> &[Arc<dyn LayoutParser>] {
        &self.parsers
    }

    /// Parsers registered for one document type, in registration order.
    pub fn parsers_for(&self, document_type: DocumentType) -> Vec<&Arc<dyn LayoutParser>> {
        self.parsers
            .iter()
            .filter(|parser| parser.document_type() == document_type)
            .collect()
    }

    /// Look up one parser by its (document type, layout id) key.
    pub fn get(&self, document_type: DocumentType, layout_id: &str) -> Option<&Arc<dyn LayoutParser>> {
        self.parsers.iter().find(|parser| {
            parser.document_type() == document_type && parser.layout_id() == layout_id
        })
    }

    /// All registered (document type, layout id) keys, for listings.
    pub fn layout_keys(&self) -> Vec<(DocumentType, &'static str)> {
        self.parsers
            .iter()
            .map(|parser| (parser.document_type(), parser.layout_id()))
            .collect()
    }
}

/// Builder for [`LayoutRegistry`].
pub struct LayoutRegistryBuilder {
    parsers: Vec<Arc<dyn LayoutParser>>,
}

impl LayoutRegistryBuilder {
    /// Register one parser. Registration order is the tie-break order
    /// during selection.
    pub fn register(mut self, parser: impl LayoutParser + 'static) -> Self {
        self.parsers.push(Arc::new(parser));
        self
    }

    /// Register all layouts shipped with this crate.
    pub fn with_builtin_layouts(self) -> Self {
        self.register(WeighingLayout1)
            .register(WeighingLayout2)
            .register(ManifestLayout1)
    }

    /// Finish building.
    pub fn build(self) -> LayoutRegistry {
        LayoutRegistry {
            parsers: self.parsers,
        }
    }
}

/// Fallback layout ids per document type, independent of what happens to
/// be registered. Consumed by the CLI's layout listing.
pub fn default_layout_ids(document_type: DocumentType) -> Vec<&'static str> {
    match document_type {
        DocumentType::WeighingTicket => vec!["layout-1", "layout-2"],
        DocumentType::TransportManifest => vec!["layout-1"],
    }
}
