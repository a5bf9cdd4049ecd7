//! CLI subcommands.

pub mod batch;
pub mod layouts;
pub mod process;

use std::sync::Arc;

use tickex_core::{
    DocumentExtractor, FsObjectStore, HttpOcrBackend, LayoutRegistry, TextRecognizer, TickexConfig,
};

/// Load configuration from the given path, or defaults when absent.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<TickexConfig> {
    match config_path {
        Some(path) => Ok(TickexConfig::from_file(std::path::Path::new(path))?),
        None => Ok(TickexConfig::default()),
    }
}

/// Wire up the extraction pipeline: HTTP OCR backend, filesystem object
/// store, and the built-in layout registry.
pub fn build_extractor(config: &TickexConfig) -> anyhow::Result<DocumentExtractor> {
    let backend = HttpOcrBackend::new(&config.recognition)
        .map_err(|e| anyhow::anyhow!("Failed to set up OCR backend: {}", e))?;
    let store = FsObjectStore::new(config.storage.root.clone());
    let recognizer = TextRecognizer::new(Arc::new(backend), Arc::new(store));
    let registry = LayoutRegistry::builder().with_builtin_layouts().build();

    Ok(DocumentExtractor::new(recognizer, registry))
}
