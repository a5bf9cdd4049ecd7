//! Text recognition: OCR backend invocation with page-split fallback.

mod backend;
mod pages;
mod service;
mod store;

pub use backend::{HttpOcrBackend, OcrBackend, OcrInput};
pub use pages::split_pages;
pub use service::{DocumentSource, TextRecognizer};
pub use store::{FsObjectStore, ObjectStore};
