//! Thread-safe document wrapper for MuPDF
//!
//! MuPDF documents are not thread-safe. This wrapper stores the document
//! source, opens a fresh document for each operation and serializes access
//! through a `parking_lot::Mutex`. No MuPDF object outlives the closure it
//! was created in.

use mupdf::{Document, Page};
use parking_lot::Mutex;

use crate::document::{DocumentError, DocumentResult, DocumentSource};

const PDF_MIME: &str = "application/pdf";

/// Thread-safe document wrapper
pub struct SafeDocument {
    /// Document source data
    source: DocumentSource,
    /// Document identifier
    id: String,
    /// Cached page count
    page_count: usize,
    /// Mutex for serializing access
    _lock: Mutex<()>,
}

// SAFETY: SafeDocument holds no MuPDF object. Its fields are an
// `Arc<Vec<u8>>` or `PathBuf`, a `String`, a `usize` and a
// `parking_lot::Mutex<()>`, all of which are Send + Sync. Every MuPDF
// document is created inside `with_doc`/`with_page` while `_lock` is held
// and dropped before the lock is released, so no document reference escapes
// to another thread.
unsafe impl Send for SafeDocument {}
unsafe impl Sync for SafeDocument {}

impl SafeDocument {
    /// Open and validate a document, caching its page count
    pub fn open(source: DocumentSource, id: String) -> DocumentResult<Self> {
        if let DocumentSource::Bytes(data) = &source {
            if !data.starts_with(b"%PDF") {
                return Err(DocumentError::UnsupportedFormat(
                    "Data does not start with a PDF header".into(),
                ));
            }
        }
        if let DocumentSource::Path(path) = &source {
            if !path.exists() {
                return Err(DocumentError::NotFound(path.display().to_string()));
            }
        }

        let doc = Self::open_source(&source)?;
        let page_count = doc.page_count()? as usize;

        Ok(Self {
            source,
            id,
            page_count,
            _lock: Mutex::new(()),
        })
    }

    /// Get the document ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Number of pages
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    fn open_source(source: &DocumentSource) -> DocumentResult<Document> {
        match source {
            DocumentSource::Bytes(data) => Document::from_bytes(data, PDF_MIME).map_err(Into::into),
            DocumentSource::Path(path) => {
                let path_str = path.to_string_lossy();
                Document::open(&*path_str).map_err(Into::into)
            }
        }
    }

    /// Execute a closure with access to a freshly opened document
    pub fn with_doc<F, R>(&self, f: F) -> DocumentResult<R>
    where
        F: FnOnce(&Document) -> DocumentResult<R>,
    {
        let _guard = self._lock.lock();
        let doc = Self::open_source(&self.source)?;
        f(&doc)
    }

    /// Execute a closure with access to one page
    pub fn with_page<F, R>(&self, page_index: usize, f: F) -> DocumentResult<R>
    where
        F: FnOnce(&Page) -> DocumentResult<R>,
    {
        if page_index >= self.page_count {
            return Err(DocumentError::PageNotFound(page_index));
        }
        self.with_doc(|doc| {
            let page = doc.load_page(page_index as i32)?;
            f(&page)
        })
    }
}
