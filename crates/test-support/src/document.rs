use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use curtain_core::{Document, DocumentError, PageSnapshot};

/// A document that hands out a prepared snapshot.
#[derive(Debug)]
pub struct StubDocument {
    snapshot: PageSnapshot,
    enumerations: AtomicUsize,
}

impl StubDocument {
    pub fn new(snapshot: PageSnapshot) -> Self {
        Self {
            snapshot,
            enumerations: AtomicUsize::new(0),
        }
    }

    pub fn enumerations(&self) -> usize {
        self.enumerations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Document for StubDocument {
    async fn snapshot(&self) -> Result<PageSnapshot, DocumentError> {
        self.enumerations.fetch_add(1, Ordering::SeqCst);
        Ok(self.snapshot.clone())
    }
}

/// A document whose enumeration always throws.
#[derive(Debug)]
pub struct FailingDocument;

#[async_trait]
impl Document for FailingDocument {
    async fn snapshot(&self) -> Result<PageSnapshot, DocumentError> {
        Err(DocumentError::enumeration_error("querySelectorAll threw"))
    }
}
