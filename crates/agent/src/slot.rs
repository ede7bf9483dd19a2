//! Single-slot reference to the current submit operation
//!
//! The voice pipeline never captures a session directly. It invokes
//! whatever submitter was most recently placed in the slot.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::SubmitOutcome;

/// Something that accepts guest text
#[async_trait]
pub trait Submitter: Send + Sync {
    async fn submit(&self, text: &str) -> SubmitOutcome;
}

#[derive(Clone, Default)]
pub struct SubmitSlot {
    current: Arc<RwLock<Option<Arc<dyn Submitter>>>>,
}

impl SubmitSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the submitter; later calls always reach this one
    pub fn set(&self, submitter: Arc<dyn Submitter>) {
        *self.current.write() = Some(submitter);
    }

    pub fn clear(&self) {
        *self.current.write() = None;
    }

    pub fn is_set(&self) -> bool {
        self.current.read().is_some()
    }

    /// Forward to the current submitter; `None` when the slot is empty
    pub async fn submit(&self, text: &str) -> Option<SubmitOutcome> {
        let submitter = self.current.read().clone();
        match submitter {
            Some(submitter) => Some(submitter.submit(text).await),
            None => {
                tracing::debug!("Submit slot empty, dropping text");
                None
            }
        }
    }
}
