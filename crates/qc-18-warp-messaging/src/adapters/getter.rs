//! Signature getter over in-process warp backends.
//!
//! Maps each validator to the backend that holds its key. Used by
//! single-process networks and tests; a networked getter implements the
//! same port.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use shared_crypto::BLS_SIGNATURE_LEN;
use shared_types::NodeId;

use crate::domain::UnsignedMessage;
use crate::error::{WarpError, WarpResult};
use crate::ports::{SignatureGetter, WarpBackendApi};

/// Fetches signatures straight from each validator's backend.
#[derive(Default)]
pub struct BackendSignatureGetter {
    backends: RwLock<HashMap<NodeId, Arc<dyn WarpBackendApi>>>,
}

impl BackendSignatureGetter {
    /// Empty getter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Route requests for `node_id` to `backend`.
    pub fn register(&self, node_id: NodeId, backend: Arc<dyn WarpBackendApi>) {
        self.backends.write().insert(node_id, backend);
    }
}

impl SignatureGetter for BackendSignatureGetter {
    fn get_signature(
        &self,
        node_id: &NodeId,
        message: &UnsignedMessage,
    ) -> WarpResult<[u8; BLS_SIGNATURE_LEN]> {
        let backend = self.backends.read().get(node_id).cloned().ok_or_else(|| {
            WarpError::SignatureUnavailable {
                node_id: *node_id,
                reason: "unknown peer".into(),
            }
        })?;
        backend
            .get_signature(&message.id())
            .map_err(|e| WarpError::SignatureUnavailable {
                node_id: *node_id,
                reason: e.to_string(),
            })
    }
}
