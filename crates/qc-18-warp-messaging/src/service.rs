//! Warp Backend Service
//!
//! Tracks messages emitted by executing blocks and signs them once their
//! block is accepted. A message is never signed before acceptance, and a
//! rejected block's messages are forgotten unless another block also
//! emitted them.

use std::collections::{HashMap, HashSet};

use parking_lot::{Mutex, RwLock};
use quantum_telemetry::{
    log_event, log_message_event, metric_inc, WARP_MESSAGES_DROPPED,
    WARP_MESSAGES_RECORDED, WARP_MESSAGES_SIGNED, WARP_SIGNATURE_REQUESTS,
};
use rayon::prelude::*;
use shared_crypto::BLS_SIGNATURE_LEN;
use shared_types::{Hash, MessageId};
use tracing::info;

use crate::config::WarpConfig;
use crate::domain::{new_block_hash_payload, UnsignedMessage};
use crate::error::{WarpError, WarpResult};
use crate::ports::{WarpBackendApi, WarpSigner};

const SUBSYSTEM: &str = "qc-18";

#[derive(Clone, Debug, PartialEq, Eq)]
enum MessageState {
    Pending,
    Accepted { signature: [u8; BLS_SIGNATURE_LEN] },
}

#[derive(Clone, Debug)]
struct StoredMessage {
    message: UnsignedMessage,
    state: MessageState,
}

#[derive(Default)]
struct BackendState {
    messages: HashMap<MessageId, StoredMessage>,
    /// Messages emitted by blocks not yet decided.
    pending_by_block: HashMap<Hash, Vec<MessageId>>,
    accepted_blocks: HashSet<Hash>,
    block_signatures: HashMap<Hash, [u8; BLS_SIGNATURE_LEN]>,
}

impl BackendState {
    fn referenced_elsewhere(&self, id: &MessageId) -> bool {
        self.pending_by_block.values().any(|ids| ids.contains(id))
    }
}

/// Warp backend for one chain.
pub struct WarpBackend<S: WarpSigner> {
    config: WarpConfig,
    signer: S,
    state: RwLock<BackendState>,
    /// Serializes accept and reject.
    decision: Mutex<()>,
}

impl<S: WarpSigner> WarpBackend<S> {
    /// Create a backend signing with `signer`.
    ///
    /// # Errors
    /// * `WarpError::SignerMismatch` - `signer` signs for another chain or
    ///   network than `config`
    pub fn new(config: WarpConfig, signer: S) -> WarpResult<Self> {
        if signer.network_id() != config.network_id || signer.chain_id() != config.chain_id {
            return Err(WarpError::SignerMismatch {
                network: config.network_id,
                chain: config.chain_id,
                signer_network: signer.network_id(),
                signer_chain: signer.chain_id(),
            });
        }
        info!(
            "[qc-18] Initializing warp backend for chain {} on network {}",
            config.chain_id, config.network_id
        );
        Ok(Self {
            config,
            signer,
            state: RwLock::new(BackendState::default()),
            decision: Mutex::new(()),
        })
    }

    /// Chain configuration.
    pub fn config(&self) -> &WarpConfig {
        &self.config
    }

    /// Signing key.
    pub fn signer(&self) -> &S {
        &self.signer
    }

    /// Messages recorded but not yet signed.
    pub fn pending_count(&self) -> usize {
        self.state
            .read()
            .messages
            .values()
            .filter(|m| m.state == MessageState::Pending)
            .count()
    }

    /// Messages signed.
    pub fn accepted_count(&self) -> usize {
        self.state.read().messages.len() - self.pending_count()
    }

    fn check_origin(&self, message: &UnsignedMessage) -> WarpResult<()> {
        if message.network_id() != self.config.network_id {
            return Err(WarpError::WrongNetwork {
                expected: self.config.network_id,
                actual: message.network_id(),
            });
        }
        if message.source_chain_id() != self.config.chain_id {
            return Err(WarpError::WrongSourceChain {
                expected: self.config.chain_id,
                actual: message.source_chain_id(),
            });
        }
        Ok(())
    }

    fn sign_all(
        &self,
        messages: Vec<(MessageId, UnsignedMessage)>,
    ) -> WarpResult<Vec<(MessageId, [u8; BLS_SIGNATURE_LEN])>> {
        messages
            .into_par_iter()
            .map(|(id, message)| self.signer.sign(&message).map(|sig| (id, sig)))
            .collect()
    }
}

impl<S: WarpSigner> WarpBackendApi for WarpBackend<S> {
    fn add_message(&self, block_hash: Hash, message: UnsignedMessage) -> WarpResult<MessageId> {
        self.check_origin(&message)?;
        let id = message.id();

        let mut state = self.state.write();
        if state.accepted_blocks.contains(&block_hash) {
            drop(state);
            let signature = self.signer.sign(&message)?;
            let mut state = self.state.write();
            state.messages.insert(
                id,
                StoredMessage {
                    message,
                    state: MessageState::Accepted { signature },
                },
            );
            return Ok(id);
        }

        state.messages.entry(id).or_insert(StoredMessage {
            message,
            state: MessageState::Pending,
        });
        let ids = state.pending_by_block.entry(block_hash).or_default();
        if !ids.contains(&id) {
            ids.push(id);
            metric_inc!(WARP_MESSAGES_RECORDED);
            log_message_event!(debug, SUBSYSTEM, "Warp message recorded", id);
        }
        Ok(id)
    }

    fn accept_block(&self, block_hash: &Hash) -> WarpResult<()> {
        let _decision = self.decision.lock();

        let to_sign: Vec<(MessageId, UnsignedMessage)> = {
            let state = self.state.read();
            state
                .pending_by_block
                .get(block_hash)
                .into_iter()
                .flatten()
                .filter_map(|id| state.messages.get(id).map(|m| (*id, m)))
                .filter(|(_, m)| m.state == MessageState::Pending)
                .map(|(id, m)| (id, m.message.clone()))
                .collect()
        };

        let signed = self.sign_all(to_sign)?;

        let mut state = self.state.write();
        state.pending_by_block.remove(block_hash);
        state.accepted_blocks.insert(*block_hash);
        for (id, signature) in &signed {
            if let Some(stored) = state.messages.get_mut(id) {
                stored.state = MessageState::Accepted {
                    signature: *signature,
                };
            }
        }
        drop(state);

        WARP_MESSAGES_SIGNED.inc_by(signed.len() as f64);
        log_event!(
            info,
            SUBSYSTEM,
            "Block accepted, warp messages signed",
            block_hash = ?block_hash,
            signed = signed.len()
        );
        Ok(())
    }

    fn reject_block(&self, block_hash: &Hash) -> WarpResult<()> {
        let _decision = self.decision.lock();

        let mut state = self.state.write();
        let ids = state.pending_by_block.remove(block_hash).unwrap_or_default();
        let mut dropped = 0usize;
        for id in ids {
            let pending = matches!(
                state.messages.get(&id).map(|m| &m.state),
                Some(MessageState::Pending)
            );
            if pending && !state.referenced_elsewhere(&id) {
                state.messages.remove(&id);
                dropped += 1;
            }
        }
        drop(state);

        WARP_MESSAGES_DROPPED.inc_by(dropped as f64);
        info!(
            "[qc-18] Block {:?} rejected, dropped {} warp messages",
            block_hash, dropped
        );
        Ok(())
    }

    fn get_signature(&self, message_id: &MessageId) -> WarpResult<[u8; BLS_SIGNATURE_LEN]> {
        let state = self.state.read();
        match state.messages.get(message_id).map(|m| &m.state) {
            Some(MessageState::Accepted { signature }) => {
                metric_inc!(WARP_SIGNATURE_REQUESTS, &["message", "ok"]);
                Ok(*signature)
            }
            _ => {
                metric_inc!(WARP_SIGNATURE_REQUESTS, &["message", "not_found"]);
                Err(WarpError::NotFound {
                    message_id: *message_id,
                })
            }
        }
    }

    fn get_message(&self, message_id: &MessageId) -> WarpResult<UnsignedMessage> {
        self.state
            .read()
            .messages
            .get(message_id)
            .map(|m| m.message.clone())
            .ok_or(WarpError::NotFound {
                message_id: *message_id,
            })
    }

    fn get_block_signature(&self, block_hash: &Hash) -> WarpResult<[u8; BLS_SIGNATURE_LEN]> {
        {
            let state = self.state.read();
            if !state.accepted_blocks.contains(block_hash) {
                metric_inc!(WARP_SIGNATURE_REQUESTS, &["block", "not_found"]);
                return Err(WarpError::BlockNotAccepted {
                    block_hash: *block_hash,
                });
            }
            if let Some(signature) = state.block_signatures.get(block_hash) {
                metric_inc!(WARP_SIGNATURE_REQUESTS, &["block", "ok"]);
                return Ok(*signature);
            }
        }

        let message = UnsignedMessage::new(
            self.config.network_id,
            self.config.chain_id,
            new_block_hash_payload(*block_hash),
        )?;
        let signature = self.signer.sign(&message)?;
        self.state
            .write()
            .block_signatures
            .insert(*block_hash, signature);
        metric_inc!(WARP_SIGNATURE_REQUESTS, &["block", "ok"]);
        Ok(signature)
    }

    fn forget_block(&self, block_hash: &Hash) {
        let mut state = self.state.write();
        state.accepted_blocks.remove(block_hash);
        state.block_signatures.remove(block_hash);
    }
}
