//! # Test Fixtures
//!
//! A network of two chains sharing one validator set:
//!
//! - the **local** chain, validated by [`LOCAL_SUBNET`], which receives
//!   messages and runs the predicate block service
//! - a **source** chain on the primary network, whose messages are checked
//!   against the local subnet's validators
//!
//! Validator `i` has node id `[i + 1; 20]`, so the canonical order is the
//! creation order. Validator sets are recorded at [`MINIMUM_HEIGHT`]; any
//! lower height is unavailable.

use std::collections::BTreeMap;
use std::sync::Arc;

use qc_18_warp_messaging::contract::WarpContract;
use qc_18_warp_messaging::{
    new_addressed_payload, new_block_hash_payload, BackendSignatureGetter, BitSet,
    BitSetSignature, InMemoryValidatorRegistry, LocalWarpSigner, QuorumThreshold,
    SignedMessage, UnsignedMessage, ValidatorInfo, VerificationContext, WarpBackend,
    WarpBackendApi, WarpConfig, WarpMessageVerifier, WARP_CONTRACT_ADDRESS,
};
use qc_19_warp_predicates::{
    BlockExecutor, PredicateBlockService, PredicateConfig, Predicater, PredicaterSet,
    WarpMessageReceiver, WarpPredicater,
};
use shared_crypto::{BlsKeyPair, BlsSignature};
use shared_types::{Address, ChainId, Hash, NodeId, SubnetId};

/// Network id of every fixture chain.
pub const NETWORK_ID: u32 = 1337;

/// Lowest height with a recorded validator set.
pub const MINIMUM_HEIGHT: u64 = 10;

/// Receiving chain.
pub const LOCAL_CHAIN: ChainId = ChainId([0xC1; 32]);

/// Subnet validating the receiving chain.
pub const LOCAL_SUBNET: SubnetId = SubnetId([0x5B; 32]);

/// Sending chain, validated by the primary network.
pub const SOURCE_CHAIN: ChainId = ChainId([0x5C; 32]);

/// Where the receiving contract lives.
pub const RECEIVER_ADDRESS: Address = [0xE0; 20];

/// Externally owned account sending transactions.
pub const SENDER: Address = [0xAA; 20];

/// Validators, registry and keys of the fixture network.
pub struct WarpTestbed {
    /// Keys in canonical order.
    pub keys: Vec<BlsKeyPair>,
    /// Node ids in canonical order.
    pub node_ids: Vec<NodeId>,
    /// Weights in canonical order.
    pub weights: Vec<u64>,
    /// Shared registry.
    pub registry: Arc<InMemoryValidatorRegistry>,
}

impl WarpTestbed {
    /// Network with one validator per weight.
    pub fn new(weights: &[u64]) -> Self {
        let keys: Vec<BlsKeyPair> = (0..weights.len())
            .map(|i| BlsKeyPair::from_seed(&[i as u8 + 1; 32]).unwrap())
            .collect();
        let node_ids: Vec<NodeId> = (0..weights.len())
            .map(|i| NodeId([i as u8 + 1; 20]))
            .collect();
        let validators = keys
            .iter()
            .zip(&node_ids)
            .zip(weights)
            .map(|((key, node_id), weight)| ValidatorInfo {
                node_id: *node_id,
                public_key: key.public_key(),
                weight: *weight,
            })
            .collect();

        let registry = InMemoryValidatorRegistry::new(MINIMUM_HEIGHT)
            .with_chain(LOCAL_CHAIN, LOCAL_SUBNET)
            .with_chain(SOURCE_CHAIN, SubnetId::PRIMARY_NETWORK)
            .with_validators(LOCAL_SUBNET, MINIMUM_HEIGHT, validators);

        Self {
            keys,
            node_ids,
            weights: weights.to_vec(),
            registry: Arc::new(registry),
        }
    }

    /// Two validators of weight 50.
    pub fn two_validators() -> Self {
        Self::new(&[50, 50])
    }

    /// Chain configuration of the receiving chain.
    pub fn warp_config(&self) -> WarpConfig {
        WarpConfig::for_chain(NETWORK_ID, LOCAL_CHAIN, LOCAL_SUBNET)
    }

    /// Verification parameters of the receiving chain.
    pub fn context(&self) -> VerificationContext {
        VerificationContext {
            network_id: NETWORK_ID,
            local_subnet_id: LOCAL_SUBNET,
            quorum: QuorumThreshold::default(),
            require_primary_network_signers: false,
        }
    }

    /// Verifier of the receiving chain.
    pub fn verifier(&self) -> WarpMessageVerifier {
        WarpMessageVerifier::new(self.registry.clone(), self.context())
    }

    /// Aggregate the signatures of `signers` over `unsigned`.
    pub fn sign(&self, unsigned: &UnsignedMessage, signers: &[usize]) -> SignedMessage {
        let bytes = unsigned.to_bytes();
        let signatures: Vec<BlsSignature> =
            signers.iter().map(|&i| self.keys[i].sign(&bytes)).collect();
        let aggregate = BlsSignature::aggregate(signatures.iter()).unwrap();
        SignedMessage::new(
            unsigned.clone(),
            BitSetSignature::new(
                BitSet::from_indices(signers.iter().copied()),
                aggregate.to_bytes(),
            ),
        )
    }

    /// Sign with every validator.
    pub fn sign_all(&self, unsigned: &UnsignedMessage) -> SignedMessage {
        let all: Vec<usize> = (0..self.keys.len()).collect();
        self.sign(unsigned, &all)
    }

    /// One backend per validator of the receiving chain, plus a getter
    /// routing to them.
    pub fn backends(
        &self,
    ) -> (
        Vec<Arc<WarpBackend<LocalWarpSigner>>>,
        Arc<BackendSignatureGetter>,
    ) {
        let getter = Arc::new(BackendSignatureGetter::new());
        let backends: Vec<_> = (0..self.keys.len())
            .map(|i| {
                let key = BlsKeyPair::from_seed(&[i as u8 + 1; 32]).unwrap();
                let backend = Arc::new(
                    WarpBackend::new(
                        self.warp_config(),
                        LocalWarpSigner::new(key, NETWORK_ID, LOCAL_CHAIN),
                    )
                    .unwrap(),
                );
                getter.register(self.node_ids[i], backend.clone());
                backend
            })
            .collect();
        (backends, getter)
    }

    /// Predicate block service of the receiving chain, with the receiving
    /// contract deployed at [`RECEIVER_ADDRESS`].
    pub fn block_service(&self, backend: Arc<dyn WarpBackendApi>) -> PredicateBlockService {
        let warp = Arc::new(WarpContract::new(NETWORK_ID, LOCAL_CHAIN));
        let executor = BlockExecutor::new(warp.clone()).with_handler(
            RECEIVER_ADDRESS,
            Arc::new(WarpMessageReceiver::new(warp)),
        );
        let mut predicaters: PredicaterSet = BTreeMap::new();
        predicaters.insert(
            WARP_CONTRACT_ADDRESS,
            Arc::new(WarpPredicater::new(self.verifier())) as Arc<dyn Predicater>,
        );
        PredicateBlockService::new(PredicateConfig::default(), predicaters, executor, backend)
            .unwrap()
    }
}

/// Message from the source chain addressed to the receiving chain.
pub fn addressed_message(
    sender: Address,
    destination_address: Address,
    payload: &[u8],
) -> UnsignedMessage {
    let addressed =
        new_addressed_payload(sender, LOCAL_CHAIN, destination_address, payload).unwrap();
    UnsignedMessage::new(NETWORK_ID, SOURCE_CHAIN, addressed).unwrap()
}

/// Block hash attestation from the source chain.
pub fn block_hash_message(block_hash: Hash) -> UnsignedMessage {
    UnsignedMessage::new(NETWORK_ID, SOURCE_CHAIN, new_block_hash_payload(block_hash)).unwrap()
}
