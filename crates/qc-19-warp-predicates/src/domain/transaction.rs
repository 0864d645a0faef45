//! # Predicate Transactions
//!
//! A transaction whose access list carries predicates: each access tuple
//! addressed to a predicate contract holds one packed predicate in its
//! storage keys.

use qc_18_warp_messaging::domain::Packer;
use serde::{Deserialize, Serialize};
use shared_crypto::sha256;
use shared_types::{Address, Hash};

use super::predicate::{from_storage_keys, pack_predicate, to_storage_keys};

/// Intrinsic gas of every transaction.
pub const TX_BASE_GAS: u64 = 21_000;

/// One access-list entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTuple {
    /// Accessed contract.
    pub address: Address,
    /// Storage keys; packed predicate bytes for predicate contracts.
    pub storage_keys: Vec<Hash>,
}

/// Transaction with an access list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredicateTransaction {
    /// Sender nonce.
    pub nonce: u64,
    /// Sender.
    pub from: Address,
    /// Callee; `None` for contract creation.
    pub to: Option<Address>,
    /// Transferred value.
    pub value: u64,
    /// Gas limit.
    pub gas_limit: u64,
    /// Gas price.
    pub gas_price: u64,
    /// Call data.
    pub data: Vec<u8>,
    /// Access list.
    pub access_list: Vec<AccessTuple>,
}

impl PredicateTransaction {
    /// SHA-256 of the canonical encoding.
    pub fn hash(&self) -> Hash {
        let mut p = Packer::with_capacity(128 + self.data.len());
        p.pack_u64(self.nonce);
        p.pack_fixed(&self.from);
        match &self.to {
            Some(to) => {
                p.pack_u8(1);
                p.pack_fixed(to);
            }
            None => p.pack_u8(0),
        }
        p.pack_u64(self.value);
        p.pack_u64(self.gas_limit);
        p.pack_u64(self.gas_price);
        p.pack_bytes(&self.data);
        p.pack_u32(self.access_list.len() as u32);
        for tuple in &self.access_list {
            p.pack_fixed(&tuple.address);
            p.pack_u32(tuple.storage_keys.len() as u32);
            for key in &tuple.storage_keys {
                p.pack_fixed(key);
            }
        }
        sha256(&p.finish())
    }

    /// Packed predicates addressed to `address`, in access-list order.
    pub fn predicates_for(&self, address: &Address) -> Vec<Vec<u8>> {
        self.access_list
            .iter()
            .filter(|t| &t.address == address)
            .map(|t| from_storage_keys(&t.storage_keys))
            .collect()
    }

    /// Whether any access tuple targets one of `addresses`.
    pub fn has_predicates<'a, I>(&self, addresses: I) -> bool
    where
        I: IntoIterator<Item = &'a Address>,
    {
        let addresses: Vec<&Address> = addresses.into_iter().collect();
        self.access_list
            .iter()
            .any(|t| addresses.contains(&&t.address))
    }
}

/// Build a call carrying `predicate` for `predicate_address` as the last
/// access tuple.
#[allow(clippy::too_many_arguments)]
pub fn new_predicate_tx(
    nonce: u64,
    from: Address,
    to: Option<Address>,
    gas_limit: u64,
    gas_price: u64,
    data: Vec<u8>,
    mut access_list: Vec<AccessTuple>,
    predicate_address: Address,
    predicate: &[u8],
) -> PredicateTransaction {
    access_list.push(AccessTuple {
        address: predicate_address,
        storage_keys: to_storage_keys(&pack_predicate(predicate)),
    });
    PredicateTransaction {
        nonce,
        from,
        to,
        value: 0,
        gas_limit,
        gas_price,
        data,
        access_list,
    }
}
