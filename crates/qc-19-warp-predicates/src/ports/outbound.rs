//! # Outbound Ports (Driven Ports / SPI)

use qc_18_warp_messaging::contract::{CallContext, ContractError, PrecompileOutput};

use crate::domain::{PredicateError, PredicateFailure, ProposerContext};

/// Verifies predicates addressed to one predicate contract.
///
/// Both methods take the predicate as packed in the access list.
pub trait Predicater: Send + Sync {
    /// Gas charged up front for carrying `packed`.
    ///
    /// # Errors
    /// Fails when the predicate cannot be decoded; the transaction is then
    /// invalid.
    fn predicate_gas(&self, packed: &[u8]) -> Result<u64, PredicateError>;

    /// Verify `packed` under the proposer's context. Deterministic for a
    /// given `(context, packed, registry state)`.
    fn verify_predicate(
        &self,
        context: Option<&ProposerContext>,
        packed: &[u8],
    ) -> Result<(), PredicateFailure>;
}

/// A contract reachable from transactions.
pub trait ContractHandler: Send + Sync {
    /// Execute ABI call data.
    fn call(
        &self,
        ctx: &CallContext<'_>,
        input: &[u8],
        gas_limit: u64,
    ) -> Result<PrecompileOutput, ContractError>;
}
