//! Transaction execution receipts.

use qc_18_warp_messaging::contract::Log;
use shared_types::Hash;

/// Execution outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReceiptStatus {
    /// Call completed.
    Success,
    /// Call reverted; the transaction still consumed gas.
    Reverted {
        /// Revert reason
        reason: String,
    },
}

/// Result of executing one transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    /// Executed transaction.
    pub tx_hash: Hash,
    /// Outcome.
    pub status: ReceiptStatus,
    /// Gas consumed, intrinsic gas included.
    pub gas_used: u64,
    /// Return data.
    pub output: Vec<u8>,
    /// Emitted logs; empty on revert.
    pub logs: Vec<Log>,
}

impl Receipt {
    /// Whether the call completed.
    pub fn is_success(&self) -> bool {
        self.status == ReceiptStatus::Success
    }
}
