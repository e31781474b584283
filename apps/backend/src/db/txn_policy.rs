//! Process-wide switch deciding what `with_txn` does with a successful
//! transaction.

use once_cell::sync::OnceCell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TxnPolicy {
    /// Persist the work of a successful closure.
    #[default]
    CommitOnOk,
    /// Discard the work even on success. Test binaries install this to
    /// keep a shared database clean.
    RollbackOnOk,
}

static POLICY: OnceCell<TxnPolicy> = OnceCell::new();

/// Policy in force; `CommitOnOk` until something installs another one.
pub fn current() -> TxnPolicy {
    POLICY.get().copied().unwrap_or_default()
}

/// Install the policy for this process. First caller wins; later calls
/// are ignored so parallel test setup cannot flip it mid-run.
pub fn set_txn_policy(policy: TxnPolicy) {
    if POLICY.set(policy).is_err() && current() != policy {
        tracing::warn!(?policy, active = ?current(), "transaction policy already installed");
    }
}
