//! Balance/token conversion
//!
//! Withdraw debits balance and reports how many tokens to mint; deposit
//! consumes tokens and credits balance. The converter's contract ends at
//! the ledger mutation: placing minted tokens into the actor's
//! possession (and handling sink overflow) is the host's job.

use life_ledger::{ActorId, LifeLedger};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Why a withdraw request was rejected
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WithdrawReason {
    /// A zero-token request has nothing to mint
    NothingRequested,
    /// The debit would land the remaining balance below the floor
    InsufficientBalance {
        /// Life points the request would cost
        required: f64,
        /// Balance headroom above the floor at the time of the request
        available: f64,
    },
}

/// Outcome of a withdraw request.
///
/// On rejection the balance is guaranteed unchanged and nothing is
/// minted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WithdrawResult {
    /// Tokens the host should mint
    pub minted_count: u32,

    /// Life points debited from the balance
    pub debited: f64,

    /// Whether the request was rejected
    pub rejected: bool,

    /// Rejection reason, present iff `rejected`
    pub reason: Option<WithdrawReason>,
}

impl WithdrawResult {
    fn rejected(reason: WithdrawReason) -> Self {
        Self {
            minted_count: 0,
            debited: 0.0,
            rejected: true,
            reason: Some(reason),
        }
    }
}

/// Converter between balance and discrete tokens
pub struct TokenConverter {
    ledger: Arc<LifeLedger>,
}

impl TokenConverter {
    /// Wire the converter to the ledger
    pub fn new(ledger: Arc<LifeLedger>) -> Self {
        Self { ledger }
    }

    /// Exchange balance for `count` tokens.
    ///
    /// The floor pre-check and the debit happen atomically in the ledger;
    /// on success the balance is debited by exactly
    /// `count * token_exchange_rate` with no clamping.
    pub fn withdraw(&self, actor: ActorId, count: u32) -> WithdrawResult {
        if count == 0 {
            return WithdrawResult::rejected(WithdrawReason::NothingRequested);
        }

        let policy = self.ledger.policy().current();
        let required = f64::from(count) * policy.token_exchange_rate;

        match self.ledger.debit_exact(actor, required) {
            Some(remaining) => {
                tracing::debug!(
                    actor = %actor,
                    count,
                    cost = required,
                    remaining,
                    "Tokens withdrawn"
                );
                WithdrawResult {
                    minted_count: count,
                    debited: required,
                    rejected: false,
                    reason: None,
                }
            }
            None => {
                let available = (self.ledger.get_balance(actor) - policy.floor).max(0.0);
                WithdrawResult::rejected(WithdrawReason::InsufficientBalance {
                    required,
                    available,
                })
            }
        }
    }

    /// Convert `count` tokens back into balance.
    ///
    /// Returns the life-point gain actually applied after ceiling
    /// clamping. The full token count is considered consumed once this is
    /// invoked; clamped excess gain is an accepted economic leak, because
    /// a token cannot be partially consumed.
    pub fn deposit(&self, actor: ActorId, count: u32) -> f64 {
        let policy = self.ledger.policy().current();
        let gain = f64::from(count) * policy.token_exchange_rate;

        let applied = self.ledger.adjust_balance(actor, gain);
        tracing::debug!(actor = %actor, count, gain, applied, "Tokens deposited");
        applied
    }
}
