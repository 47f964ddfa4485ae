//! Core types for the life economy
//!
//! All types are designed for:
//! - Stable identity across disconnect/reconnect (UUID-keyed actors)
//! - Reported outcomes (clamping and rejection are values, not errors)

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Tolerance for floor/threshold comparisons on `f64` balances.
///
/// Shared by the elimination threshold check and the withdraw floor
/// pre-check so both sides of the economy agree on "at the floor".
pub const BALANCE_EPSILON: f64 = 1e-6;

/// Stable actor identity.
///
/// Opaque and independent of display name or network session; the same
/// actor keeps the same `ActorId` across disconnects. The derived `Ord`
/// gives the total order used for deterministic lock acquisition in
/// [`crate::LifeLedger::transfer`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ActorId(Uuid);

impl ActorId {
    /// Wrap an existing identity
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Fresh random identity (hosts without an identity source, tests)
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Parse from the canonical hyphenated string form
    pub fn parse_str(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-actor balance record.
///
/// Created lazily on first mutating access with the configured default
/// balance. Mutated exclusively through [`crate::LifeLedger`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LifeRecord {
    /// Current maximum life points, `floor <= balance <= ceiling`
    pub balance: f64,
}

/// Outcome of a kill transfer.
///
/// Each leg is clamped independently against its own boundary; either leg
/// may be smaller than requested (or zero) without affecting the other.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransferResult {
    /// Life points actually removed from the loser
    pub actual_loss: f64,

    /// Life points actually credited to the gainer
    pub actual_gain: f64,
}

impl TransferResult {
    /// True when both legs were fully absorbed by boundaries
    pub fn is_noop(&self) -> bool {
        self.actual_loss == 0.0 && self.actual_gain == 0.0
    }
}

/// Elimination consequence mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EliminationMode {
    /// Remove the actor from the live session
    Exile,
    /// Keep the actor connected but non-participating
    Restrict,
}

impl fmt::Display for EliminationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EliminationMode::Exile => write!(f, "exile"),
            EliminationMode::Restrict => write!(f, "restrict"),
        }
    }
}

/// Structured user-visible event.
///
/// The core supplies only the event kind and the applied amounts; message
/// content and formatting are entirely the host's responsibility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LifeEvent {
    /// Actor lost life points as the loser of a kill
    KillLoss {
        /// Applied loss after floor clamping
        amount: f64,
    },
    /// Actor gained life points as the gainer of a kill
    KillGain {
        /// Applied gain after ceiling clamping
        amount: f64,
    },
    /// Actor lost life points to a natural cause
    NaturalLoss {
        /// Applied loss after floor clamping
        amount: f64,
    },
    /// Actor lost life points to a monster
    MonsterLoss {
        /// Applied loss after floor clamping
        amount: f64,
    },
    /// Balance was exchanged for tokens
    TokensWithdrawn {
        /// Tokens minted
        count: u32,
        /// Life points debited
        cost: f64,
    },
    /// A withdraw request was rejected, balance untouched
    WithdrawRejected {
        /// Tokens requested
        count: u32,
        /// Life points the request would have cost
        required: f64,
        /// Balance headroom above the floor at the time of the request
        available: f64,
    },
    /// Tokens were converted back into balance
    TokensDeposited {
        /// Tokens consumed
        count: u32,
        /// Applied gain after ceiling clamping
        gain: f64,
    },
    /// Actor crossed the elimination threshold
    Eliminated {
        /// Consequence mode in effect at the transition
        mode: EliminationMode,
    },
    /// Actor was restored to active participation
    Revived {
        /// Balance after revival
        balance: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_id_roundtrip() {
        let id = ActorId::random();
        let parsed = ActorId::parse_str(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_actor_id_rejects_garbage() {
        assert!(ActorId::parse_str("not-a-uuid").is_none());
    }

    #[test]
    fn test_actor_id_total_order() {
        let mut ids = vec![ActorId::random(), ActorId::random(), ActorId::random()];
        ids.sort();
        for pair in ids.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn test_transfer_result_noop() {
        assert!(TransferResult {
            actual_loss: 0.0,
            actual_gain: 0.0
        }
        .is_noop());
        assert!(!TransferResult {
            actual_loss: 2.0,
            actual_gain: 0.0
        }
        .is_noop());
    }
}
