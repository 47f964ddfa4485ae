//! Elimination state machine
//!
//! `Active` is implicit (absence of a roster record); `Eliminated` is
//! explicit (presence). The engine is the sole writer of the roster.
//!
//! Transitions report through return values: `false` always means "no
//! state change occurred", which is a valid, expected outcome, not an
//! error. Consequence hooks are scheduled requests; the engine never
//! waits for the host to finish enacting them.

use crate::store::EliminationStore;
use life_ledger::{ActorId, HostHooks, LifeEvent, LifeLedger, BALANCE_EPSILON};
use std::sync::Arc;

/// Per-actor Active/Eliminated lifecycle driver
pub struct EliminationEngine {
    ledger: Arc<LifeLedger>,
    store: Arc<EliminationStore>,
    hooks: Arc<dyn HostHooks>,
}

impl EliminationEngine {
    /// Wire the engine to its collaborators
    pub fn new(
        ledger: Arc<LifeLedger>,
        store: Arc<EliminationStore>,
        hooks: Arc<dyn HostHooks>,
    ) -> Self {
        Self {
            ledger,
            store,
            hooks,
        }
    }

    /// Eliminate `actor` if the balance sits at or below the threshold.
    ///
    /// Must be invoked synchronously after any balance-decreasing
    /// operation on `actor`, in the same logical operation; every
    /// loss-causing call site owns that obligation.
    ///
    /// Returns whether a transition occurred. Already-eliminated actors
    /// are a no-op: repeated crossings never re-fire the consequence.
    pub fn check_and_eliminate(&self, actor: ActorId) -> bool {
        let policy = self.ledger.policy().current();

        if !policy.elimination_enabled {
            return false;
        }
        if self.ledger.get_balance(actor) > policy.floor + BALANCE_EPSILON {
            return false;
        }

        let newly_added = match self.store.add(actor) {
            Ok(newly_added) => newly_added,
            Err(e) => {
                // In-memory state stays authoritative; a crash before the
                // next successful write loses this transition, an
                // accepted risk at this write frequency.
                tracing::warn!(actor = %actor, error = %e, "Elimination persisted in memory only");
                true
            }
        };
        if !newly_added {
            // Already eliminated, possibly by a concurrent crossing
            return false;
        }

        tracing::info!(actor = %actor, mode = %policy.elimination_mode, "Actor eliminated");

        self.hooks
            .apply_consequence(actor, policy.elimination_mode);
        self.hooks.notify(
            actor,
            LifeEvent::Eliminated {
                mode: policy.elimination_mode,
            },
        );

        true
    }

    /// Return `actor` to active participation with a fresh balance.
    ///
    /// `false` when the actor is not currently eliminated. The restored
    /// balance overwrites any residual balance; it does not add to it.
    pub fn revive(&self, actor: ActorId) -> bool {
        match self.store.remove(actor) {
            Ok(true) => {}
            Ok(false) => return false,
            Err(e) => {
                tracing::warn!(actor = %actor, error = %e, "Revival persisted in memory only");
            }
        }

        let policy = self.ledger.policy().current();
        let applied = self.ledger.set_balance(actor, policy.revival_balance);

        tracing::info!(actor = %actor, balance = applied, "Actor revived");

        self.hooks.restore_participation(actor);
        self.hooks
            .notify(actor, LifeEvent::Revived { balance: applied });

        true
    }

    /// Whether `actor` is currently eliminated
    pub fn is_eliminated(&self, actor: ActorId) -> bool {
        self.store.contains(actor)
    }

    /// Identities of all currently eliminated actors
    pub fn list_eliminated(&self) -> Vec<ActorId> {
        self.store.all()
    }
}
