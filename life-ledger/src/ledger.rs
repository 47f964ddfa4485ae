//! Authoritative balance mutation
//!
//! [`LifeLedger`] is the sole writer of every actor's life-point balance.
//! The floor/ceiling invariants hold at every observable point: each
//! operation computes a clamped target under the record's lock and stores
//! only the clamped value. Clamping is a reported outcome, not an error.
//!
//! The record map is safe for concurrent single-key access from any
//! worker. The one dual-key operation, [`LifeLedger::transfer`], acquires
//! both record locks in the total order given by [`ActorId`] so opposing
//! transfers on the same pair can never deadlock.

use crate::config::{PolicyConfig, PolicyHandle};
use crate::types::{ActorId, LifeRecord, TransferResult};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// Sole authority over actor balances
pub struct LifeLedger {
    /// Per-actor records, each behind its own lock
    records: DashMap<ActorId, Arc<Mutex<LifeRecord>>>,

    /// Shared policy snapshot
    policy: PolicyHandle,
}

impl LifeLedger {
    /// Create an empty ledger
    pub fn new(policy: PolicyHandle) -> Self {
        Self {
            records: DashMap::new(),
            policy,
        }
    }

    /// Policy handle shared with the other services
    pub fn policy(&self) -> &PolicyHandle {
        &self.policy
    }

    /// Fetch or lazily create the record for `actor`.
    ///
    /// The shard reference is dropped before the caller locks the record;
    /// no operation ever holds two map shards at once.
    fn record(&self, actor: ActorId, default_balance: f64) -> Arc<Mutex<LifeRecord>> {
        self.records
            .entry(actor)
            .or_insert_with(|| {
                Arc::new(Mutex::new(LifeRecord {
                    balance: default_balance,
                }))
            })
            .clone()
    }

    fn clamp(policy: &PolicyConfig, target: f64) -> f64 {
        let mut value = target.max(policy.floor);
        if policy.ceiling_enabled {
            value = value.min(policy.ceiling);
        }
        value
    }

    /// Current balance; unknown actors read as the default balance.
    ///
    /// No side effects: looking at an actor does not create a record.
    pub fn get_balance(&self, actor: ActorId) -> f64 {
        match self.records.get(&actor) {
            Some(record) => record.lock().balance,
            None => self.policy.current().default_balance,
        }
    }

    /// Clamp `target` to `[floor, ceiling]` and store it.
    ///
    /// Returns the value actually applied so the caller can compute the
    /// true delta for messaging and auditing.
    pub fn set_balance(&self, actor: ActorId, target: f64) -> f64 {
        let policy = self.policy.current();
        let record = self.record(actor, policy.default_balance);
        let mut guard = record.lock();

        let applied = Self::clamp(&policy, target);
        guard.balance = applied;

        tracing::debug!(actor = %actor, target, applied, "Balance set");
        applied
    }

    /// Apply `delta` to the current balance, clamped.
    ///
    /// Returns the applied delta, which may be smaller in magnitude than
    /// requested and is exactly `0.0` when the actor already sits at the
    /// boundary in the direction of `delta`.
    pub fn adjust_balance(&self, actor: ActorId, delta: f64) -> f64 {
        let policy = self.policy.current();
        let record = self.record(actor, policy.default_balance);
        let mut guard = record.lock();

        let previous = guard.balance;
        let applied_value = Self::clamp(&policy, previous + delta);
        guard.balance = applied_value;

        let applied_delta = applied_value - previous;
        tracing::debug!(actor = %actor, delta, applied_delta, "Balance adjusted");
        applied_delta
    }

    /// Checked, unclamped debit.
    ///
    /// Refuses (returns `None`, balance untouched) when the debit would
    /// land the balance below the floor; otherwise subtracts exactly
    /// `amount` and returns the remaining balance. The check and the
    /// debit happen under one lock acquisition, which is what lets the
    /// token withdraw path guarantee "rejected means untouched".
    ///
    /// The check is strict: unlike the elimination threshold there is no
    /// epsilon allowance, because admitting a debit inside the tolerance
    /// would store a balance below the floor.
    pub fn debit_exact(&self, actor: ActorId, amount: f64) -> Option<f64> {
        let policy = self.policy.current();
        let record = self.record(actor, policy.default_balance);
        let mut guard = record.lock();

        if guard.balance - amount < policy.floor {
            return None;
        }

        guard.balance -= amount;
        tracing::debug!(actor = %actor, amount, remaining = guard.balance, "Exact debit");
        Some(guard.balance)
    }

    /// Atomic dual-actor kill transfer.
    ///
    /// Both mutations are applied under both record locks: no third
    /// operation can observe one side updated without the other. Each leg
    /// is clamped independently against its own boundary; a loser at the
    /// floor loses nothing without blocking the gainer's gain, and a
    /// gainer at the ceiling gains nothing without blocking the loser's
    /// loss. Locks are acquired in `ActorId` order.
    pub fn transfer(
        &self,
        loser: ActorId,
        gainer: ActorId,
        loser_loss: f64,
        gainer_gain: f64,
    ) -> TransferResult {
        let policy = self.policy.current();

        // Degenerate self-transfer: one record, loss leg then gain leg.
        if loser == gainer {
            let record = self.record(loser, policy.default_balance);
            let mut guard = record.lock();

            let before = guard.balance;
            let after_loss = Self::clamp(&policy, before - loser_loss);
            let after_gain = Self::clamp(&policy, after_loss + gainer_gain);
            guard.balance = after_gain;

            return TransferResult {
                actual_loss: before - after_loss,
                actual_gain: after_gain - after_loss,
            };
        }

        let loser_record = self.record(loser, policy.default_balance);
        let gainer_record = self.record(gainer, policy.default_balance);

        // Fixed acquisition order over the identity total order.
        let (mut loser_guard, mut gainer_guard) = if loser < gainer {
            let lg = loser_record.lock();
            let gg = gainer_record.lock();
            (lg, gg)
        } else {
            let gg = gainer_record.lock();
            let lg = loser_record.lock();
            (lg, gg)
        };

        let loser_previous = loser_guard.balance;
        let gainer_previous = gainer_guard.balance;

        let loser_applied = Self::clamp(&policy, loser_previous - loser_loss);
        let gainer_applied = Self::clamp(&policy, gainer_previous + gainer_gain);

        loser_guard.balance = loser_applied;
        gainer_guard.balance = gainer_applied;

        let result = TransferResult {
            actual_loss: loser_previous - loser_applied,
            actual_gain: gainer_applied - gainer_previous,
        };

        tracing::debug!(
            loser = %loser,
            gainer = %gainer,
            actual_loss = result.actual_loss,
            actual_gain = result.actual_gain,
            "Kill transfer applied"
        );

        result
    }
}
