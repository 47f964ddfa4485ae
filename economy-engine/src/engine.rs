//! Host-facing orchestration
//!
//! [`EconomyEngine`] composes the ledger, the token converter, and the
//! elimination engine behind the event entry points the host calls.
//! Every balance-decreasing entry point runs the elimination check
//! synchronously, in the same logical operation, before returning
//! control to the host.

use crate::config::EngineConfig;
use crate::dispatch::{ActorDispatch, DispatchedHooks};
use crate::Result;
use elimination::{EliminationEngine, EliminationStore};
use life_ledger::{
    ActorId, HostHooks, LifeEvent, LifeLedger, Metrics, PolicyConfig, PolicyHandle,
    TransferResult,
};
use std::sync::Arc;
use token_exchange::{TokenConverter, WithdrawReason, WithdrawResult};

/// Which way a token-use event converts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeDirection {
    /// Balance out, tokens in
    Withdraw,
    /// Tokens out, balance in
    Deposit,
}

/// Outcome of a token-use event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenOutcome {
    /// A withdraw ran (possibly rejected; see the carried result)
    Withdrawn(WithdrawResult),
    /// A deposit ran
    Deposited {
        /// Applied gain after ceiling clamping
        applied_gain: f64,
    },
}

/// What a kill event did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KillOutcome {
    /// Applied legs of the transfer (gain is zero for killer-less kills)
    pub transfer: TransferResult,

    /// Whether the loser was eliminated by this kill
    pub eliminated: bool,
}

/// What a loss event did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LossOutcome {
    /// Life points actually removed after floor clamping
    pub applied_loss: f64,

    /// Whether the actor was eliminated by this loss
    pub eliminated: bool,
}

/// Life economy engine: the host's single entry point
pub struct EconomyEngine {
    ledger: Arc<LifeLedger>,
    converter: TokenConverter,
    elimination: Arc<EliminationEngine>,
    store: Arc<EliminationStore>,
    hooks: Arc<dyn HostHooks>,
    dispatch: ActorDispatch,
    metrics: Metrics,
}

impl EconomyEngine {
    /// Open the engine: load the roster, wire the services, wrap the
    /// host's hooks in per-actor dispatch.
    ///
    /// Must be called from within a Tokio runtime; consequence workers
    /// spawn onto it.
    pub async fn open(config: EngineConfig, host: Arc<dyn HostHooks>) -> Result<Self> {
        let policy = PolicyHandle::new(config.policy)?;
        let ledger = Arc::new(LifeLedger::new(policy));
        let store = Arc::new(EliminationStore::open(
            &config.data_dir,
            config.collection.clone(),
        )?);

        let dispatch = ActorDispatch::new();
        let hooks: Arc<dyn HostHooks> =
            Arc::new(DispatchedHooks::new(host, dispatch.clone()));

        let elimination = Arc::new(EliminationEngine::new(
            ledger.clone(),
            store.clone(),
            hooks.clone(),
        ));
        let converter = TokenConverter::new(ledger.clone());

        let metrics = Metrics::new()?;
        metrics.eliminated_actors.set(store.len() as i64);

        tracing::info!(
            data_dir = %config.data_dir.display(),
            eliminated = store.len(),
            "Economy engine opened"
        );

        Ok(Self {
            ledger,
            converter,
            elimination,
            store,
            hooks,
            dispatch,
            metrics,
        })
    }

    /// Balance authority (reads for display go straight here)
    pub fn ledger(&self) -> &LifeLedger {
        &self.ledger
    }

    /// Elimination state machine
    pub fn elimination(&self) -> &EliminationEngine {
        &self.elimination
    }

    /// Metrics collector
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Kill-resolution event.
    ///
    /// With a gainer, runs the atomic kill transfer; without one
    /// (environment kill), only the loss leg applies. Both parties are
    /// notified with the applied amounts, then the loser is checked
    /// against the elimination threshold before this returns.
    pub fn on_kill(&self, loser: ActorId, gainer: Option<ActorId>) -> KillOutcome {
        let policy = self.ledger.policy().current();

        let transfer = match gainer {
            Some(gainer) => {
                let result =
                    self.ledger
                        .transfer(loser, gainer, policy.kill_loss, policy.kill_gain);
                self.hooks.notify(
                    loser,
                    LifeEvent::KillLoss {
                        amount: result.actual_loss,
                    },
                );
                self.hooks.notify(
                    gainer,
                    LifeEvent::KillGain {
                        amount: result.actual_gain,
                    },
                );
                result
            }
            None => {
                let applied = self.ledger.adjust_balance(loser, -policy.kill_loss);
                let result = TransferResult {
                    actual_loss: -applied,
                    actual_gain: 0.0,
                };
                self.hooks.notify(
                    loser,
                    LifeEvent::KillLoss {
                        amount: result.actual_loss,
                    },
                );
                result
            }
        };
        self.metrics.record_transfer();

        let eliminated = self.check_after_loss(loser);
        KillOutcome {
            transfer,
            eliminated,
        }
    }

    /// Natural-cause loss event
    pub fn on_natural_loss(&self, actor: ActorId) -> LossOutcome {
        let amount = self.ledger.policy().current().natural_loss;
        self.apply_loss(actor, amount, LossKind::Natural)
    }

    /// Monster loss event
    pub fn on_monster_loss(&self, actor: ActorId) -> LossOutcome {
        let amount = self.ledger.policy().current().monster_loss;
        self.apply_loss(actor, amount, LossKind::Monster)
    }

    /// Token-use event.
    ///
    /// Withdraw asks the host to mint on success; deposit asks the host
    /// to consume. Either way the actor is notified with the applied
    /// amounts.
    pub fn on_token_use(
        &self,
        actor: ActorId,
        count: u32,
        direction: ExchangeDirection,
    ) -> TokenOutcome {
        match direction {
            ExchangeDirection::Withdraw => {
                let result = self.converter.withdraw(actor, count);
                if result.rejected {
                    if let Some(WithdrawReason::InsufficientBalance {
                        required,
                        available,
                    }) = result.reason
                    {
                        self.hooks.notify(
                            actor,
                            LifeEvent::WithdrawRejected {
                                count,
                                required,
                                available,
                            },
                        );
                    }
                } else {
                    self.hooks.mint_tokens(actor, result.minted_count);
                    self.metrics.record_tokens_minted(result.minted_count);
                    self.hooks.notify(
                        actor,
                        LifeEvent::TokensWithdrawn {
                            count: result.minted_count,
                            cost: result.debited,
                        },
                    );
                }
                TokenOutcome::Withdrawn(result)
            }
            ExchangeDirection::Deposit => {
                let applied_gain = self.converter.deposit(actor, count);
                self.hooks.consume_tokens(actor, count);
                self.metrics.record_tokens_deposited(count);
                self.hooks
                    .notify(actor, LifeEvent::TokensDeposited { count, gain: applied_gain });
                TokenOutcome::Deposited { applied_gain }
            }
        }
    }

    /// Join event.
    ///
    /// An actor may have been eliminated while disconnected, or the mode
    /// may have been reconfigured since; if still eliminated, the
    /// consequence for the current mode is re-applied. Returns whether
    /// the actor is eliminated.
    pub fn on_join(&self, actor: ActorId) -> bool {
        if !self.elimination.is_eliminated(actor) {
            return false;
        }

        let policy = self.ledger.policy().current();
        tracing::debug!(actor = %actor, mode = %policy.elimination_mode, "Re-applying consequence on join");
        self.hooks
            .apply_consequence(actor, policy.elimination_mode);
        true
    }

    /// Revival-request event, performed by `initiator` on `target`.
    ///
    /// `false` when the target is not eliminated; the initiator treats
    /// that as "no state change occurred".
    pub fn on_revive_request(&self, initiator: ActorId, target: ActorId) -> bool {
        let revived = self.elimination.revive(target);
        if revived {
            self.metrics.record_revival();
            tracing::info!(initiator = %initiator, target = %target, "Revival granted");
        }
        revived
    }

    /// Atomically swap in new policy limits; only future operations see
    /// them
    pub fn reload_policy(&self, config: PolicyConfig) -> Result<()> {
        self.ledger.policy().replace(config)?;
        Ok(())
    }

    /// Re-read the roster from the durable backing after external edits
    pub fn reload_roster(&self) -> Result<()> {
        self.store.reload()?;
        self.metrics.eliminated_actors.set(self.store.len() as i64);
        Ok(())
    }

    /// Retire the consequence workers; in-flight jobs finish
    pub fn shutdown(&self) {
        self.dispatch.shutdown();
        tracing::info!("Economy engine shut down");
    }

    fn apply_loss(&self, actor: ActorId, amount: f64, kind: LossKind) -> LossOutcome {
        let applied = self.ledger.adjust_balance(actor, -amount);
        let applied_loss = -applied;

        let event = match kind {
            LossKind::Natural => LifeEvent::NaturalLoss {
                amount: applied_loss,
            },
            LossKind::Monster => LifeEvent::MonsterLoss {
                amount: applied_loss,
            },
        };
        self.hooks.notify(actor, event);

        let eliminated = self.check_after_loss(actor);
        LossOutcome {
            applied_loss,
            eliminated,
        }
    }

    fn check_after_loss(&self, actor: ActorId) -> bool {
        let eliminated = self.elimination.check_and_eliminate(actor);
        if eliminated {
            self.metrics.record_elimination();
        }
        eliminated
    }
}

enum LossKind {
    Natural,
    Monster,
}
