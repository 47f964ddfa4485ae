//! End-to-end tests through the host-facing entry points
//!
//! The engine's return value carries the decision; the host-side effect
//! (consequence, mint, notification) lands at most one scheduling hop
//! later. Tests therefore settle briefly before asserting hook effects.

use economy_engine::{
    EconomyEngine, EngineConfig, ExchangeDirection, TokenOutcome,
};
use life_ledger::{
    ActorId, EliminationMode, HostHooks, LifeEvent, PolicyConfig,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

#[derive(Default)]
struct RecordingHooks {
    consequences: Mutex<Vec<(ActorId, EliminationMode)>>,
    restores: Mutex<Vec<ActorId>>,
    minted: Mutex<Vec<(ActorId, u32)>>,
    consumed: Mutex<Vec<(ActorId, u32)>>,
    events: Mutex<Vec<(ActorId, LifeEvent)>>,
}

impl HostHooks for RecordingHooks {
    fn apply_consequence(&self, actor: ActorId, mode: EliminationMode) {
        self.consequences.lock().push((actor, mode));
    }
    fn restore_participation(&self, actor: ActorId) {
        self.restores.lock().push(actor);
    }
    fn mint_tokens(&self, actor: ActorId, count: u32) {
        self.minted.lock().push((actor, count));
    }
    fn consume_tokens(&self, actor: ActorId, count: u32) {
        self.consumed.lock().push((actor, count));
    }
    fn notify(&self, actor: ActorId, event: LifeEvent) {
        self.events.lock().push((actor, event));
    }
}

fn test_policy() -> PolicyConfig {
    PolicyConfig {
        default_balance: 10.0,
        floor: 2.0,
        ceiling_enabled: true,
        ceiling: 20.0,
        natural_loss: 1.0,
        monster_loss: 1.0,
        kill_loss: 2.0,
        kill_gain: 2.0,
        token_exchange_rate: 2.0,
        elimination_enabled: true,
        elimination_mode: EliminationMode::Exile,
        revival_balance: 10.0,
    }
}

fn test_config(dir: &TempDir) -> EngineConfig {
    EngineConfig {
        data_dir: dir.path().to_path_buf(),
        collection: "eliminated".to_string(),
        policy: test_policy(),
    }
}

async fn open_engine(dir: &TempDir) -> (Arc<RecordingHooks>, EconomyEngine) {
    let hooks = Arc::new(RecordingHooks::default());
    let engine = EconomyEngine::open(test_config(dir), hooks.clone())
        .await
        .unwrap();
    (hooks, engine)
}

/// Let scheduled hook jobs land on their workers
async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_kill_transfers_both_legs() {
    let dir = TempDir::new().unwrap();
    let (hooks, engine) = open_engine(&dir).await;
    let a = ActorId::random();
    let b = ActorId::random();
    engine.ledger().set_balance(a, 8.0);
    engine.ledger().set_balance(b, 8.0);

    let outcome = engine.on_kill(a, Some(b));
    assert_eq!(outcome.transfer.actual_loss, 2.0);
    assert_eq!(outcome.transfer.actual_gain, 2.0);
    assert!(!outcome.eliminated);
    assert_eq!(engine.ledger().get_balance(a), 6.0);
    assert_eq!(engine.ledger().get_balance(b), 10.0);

    settle().await;
    let events = hooks.events.lock();
    assert!(events.contains(&(a, LifeEvent::KillLoss { amount: 2.0 })));
    assert!(events.contains(&(b, LifeEvent::KillGain { amount: 2.0 })));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_kill_to_floor_eliminates_loser() {
    let dir = TempDir::new().unwrap();
    let (hooks, engine) = open_engine(&dir).await;
    let a = ActorId::random();
    let b = ActorId::random();
    engine.ledger().set_balance(a, 4.0);
    engine.ledger().set_balance(b, 4.0);

    let outcome = engine.on_kill(a, Some(b));
    assert_eq!(outcome.transfer.actual_loss, 2.0);
    assert_eq!(outcome.transfer.actual_gain, 2.0);
    assert_eq!(engine.ledger().get_balance(a), 2.0);
    assert_eq!(engine.ledger().get_balance(b), 6.0);

    // A landed on the floor: eliminated in the same logical operation
    assert!(outcome.eliminated);
    assert!(engine.elimination().is_eliminated(a));

    settle().await;
    assert_eq!(
        hooks.consequences.lock().as_slice(),
        &[(a, EliminationMode::Exile)]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_killerless_kill_only_loss_leg() {
    let dir = TempDir::new().unwrap();
    let (_hooks, engine) = open_engine(&dir).await;
    let a = ActorId::random();
    engine.ledger().set_balance(a, 8.0);

    let outcome = engine.on_kill(a, None);
    assert_eq!(outcome.transfer.actual_loss, 2.0);
    assert_eq!(outcome.transfer.actual_gain, 0.0);
    assert_eq!(engine.ledger().get_balance(a), 6.0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_natural_loss_at_floor_is_idempotent_elimination() {
    let dir = TempDir::new().unwrap();
    let (hooks, engine) = open_engine(&dir).await;
    let c = ActorId::random();
    engine.ledger().set_balance(c, 2.0);

    // Already at the floor: the loss is fully absorbed, the crossing
    // still counts
    let first = engine.on_natural_loss(c);
    assert_eq!(first.applied_loss, 0.0);
    assert!(first.eliminated);

    let second = engine.on_natural_loss(c);
    assert!(!second.eliminated);

    settle().await;
    // One consequence despite two crossings
    assert_eq!(hooks.consequences.lock().len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_withdraw_success_mints() {
    let dir = TempDir::new().unwrap();
    let (hooks, engine) = open_engine(&dir).await;
    let d = ActorId::random();
    engine.ledger().set_balance(d, 6.0);

    // rate 2, floor 2: 2 tokens need 4 points, 6 - 4 == floor
    let outcome = engine.on_token_use(d, 2, ExchangeDirection::Withdraw);
    match outcome {
        TokenOutcome::Withdrawn(result) => {
            assert!(!result.rejected);
            assert_eq!(result.minted_count, 2);
            assert_eq!(result.debited, 4.0);
        }
        TokenOutcome::Deposited { .. } => panic!("wrong direction"),
    }
    assert_eq!(engine.ledger().get_balance(d), 2.0);

    settle().await;
    assert_eq!(hooks.minted.lock().as_slice(), &[(d, 2)]);
    assert!(hooks
        .events
        .lock()
        .contains(&(d, LifeEvent::TokensWithdrawn { count: 2, cost: 4.0 })));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_withdraw_rejected_leaves_everything() {
    let dir = TempDir::new().unwrap();
    let (hooks, engine) = open_engine(&dir).await;
    let d = ActorId::random();
    engine.ledger().set_balance(d, 5.0);

    let outcome = engine.on_token_use(d, 2, ExchangeDirection::Withdraw);
    match outcome {
        TokenOutcome::Withdrawn(result) => assert!(result.rejected),
        TokenOutcome::Deposited { .. } => panic!("wrong direction"),
    }
    assert_eq!(engine.ledger().get_balance(d), 5.0);

    settle().await;
    assert!(hooks.minted.lock().is_empty());
    assert!(hooks.events.lock().contains(&(
        d,
        LifeEvent::WithdrawRejected {
            count: 2,
            required: 4.0,
            available: 3.0,
        }
    )));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_deposit_consumes_and_credits() {
    let dir = TempDir::new().unwrap();
    let (hooks, engine) = open_engine(&dir).await;
    let d = ActorId::random();
    engine.ledger().set_balance(d, 18.0);

    // 2 tokens are worth 4 points, only 2 fit under the ceiling
    let outcome = engine.on_token_use(d, 2, ExchangeDirection::Deposit);
    assert_eq!(outcome, TokenOutcome::Deposited { applied_gain: 2.0 });
    assert_eq!(engine.ledger().get_balance(d), 20.0);

    settle().await;
    // Full token count consumed despite the clamped gain
    assert_eq!(hooks.consumed.lock().as_slice(), &[(d, 2)]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_revival_restores_and_notifies() {
    let dir = TempDir::new().unwrap();
    let (hooks, engine) = open_engine(&dir).await;
    let target = ActorId::random();
    let initiator = ActorId::random();
    engine.ledger().set_balance(target, 2.0);

    assert!(engine.on_natural_loss(target).eliminated);
    assert!(engine.on_revive_request(initiator, target));

    // Overwritten to the configured revival balance, not accumulated
    assert_eq!(engine.ledger().get_balance(target), 10.0);
    assert!(!engine.elimination().is_eliminated(target));

    // Second request: no state change occurred
    assert!(!engine.on_revive_request(initiator, target));

    settle().await;
    assert_eq!(hooks.restores.lock().as_slice(), &[target]);
    assert!(hooks
        .events
        .lock()
        .contains(&(target, LifeEvent::Revived { balance: 10.0 })));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_join_reapplies_consequence() {
    let dir = TempDir::new().unwrap();
    let (hooks, engine) = open_engine(&dir).await;
    let actor = ActorId::random();
    engine.ledger().set_balance(actor, 2.0);
    assert!(engine.on_natural_loss(actor).eliminated);

    assert!(engine.on_join(actor));
    settle().await;
    assert_eq!(hooks.consequences.lock().len(), 2);

    // Active actors join without ceremony
    assert!(!engine.on_join(ActorId::random()));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_elimination_survives_restart() {
    let dir = TempDir::new().unwrap();
    let actor = ActorId::random();

    {
        let (_hooks, engine) = open_engine(&dir).await;
        engine.ledger().set_balance(actor, 2.0);
        assert!(engine.on_natural_loss(actor).eliminated);
        engine.shutdown();
    }

    let (_hooks, engine) = open_engine(&dir).await;
    assert!(engine.elimination().is_eliminated(actor));
    assert_eq!(engine.metrics().eliminated_actors.get(), 1);
    assert!(engine.on_join(actor));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_policy_reload_affects_future_operations() {
    let dir = TempDir::new().unwrap();
    let (_hooks, engine) = open_engine(&dir).await;
    let a = ActorId::random();
    let b = ActorId::random();
    engine.ledger().set_balance(a, 12.0);
    engine.ledger().set_balance(b, 12.0);

    let mut policy = test_policy();
    policy.kill_loss = 4.0;
    policy.kill_gain = 1.0;
    engine.reload_policy(policy).unwrap();

    // Existing balances untouched by the reload itself
    assert_eq!(engine.ledger().get_balance(a), 12.0);

    let outcome = engine.on_kill(a, Some(b));
    assert_eq!(outcome.transfer.actual_loss, 4.0);
    assert_eq!(outcome.transfer.actual_gain, 1.0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_metrics_track_lifecycle() {
    let dir = TempDir::new().unwrap();
    let (_hooks, engine) = open_engine(&dir).await;
    let a = ActorId::random();
    let b = ActorId::random();
    engine.ledger().set_balance(a, 4.0);
    engine.ledger().set_balance(b, 4.0);

    engine.on_kill(a, Some(b));
    assert_eq!(engine.metrics().transfers_total.get(), 1);
    assert_eq!(engine.metrics().eliminations_total.get(), 1);
    assert_eq!(engine.metrics().eliminated_actors.get(), 1);

    engine.on_revive_request(b, a);
    assert_eq!(engine.metrics().revivals_total.get(), 1);
    assert_eq!(engine.metrics().eliminated_actors.get(), 0);
}
