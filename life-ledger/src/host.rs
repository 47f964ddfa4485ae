//! Host boundary
//!
//! The core is the source of truth for balances; the host owns everything
//! user-facing. This trait is the full outbound contract: consequence
//! application, token mint/consume, and structured notification.
//!
//! Implementations must not block. Calls arrive as scheduled requests on
//! the affected actor's owning worker: a caller observing an engine
//! return value sees the decision slightly before the effect becomes
//! externally visible (at most one scheduling hop).

use crate::types::{ActorId, EliminationMode, LifeEvent};

/// Callbacks the core makes into the embedding host
pub trait HostHooks: Send + Sync {
    /// Enact the elimination consequence for `mode`.
    ///
    /// Exile: remove the actor from the live session. Restrict: place the
    /// actor into a non-participating mode while they stay connected.
    fn apply_consequence(&self, actor: ActorId, mode: EliminationMode);

    /// Restore normal participation after revival.
    ///
    /// Only meaningful while the actor is connected; implementations
    /// ignore the call otherwise (the roster removal has already
    /// happened, so a later join sees the actor as active).
    fn restore_participation(&self, actor: ActorId);

    /// Place `count` freshly minted tokens into the actor's possession.
    ///
    /// The core's contract ends at "balance debited"; sink-capacity
    /// overflow (dropping excess into the world) is the host's problem.
    fn mint_tokens(&self, actor: ActorId, count: u32);

    /// Consume `count` physical tokens after a deposit.
    fn consume_tokens(&self, actor: ActorId, count: u32);

    /// User-visible messaging; the host formats, the core only supplies
    /// the event kind and applied amounts.
    fn notify(&self, actor: ActorId, event: LifeEvent);
}

/// Host that does nothing.
///
/// For embedding without a user-facing surface, and for tests that only
/// exercise balance arithmetic.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHooks;

impl HostHooks for NullHooks {
    fn apply_consequence(&self, _actor: ActorId, _mode: EliminationMode) {}
    fn restore_participation(&self, _actor: ActorId) {}
    fn mint_tokens(&self, _actor: ActorId, _count: u32) {}
    fn consume_tokens(&self, _actor: ActorId, _count: u32) {}
    fn notify(&self, _actor: ActorId, _event: LifeEvent) {}
}
