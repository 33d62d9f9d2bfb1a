use crate::domain::pool::{PoolConfig, PoolStats, SlotId, SlotState};
use crate::error::{PaymentError, Result};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::field::Empty;

/// A simulated, fixed-size pool of database connections.
///
/// Slots are handed out in the order callers started waiting. Releasing a
/// slot while others are queued passes it straight to the earliest waiter
/// under the same lock that would have marked it free, so a wake-up can
/// never be lost and a late arrival can never jump the queue.
///
/// The pool is a cheap handle around shared state; clones refer to the same
/// slots.
#[derive(Clone)]
pub struct ConnectionPool {
    shared: Arc<PoolShared>,
}

struct PoolShared {
    state: Mutex<PoolState>,
}

struct PoolState {
    slots: Vec<SlotState>,
    free: Vec<SlotId>,
    waiters: VecDeque<Waiter>,
    next_waiter: u64,
    closed: bool,
    acquired: u64,
    released: u64,
    timeouts: u64,
}

struct Waiter {
    id: u64,
    tx: oneshot::Sender<SlotId>,
}

impl ConnectionPool {
    /// Creates a pool with `size` free slots.
    pub fn new(size: usize) -> Self {
        // Reversed so that `pop` hands out the lowest index first.
        let free = (0..size).rev().map(SlotId).collect();
        Self {
            shared: Arc::new(PoolShared {
                state: Mutex::new(PoolState {
                    slots: vec![SlotState::Free; size],
                    free,
                    waiters: VecDeque::new(),
                    next_waiter: 0,
                    closed: false,
                    acquired: 0,
                    released: 0,
                    timeouts: 0,
                }),
            }),
        }
    }

    pub fn from_config(config: &PoolConfig) -> Self {
        Self::new(config.size)
    }

    pub fn size(&self) -> usize {
        self.shared.state.lock().slots.len()
    }

    /// Waits up to `timeout` for a free slot.
    ///
    /// A zero timeout never suspends: it either takes a free slot right away
    /// or fails with [`PaymentError::PoolTimeout`]. Dropping the returned
    /// future while it waits leaves no trace in the queue.
    #[tracing::instrument(
        name = "acquire_db_connection",
        skip(self, timeout),
        fields(
            timeout_ms = timeout.as_millis() as u64,
            slot = Empty,
            wait_ms = Empty,
            warning = Empty
        )
    )]
    pub async fn acquire(&self, timeout: Duration) -> Result<SlotHandle> {
        let started = Instant::now();

        let (id, rx) = match self.shared.try_claim(timeout.is_zero()) {
            Claim::Ready(slot) => return Ok(self.handle(slot, started)),
            Claim::Queued { id, rx } => (id, rx),
            Claim::Rejected(err) => return Err(err),
        };
        tracing::Span::current().record("warning", "connection_pool_exhausted");

        let mut waiting = WaitGuard {
            shared: &self.shared,
            id,
            rx: Some(rx),
        };
        match waiting.wait(timeout).await {
            Ok(slot) => Ok(self.handle(slot, started)),
            Err(err) => {
                tracing::warn!(
                    wait_ms = started.elapsed().as_millis() as u64,
                    error = %err,
                    "failed to acquire database connection"
                );
                Err(err)
            }
        }
    }

    /// Returns a slot to the pool.
    ///
    /// Equivalent to dropping the handle; kept so call sites can make the
    /// release point explicit.
    pub fn release(&self, handle: SlotHandle) {
        drop(handle);
    }

    /// Closes the pool. Queued acquirers fail with
    /// [`PaymentError::PoolClosed`]; slots already handed out are still
    /// returned normally.
    pub fn close(&self) {
        let mut state = self.shared.state.lock();
        state.closed = true;
        let dropped = state.waiters.len();
        state.waiters.clear();
        tracing::info!(dropped_waiters = dropped, "connection pool closed");
    }

    /// Number of slots currently free.
    pub fn free_slots(&self) -> usize {
        self.shared.state.lock().free.len()
    }

    /// Number of acquirers currently queued.
    pub fn waiting(&self) -> usize {
        self.shared.state.lock().waiters.len()
    }

    pub fn stats(&self) -> PoolStats {
        let state = self.shared.state.lock();
        PoolStats {
            size: state.slots.len(),
            free: state.free.len(),
            acquired: state.acquired,
            released: state.released,
            timeouts: state.timeouts,
        }
    }

    fn handle(&self, slot: SlotId, started: Instant) -> SlotHandle {
        let span = tracing::Span::current();
        span.record("slot", slot.0);
        span.record("wait_ms", started.elapsed().as_millis() as u64);
        SlotHandle {
            slot,
            shared: Arc::clone(&self.shared),
            acquired_at: Instant::now(),
        }
    }
}

enum Claim {
    Ready(SlotId),
    Queued {
        id: u64,
        rx: oneshot::Receiver<SlotId>,
    },
    Rejected(PaymentError),
}

impl PoolShared {
    fn try_claim(&self, no_wait: bool) -> Claim {
        let mut state = self.state.lock();
        if state.closed {
            return Claim::Rejected(PaymentError::PoolClosed);
        }
        // Free slots only exist while nobody is queued, so taking one here
        // cannot overtake an earlier waiter.
        if let Some(slot) = state.free.pop() {
            state.mark(slot, SlotState::InUse);
            state.acquired += 1;
            return Claim::Ready(slot);
        }
        if no_wait {
            state.timeouts += 1;
            return Claim::Rejected(PaymentError::PoolTimeout(Duration::ZERO));
        }

        let (tx, rx) = oneshot::channel();
        let id = state.next_waiter;
        state.next_waiter += 1;
        state.waiters.push_back(Waiter { id, tx });
        Claim::Queued { id, rx }
    }

    fn release(&self, slot: SlotId) {
        let mut state = self.state.lock();
        state.released += 1;
        while let Some(waiter) = state.waiters.pop_front() {
            // The slot stays InUse; ownership moves to the waiter.
            match waiter.tx.send(slot) {
                Ok(()) => {
                    state.acquired += 1;
                    return;
                }
                Err(_) => continue,
            }
        }
        state.mark(slot, SlotState::Free);
        state.free.push(slot);
    }
}

impl PoolState {
    fn mark(&mut self, slot: SlotId, next: SlotState) {
        let current = &mut self.slots[slot.0];
        debug_assert_ne!(*current, next, "{slot} is already {next:?}");
        *current = next;
    }
}

/// Keeps a queued acquirer's bookkeeping consistent however the wait ends.
struct WaitGuard<'a> {
    shared: &'a PoolShared,
    id: u64,
    rx: Option<oneshot::Receiver<SlotId>>,
}

impl WaitGuard<'_> {
    async fn wait(&mut self, timeout: Duration) -> Result<SlotId> {
        let Some(rx) = self.rx.as_mut() else {
            return Err(PaymentError::PoolClosed);
        };
        let outcome = tokio::time::timeout(timeout, rx).await;
        match outcome {
            Ok(Ok(slot)) => {
                self.rx = None;
                Ok(slot)
            }
            // Sender dropped without a slot: the pool was closed.
            Ok(Err(_)) => {
                self.rx = None;
                Err(PaymentError::PoolClosed)
            }
            Err(_) => {
                self.abandon();
                self.shared.state.lock().timeouts += 1;
                Err(PaymentError::PoolTimeout(timeout))
            }
        }
    }

    fn abandon(&mut self) {
        let Some(mut rx) = self.rx.take() else {
            return;
        };
        let mut state = self.shared.state.lock();
        if let Some(pos) = state.waiters.iter().position(|w| w.id == self.id) {
            state.waiters.remove(pos);
            return;
        }
        drop(state);
        // No longer queued: either the pool closed, or a release handed us a
        // slot just as we gave up. Pass the slot on instead of keeping it.
        if let Ok(slot) = rx.try_recv() {
            self.shared.release(slot);
        }
    }
}

impl Drop for WaitGuard<'_> {
    fn drop(&mut self) {
        self.abandon();
    }
}

/// Exclusive use of one pool slot. The slot goes back to the pool when the
/// handle is dropped or passed to [`ConnectionPool::release`].
pub struct SlotHandle {
    slot: SlotId,
    shared: Arc<PoolShared>,
    acquired_at: Instant,
}

impl SlotHandle {
    pub fn slot(&self) -> SlotId {
        self.slot
    }

    /// How long this handle has held its slot.
    pub fn held_for(&self) -> Duration {
        self.acquired_at.elapsed()
    }
}

impl std::fmt::Debug for SlotHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotHandle")
            .field("slot", &self.slot)
            .field("held_for", &self.held_for())
            .finish()
    }
}

impl Drop for SlotHandle {
    fn drop(&mut self) {
        let held_ms = self.held_for().as_millis() as u64;
        let span = tracing::info_span!("release_db_connection", slot = self.slot.0, held_ms);
        span.in_scope(|| {
            tracing::debug!(held_ms, "releasing database connection");
            self.shared.release(self.slot);
        });
    }
}
