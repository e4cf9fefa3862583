//! Coin lifecycle orchestration: generate, list, collect, expire.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use coindrop_protocol::{Coin, CoinId, RoomId};
use coindrop_store::{KeyValueStore, RoomStateStore};
use tokio::sync::Mutex as AsyncMutex;

use crate::{RoomDirectory, RoomError, generate_coins};

/// The stateful core of the service.
///
/// Owns the room directory and the room-state store, and holds the
/// per-room bookkeeping that keeps mutations safe:
///
/// - **Per-room gate**: every mutation (generate, collect, expiry) for
///   a room runs under that room's async mutex, so two collects racing
///   between load and save can never lose a removal. Reads take no
///   lock; they are single store round-trips.
/// - **Generation epoch**: each generate bumps the room's epoch and
///   arms a one-shot expiry task carrying that epoch. The task only
///   clears the key if the epoch still matches when it fires, so a
///   stale timer never deletes a newer generation's coins.
///
/// Cheap to clone; clones share the same state.
pub struct CoinLifecycle<S: KeyValueStore> {
    inner: Arc<Inner<S>>,
}

impl<S: KeyValueStore> Clone for CoinLifecycle<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<S> {
    directory: RoomDirectory,
    store: RoomStateStore<S>,
    ttl: Duration,
    /// Per-room gate and epoch. The outer mutex is held only to fetch
    /// or update a slot, never across an await.
    slots: Mutex<HashMap<RoomId, RoomSlot>>,
}

#[derive(Clone, Default)]
struct RoomSlot {
    epoch: u64,
    gate: Arc<AsyncMutex<()>>,
}

impl<S: KeyValueStore> Inner<S> {
    fn gate(&self, room_id: &RoomId) -> Arc<AsyncMutex<()>> {
        let mut slots = self.slots.lock().expect("slot mutex poisoned");
        Arc::clone(&slots.entry(room_id.clone()).or_default().gate)
    }

    fn epoch(&self, room_id: &RoomId) -> u64 {
        let slots = self.slots.lock().expect("slot mutex poisoned");
        slots.get(room_id).map(|slot| slot.epoch).unwrap_or(0)
    }

    fn bump_epoch(&self, room_id: &RoomId) -> u64 {
        let mut slots = self.slots.lock().expect("slot mutex poisoned");
        let slot = slots.entry(room_id.clone()).or_default();
        slot.epoch += 1;
        slot.epoch
    }
}

impl<S: KeyValueStore> CoinLifecycle<S> {
    /// Creates a lifecycle manager over the given directory and store.
    ///
    /// `ttl` is the fixed delay between a generation and its wholesale
    /// expiration.
    pub fn new(directory: RoomDirectory, store: RoomStateStore<S>, ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                directory,
                store,
                ttl,
                slots: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// The configured expiration delay.
    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }

    /// Generates a fresh coin set for the room, persists it, and arms
    /// its expiration.
    ///
    /// Replaces any prior set wholesale; coins already collected from
    /// the previous generation are forgotten. Returns the new set.
    ///
    /// # Errors
    /// [`RoomError::RoomNotFound`] if the room id is not configured;
    /// store failures propagate unchanged (and leave the previous set
    /// and its timer intact).
    pub async fn generate(&self, room_id: &RoomId) -> Result<Vec<Coin>, RoomError> {
        let config = self
            .inner
            .directory
            .get(room_id)
            .ok_or_else(|| RoomError::RoomNotFound(room_id.clone()))?;

        let gate = self.inner.gate(room_id);
        let _guard = gate.lock().await;

        let coins = generate_coins(config);
        self.inner.store.save(room_id, &coins).await?;

        // Bump only after a successful save: on failure the old timer
        // must stay valid for the set that is still stored.
        let epoch = self.inner.bump_epoch(room_id);
        self.arm_expiry(room_id.clone(), epoch);

        tracing::info!(
            room_id = %room_id,
            coins = coins.len(),
            epoch,
            ttl_secs = self.inner.ttl.as_secs(),
            "coin set generated"
        );
        Ok(coins)
    }

    /// Generates coin sets for every configured room, in declaration
    /// order. Called once at startup.
    pub async fn generate_all(&self) -> Result<(), RoomError> {
        for config in self.inner.directory.iter() {
            self.generate(&config.id).await?;
        }
        Ok(())
    }

    /// Returns the room's currently available coins.
    ///
    /// An absent key yields an empty vec, never an error: "no coins"
    /// looks the same whether the room expired, was never generated,
    /// or isn't configured at all.
    pub async fn list_available(&self, room_id: &RoomId) -> Result<Vec<Coin>, RoomError> {
        Ok(self.inner.store.load(room_id).await?.unwrap_or_default())
    }

    /// Removes one coin from the room's set.
    ///
    /// # Errors
    /// - [`RoomError::RoomNotFound`] if the room id is not configured,
    ///   or if the room has no persisted state (expired or never
    ///   generated, indistinguishable at the key).
    /// - [`RoomError::CoinNotFound`] if the coin is not in the set; no
    ///   write happens, so repeated collects of the same coin fail
    ///   idempotently.
    pub async fn collect(&self, room_id: &RoomId, coin_id: &CoinId) -> Result<(), RoomError> {
        // Unconfigured rooms fail without a store round-trip.
        if !self.inner.directory.contains(room_id) {
            return Err(RoomError::RoomNotFound(room_id.clone()));
        }

        let gate = self.inner.gate(room_id);
        let _guard = gate.lock().await;

        let Some(coins) = self.inner.store.load(room_id).await? else {
            return Err(RoomError::RoomNotFound(room_id.clone()));
        };

        let before = coins.len();
        let remaining: Vec<Coin> = coins.into_iter().filter(|c| &c.id != coin_id).collect();
        if remaining.len() == before {
            return Err(RoomError::CoinNotFound(coin_id.clone()));
        }

        self.inner.store.save(room_id, &remaining).await?;
        tracing::debug!(
            room_id = %room_id,
            coin_id = %coin_id,
            remaining = remaining.len(),
            "coin collected"
        );
        Ok(())
    }

    /// Spawns the one-shot expiry task for a generation cycle.
    ///
    /// The task sleeps for the TTL, then deletes the room's key, but
    /// only if the room's epoch still matches the one that armed it.
    fn arm_expiry(&self, room_id: RoomId, epoch: u64) {
        let inner = Arc::clone(&self.inner);
        // Capture the deadline now, not at the task's first poll, so the
        // timer measures the TTL from the moment the generation was armed.
        let deadline = tokio::time::Instant::now() + inner.ttl;
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;

            let gate = inner.gate(&room_id);
            let _guard = gate.lock().await;

            if inner.epoch(&room_id) != epoch {
                tracing::debug!(room_id = %room_id, epoch, "stale expiry timer skipped");
                return;
            }

            match inner.store.clear(&room_id).await {
                Ok(()) => {
                    tracing::info!(room_id = %room_id, epoch, "expired coins for room");
                }
                Err(e) => {
                    tracing::warn!(
                        room_id = %room_id,
                        error = %e,
                        "failed to clear expired coin set"
                    );
                }
            }
        });
    }
}
