use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use party_common::{get_current_timestamp, GuestId};

use crate::{default_prize_types, DrinkTally, PrizeInstance, PrizeType};

/// Emitted once per fresh reveal; consumed by the recorder task.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickEvent {
    pub id: Uuid,
    pub guest_id: GuestId,
    pub pool_index: usize,
    pub prize: PrizeInstance,
    pub picked_at: i64,
}

impl PickEvent {
    pub fn new(guest_id: GuestId, pool_index: usize, prize: PrizeInstance) -> Self {
        Self {
            id: Uuid::new_v4(),
            guest_id,
            pool_index,
            prize,
            picked_at: get_current_timestamp(),
        }
    }
}

/// Where configured prize types come from.
#[async_trait::async_trait]
pub trait PrizeSource: Send + Sync + 'static {
    async fn fetch_prize_types(&self) -> Result<Vec<PrizeType>>;
}

/// Bookkeeping for picks. Nothing here can undo a reveal.
#[async_trait::async_trait]
pub trait PickRecorder: Send + Sync + 'static {
    async fn record_pick(&self, event: &PickEvent) -> Result<()>;
    /// Returns the guest's new `envelope_picks_used`.
    async fn increment_picks_used(&self, guest_id: &GuestId) -> Result<u32>;
}

#[async_trait::async_trait]
pub trait TallyStore: Send + Sync + 'static {
    async fn load_tally(&self, guest_id: &GuestId) -> Result<DrinkTally>;
    async fn add_drink(&self, guest_id: &GuestId) -> Result<DrinkTally>;
}

/// Fetches prize types, falling back to the built-in set when the source is
/// empty or unreachable so the game stays playable.
pub async fn load_prize_types<S: PrizeSource + ?Sized>(source: &S) -> Vec<PrizeType> {
    match source.fetch_prize_types().await {
        Ok(types) if !types.is_empty() => {
            tracing::debug!("[load_prize_types] Loaded {} prize types", types.len());
            types
        }
        Ok(_) => {
            tracing::info!("[load_prize_types] No prize types configured, using defaults");
            default_prize_types()
        }
        Err(e) => {
            tracing::warn!("[load_prize_types] Failed to fetch prize types, using defaults: {:?}", e);
            default_prize_types()
        }
    }
}

pub fn pick_record_channel(buffer: usize) -> (mpsc::Sender<PickEvent>, mpsc::Receiver<PickEvent>) {
    mpsc::channel(buffer)
}

/// Drains pick events into `recorder` until every sender is dropped.
pub fn spawn_pick_recorder<R: PickRecorder + ?Sized>(
    recorder: Arc<R>,
    mut events: mpsc::Receiver<PickEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            if let Err(e) = recorder.record_pick(&event).await {
                tracing::warn!("[PickRecorder::record_pick] Failed to record pick {} for {}: {:?}", event.id, event.guest_id, e);
            }

            match recorder.increment_picks_used(&event.guest_id).await {
                Ok(used) => tracing::debug!("[PickRecorder::increment_picks_used] {} has used {} envelopes", event.guest_id, used),
                Err(e) => tracing::warn!("[PickRecorder::increment_picks_used] Failed to update {}: {:?}", event.guest_id, e),
            }
        }
        tracing::debug!("[spawn_pick_recorder] All senders dropped, recorder stopped");
    })
}
