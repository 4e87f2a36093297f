use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use party_common::GuestId;

use crate::{DrawError, PickEvent};
use crate::prizes::{build_pool, ensure_playable, shuffle, PrizeInstance, PrizeType};

/// Reveal state of one draw session. Callers persist it (e.g. as JSON)
/// to survive a reload; once `Picked` it never changes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DrawState {
    #[default]
    NotPicked,
    Picked { index: usize, prize: PrizeInstance },
}

impl DrawState {
    pub fn is_picked(&self) -> bool {
        matches!(self, Self::Picked { .. })
    }

    pub fn revealed(&self) -> Option<(usize, &PrizeInstance)> {
        match self {
            Self::Picked { index, prize } => Some((*index, prize)),
            Self::NotPicked => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PickOutcome {
    /// First successful pick of the session.
    Revealed { index: usize, prize: PrizeInstance },
    /// The session was already picked; this is the earlier result.
    AlreadyRevealed { index: usize, prize: PrizeInstance },
}

impl PickOutcome {
    pub fn index(&self) -> usize {
        match self {
            Self::Revealed { index, .. } | Self::AlreadyRevealed { index, .. } => *index,
        }
    }

    pub fn prize(&self) -> &PrizeInstance {
        match self {
            Self::Revealed { prize, .. } | Self::AlreadyRevealed { prize, .. } => prize,
        }
    }

    pub fn is_fresh(&self) -> bool {
        matches!(self, Self::Revealed { .. })
    }
}

/// Pure state transition for picking envelope `index`.
///
/// An already picked state is returned unchanged whatever the index. An out of
/// range index on a fresh state fails with `InvalidIndex` and leaves no transition.
pub fn pick(pool: &[PrizeInstance], state: &DrawState, index: usize) -> Result<DrawState, DrawError> {
    if state.is_picked() {
        return Ok(state.clone());
    }

    let prize = pool.get(index)
        .ok_or(DrawError::InvalidIndex { index, pool_size: pool.len() })?;
    Ok(DrawState::Picked { index, prize: prize.clone() })
}

/// One guest's envelope draw: a shuffled pool plus its reveal state.
///
/// A fresh reveal queues a `PickEvent` on the recorder channel without waiting,
/// so bookkeeping failures never affect what the guest sees.
pub struct DrawSession {
    guest_id: GuestId,
    pool: Vec<PrizeInstance>,
    state: DrawState,
    recorder: Option<mpsc::Sender<PickEvent>>,
}

impl DrawSession {
    pub fn new(guest_id: GuestId, pool: Vec<PrizeInstance>) -> Self {
        Self::resume(guest_id, pool, DrawState::NotPicked)
    }

    pub fn shuffled(guest_id: GuestId, types: &[PrizeType]) -> Result<Self, DrawError> {
        ensure_playable(types)?;
        let pool = shuffle(build_pool(types));
        tracing::debug!("[DrawSession::shuffled] Built pool of {} envelopes for {}", pool.len(), guest_id);
        Ok(Self::new(guest_id, pool))
    }

    /// Restores a persisted reveal. A `Picked` index refers to the pool the
    /// reveal was drawn from, not necessarily `pool`.
    pub fn resume(guest_id: GuestId, pool: Vec<PrizeInstance>, state: DrawState) -> Self {
        if let DrawState::Picked { index, .. } = &state {
            if *index >= pool.len() {
                tracing::debug!("[DrawSession::resume] {} resumed envelope {} outside the current pool of {}", guest_id, index, pool.len());
            }
        }
        Self { guest_id, pool, state, recorder: None }
    }

    pub fn with_recorder(mut self, recorder: mpsc::Sender<PickEvent>) -> Self {
        self.recorder = Some(recorder);
        self
    }

    pub fn guest_id(&self) -> &GuestId { &self.guest_id }
    pub fn pool(&self) -> &[PrizeInstance] { &self.pool }
    pub fn state(&self) -> &DrawState { &self.state }

    pub fn revealed(&self) -> Option<&PrizeInstance> {
        self.state.revealed().map(|(_, prize)| prize)
    }

    pub fn pick(&mut self, index: usize) -> Result<PickOutcome, DrawError> {
        if let DrawState::Picked { index, prize } = &self.state {
            tracing::debug!("[DrawSession::pick] {} already revealed envelope {}", self.guest_id, index);
            return Ok(PickOutcome::AlreadyRevealed { index: *index, prize: prize.clone() });
        }

        let prize = self.pool.get(index)
            .cloned()
            .ok_or(DrawError::InvalidIndex { index, pool_size: self.pool.len() })?;
        self.state = DrawState::Picked { index, prize: prize.clone() };

        tracing::info!("[DrawSession::pick] {} revealed {:?} from envelope {}", self.guest_id, prize.label, index);
        self.emit(PickEvent::new(self.guest_id.clone(), index, prize.clone()));

        Ok(PickOutcome::Revealed { index, prize })
    }

    fn emit(&self, event: PickEvent) {
        let Some(recorder) = &self.recorder else {
            tracing::debug!("[DrawSession::emit] No recorder attached, pick {} not recorded", event.id);
            return;
        };

        match recorder.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                tracing::warn!("[DrawSession::emit] Recorder queue full, dropping pick {} for {}", event.id, event.guest_id);
            }
            Err(TrySendError::Closed(event)) => {
                tracing::warn!("[DrawSession::emit] Recorder stopped, dropping pick {} for {}", event.id, event.guest_id);
            }
        }
    }
}
