use std::collections::HashMap;

use anyhow::Result;
use tokio::sync::Mutex;

use party_common::GuestId;
use party_runtime::{DrinkTally, PickEvent, PickRecorder, PrizeSource, PrizeType, TallyStore};

/// Process-local party storage, for the sandbox without a database and for tests.
#[derive(Default)]
pub struct MemoryPartyStore {
    prize_types: Vec<PrizeType>,
    picks: Mutex<Vec<PickEvent>>,
    guests: Mutex<HashMap<GuestId, DrinkTally>>,
}

impl MemoryPartyStore {
    pub fn new(prize_types: Vec<PrizeType>) -> Self {
        Self { prize_types, ..Default::default() }
    }

    pub async fn picks(&self) -> Vec<PickEvent> {
        self.picks.lock().await.clone()
    }

    pub async fn picks_for(&self, guest_id: &GuestId) -> Vec<PickEvent> {
        self.picks.lock().await
            .iter()
            .filter(|event| &event.guest_id == guest_id)
            .cloned()
            .collect()
    }
}

#[async_trait::async_trait]
impl PrizeSource for MemoryPartyStore {
    async fn fetch_prize_types(&self) -> Result<Vec<PrizeType>> {
        Ok(self.prize_types.clone())
    }
}

#[async_trait::async_trait]
impl PickRecorder for MemoryPartyStore {
    async fn record_pick(&self, event: &PickEvent) -> Result<()> {
        self.picks.lock().await.push(event.clone());
        Ok(())
    }

    async fn increment_picks_used(&self, guest_id: &GuestId) -> Result<u32> {
        let mut guests = self.guests.lock().await;
        let tally = guests.entry(guest_id.clone()).or_default();
        tally.record_pick();
        Ok(tally.envelope_picks_used)
    }
}

#[async_trait::async_trait]
impl TallyStore for MemoryPartyStore {
    async fn load_tally(&self, guest_id: &GuestId) -> Result<DrinkTally> {
        Ok(self.guests.lock().await.get(guest_id).copied().unwrap_or_default())
    }

    async fn add_drink(&self, guest_id: &GuestId) -> Result<DrinkTally> {
        let mut guests = self.guests.lock().await;
        let tally = guests.entry(guest_id.clone()).or_default();
        tally.drink_count = tally.drink_count.saturating_add(1);
        Ok(*tally)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use party_runtime::{load_prize_types, pick_record_channel, spawn_pick_recorder, DrawSession};

    use super::*;

    #[tokio::test]
    async fn test_tally_counts_per_guest() -> Result<()> {
        let store = MemoryPartyStore::default();
        let alice: GuestId = "g_1_alice".parse()?;
        let bob: GuestId = "g_2_bob".parse()?;

        for _ in 0..5 {
            store.add_drink(&alice).await?;
        }
        store.add_drink(&bob).await?;
        assert_eq!(store.increment_picks_used(&alice).await?, 1);

        assert_eq!(store.load_tally(&alice).await?, DrinkTally::new(5, 1));
        assert_eq!(store.load_tally(&bob).await?, DrinkTally::new(1, 0));
        assert_eq!(store.load_tally(&"g_3_nobody".parse()?).await?, DrinkTally::default());
        Ok(())
    }

    #[tokio::test]
    async fn test_session_pick_lands_in_store() -> Result<()> {
        let store = Arc::new(MemoryPartyStore::new(vec![PrizeType::new("Only", 2)]));
        let guest: GuestId = "g_1_alice".parse()?;
        let (tx, rx) = pick_record_channel(4);
        let handle = spawn_pick_recorder(store.clone(), rx);

        let types = load_prize_types(store.as_ref()).await;
        let mut session = DrawSession::shuffled(guest.clone(), &types)?.with_recorder(tx);
        session.pick(1)?;
        drop(session);
        handle.await?;

        let picks = store.picks_for(&guest).await;
        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].prize.label, "Only");
        assert_eq!(store.load_tally(&guest).await?.envelope_picks_used, 1);
        Ok(())
    }
}
