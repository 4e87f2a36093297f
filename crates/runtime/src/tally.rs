use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// A guest's drink count and the envelopes they have opened.
///
/// Check-in earns the first envelope; every `drinks_per_pick` drinks earn another.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrinkTally {
    pub drink_count: u32,
    pub envelope_picks_used: u32,
}

impl DrinkTally {
    pub fn new(drink_count: u32, envelope_picks_used: u32) -> Self {
        Self { drink_count, envelope_picks_used }
    }

    pub fn picks_earned(&self, drinks_per_pick: NonZeroU32) -> u32 {
        1 + self.drink_count / drinks_per_pick.get()
    }

    pub fn can_pick_again(&self, drinks_per_pick: NonZeroU32) -> bool {
        self.picks_earned(drinks_per_pick) > self.envelope_picks_used
    }

    pub fn drinks_until_next_pick(&self, drinks_per_pick: NonZeroU32) -> u32 {
        drinks_per_pick.get() - self.drink_count % drinks_per_pick.get()
    }

    /// Counts one more drink. Returns true when that drink earned an envelope.
    pub fn add_drink(&mut self, drinks_per_pick: NonZeroU32) -> bool {
        self.drink_count = self.drink_count.saturating_add(1);
        self.drink_count % drinks_per_pick.get() == 0
    }

    pub fn record_pick(&mut self) {
        self.envelope_picks_used = self.envelope_picks_used.saturating_add(1);
    }
}
