mod env;
mod error;
mod prizes;
mod record;
mod tally;

pub use env::{DrawConfig, RuntimeEnv};
pub use error::DrawError;
pub use prizes::{
    PrizeType, PrizeInstance, RarityTier, default_prize_types,
    build_pool, ensure_playable, shuffle, shuffle_with,
    DrawState, DrawSession, PickOutcome, pick,
    WinRate, win_rates,
};
pub use record::{
    PickEvent, PickRecorder, PrizeSource, TallyStore,
    load_prize_types, pick_record_channel, spawn_pick_recorder,
};
pub use tally::DrinkTally;
