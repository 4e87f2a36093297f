mod prize_type;
mod prize_pool;
mod draw_session;
mod win_rate;

pub use prize_type::{PrizeType, PrizeInstance, RarityTier, default_prize_types};
pub use prize_pool::{build_pool, ensure_playable, shuffle, shuffle_with};
pub use draw_session::{DrawState, DrawSession, PickOutcome, pick};
pub use win_rate::{WinRate, win_rates};
