mod client;
mod env;
mod guest_id;
mod party_start;

pub use client::ModuleClient;
pub use env::{env_or, EnvVars};
pub use guest_id::GuestId;
pub use party_start::{PartySchedule, TimeUntil, DEFAULT_PARTY_START, PARTY_TIMEZONE};

pub fn get_current_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}

pub fn get_current_timestamp_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
