use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use colored::*;
use dialoguer::{Confirm, Input};
use tracing_subscriber::EnvFilter;

use party_clients::{MemoryPartyStore, PostgresClient, PostgresPartyStore};
use party_common::{GuestId, ModuleClient, PartySchedule};
use party_runtime::{
    default_prize_types, load_prize_types, pick_record_channel, spawn_pick_recorder, win_rates,
    DrawConfig, DrawError, DrawSession, PickOutcome, PickRecorder, PrizeSource, TallyStore,
};

mod cache;
mod display;

fn setup_tracing() {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    setup_tracing();

    let config = DrawConfig::from_env()?;
    let schedule = PartySchedule::from_env()?;
    display::print_party_gate(&schedule, chrono::Utc::now());

    let guest_id = match std::env::var("GUEST_ID") {
        Ok(raw) => raw.parse::<GuestId>()?,
        Err(_) => GuestId::generate(),
    };
    println!("{} {}", "Checked in as".red(), guest_id.to_string().bold());

    if std::env::var("DATABASE_URL").is_ok() {
        let store = PostgresPartyStore::new(PostgresClient::setup_connection().await);
        store.initialize().await?;
        run(Arc::new(store), &config, guest_id).await
    } else {
        tracing::info!("[party-sandbox] DATABASE_URL not set, keeping the party in memory");
        run(Arc::new(MemoryPartyStore::new(default_prize_types())), &config, guest_id).await
    }
}

async fn run<S>(store: Arc<S>, config: &DrawConfig, guest_id: GuestId) -> Result<()>
where
    S: PrizeSource + PickRecorder + TallyStore,
{
    let cache_path = std::env::var("SANDBOX_REVEAL_CACHE").ok().map(PathBuf::from);
    let cached_state = match &cache_path {
        Some(path) => cache::read_cached_state(path).await?,
        None => None,
    };
    if let Some((index, prize)) = cached_state.as_ref().and_then(|state| state.revealed()) {
        display::print_prize(&PickOutcome::AlreadyRevealed { index, prize: prize.clone() });
        return back_to_dashboard(cache_path.as_deref()).await;
    }

    let mut tally = store.load_tally(&guest_id).await?;
    while !tally.can_pick_again(config.drinks_per_pick) {
        let remaining = tally.drinks_until_next_pick(config.drinks_per_pick);
        println!(
            "{} drinks so far, {} more until another envelope",
            tally.drink_count, remaining,
        );
        if !Confirm::new().with_prompt("Add a drink?").default(true).interact()? {
            return Ok(());
        }
        tally = store.add_drink(&guest_id).await?;
    }

    let types = load_prize_types(store.as_ref()).await;
    let session = match DrawSession::shuffled(guest_id.clone(), &types) {
        Ok(session) => session,
        Err(DrawError::EmptyConfiguration) => {
            println!("{}", "No prizes are configured yet. Ask the host!".yellow());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let (events_tx, events_rx) = pick_record_channel(config.record_buffer);
    let recorder = spawn_pick_recorder(store.clone(), events_rx);
    let mut session = session.with_recorder(events_tx);

    display::print_win_rates(&win_rates(&types, session.pool().len(), config.primary_label()));

    let outcome = prompt_pick(&mut session)?;
    display::print_prize(&outcome);
    if let Some(path) = &cache_path {
        cache::cache_reveal(path, &outcome).await?;
    }

    drop(session);
    recorder.await?;
    back_to_dashboard(cache_path.as_deref()).await
}

async fn back_to_dashboard(cache_path: Option<&Path>) -> Result<()> {
    if !Confirm::new().with_prompt("Back to dashboard?").default(true).interact()? {
        return Ok(());
    }
    if let Some(path) = cache_path {
        cache::clear_cached_state(path).await?;
    }
    Ok(())
}

fn prompt_pick(session: &mut DrawSession) -> Result<PickOutcome> {
    let last = session.pool().len().saturating_sub(1);
    loop {
        let index: usize = Input::new()
            .with_prompt(format!("Pick a red envelope (0-{})", last))
            .interact_text()?;

        match session.pick(index) {
            Ok(outcome) => return Ok(outcome),
            Err(e @ DrawError::InvalidIndex { .. }) => println!("{}", e.to_string().red()),
            Err(e) => return Err(e.into()),
        }
    }
}
