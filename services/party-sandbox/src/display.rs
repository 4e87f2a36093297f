use colored::*;
use party_common::{PartySchedule, TimeUntil};
use party_runtime::{PickOutcome, RarityTier, WinRate};

fn paint_rarity(text: &str, tier: RarityTier) -> ColoredString {
    match tier {
        RarityTier::Legendary => text.yellow().bold(),
        RarityTier::Epic => text.magenta(),
        RarityTier::Rare => text.blue(),
        RarityTier::Common | RarityTier::Unknown => text.normal(),
    }
}

pub fn print_party_gate(schedule: &PartySchedule, now: chrono::DateTime<chrono::Utc>) {
    let local_start = schedule.local_start().format("%a %b %-d, %-I:%M%P %Z");
    if schedule.has_started(now) {
        println!("{} {}", "The party is on!".red().bold(), format!("(started {})", local_start).dimmed());
        return;
    }

    let TimeUntil { days, hours, minutes, seconds, .. } = schedule.time_until(now);
    println!(
        "{} {}d {}h {}m {}s {}",
        "Party starts in".red(),
        days, hours, minutes, seconds,
        format!("({})", local_start).dimmed(),
    );
}

pub fn print_win_rates(rates: &[WinRate]) {
    println!("{}", "Win rates".bold());
    for rate in rates {
        let tier = RarityTier::from_label(rate.rarity.as_deref());
        let rarity = rate.rarity.as_deref().map(|r| format!("[{}]", r)).unwrap_or_default();
        println!("  {:>3}%  {} {}", rate.rate, rate.label, paint_rarity(&rarity, tier));
        if let Some(microcopy) = &rate.microcopy {
            println!("        {}", microcopy.dimmed());
        }
    }
}

pub fn print_prize(outcome: &PickOutcome) {
    let prize = outcome.prize();
    if !outcome.is_fresh() {
        println!("{}", "You already opened your envelope.".dimmed());
    }

    println!("{}", "Your prize".bold());
    if let Some(rarity) = &prize.rarity {
        println!("  {}", paint_rarity(rarity, prize.tier()));
    }
    println!("  {}", paint_rarity(&prize.label, prize.tier()).bold());
    if let Some(microcopy) = &prize.microcopy {
        println!("  {}", microcopy.italic());
    }
    println!("{}", "Show this to the host and claim your prize!".red());
}
