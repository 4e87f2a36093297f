use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::prizes::{PrizeType, RarityTier};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinRate {
    pub label: String,
    pub rarity: Option<String>,
    pub microcopy: Option<String>,
    /// Whole percent, `round(quantity / pool_size * 100)`.
    pub rate: u32,
}

impl WinRate {
    fn tier(&self) -> RarityTier {
        RarityTier::from_label(self.rarity.as_deref())
    }
}

/// Player-facing odds for each prize type.
///
/// Rows matching `primary_label` come first, then rarer tiers after commoner
/// ones, then alphabetical by label.
pub fn win_rates(types: &[PrizeType], pool_size: usize, primary_label: Option<&str>) -> Vec<WinRate> {
    let mut rates = types.iter()
        .map(|prize_type| WinRate {
            label: prize_type.label.clone(),
            rarity: prize_type.rarity.clone(),
            microcopy: prize_type.microcopy.clone(),
            rate: percent(prize_type.quantity, pool_size),
        })
        .collect::<Vec<_>>();

    let primary = primary_label
        .map(|label| label.trim().to_lowercase())
        .filter(|label| !label.is_empty());
    let is_primary = |rate: &WinRate| primary.as_ref()
        .map(|label| rate.label.to_lowercase().contains(label.as_str()))
        .unwrap_or(false);

    rates.sort_by(|a, b| {
        is_primary(b).cmp(&is_primary(a))
            .then_with(|| a.tier().cmp(&b.tier()))
            .then_with(|| compare_labels(&a.label, &b.label))
    });
    rates
}

fn percent(quantity: u32, pool_size: usize) -> u32 {
    if pool_size == 0 {
        return 0;
    }
    (quantity as f64 / pool_size as f64 * 100.0).round() as u32
}

fn compare_labels(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build_pool, default_prize_types};

    fn summary(rates: &[WinRate]) -> Vec<(&str, u32)> {
        rates.iter().map(|r| (r.label.as_str(), r.rate)).collect()
    }

    #[test]
    fn test_two_types_without_rarity() {
        let types = vec![PrizeType::new("B", 1), PrizeType::new("A", 2)];
        let rates = win_rates(&types, build_pool(&types).len(), None);
        assert_eq!(summary(&rates), vec![("A", 67), ("B", 33)]);
    }

    #[test]
    fn test_default_set_ordering_and_total() {
        let types = default_prize_types();
        let pool_size = build_pool(&types).len();
        let rates = win_rates(&types, pool_size, Some("good fortune"));

        assert_eq!(summary(&rates), vec![
            ("Good luck!", 26),
            ("LNY blessing", 21),
            ("🍊 Orange luck", 32),
            ("Fortune cookie", 13),
            ("Mystery prize", 8),
        ]);
        let total: u32 = rates.iter().map(|r| r.rate).sum();
        assert!((98..=102).contains(&total), "rates summed to {}", total);
    }

    #[test]
    fn test_primary_label_sorts_first_regardless_of_rarity() {
        let types = vec![
            PrizeType::new("Jackpot", 1).with_rarity("Legendary"),
            PrizeType::new("Plain", 5).with_rarity("Common"),
            PrizeType::new("Good Fortune Red Packet", 10).with_rarity("Legendary"),
        ];
        let rates = win_rates(&types, 16, Some("good fortune"));
        let labels: Vec<&str> = rates.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["Good Fortune Red Packet", "Plain", "Jackpot"]);
    }

    #[test]
    fn test_unknown_rarity_sorts_last_then_by_label() {
        let types = vec![
            PrizeType::new("zeta", 1),
            PrizeType::new("Alpha", 1).with_rarity("mythic"),
            PrizeType::new("Beta", 1).with_rarity("epic"),
            PrizeType::new("gamma", 1).with_rarity("RARE"),
        ];
        let rates = win_rates(&types, 4, None);
        let labels: Vec<&str> = rates.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["gamma", "Beta", "Alpha", "zeta"]);
    }

    #[test]
    fn test_empty_pool_reports_zero() {
        let rates = win_rates(&[PrizeType::new("A", 0)], 0, None);
        assert_eq!(summary(&rates), vec![("A", 0)]);
        assert!(win_rates(&[], 0, None).is_empty());
    }
}
