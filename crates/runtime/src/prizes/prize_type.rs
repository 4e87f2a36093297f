use serde::{Deserialize, Serialize};

/// One configured prize category. `quantity` copies of it go into the pool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeType {
    pub label: String,
    pub quantity: u32,
    #[serde(default)]
    pub microcopy: Option<String>,
    #[serde(default)]
    pub rarity: Option<String>,
}

impl PrizeType {
    pub fn new(label: impl Into<String>, quantity: u32) -> Self {
        Self { label: label.into(), quantity, microcopy: None, rarity: None }
    }

    pub fn with_microcopy(mut self, microcopy: impl Into<String>) -> Self {
        self.microcopy = Some(microcopy.into());
        self
    }

    pub fn with_rarity(mut self, rarity: impl Into<String>) -> Self {
        self.rarity = Some(rarity.into());
        self
    }

    pub fn tier(&self) -> RarityTier {
        RarityTier::from_label(self.rarity.as_deref())
    }
}

/// A single drawable envelope. It has no identity beyond its pool position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeInstance {
    pub label: String,
    pub microcopy: Option<String>,
    pub rarity: Option<String>,
}

impl PrizeInstance {
    pub fn tier(&self) -> RarityTier {
        RarityTier::from_label(self.rarity.as_deref())
    }
}

impl From<&PrizeType> for PrizeInstance {
    fn from(prize_type: &PrizeType) -> Self {
        Self {
            label: prize_type.label.clone(),
            microcopy: prize_type.microcopy.clone(),
            rarity: prize_type.rarity.clone(),
        }
    }
}

/// Display ordering of rarities. Anything unrecognised sorts last.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RarityTier {
    Common,
    Rare,
    Epic,
    Legendary,
    Unknown,
}

impl RarityTier {
    pub fn from_label(rarity: Option<&str>) -> Self {
        match rarity.map(|r| r.trim().to_lowercase()).as_deref() {
            Some("common") => Self::Common,
            Some("rare") => Self::Rare,
            Some("epic") => Self::Epic,
            Some("legendary") => Self::Legendary,
            _ => Self::Unknown,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Common => "Common",
            Self::Rare => "Rare",
            Self::Epic => "Epic",
            Self::Legendary => "Legendary",
            Self::Unknown => "Unknown",
        }
    }
}

/// Built-in prize set used until real configuration is provided.
pub fn default_prize_types() -> Vec<PrizeType> {
    vec![
        PrizeType::new("Good luck!", 10)
            .with_microcopy("May the new year bring you joy.")
            .with_rarity("Common"),
        PrizeType::new("Fortune cookie", 5)
            .with_microcopy("Your fortune awaits inside.")
            .with_rarity("Rare"),
        PrizeType::new("LNY blessing", 8)
            .with_microcopy("Wishing you prosperity!")
            .with_rarity("Common"),
        PrizeType::new("🍊 Orange luck", 12)
            .with_microcopy("Sour today, sweet tomorrow.")
            .with_rarity("Common"),
        PrizeType::new("Mystery prize", 3)
            .with_microcopy("Curiosity rewarded.")
            .with_rarity("Legendary"),
    ]
}
