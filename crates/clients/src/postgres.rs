use anyhow::{anyhow, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

use party_common::{define_module_client, get_current_timestamp, GuestId, ModuleClient};
use party_runtime::{DrinkTally, PickEvent, PickRecorder, PrizeSource, PrizeType, TallyStore};

define_module_client! {
    (struct PostgresClient, "postgres")
    client_type: PgPool,
    env: ["DATABASE_URL"],
    setup: async {
        let database_url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL environment variable not set");
        PgPoolOptions::new()
            .max_connections(5)
            .connect(&database_url)
            .await
            .expect("Failed to connect to default database")
    }
}

/// Party tables in Postgres: `prize_types`, `prize_picks` and `guests`.
#[derive(Clone)]
pub struct PostgresPartyStore {
    client: PostgresClient,
}

impl PostgresPartyStore {
    pub fn new(client: PostgresClient) -> Self {
        Self { client }
    }

    fn pool(&self) -> &PgPool {
        self.client.get_client()
    }

    pub async fn initialize(&self) -> Result<()> {
        let mut tx = self.pool().begin().await?;
        sqlx::query(r#"
            CREATE TABLE IF NOT EXISTS prize_types (
                id BIGSERIAL PRIMARY KEY,
                label TEXT NOT NULL,
                quantity INTEGER NOT NULL DEFAULT 0,
                microcopy TEXT,
                rarity TEXT,
                created_at BIGINT NOT NULL DEFAULT 0
            )
        "#)
        .execute(&mut *tx)
        .await?;

        sqlx::query(r#"
            CREATE TABLE IF NOT EXISTS prize_picks (
                id UUID PRIMARY KEY,
                guest_id TEXT NOT NULL,
                pool_index INTEGER NOT NULL,
                prize_label TEXT NOT NULL,
                prize_microcopy TEXT,
                prize_rarity TEXT,
                created_at BIGINT NOT NULL
            )
        "#)
        .execute(&mut *tx)
        .await?;

        sqlx::query(r#"
            CREATE TABLE IF NOT EXISTS guests (
                guest_id TEXT PRIMARY KEY,
                drink_count INTEGER NOT NULL DEFAULT 0,
                envelope_picks_used INTEGER NOT NULL DEFAULT 0,
                updated_at BIGINT NOT NULL DEFAULT 0
            )
        "#)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::info!("[PostgresPartyStore::initialize] Party tables ready");
        Ok(())
    }

    pub async fn insert_prize_types(&self, types: &[PrizeType]) -> Result<()> {
        let mut tx = self.pool().begin().await?;
        for prize_type in types {
            sqlx::query(
                "INSERT INTO prize_types (label, quantity, microcopy, rarity, created_at) VALUES ($1, $2, $3, $4, $5)"
            )
            .bind(&prize_type.label)
            .bind(i32::try_from(prize_type.quantity)?)
            .bind(&prize_type.microcopy)
            .bind(&prize_type.rarity)
            .bind(get_current_timestamp())
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}

fn tally_from_row(drink_count: i32, envelope_picks_used: i32) -> DrinkTally {
    DrinkTally::new(
        u32::try_from(drink_count).unwrap_or(0),
        u32::try_from(envelope_picks_used).unwrap_or(0),
    )
}

#[async_trait::async_trait]
impl PrizeSource for PostgresPartyStore {
    async fn fetch_prize_types(&self) -> Result<Vec<PrizeType>> {
        let rows = sqlx::query("SELECT label, quantity, microcopy, rarity FROM prize_types ORDER BY id")
            .fetch_all(self.pool())
            .await?;

        rows.iter()
            .map(|row| -> Result<PrizeType> {
                let quantity: i32 = row.try_get("quantity")?;
                Ok(PrizeType {
                    label: row.try_get("label")?,
                    quantity: u32::try_from(quantity).unwrap_or(0),
                    microcopy: row.try_get("microcopy")?,
                    rarity: row.try_get("rarity")?,
                })
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl PickRecorder for PostgresPartyStore {
    async fn record_pick(&self, event: &PickEvent) -> Result<()> {
        sqlx::query(r#"
            INSERT INTO prize_picks (id, guest_id, pool_index, prize_label, prize_microcopy, prize_rarity, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#)
        .bind(event.id)
        .bind(event.guest_id.as_str())
        .bind(i32::try_from(event.pool_index)?)
        .bind(&event.prize.label)
        .bind(&event.prize.microcopy)
        .bind(&event.prize.rarity)
        .bind(event.picked_at)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn increment_picks_used(&self, guest_id: &GuestId) -> Result<u32> {
        let row = sqlx::query(r#"
            INSERT INTO guests (guest_id, envelope_picks_used, updated_at)
            VALUES ($1, 1, $2)
            ON CONFLICT (guest_id) DO UPDATE
            SET envelope_picks_used = guests.envelope_picks_used + 1, updated_at = EXCLUDED.updated_at
            RETURNING envelope_picks_used
        "#)
        .bind(guest_id.as_str())
        .bind(get_current_timestamp())
        .fetch_one(self.pool())
        .await?;

        let used: i32 = row.try_get("envelope_picks_used")?;
        u32::try_from(used)
            .map_err(|_| anyhow!("[PostgresPartyStore::increment_picks_used] negative pick count {} for {}", used, guest_id))
    }
}

#[async_trait::async_trait]
impl TallyStore for PostgresPartyStore {
    async fn load_tally(&self, guest_id: &GuestId) -> Result<DrinkTally> {
        let row = sqlx::query("SELECT drink_count, envelope_picks_used FROM guests WHERE guest_id = $1")
            .bind(guest_id.as_str())
            .fetch_optional(self.pool())
            .await?;

        match row {
            Some(row) => Ok(tally_from_row(row.try_get("drink_count")?, row.try_get("envelope_picks_used")?)),
            None => Ok(DrinkTally::default()),
        }
    }

    async fn add_drink(&self, guest_id: &GuestId) -> Result<DrinkTally> {
        let row = sqlx::query(r#"
            INSERT INTO guests (guest_id, drink_count, updated_at)
            VALUES ($1, 1, $2)
            ON CONFLICT (guest_id) DO UPDATE
            SET drink_count = guests.drink_count + 1, updated_at = EXCLUDED.updated_at
            RETURNING drink_count, envelope_picks_used
        "#)
        .bind(guest_id.as_str())
        .bind(get_current_timestamp())
        .fetch_one(self.pool())
        .await?;

        Ok(tally_from_row(row.try_get("drink_count")?, row.try_get("envelope_picks_used")?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use party_runtime::{build_pool, PrizeInstance};

    #[test]
    fn test_negative_counts_clamp_to_zero() {
        assert_eq!(tally_from_row(-3, 2), DrinkTally::new(0, 2));
    }

    #[tokio::test]
    async fn test_postgres_round_trip() -> Result<()> {
        // skip test if no database connection
        if std::env::var("DATABASE_URL").is_err() {
            println!("Skipping database test - no DATABASE_URL set");
            return Ok(());
        }

        let store = PostgresPartyStore::new(PostgresClient::setup_connection().await);
        store.initialize().await?;

        let guest = GuestId::generate();
        assert_eq!(store.load_tally(&guest).await?, DrinkTally::default());
        assert_eq!(store.add_drink(&guest).await?, DrinkTally::new(1, 0));

        let prize: PrizeInstance = build_pool(&[PrizeType::new("Fortune cookie", 1).with_rarity("Rare")]).remove(0);
        store.record_pick(&PickEvent::new(guest.clone(), 0, prize)).await?;
        assert_eq!(store.increment_picks_used(&guest).await?, 1);
        assert_eq!(store.increment_picks_used(&guest).await?, 2);
        assert_eq!(store.load_tally(&guest).await?, DrinkTally::new(1, 2));
        Ok(())
    }
}
