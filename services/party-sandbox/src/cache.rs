use std::path::Path;

use anyhow::{anyhow, Result};
use party_runtime::{DrawState, PickOutcome};

/// Reads a reveal cached by an earlier run. A missing file means nothing was revealed.
pub async fn read_cached_state(path: &Path) -> Result<Option<DrawState>> {
    match tokio::fs::read_to_string(path).await {
        Ok(raw) => {
            let state = serde_json::from_str(&raw)
                .map_err(|e| anyhow!("[cache::read_cached_state] corrupt reveal cache {}: {}", path.display(), e))?;
            Ok(Some(state))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Caches a fresh reveal so a restart shows the same prize. Earlier results are not rewritten.
pub async fn cache_reveal(path: &Path, outcome: &PickOutcome) -> Result<bool> {
    let PickOutcome::Revealed { index, prize } = outcome else {
        return Ok(false);
    };
    let state = DrawState::Picked { index: *index, prize: prize.clone() };
    tokio::fs::write(path, serde_json::to_string_pretty(&state)?).await?;
    Ok(true)
}

/// Forgets the cached reveal once the guest has acknowledged it.
pub async fn clear_cached_state(path: &Path) -> Result<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use party_common::GuestId;
    use party_runtime::{build_pool, PrizeType};

    fn scratch_path() -> PathBuf {
        std::env::temp_dir().join(format!("party-reveal-{}.json", GuestId::generate()))
    }

    #[tokio::test]
    async fn test_reveal_is_cached_until_cleared() -> Result<()> {
        let path = scratch_path();
        let prize = build_pool(&[PrizeType::new("Mystery prize", 1)]).remove(0);

        assert_eq!(read_cached_state(&path).await?, None);
        assert!(cache_reveal(&path, &PickOutcome::Revealed { index: 0, prize: prize.clone() }).await?);
        assert_eq!(read_cached_state(&path).await?, Some(DrawState::Picked { index: 0, prize }));

        clear_cached_state(&path).await?;
        assert_eq!(read_cached_state(&path).await?, None);
        clear_cached_state(&path).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_earlier_reveal_is_not_rewritten() -> Result<()> {
        let path = scratch_path();
        let prize = build_pool(&[PrizeType::new("Good luck!", 1)]).remove(0);

        assert!(!cache_reveal(&path, &PickOutcome::AlreadyRevealed { index: 0, prize }).await?);
        assert_eq!(read_cached_state(&path).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_cache_is_an_error() -> Result<()> {
        let path = scratch_path();
        tokio::fs::write(&path, "not json").await?;
        assert!(read_cached_state(&path).await.is_err());
        clear_cached_state(&path).await?;
        Ok(())
    }
}
