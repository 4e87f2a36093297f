use rand::Rng;

use crate::DrawError;
use crate::prizes::{PrizeInstance, PrizeType};

/// Expands prize types into one instance per unit of quantity, in type order.
pub fn build_pool(types: &[PrizeType]) -> Vec<PrizeInstance> {
    types.iter()
        .flat_map(|prize_type| {
            std::iter::repeat_with(move || PrizeInstance::from(prize_type))
                .take(prize_type.quantity as usize)
        })
        .collect()
}

/// Fails with `EmptyConfiguration` when the types would produce an empty pool.
pub fn ensure_playable(types: &[PrizeType]) -> Result<(), DrawError> {
    if types.iter().all(|prize_type| prize_type.quantity == 0) {
        return Err(DrawError::EmptyConfiguration);
    }
    Ok(())
}

pub fn shuffle<T>(mut pool: Vec<T>) -> Vec<T> {
    shuffle_with(&mut pool, &mut rand::rng());
    pool
}

/// Backward Fisher–Yates. Uniform over all permutations when `rng` is uniform.
pub fn shuffle_with<T, R: Rng + ?Sized>(pool: &mut [T], rng: &mut R) {
    for i in (1..pool.len()).rev() {
        let j = rng.random_range(0..=i);
        pool.swap(i, j);
    }
}
