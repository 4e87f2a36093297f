use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    #[error("envelope index {index} is out of range for a pool of {pool_size}")]
    InvalidIndex { index: usize, pool_size: usize },

    #[error("no prizes are configured, there is nothing to draw")]
    EmptyConfiguration,
}
