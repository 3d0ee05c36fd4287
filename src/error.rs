//! Error type shared by the containers' checked operations.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum Error {
    /// A positional access past the live elements.
    #[error("index {index} out of bounds for length {len}")]
    OutOfBounds { index: usize, len: usize },
    /// A `NodeRef` whose node has been removed, or that another list issued.
    #[error("node reference does not resolve to a live node")]
    StaleNode,
    /// Load factor must be finite and strictly positive.
    #[error("invalid load factor {0}")]
    InvalidLoadFactor(f32),
}

pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn messages_name_the_offending_values() {
        let e = Error::OutOfBounds { index: 7, len: 3 };
        assert_eq!(e.to_string(), "index 7 out of bounds for length 3");
        assert_eq!(
            Error::InvalidLoadFactor(-1.0).to_string(),
            "invalid load factor -1"
        );
        assert!(Error::StaleNode.to_string().contains("node reference"));
    }
}
