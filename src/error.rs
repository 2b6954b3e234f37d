use thiserror::Error;

/// Shape preconditions checked before any tensor computation runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("input has {actual} features per node, encoder expects {expected}")]
    InputFeatures { expected: usize, actual: usize },

    #[error("attention mask {dims:?} is not square per batch element")]
    MaskNotSquare { dims: [usize; 3] },

    #[error(
        "attention mask {mask:?} does not match input of {seq_len} nodes and batch size {batch}"
    )]
    MaskMismatch {
        mask: [usize; 3],
        seq_len: usize,
        batch: usize,
    },

    #[error("hidden state {actual:?} does not match expected {expected:?}")]
    HiddenMismatch {
        expected: [usize; 3],
        actual: [usize; 3],
    },

    #[error("hidden size {hidden_size} is not divisible by {num_heads} attention heads")]
    HeadSplit { hidden_size: usize, num_heads: usize },
}
