use burn::prelude::{Backend, Int};
use burn::tensor::{Bool, Tensor, TensorData};
use itertools::Itertools;
use num_traits::float::Float;

use crate::error::ShapeError;

/// Checks that a mask of `mask_dims` fits an input of `seq_len` nodes and `batch` elements.
pub fn check_mask(mask_dims: [usize; 3], seq_len: usize, batch: usize) -> Result<(), ShapeError> {
    let [mask_batch, rows, cols] = mask_dims;

    if rows != cols {
        return Err(ShapeError::MaskNotSquare { dims: mask_dims });
    }

    if mask_batch != batch || rows != seq_len {
        return Err(ShapeError::MaskMismatch {
            mask: mask_dims,
            seq_len,
            batch,
        });
    }

    Ok(())
}

// blocked: batch x nodes x nodes, true where a node may not attend to another
pub fn blocked_to_additive<B: Backend>(blocked: Tensor<B, 3, Bool>) -> Tensor<B, 3> {
    let device = blocked.device();

    Tensor::zeros(blocked.shape(), &device).mask_fill(blocked, f32::neg_infinity())
}

/// Repeats every batch entry once per head, so entry `b * num_heads + h` holds the mask of
/// batch element `b` for head `h`.
pub fn repeat_heads<B: Backend>(mask: Tensor<B, 3>, num_heads: usize) -> Tensor<B, 3> {
    let [batch, rows, cols] = mask.dims();

    mask.unsqueeze_dim::<4>(1)
        .expand([batch, num_heads, rows, cols])
        .reshape([batch * num_heads, rows, cols])
}

/// Blocks attention to the padded tail of every sequence in a batch padded to `max_len` nodes.
///
/// Padded nodes still attend to the real nodes of their sequence, so no row is fully blocked
/// as long as every sequence has at least one node.
pub fn padding_mask<B: Backend>(
    seq_lens: &[usize],
    max_len: usize,
    device: &B::Device,
) -> Tensor<B, 3, Bool> {
    assert!(
        seq_lens.iter().all(|&len| len > 0 && len <= max_len),
        "sequence lengths {seq_lens:?} must lie in 1..={max_len}"
    );

    let batch = seq_lens.len();
    let lens = seq_lens.iter().map(|&len| len as i64).collect_vec();

    let lens = Tensor::<B, 1, Int>::from_data(TensorData::new(lens, [batch]), device)
        .reshape([batch, 1, 1])
        .expand([batch, max_len, max_len]);

    let range = Tensor::<B, 1, Int>::arange(0..max_len as i64, device)
        .reshape([1, 1, max_len])
        .expand([batch, max_len, max_len]);

    range.greater_equal(lens)
}
