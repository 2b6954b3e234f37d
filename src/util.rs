use burn::prelude::Backend;
use itertools::Itertools;
use rand::{thread_rng, Rng};

use crate::data::AstBatch;
use crate::pad::{pad_batch, PaddingType};

pub fn sample_sequence(min_len: usize, max_len: usize, input_size: usize) -> Vec<Vec<f32>> {
    let seq_len = thread_rng().gen_range(min_len..=max_len);

    (0..seq_len)
        .map(|_| {
            thread_rng()
                .sample_iter(rand::distributions::Uniform::new(0.0, 1.0))
                .take(input_size)
                .collect_vec()
        })
        .collect_vec()
}

/// Random node features for `batch_size` sequences of `min_len..=max_len` nodes, padded to the
/// longest one. The padding caveats of `pad_batch` apply.
pub fn sample_batch<B: Backend>(
    batch_size: usize,
    min_len: usize,
    max_len: usize,
    input_size: usize,
    device: &B::Device,
) -> AstBatch<B> {
    let seqs = (0..batch_size)
        .map(|_| sample_sequence(min_len, max_len, input_size))
        .collect_vec();

    pad_batch::<B>(seqs, input_size, PaddingType::LongestSequence, device)
}
