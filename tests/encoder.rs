use burn::backend::ndarray::NdArrayDevice;
use burn::backend::NdArray;
use burn::prelude::Backend;
use burn::tensor::{Bool, Distribution, Tensor, TensorData};

use astencoder::config::ast_small::ast_small_config;
use astencoder::mask;
use astencoder::model::pooling::sum_real_nodes;
use astencoder::pad::{pad_batch, PaddingType};
use astencoder::util::sample_batch;

type TestBackend = NdArray;

#[test]
fn small_config_encodes_three_by_thirty_two() {
    let device = NdArrayDevice::Cpu;
    TestBackend::seed(0);

    let model = ast_small_config().init::<TestBackend>(&device);
    assert_eq!(model.input_size(), 16);
    assert_eq!(model.hidden_size(), 32);
    assert_eq!(model.num_layers(), 2);
    assert_eq!(model.num_heads(), 2);

    let input = Tensor::<TestBackend, 3>::random([5, 3, 16], Distribution::Default, &device);
    let mask = Tensor::<TestBackend, 3>::zeros([3, 5, 5], &device);

    assert_eq!(model.forward(input, mask).dims(), [3, 32]);
}

#[test]
fn padded_batch_flows_through_encoder() {
    let device = NdArrayDevice::Cpu;
    TestBackend::seed(1);

    let model = ast_small_config().init::<TestBackend>(&device);
    let batch = sample_batch::<TestBackend>(4, 1, 7, 16, &device);

    let output = model.forward(batch.input, batch.mask);

    assert_eq!(output.dims(), [4, 32]);
    let values = output.to_data().to_vec::<f32>().unwrap();
    assert!(values.iter().all(|value| value.is_finite()));
}

#[test]
fn padding_changes_pooled_sum_but_not_real_node_states() {
    let device = NdArrayDevice::Cpu;
    TestBackend::seed(2);

    let model = ast_small_config().init::<TestBackend>(&device);
    let nodes = vec![vec![0.25; 16], vec![-0.75; 16]];

    let alone =
        pad_batch::<TestBackend>(vec![nodes.clone()], 16, PaddingType::LongestSequence, &device);
    let padded = pad_batch::<TestBackend>(vec![nodes], 16, PaddingType::Explicit(6), &device);
    assert_eq!(padded.seq_lens, vec![2]);

    let encoded_alone = model.encode(alone.input.clone(), alone.mask.clone());
    let encoded_padded = model.encode(padded.input.clone(), padded.mask.clone());
    encoded_alone
        .to_data()
        .assert_approx_eq(&encoded_padded.clone().slice([0..2, 0..1, 0..32]).to_data(), 4);

    let pooled_alone = model.forward(alone.input, alone.mask);
    let pooled_padded = model.forward(padded.input, padded.mask);
    let drift = (pooled_alone.clone() - pooled_padded)
        .abs()
        .max()
        .into_scalar();
    assert!(drift > 1e-2, "padded nodes should add to the pooled sum, drift {drift}");

    sum_real_nodes(encoded_padded, &padded.seq_lens)
        .to_data()
        .assert_approx_eq(&pooled_alone.to_data(), 4);
}

#[test]
fn single_node_sequences_are_supported() {
    let device = NdArrayDevice::Cpu;

    let model = ast_small_config().init::<TestBackend>(&device);
    let batch = pad_batch::<TestBackend>(
        vec![vec![vec![0.5; 16]], vec![vec![-0.5; 16]]],
        16,
        PaddingType::LongestSequence,
        &device,
    );

    assert_eq!(batch.mask.dims(), [2, 1, 1]);
    assert_eq!(model.forward(batch.input, batch.mask).dims(), [2, 32]);
}

#[test]
fn tree_adjacency_mask_is_accepted() {
    let device = NdArrayDevice::Cpu;

    // root 0 with children 1 and 2; nodes see themselves, their parent and their children
    #[rustfmt::skip]
    let blocked = vec![
        false, false, false,
        false, false, true,
        false, true, false,
    ];
    let blocked = Tensor::<TestBackend, 3, Bool>::from_data(
        TensorData::new(blocked, [1, 3, 3]),
        &device,
    );

    let model = ast_small_config().init::<TestBackend>(&device);
    let input = Tensor::<TestBackend, 3>::random([3, 1, 16], Distribution::Default, &device);

    let output = model.forward(input, mask::blocked_to_additive(blocked));

    assert_eq!(output.dims(), [1, 32]);
}

#[test]
#[should_panic(expected = "does not match")]
fn mask_for_other_sequence_length_is_fatal() {
    let device = NdArrayDevice::Cpu;

    let model = ast_small_config().init::<TestBackend>(&device);
    let input = Tensor::<TestBackend, 3>::zeros([5, 3, 16], &device);
    let mask = Tensor::<TestBackend, 3>::zeros([3, 4, 4], &device);

    model.forward(input, mask);
}
