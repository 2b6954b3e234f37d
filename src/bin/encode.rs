use std::env;

use burn::backend::ndarray::NdArrayDevice;
use burn::backend::NdArray;
use burn::config::Config;
use burn::module::Module;
use color_eyre::eyre::{eyre, Result};
use serde::Serialize;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use astencoder::config::ast_small::ast_small_config;
use astencoder::model::AstAttentionConfig;
use astencoder::util::sample_batch;

type B = NdArray;

#[derive(Serialize)]
struct EncodeSummary {
    input_dims: [usize; 3],
    mask_dims: [usize; 3],
    seq_lens: Vec<usize>,
    output_dims: [usize; 2],
    num_params: usize,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let level = if env::var_os("AST_ENCODER_DEBUG").is_some() {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = match env::args().nth(1) {
        Some(path) => AstAttentionConfig::load(&path)
            .map_err(|err| eyre!("failed to load encoder config from {path}: {err}"))?,
        None => ast_small_config(),
    };
    config.validate()?;

    let device = NdArrayDevice::Cpu;
    let model = config.clone().init::<B>(&device);

    let batch = sample_batch::<B>(3, 1, 8, config.input_size, &device);
    info!(batch_size = batch.batch_size(), nodes = batch.num_nodes(), "sampled ast batch");

    let input_dims = batch.input.dims();
    let mask_dims = batch.mask.dims();
    let output = model.try_forward(batch.input, batch.mask)?;

    let summary = EncodeSummary {
        input_dims,
        mask_dims,
        seq_lens: batch.seq_lens,
        output_dims: output.dims(),
        num_params: model.num_params(),
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
