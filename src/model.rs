use burn::config::Config;
use burn::module::Module;
use burn::nn::{LayerNorm, LayerNormConfig, Linear, LinearConfig};
use burn::prelude::Backend;
use burn::tensor::Tensor;
use itertools::Itertools;
use tracing::{debug, trace};

use crate::error::ShapeError;
use crate::mask;
use crate::model::layer::{EncodeLayer, EncodeLayerConfig};

pub mod attention;
pub mod feedforward;
pub mod layer;
pub mod pooling;

#[derive(Config)]
pub struct AstAttentionConfig {
    pub input_size: usize,
    pub hidden_size: usize,
    pub num_layers: usize,
    #[config(default = 1)]
    pub num_heads: usize,
    #[config(default = 0.3)]
    pub dropout: f64,
    #[config(default = 1e-5)]
    pub layer_norm_eps: f64,
}

impl AstAttentionConfig {
    pub fn validate(&self) -> Result<(), ShapeError> {
        if self.num_heads == 0 || self.hidden_size % self.num_heads != 0 {
            return Err(ShapeError::HeadSplit {
                hidden_size: self.hidden_size,
                num_heads: self.num_heads,
            });
        }

        Ok(())
    }

    /// Panics if `hidden_size` cannot be split evenly across `num_heads`.
    pub fn init<B: Backend>(self, device: &B::Device) -> AstAttention<B> {
        if let Err(err) = self.validate() {
            panic!("{err}");
        }

        let layers = (0..self.num_layers)
            .map(|_| {
                EncodeLayerConfig::new(self.hidden_size)
                    .with_num_heads(self.num_heads)
                    .with_dropout(self.dropout)
                    .with_layer_norm_eps(self.layer_norm_eps)
                    .init(device)
            })
            .collect_vec();

        let model = AstAttention {
            dense: LinearConfig::new(self.input_size, self.hidden_size).init(device),
            layers,
            norm: LayerNormConfig::new(self.hidden_size)
                .with_epsilon(self.layer_norm_eps)
                .init(device),
            input_size: self.input_size,
            hidden_size: self.hidden_size,
            num_heads: self.num_heads,
        };

        debug!(
            input_size = self.input_size,
            hidden_size = self.hidden_size,
            num_layers = self.num_layers,
            num_heads = self.num_heads,
            num_params = model.num_params(),
            "initialized ast attention encoder"
        );

        model
    }
}

/// Encodes a batch of AST node sequences into one vector per sequence.
///
/// Inputs are sequence-first: nodes x batch x input_size, with an additive attention mask of
/// batch x nodes x nodes shared by every layer. Dropout follows the backend: it is applied on
/// an autodiff backend and skipped otherwise.
#[derive(Module, Debug)]
pub struct AstAttention<B: Backend> {
    dense: Linear<B>,
    layers: Vec<EncodeLayer<B>>,
    norm: LayerNorm<B>,
    input_size: usize,
    hidden_size: usize,
    num_heads: usize,
}

impl<B: Backend> AstAttention<B> {
    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    pub fn num_heads(&self) -> usize {
        self.num_heads
    }

    fn check_shapes(
        &self,
        input_dims: [usize; 3],
        mask_dims: [usize; 3],
    ) -> Result<(), ShapeError> {
        let [nodes, batch, features] = input_dims;

        if features != self.input_size {
            return Err(ShapeError::InputFeatures {
                expected: self.input_size,
                actual: features,
            });
        }

        mask::check_mask(mask_dims, nodes, batch)
    }

    /// Normalized per-node hidden states, nodes x batch x hidden_size.
    ///
    /// With a padding mask, rows `0..seq_len` of each batch element do not depend on how many
    /// padded nodes follow them. The padded rows themselves are not zero.
    pub fn try_encode(
        &self,
        input: Tensor<B, 3>,
        mask: Tensor<B, 3>,
    ) -> Result<Tensor<B, 3>, ShapeError> {
        self.check_shapes(input.dims(), mask.dims())?;

        let [nodes, batch, _] = input.dims();
        debug!(batch, nodes, "encoding ast batch");

        let mut hidden = self.dense.forward(input);

        for (idx, layer) in self.layers.iter().enumerate() {
            hidden = layer.try_forward(hidden, mask.clone())?;
            trace!(layer = idx, dims = ?hidden.dims(), "encoder layer");
        }

        Ok(self.norm.forward(hidden))
    }

    pub fn encode(&self, input: Tensor<B, 3>, mask: Tensor<B, 3>) -> Tensor<B, 3> {
        self.try_encode(input, mask).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Pooled embeddings, batch x hidden_size, summed over every node including padding. Use
    /// `encode` with `pooling::sum_real_nodes` for padded batches.
    pub fn try_forward(
        &self,
        input: Tensor<B, 3>,
        mask: Tensor<B, 3>,
    ) -> Result<Tensor<B, 2>, ShapeError> {
        let hidden = self.try_encode(input, mask)?;

        Ok(pooling::sum_nodes(hidden))
    }

    /// Panics on a shape mismatch between `input`, `mask` and the configured sizes.
    pub fn forward(&self, input: Tensor<B, 3>, mask: Tensor<B, 3>) -> Tensor<B, 2> {
        self.try_forward(input, mask).unwrap_or_else(|err| panic!("{err}"))
    }
}
