use burn::config::Config;
use burn::module::Module;
use burn::prelude::Backend;
use burn::tensor::Tensor;

use crate::error::ShapeError;
use crate::model::attention::{AttentionLayer, AttentionLayerConfig};
use crate::model::feedforward::{FCLayer, FCLayerConfig};

#[derive(Config)]
pub struct EncodeLayerConfig {
    pub hidden_size: usize,
    #[config(default = 1)]
    pub num_heads: usize,
    #[config(default = 0.3)]
    pub dropout: f64,
    #[config(default = 1e-5)]
    pub layer_norm_eps: f64,
}

impl EncodeLayerConfig {
    pub fn init<B: Backend>(self, device: &B::Device) -> EncodeLayer<B> {
        EncodeLayer {
            attention: AttentionLayerConfig::new(self.hidden_size)
                .with_num_heads(self.num_heads)
                .with_dropout(self.dropout)
                .with_layer_norm_eps(self.layer_norm_eps)
                .init(device),
            fc: FCLayerConfig::new(self.hidden_size)
                .with_dropout(self.dropout)
                .init(device),
        }
    }
}

#[derive(Module, Debug)]
pub struct EncodeLayer<B: Backend> {
    attention: AttentionLayer<B>,
    fc: FCLayer<B>,
}

impl<B: Backend> EncodeLayer<B> {
    pub fn try_forward(
        &self,
        input: Tensor<B, 3>,
        mask: Tensor<B, 3>,
    ) -> Result<Tensor<B, 3>, ShapeError> {
        let hidden = self.attention.try_forward(input, mask)?;

        Ok(self.fc.forward(hidden))
    }

    pub fn forward(&self, input: Tensor<B, 3>, mask: Tensor<B, 3>) -> Tensor<B, 3> {
        self.fc.forward(self.attention.forward(input, mask))
    }
}
