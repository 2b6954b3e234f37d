use burn::config::Config;
use burn::module::Module;
use burn::nn::{Dropout, DropoutConfig, LayerNorm, LayerNormConfig, Linear, LinearConfig};
use burn::prelude::Backend;
use burn::tensor::activation::softmax;
use burn::tensor::Tensor;

use crate::error::ShapeError;
use crate::mask;

#[derive(Config)]
pub struct SelfAttentionConfig {
    embed_dim: usize,
    num_heads: usize,
    #[config(default = true)]
    bias: bool,
}

impl SelfAttentionConfig {
    pub fn init<B: Backend>(self, device: &B::Device) -> SelfAttention<B> {
        let embed_dim = self.embed_dim;
        let head_dim = embed_dim / self.num_heads;
        let projection = || {
            LinearConfig::new(embed_dim, embed_dim)
                .with_bias(self.bias)
                .init(device)
        };

        SelfAttention {
            embed_dim,
            num_heads: self.num_heads,
            head_dim,
            scaling: f32::powf(head_dim as f32, -0.5),
            q_proj: projection(),
            k_proj: projection(),
            v_proj: projection(),
            out_proj: projection(),
        }
    }
}

/// Multi-head self-attention over sequence-first hidden states.
#[derive(Module, Debug)]
pub struct SelfAttention<B: Backend> {
    embed_dim: usize,
    num_heads: usize,
    head_dim: usize,
    scaling: f32,
    q_proj: Linear<B>,
    k_proj: Linear<B>,
    v_proj: Linear<B>,
    out_proj: Linear<B>,
}

impl<B: Backend> SelfAttention<B> {
    // batch x nodes x embed -> (batch * heads) x nodes x head_dim
    fn split_heads(&self, tensor: Tensor<B, 3>) -> Tensor<B, 3> {
        let [batch, nodes, _] = tensor.dims();

        tensor
            .reshape([batch, nodes, self.num_heads, self.head_dim])
            .swap_dims(1, 2)
            .reshape([batch * self.num_heads, nodes, self.head_dim])
    }

    /// `hidden` is nodes x batch x embed, `attention_mask` is additive and already repeated per
    /// head: (batch * heads) x nodes x nodes.
    pub fn forward(&self, hidden: Tensor<B, 3>, attention_mask: Tensor<B, 3>) -> Tensor<B, 3> {
        let [nodes, batch, _] = hidden.dims();
        let hidden = hidden.swap_dims(0, 1);

        let query_states = self.split_heads(self.q_proj.forward(hidden.clone()) * self.scaling);
        let key_states = self.split_heads(self.k_proj.forward(hidden.clone()));
        let value_states = self.split_heads(self.v_proj.forward(hidden));

        let attention_weights = query_states.matmul(key_states.swap_dims(1, 2)) + attention_mask;
        let attention_probs = softmax(attention_weights, 2);

        let attention_output = attention_probs.matmul(value_states);
        let attention_output = attention_output
            .reshape([batch, self.num_heads, nodes, self.head_dim])
            .swap_dims(1, 2)
            .reshape([batch, nodes, self.embed_dim]);

        self.out_proj.forward(attention_output).swap_dims(0, 1)
    }
}

#[derive(Config)]
pub struct AttentionLayerConfig {
    pub hidden_size: usize,
    #[config(default = 1)]
    pub num_heads: usize,
    #[config(default = 0.3)]
    pub dropout: f64,
    #[config(default = 1e-5)]
    pub layer_norm_eps: f64,
}

impl AttentionLayerConfig {
    pub fn init<B: Backend>(self, device: &B::Device) -> AttentionLayer<B> {
        assert!(
            self.num_heads > 0 && self.hidden_size % self.num_heads == 0,
            "{}",
            ShapeError::HeadSplit {
                hidden_size: self.hidden_size,
                num_heads: self.num_heads,
            }
        );

        AttentionLayer {
            attention: SelfAttentionConfig::new(self.hidden_size, self.num_heads).init(device),
            norm: LayerNormConfig::new(self.hidden_size)
                .with_epsilon(self.layer_norm_eps)
                .init(device),
            dropout: DropoutConfig::new(self.dropout).init(),
            hidden_size: self.hidden_size,
            num_heads: self.num_heads,
        }
    }
}

/// Masked self-attention, normalized, with dropout and a residual connection.
#[derive(Module, Debug)]
pub struct AttentionLayer<B: Backend> {
    attention: SelfAttention<B>,
    norm: LayerNorm<B>,
    dropout: Dropout,
    hidden_size: usize,
    num_heads: usize,
}

impl<B: Backend> AttentionLayer<B> {
    pub fn try_forward(
        &self,
        input: Tensor<B, 3>,
        mask: Tensor<B, 3>,
    ) -> Result<Tensor<B, 3>, ShapeError> {
        let [nodes, batch, hidden] = input.dims();

        mask::check_mask(mask.dims(), nodes, batch)?;

        if hidden != self.hidden_size {
            return Err(ShapeError::HiddenMismatch {
                expected: [nodes, batch, self.hidden_size],
                actual: [nodes, batch, hidden],
            });
        }

        let mask = mask::repeat_heads(mask, self.num_heads);

        let output = self.attention.forward(input.clone(), mask);
        let output = self.norm.forward(output);

        Ok(input + self.dropout.forward(output))
    }

    /// Panics if `mask` is not batch x nodes x nodes for an input of nodes x batch x hidden.
    pub fn forward(&self, input: Tensor<B, 3>, mask: Tensor<B, 3>) -> Tensor<B, 3> {
        self.try_forward(input, mask).unwrap_or_else(|err| panic!("{err}"))
    }
}
