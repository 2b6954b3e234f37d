use burn::config::Config;
use burn::module::Module;
use burn::nn::{Dropout, DropoutConfig, Linear, LinearConfig, Relu};
use burn::prelude::Backend;
use burn::tensor::Tensor;

#[derive(Config)]
pub struct FCLayerConfig {
    pub hidden_size: usize,
    #[config(default = 0.3)]
    pub dropout: f64,
}

impl FCLayerConfig {
    pub fn init<B: Backend>(self, device: &B::Device) -> FCLayer<B> {
        let intermediate_size = self.hidden_size * 2;

        FCLayer {
            dense: LinearConfig::new(self.hidden_size, intermediate_size).init(device),
            activation: Relu::new(),
            output_dense: LinearConfig::new(intermediate_size, self.hidden_size).init(device),
            dropout: DropoutConfig::new(self.dropout).init(),
        }
    }
}

/// Position-wise feed-forward block with a residual connection.
#[derive(Module, Debug)]
pub struct FCLayer<B: Backend> {
    dense: Linear<B>,
    activation: Relu,
    output_dense: Linear<B>,
    dropout: Dropout,
}

impl<B: Backend> FCLayer<B> {
    pub fn forward<const D: usize>(&self, input: Tensor<B, D>) -> Tensor<B, D> {
        let hidden = self.dense.forward(input.clone());
        let hidden = self.activation.forward(hidden);
        let hidden = self.output_dense.forward(hidden);

        input + self.dropout.forward(hidden)
    }
}

#[cfg(test)]
mod tests {
    use burn::backend::ndarray::NdArrayDevice;
    use burn::backend::NdArray;
    use burn::tensor::Distribution;

    use super::*;

    type TestBackend = NdArray;

    #[test]
    fn fc_layer_preserves_shape() {
        let device = NdArrayDevice::Cpu;
        let layer = FCLayerConfig::new(12).init::<TestBackend>(&device);

        let hidden = Tensor::<TestBackend, 3>::random([5, 3, 12], Distribution::Default, &device);
        assert_eq!(layer.forward(hidden).dims(), [5, 3, 12]);

        let flat = Tensor::<TestBackend, 2>::random([7, 12], Distribution::Default, &device);
        assert_eq!(layer.forward(flat).dims(), [7, 12]);
    }

    #[test]
    fn fc_layer_is_position_wise() {
        let device = NdArrayDevice::Cpu;
        TestBackend::seed(4);

        let layer = FCLayerConfig::new(6).init::<TestBackend>(&device);
        let hidden = Tensor::<TestBackend, 3>::random([4, 2, 6], Distribution::Default, &device);

        let batched = layer.forward(hidden.clone()).reshape([8, 6]);
        let flattened = layer.forward(hidden.reshape([8, 6]));

        batched.to_data().assert_approx_eq(&flattened.to_data(), 5);
    }
}
