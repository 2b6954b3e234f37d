use crate::model::AstAttentionConfig;

pub fn ast_small_config() -> AstAttentionConfig {
    let input_size = 16;
    let hidden_size = 32;

    AstAttentionConfig::new(input_size, hidden_size, 2)
        .with_num_heads(2)
        .with_dropout(0.3)
}
