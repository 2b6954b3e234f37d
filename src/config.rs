pub mod ast_small;
