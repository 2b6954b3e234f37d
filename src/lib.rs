pub mod config;
pub mod data;
pub mod error;
pub mod mask;
pub mod model;
pub mod pad;
pub mod util;
