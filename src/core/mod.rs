pub mod builder;
pub mod config;
pub mod geo;
pub mod props;
