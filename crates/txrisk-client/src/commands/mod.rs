pub mod classify;
mod common;
pub mod export;
pub mod rules;

pub use common::InputOptions;
