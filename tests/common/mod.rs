#[allow(dead_code)]
pub mod fixtures;
#[allow(dead_code)]
pub mod modules;

pub use fixtures::*;
pub use modules::*;
