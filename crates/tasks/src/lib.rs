#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod spawner;
mod task;

pub use spawner::*;
pub use task::*;
