//! Built-in check programs.

pub mod block_height;
