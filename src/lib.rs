#![allow(clippy::needless_return)]
// src/lib.rs

pub mod checks;
pub mod cli;
pub mod config;
pub mod core;
pub mod logging;
pub mod network;
pub mod ops;
pub mod runner;
