// src/runner/mod.rs
mod runner;

pub use runner::{CheckRunner, ErrorCallback, RunnerOptions};
