#![deny(warnings)]

//! Benchmark harness racing Cheat table strategies against each other.

pub mod analytics;
pub mod config;
pub mod logging;
pub mod runner;
