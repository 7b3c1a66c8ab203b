// src/lib.rs

#[macro_use]
pub mod macros;

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod specs;

pub mod accumulator;
pub mod error;
pub mod fetch;
pub mod file;
pub mod interval;
pub mod kingdoms;
pub mod ledger;
pub mod log;
pub mod model;
pub mod progress;
pub mod quota;
pub mod rank;
pub mod runner;
pub mod scan;
pub mod store;

pub use error::{Result, ScrapeError};
