pub mod analyzers;
pub mod config;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod output;
pub mod services;
