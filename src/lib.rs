pub mod cache;
pub mod configuration;
pub mod controller;
pub mod error;
pub mod handler;
pub mod helpers;
pub mod metrics;
pub mod model;
pub mod provider;
pub mod server;
