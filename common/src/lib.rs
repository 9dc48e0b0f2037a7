pub mod config;
pub mod configs;
pub mod error;
pub mod logging;
pub mod service;
pub mod service_register_center;

pub use error::{Error, Result};
