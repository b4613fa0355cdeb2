#[macro_use]
extern crate lazy_static;

pub mod app_config;
pub mod error;
pub mod logger;
