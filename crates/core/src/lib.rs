mod assets;

pub mod client;
pub mod config;
pub mod fixture;
pub mod report;
pub mod session;
pub mod suite;
pub mod token;

pub use crate::assets::get_config_dir;
