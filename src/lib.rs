pub mod cache;
pub mod calculator;
pub mod cli;
pub mod client;
pub mod compare;
pub mod config;
pub mod config_manager;
pub mod error;
pub mod format;
pub mod mode;
pub mod model;
pub mod normalize;
pub mod providers;
pub mod query;
pub mod request_logger;
pub mod server;
pub mod sitemap;

pub use error::CatalogError;
pub use model::{ModelData, ProcessedModel, RawModelFeed};
pub use server::AppState;
