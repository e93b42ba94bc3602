pub mod catalog;
pub mod composite;
pub mod config;
pub mod error;
pub mod feed;
pub mod h2h;
pub mod http_client;
pub mod logging;
pub mod merge;
pub mod query;
pub mod reshape;
pub mod snapshot;
pub mod sync;
pub mod trailing;
