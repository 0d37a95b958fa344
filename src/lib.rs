pub mod api;
pub mod composer;
pub mod config;
pub mod data_models;
pub mod descriptor;
pub mod logging;
pub mod sanitizer;
pub mod search_client;
pub mod snippet;
pub mod summary;
