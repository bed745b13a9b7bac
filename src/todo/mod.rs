pub mod models;
pub mod snapshot;
pub mod store;
pub mod views;
