pub mod api;
pub mod config;
pub mod panel;
pub mod resource;
pub mod resources;
pub mod sanitize;
pub mod session;
pub mod sync;
