pub mod api;
pub mod hunt;
pub mod models;
