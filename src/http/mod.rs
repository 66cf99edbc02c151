//! JSON API over HTTP

pub mod handlers;
pub mod server;

pub use handlers::{ApiError, CreatePlayerRequest, GameRequest, RecordSetRequest};
pub use server::{create_router, HttpServer};
