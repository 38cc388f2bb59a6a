pub mod auth;
pub mod config;
pub mod context;
pub mod download;
mod error;
pub mod extract;
pub mod fetch;
pub mod http;
pub mod page;
pub mod retry;
pub mod session;
pub mod slug;
pub mod walker;

pub use error::{CrawlError, Result};
