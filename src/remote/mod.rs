// REST transport shared by the Booking Service and Room directory clients

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::{extract_message, RemoteError};
