// Session module
// One booking draft per session, mutated over HTTP

pub mod handlers;
pub mod models;
pub mod registry;

pub use models::{SessionView, SubmitResponse};
pub use registry::{SessionRegistry, SESSION_IDLE_TTL};
