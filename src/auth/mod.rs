// Identity module
// Resolves the caller of the gateway from a JWT bearer token

pub mod error;
pub mod middleware;
pub mod models;
pub mod token;

pub use error::AuthError;
pub use middleware::{AdminIdentity, MaybeIdentity};
pub use models::{Identity, Role};
pub use token::{Claims, TokenService};
