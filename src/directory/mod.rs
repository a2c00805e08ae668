// Room directory collaborator
// Read-only source of room price and guest capacity

pub mod cache;
pub mod client;
pub mod models;

pub use cache::CachedRoomDirectory;
pub use client::{HttpRoomDirectory, RoomDirectory};
pub use models::{Room, RoomEnvelope};
