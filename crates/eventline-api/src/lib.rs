// Eventline API building blocks
//
// Exposed as a library so router-level tests can assemble the same routes
// against in-memory backends.

pub mod common;
pub mod events;
pub mod notifications;
pub mod services;
