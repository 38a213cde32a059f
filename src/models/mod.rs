//! Data models for the Volunteer Hub application.
//!
//! Field names serialize exactly as the front end's TypeScript interfaces expect.

mod chat;
mod event;
mod identity;

pub use chat::*;
pub use event::*;
pub use identity::*;
