//! Menu state machine and reply rendering.
//!
//! `Navigator` is the single entry point for incoming updates: it mutates the
//! user's session, consults the profile cache for username lookups and sends
//! every reply through the messaging port with the current menu's keyboard.

mod card;
mod engine;
mod menu;

pub use card::profile_card;
pub use engine::{Input, Navigator};
pub use menu::{action_for_label, ButtonAction, Menu};
