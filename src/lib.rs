//! Kookie: a Telegram group bot that relays commands to mapping, AI and
//! joke providers and posts the formatted answers back to the group.

pub mod api;
pub mod chatbot;
pub mod config;
pub mod files;
pub mod permission;
pub mod usage;
