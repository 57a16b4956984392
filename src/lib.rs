//! Storyteller - Children's Storytelling Conversation Core
//!
//! This crate routes each user turn by its classified intent, decides whether
//! to decline, write a new story or extend the current one, and keeps every
//! turn in an append-only per-conversation message log.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
