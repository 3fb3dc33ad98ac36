//! MindCare API - rate-limited backend for a wellness companion app.
//!
//! This crate implements the HTTP backend behind the MindCare dashboard. Its
//! core is a fixed-window admission limiter that fronts the supportive-chat
//! endpoint; the rest is thin request handling around an external
//! chat-completion API.

pub mod chat;
pub mod config;
pub mod error;
pub mod http;
pub mod ratelimit;
