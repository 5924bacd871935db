//! Workforce Notifications - real-time HR notification delivery
//!
//! Workforce state changes (leave, absence, return-to-work, evaluations)
//! become typed notification events. Each event is recorded, broadcast on the
//! `notifications` channel, picked up by subscribed clients and tracked with
//! per-recipient read state behind a notification bell.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod server;
