//! Integration tests for pricegap-bot.
//!
//! These tests drive the supervisor end to end with scripted venues:
//! - Alert dispatch and cooldown
//! - Consecutive-error pause and recovery
//! - Cancellation and cycle limits

pub mod common;
