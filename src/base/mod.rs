//! Core components, types, and utilities for the bot.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration loading.
//! - The shared process context (start time, random generator).
//! - The static quip and presence tables.
//! - The health snapshot model.
//! - Common types and result handling.

pub mod config;
pub mod context;
pub mod health;
pub mod quips;
pub mod types;
