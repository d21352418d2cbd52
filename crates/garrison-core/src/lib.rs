//! Core types and definitions for the GARRISON bot AI.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geometry, identifiers, components, bot orders, squad events, snapshots,
//! constants and configuration. It has no dependency on the ECS or on any
//! runtime framework.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;
