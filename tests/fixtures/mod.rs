//! Test fixtures for route-sketch.
//!
//! Provides realistic test data:
//! - Real Font-Romeu / Cerdagne locations (from OpenStreetMap)
//! - A scripted in-memory routing client

pub mod font_romeu_locations;
pub mod scripted_client;

pub use font_romeu_locations::*;
