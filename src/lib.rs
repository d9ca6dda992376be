//! Treasure Hunt: a small narrative game.
//!
//! Two independent panels share a session. The scene panel walks a graph
//! parsed from a flat `Title：Description` file. The treasure hunt runs a
//! scripted sequence of chance-driven steps and writes every outcome into
//! the persisted player profile.

pub mod config;
pub mod error;
pub mod game;
pub mod narration;
pub mod profile;
pub mod quest;
pub mod resources;
pub mod scene;
