//! Chicken Shooter: a terminal arcade shooter.
//!
//! The library holds everything that can be exercised without a terminal:
//! the game session and its entities (`entities`), the per-frame logic
//! (`compute`), collision geometry (`geometry`), configuration (`config`)
//! and sprite resources (`assets`).  Rendering and the input loop live in
//! the binary.

pub mod assets;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod geometry;
