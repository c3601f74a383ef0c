//! Regolith physics test bench library
//!
//! A collection of self-verifying demo scenarios for an asteroid-mining
//! sandbox: sphere point relaxation, a toy Hopfield associative memory,
//! collision-shape and gravity-field playgrounds, non-linear sampling, flag
//! textures, a camera coverage overlay, and a ship part editor with
//! save/load.

pub mod config;
pub mod constants;
pub mod debris;
pub mod editor;
pub mod error;
pub mod flag;
pub mod graphics;
pub mod hopfield;
pub mod overlay;
pub mod relaxation;
pub mod rendering;
pub mod sampling;
pub mod save;
pub mod simulation;
pub mod testing;
