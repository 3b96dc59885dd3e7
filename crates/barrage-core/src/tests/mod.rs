//! Whole-game tests driven through [`Simulation`](crate::simulation::Simulation).
//!
//! - `determinism.rs`: same seed and input give the same battle, whatever
//!   the rayon thread count
//! - `integration.rs`: scripted scenarios for the rescue loop, shells,
//!   freezing, reinforcements and the presentation sinks
//! - `helpers.rs`: battlefield setup and fixed-frame stepping

mod helpers;
mod integration;
