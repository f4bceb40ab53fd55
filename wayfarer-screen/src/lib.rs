//! Journey screen actor.
//!
//! Holds one journey at a time, applies next-step, repeat and load requests
//! in order, keeps narration in step with the current leg, and publishes a
//! snapshot after every change.

pub mod actor;
pub mod screen;

pub use screen::{
    JourneyLoad, JourneyScreen, Notice, ScreenHandle, ScreenMsg, ScreenPhase, ScreenSnapshot,
    spawn_journey_screen,
};
