//! Common types and utilities shared across Wayfarer crates.
//!
//! This crate holds the few pieces every other crate needs: the geographic
//! coordinate type used throughout the journey model and the process-wide
//! logging initializer. It stays dependency-light so the core crates can
//! depend on it without pulling in anything heavy.
//!
//! # Overview
//!
//! - [`LatLng`]: a WGS84 coordinate as delivered by the route planner
//! - [`observability`]: centralised tracing/logging initialisation
//!
//! # Examples
//!
//! ```rust
//! use wayfarer_common::LatLng;
//!
//! let a = LatLng::new(52.9225, -1.4746);
//! let b = LatLng::new(52.9436, -1.1862);
//! let mid = a.midpoint(&b);
//! assert!((mid.lat - 52.93305).abs() < 1e-9);
//! ```
use serde::{Deserialize, Serialize};

pub mod observability;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Arithmetic midpoint, good enough for framing a short leg on a map.
    pub fn midpoint(&self, other: &LatLng) -> LatLng {
        LatLng {
            lat: (self.lat + other.lat) / 2.0,
            lng: (self.lng + other.lng) / 2.0,
        }
    }
}
