//! Route data consumed by the sequencer: legs in travel order plus the
//! transit side-tables they are joined with.

use crate::error::{JourneyError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use wayfarer_common::LatLng;

/// Discriminates which presenter and which joined data apply to a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegKind {
    Walking,
    Transit,
}

/// Kind-specific leg payload. Walking legs carry their own instruction and
/// path; transit legs get everything else from [`TransitDetails`].
#[derive(Debug, Clone, PartialEq)]
pub enum Leg {
    Walking {
        /// Planner instruction, may contain markup.
        instruction_html: String,
        /// Polyline-encoded path; decoding is the map presenter's job.
        encoded_path: Option<String>,
    },
    Transit,
}

/// One leg of the journey.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// 1-based position in the route.
    pub step_number: u32,
    pub start_location: LatLng,
    pub end_location: LatLng,
    /// Human-readable estimate such as "6 mins"; `None` reads as unknown.
    pub duration_text: Option<String>,
    pub leg: Leg,
}

impl Step {
    pub fn walking(
        step_number: u32,
        start_location: LatLng,
        end_location: LatLng,
        instruction_html: impl Into<String>,
    ) -> Self {
        Self {
            step_number,
            start_location,
            end_location,
            duration_text: None,
            leg: Leg::Walking {
                instruction_html: instruction_html.into(),
                encoded_path: None,
            },
        }
    }

    pub fn transit(step_number: u32, start_location: LatLng, end_location: LatLng) -> Self {
        Self {
            step_number,
            start_location,
            end_location,
            duration_text: None,
            leg: Leg::Transit,
        }
    }

    pub fn with_duration(mut self, duration_text: impl Into<String>) -> Self {
        self.duration_text = Some(duration_text.into());
        self
    }

    /// Attach an encoded path. Ignored for transit legs.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        if let Leg::Walking { encoded_path, .. } = &mut self.leg {
            *encoded_path = Some(path.into());
        }
        self
    }

    pub fn kind(&self) -> LegKind {
        match self.leg {
            Leg::Walking { .. } => LegKind::Walking,
            Leg::Transit => LegKind::Transit,
        }
    }
}

/// Legs in travel order with step numbers running `1..=N`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedRoute {
    steps: Vec<Step>,
}

impl ParsedRoute {
    /// Build a route, checking that step numbers are contiguous from 1.
    ///
    /// ```
    /// use wayfarer_common::LatLng;
    /// use wayfarer_journey::{JourneyError, ParsedRoute, Step};
    ///
    /// let here = LatLng::new(52.92, -1.47);
    /// let route = ParsedRoute::new(vec![
    ///     Step::walking(1, here, here, "Walk to the stop"),
    ///     Step::transit(2, here, here),
    /// ])
    /// .unwrap();
    /// assert_eq!(route.len(), 2);
    ///
    /// let gap = ParsedRoute::new(vec![Step::transit(2, here, here)]);
    /// assert_eq!(gap, Err(JourneyError::NonContiguousSteps { expected: 1, found: 2 }));
    /// ```
    pub fn new(steps: Vec<Step>) -> Result<Self> {
        for (idx, step) in steps.iter().enumerate() {
            let expected = idx as u32 + 1;
            if step.step_number != expected {
                return Err(JourneyError::NonContiguousSteps {
                    expected,
                    found: step.step_number,
                });
            }
        }
        Ok(Self { steps })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

/// Planner detail for one transit leg, keyed by its step number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitDetail {
    pub step_number: u32,
    pub line_name: Option<String>,
    pub line_short_name: Option<String>,
    pub vehicle: Option<String>,
    pub headsign: Option<String>,
    pub departure_stop: Option<String>,
    pub departure_time: Option<String>,
    pub arrival_stop: Option<String>,
    pub arrival_time: Option<String>,
    pub duration: Option<String>,
    pub num_stops: Option<u32>,
}

/// `step_number → TransitDetail`, at most one row per leg.
#[derive(Debug, Clone, Default)]
pub struct TransitDetails {
    by_step: HashMap<u32, TransitDetail>,
}

impl TransitDetails {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row, replacing any previous row for the same step.
    pub fn insert(&mut self, detail: TransitDetail) {
        self.by_step.insert(detail.step_number, detail);
    }

    pub fn get(&self, step_number: u32) -> Option<&TransitDetail> {
        self.by_step.get(&step_number)
    }

    pub fn len(&self) -> usize {
        self.by_step.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_step.is_empty()
    }
}

impl FromIterator<TransitDetail> for TransitDetails {
    fn from_iter<I: IntoIterator<Item = TransitDetail>>(iter: I) -> Self {
        let mut details = Self::new();
        for detail in iter {
            details.insert(detail);
        }
        details
    }
}

/// A stop on a line's pattern.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransitStop {
    #[serde(default)]
    pub stop_ref: Option<String>,
    pub name: String,
    pub location: LatLng,
}

/// Ordered stops of one line in the outbound direction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitStopList {
    stops: Vec<TransitStop>,
}

impl TransitStopList {
    pub fn new(stops: Vec<TransitStop>) -> Self {
        Self { stops }
    }

    pub fn stops(&self) -> &[TransitStop] {
        &self.stops
    }

    /// The stop after the boarding stop, i.e. the second entry.
    pub fn next_stop(&self) -> Option<&TransitStop> {
        self.stops.get(1)
    }

    pub fn waypoints(&self) -> Vec<LatLng> {
        self.stops.iter().map(|s| s.location).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Outbound,
    Inbound,
    #[serde(other)]
    Unknown,
}

/// One entry of a stop catalog: a line's stops in one direction.
#[derive(Debug, Clone, Deserialize)]
pub struct StopPattern {
    pub line: String,
    pub direction: Direction,
    #[serde(default)]
    pub stops: Vec<TransitStop>,
}

/// `line → outbound stop list`. Line names compare case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct TransitStops {
    by_line: HashMap<String, TransitStopList>,
}

impl TransitStops {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the first outbound pattern seen for each line; other directions are dropped.
    pub fn from_patterns(patterns: impl IntoIterator<Item = StopPattern>) -> Self {
        let mut by_line = HashMap::new();
        for pattern in patterns {
            if pattern.direction != Direction::Outbound {
                continue;
            }
            by_line
                .entry(line_key(&pattern.line))
                .or_insert_with(|| TransitStopList::new(pattern.stops));
        }
        Self { by_line }
    }

    /// Decode a JSON array of [`StopPattern`]s.
    ///
    /// ```
    /// use wayfarer_journey::TransitStops;
    ///
    /// let stops = TransitStops::from_json(r#"[
    ///   {"line": "Skylink", "direction": "inbound", "stops": []},
    ///   {"line": "Skylink", "direction": "outbound", "stops": [
    ///     {"name": "Derby Bus Station", "location": {"lat": 52.9216, "lng": -1.4727}},
    ///     {"name": "London Road", "location": {"lat": 52.9160, "lng": -1.4660}}
    ///   ]}
    /// ]"#).unwrap();
    ///
    /// let list = stops.outbound("skylink").unwrap();
    /// assert_eq!(list.next_stop().unwrap().name, "London Road");
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let patterns: Vec<StopPattern> =
            serde_json::from_str(json).map_err(|e| JourneyError::Decode(e.to_string()))?;
        Ok(Self::from_patterns(patterns))
    }

    pub fn insert(&mut self, line: &str, stops: TransitStopList) {
        self.by_line.insert(line_key(line), stops);
    }

    pub fn outbound(&self, line: &str) -> Option<&TransitStopList> {
        self.by_line.get(&line_key(line))
    }

    pub fn len(&self) -> usize {
        self.by_line.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_line.is_empty()
    }
}

fn line_key(line: &str) -> String {
    line.trim().to_lowercase()
}

/// Both side-tables, read-only once a journey is loaded.
#[derive(Debug, Clone, Default)]
pub struct TransitTables {
    pub details: TransitDetails,
    pub stops: TransitStops,
}
