//! The journey state machine: which leg is current, and how it moves.
//!
//! ```text
//! initialize ──► Empty                      (no legs)
//!            └─► Active(0) ─advance─► Active(1) … Active(N-1) ─advance─► Complete
//! ```
//!
//! Transitions are pure: every operation consumes or borrows a state and
//! returns a new one. Nothing here speaks, renders or logs above `debug`; the
//! screen and the announcement coordinator react to the returned
//! [`Transition`].

use crate::error::{JourneyError, Result};
use crate::model::{ParsedRoute, Step};
use std::sync::Arc;
use tracing::debug;

/// 1-based position of the current leg, as read out in "step N of M".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegPosition {
    pub number: usize,
    pub total: usize,
}

/// The sequencer's own state. Only constructed over a non-empty route, so
/// `current_index < route.len()` always holds.
#[derive(Debug, Clone)]
pub struct SequencerState {
    current_index: usize,
    route: Arc<ParsedRoute>,
}

/// Terminal marker reported once the last leg has been advanced past.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JourneyComplete {
    pub legs: usize,
}

/// Result of advancing an active state.
#[derive(Debug, Clone)]
pub enum Advance {
    Next(SequencerState),
    Complete(JourneyComplete),
}

impl SequencerState {
    /// Start at the first leg, or fail with [`JourneyError::EmptyRoute`].
    pub fn initialize(route: ParsedRoute) -> Result<Self> {
        if route.is_empty() {
            return Err(JourneyError::EmptyRoute);
        }
        Ok(Self {
            current_index: 0,
            route: Arc::new(route),
        })
    }

    pub fn current_leg(&self) -> &Step {
        &self.route.steps()[self.current_index]
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn len(&self) -> usize {
        self.route.len()
    }

    pub fn is_last_leg(&self) -> bool {
        self.current_index == self.route.len() - 1
    }

    pub fn position(&self) -> LegPosition {
        LegPosition {
            number: self.current_index + 1,
            total: self.route.len(),
        }
    }

    pub fn route(&self) -> &ParsedRoute {
        &self.route
    }

    /// The leg after the current one, if any.
    pub fn peek_next(&self) -> Option<&Step> {
        self.route.get(self.current_index + 1)
    }

    /// Move one leg forward, or report completion from the last leg.
    ///
    /// ```
    /// use wayfarer_common::LatLng;
    /// use wayfarer_journey::{Advance, ParsedRoute, SequencerState, Step};
    ///
    /// let p = LatLng::new(0.0, 0.0);
    /// let route = ParsedRoute::new(vec![
    ///     Step::walking(1, p, p, "Walk"),
    ///     Step::transit(2, p, p),
    /// ]).unwrap();
    ///
    /// let state = SequencerState::initialize(route).unwrap();
    /// let Advance::Next(state) = state.advance() else { panic!("two legs") };
    /// assert!(state.is_last_leg());
    /// assert!(matches!(state.advance(), Advance::Complete(c) if c.legs == 2));
    /// ```
    pub fn advance(self) -> Advance {
        if self.is_last_leg() {
            return Advance::Complete(JourneyComplete {
                legs: self.route.len(),
            });
        }
        Advance::Next(Self {
            current_index: self.current_index + 1,
            route: self.route,
        })
    }
}

/// What an advance request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Moved { from: usize, to: usize },
    Completed { legs: usize },
    /// Advance requested after completion; nothing changed.
    AlreadyComplete,
    /// Advance requested with no route loaded; nothing changed.
    NoRoute,
}

impl Transition {
    /// Whether the current leg changed and must be re-presented.
    pub fn leg_changed(&self) -> bool {
        matches!(self, Transition::Moved { .. })
    }
}

/// Lifecycle of one journey as seen by its owner.
#[derive(Debug, Clone)]
pub enum JourneyState {
    Empty,
    Active(SequencerState),
    Complete(JourneyComplete),
}

impl JourneyState {
    /// Begin a journey. An empty route yields [`JourneyState::Empty`], which
    /// callers present as "no route available".
    pub fn initialize(route: ParsedRoute) -> Self {
        match SequencerState::initialize(route) {
            Ok(state) => {
                debug!(target: "wayfarer::sequencer", legs = state.len(), "journey initialized");
                JourneyState::Active(state)
            }
            Err(_) => {
                debug!(target: "wayfarer::sequencer", "journey initialized without legs");
                JourneyState::Empty
            }
        }
    }

    /// Apply one advance request. Requests against `Empty` or `Complete`
    /// are absorbed and hand the same state back.
    pub fn advance(self) -> (JourneyState, Transition) {
        match self {
            JourneyState::Empty => (JourneyState::Empty, Transition::NoRoute),
            JourneyState::Complete(done) => {
                debug!(target: "wayfarer::sequencer", "advance after completion ignored");
                (JourneyState::Complete(done), Transition::AlreadyComplete)
            }
            JourneyState::Active(state) => {
                let from = state.current_index();
                match state.advance() {
                    Advance::Next(next) => {
                        let to = next.current_index();
                        debug!(target: "wayfarer::sequencer", from, to, "advanced to next leg");
                        (JourneyState::Active(next), Transition::Moved { from, to })
                    }
                    Advance::Complete(done) => {
                        debug!(target: "wayfarer::sequencer", legs = done.legs, "journey complete");
                        (
                            JourneyState::Complete(done),
                            Transition::Completed { legs: done.legs },
                        )
                    }
                }
            }
        }
    }

    pub fn active(&self) -> Option<&SequencerState> {
        match self {
            JourneyState::Active(state) => Some(state),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, JourneyState::Complete(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LegKind;
    use wayfarer_common::LatLng;

    fn route_of(n: u32) -> ParsedRoute {
        let p = LatLng::new(52.9, -1.4);
        let steps = (1..=n)
            .map(|i| {
                if i % 2 == 0 {
                    Step::transit(i, p, p)
                } else {
                    Step::walking(i, p, p, format!("leg {i}"))
                }
            })
            .collect();
        ParsedRoute::new(steps).unwrap()
    }

    #[test]
    fn empty_route_initializes_to_empty() {
        assert!(matches!(
            JourneyState::initialize(ParsedRoute::empty()),
            JourneyState::Empty
        ));
        assert_eq!(
            SequencerState::initialize(ParsedRoute::empty()).unwrap_err(),
            JourneyError::EmptyRoute
        );
    }

    #[test]
    fn n_minus_one_advances_reach_the_last_leg_and_the_nth_completes() {
        for n in 1..=6 {
            let mut state = JourneyState::initialize(route_of(n));
            for expected in 1..n as usize {
                let (next, transition) = state.advance();
                assert_eq!(
                    transition,
                    Transition::Moved {
                        from: expected - 1,
                        to: expected
                    }
                );
                state = next;
            }
            let active = state.active().expect("still active before the nth advance");
            assert!(active.is_last_leg());
            assert_eq!(active.current_index(), n as usize - 1);

            let (done, transition) = state.advance();
            assert_eq!(transition, Transition::Completed { legs: n as usize });
            assert!(done.is_complete());
        }
    }

    #[test]
    fn advancing_a_complete_journey_is_idempotent() {
        let (mut state, _) = JourneyState::initialize(route_of(1)).advance();
        for _ in 0..3 {
            let (next, transition) = state.advance();
            assert_eq!(transition, Transition::AlreadyComplete);
            assert!(matches!(next, JourneyState::Complete(JourneyComplete { legs: 1 })));
            state = next;
        }
    }

    #[test]
    fn advancing_without_a_route_is_a_no_op() {
        let (state, transition) = JourneyState::Empty.advance();
        assert_eq!(transition, Transition::NoRoute);
        assert!(matches!(state, JourneyState::Empty));
    }

    #[test]
    fn position_and_kind_follow_the_index() {
        let state = SequencerState::initialize(route_of(3)).unwrap();
        assert_eq!(state.position(), LegPosition { number: 1, total: 3 });
        assert_eq!(state.current_leg().kind(), LegKind::Walking);
        assert_eq!(state.peek_next().map(|s| s.step_number), Some(2));

        let Advance::Next(state) = state.advance() else {
            panic!("three legs")
        };
        assert_eq!(state.position(), LegPosition { number: 2, total: 3 });
        assert_eq!(state.current_leg().kind(), LegKind::Transit);
    }

    #[test]
    fn cloned_states_share_the_route() {
        let state = SequencerState::initialize(route_of(2)).unwrap();
        let copy = state.clone();
        let Advance::Next(moved) = state.advance() else {
            panic!("two legs")
        };
        assert_eq!(copy.current_index(), 0);
        assert_eq!(moved.current_index(), 1);
        assert!(std::ptr::eq(copy.route(), moved.route()));
    }
}
