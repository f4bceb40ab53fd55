/// Errors raised while building or decoding a journey.
///
/// Data-completeness problems inside a running journey (missing transit
/// detail, a second advance after completion) are not represented here; the
/// sequencer and the view joins absorb them with placeholders and no-ops.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum JourneyError {
    /// The route has no legs, so there is nothing to sequence.
    #[error("route has no legs")]
    EmptyRoute,

    /// Step numbers did not form the run `1..=N` in travel order.
    #[error("step numbers must run 1..=N in order: expected {expected}, found {found}")]
    NonContiguousSteps { expected: u32, found: u32 },

    /// The planner returned a leg that is neither walking nor transit.
    #[error("unsupported travel mode: {0}")]
    UnsupportedTravelMode(String),

    /// The planner reported a failure; carries its user-facing message.
    #[error("route planner error: {0}")]
    Planner(String),

    /// A planner response or stop catalog could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
}

/// Convenient alias for results that use [`JourneyError`].
pub type Result<T> = std::result::Result<T, JourneyError>;
