// Resume shortlisting engine
// Implements: criteria validation, weighted resume scoring, batch ranking and shortlisting.
// Everything below `handlers` is pure: no I/O, no shared mutable state.

pub mod feedback;
pub mod handlers;
pub mod normalize;
pub mod scorer;
pub mod shortlist;
pub mod validation;

// Re-export the public API consumed by the service layer and integration tests.
pub use scorer::{ResumeScorer, ScoringError, WeightedScorer};
pub use shortlist::{rank_and_shortlist, CancelToken, ShortlistOptions, ShortlistOutcome};
pub use validation::{validate_criteria, FieldViolation, ValidationError};
