//! Batch conversion and submission
//!
//! [`SubmissionCoordinator`] runs messages through the conversion pipeline and
//! posts the results; [`SubmissionSummary`] aggregates the outcome.

pub mod coordinator;
pub mod summary;

pub use coordinator::{
    MessageOutcome, SourceMessage, SubmissionCoordinator, SubmissionReport, SubmissionState,
};
pub use summary::{SubmissionError, SubmissionErrorType, SubmissionSummary, SubmittedResource};
