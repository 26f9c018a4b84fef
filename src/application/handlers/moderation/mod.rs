//! Admin moderation handlers. Admin identity always arrives as an
//! explicit command field; these handlers never consult ambient state.

mod approve_submission;
mod reject_registration;
mod reject_submission;

pub use approve_submission::{ApproveSubmissionCommand, ApproveSubmissionHandler};
pub use reject_registration::{RejectRegistrationCommand, RejectRegistrationHandler};
pub use reject_submission::{RejectSubmissionCommand, RejectSubmissionHandler};
