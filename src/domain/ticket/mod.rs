//! Ticket domain - registration records, moderation, submissions.

mod errors;
mod feedback;
mod states;
mod submission;
mod ticket;

pub use errors::ModerationError;
pub use feedback::{Feedback, MAX_FEEDBACK_LEN, MIN_FEEDBACK_LEN};
pub use states::{ModerationState, SubmissionState, VerificationState};
pub use submission::Submission;
pub use ticket::{Holder, Team, Ticket, TicketCategory};
