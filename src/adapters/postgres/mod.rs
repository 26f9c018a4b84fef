//! PostgreSQL adapters. Every mutation is a conditional update so the
//! database is the single synchronization point.

mod activation_token_repository;
mod submission_repository;
mod ticket_repository;
mod transaction_repository;

pub use activation_token_repository::PostgresActivationTokenRepository;
pub use submission_repository::PostgresSubmissionRepository;
pub use ticket_repository::PostgresTicketRepository;
pub use transaction_repository::PostgresTransactionRepository;
