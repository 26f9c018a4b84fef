//! In-memory port implementations shared by handler unit tests.
//!
//! Each mock mirrors the compare-and-set semantics of the real adapters:
//! conditional mutations check the stored state under a mutex and report
//! `Conflict` when it no longer matches.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::activation::ActivationToken;
use crate::domain::foundation::{DomainError, ErrorCode, SubmissionId, TicketId, Timestamp, TransactionId};
use crate::domain::payment::{Transaction, TransactionStatus};
use crate::domain::ticket::{ModerationState, Submission, SubmissionState, Ticket, VerificationState};
use crate::ports::{
    ActivationTokenRepository, AdmissionReader, CacheInvalidator, ConsumeOutcome, Notification,
    NotificationSink, SubmissionRepository, TicketRepository, TransactionRepository,
    TransitionOutcome,
};

pub struct InMemoryTickets {
    tickets: Mutex<Vec<Ticket>>,
}

impl InMemoryTickets {
    pub fn new() -> Self {
        Self {
            tickets: Mutex::new(Vec::new()),
        }
    }

    pub fn with_ticket(ticket: Ticket) -> Self {
        Self {
            tickets: Mutex::new(vec![ticket]),
        }
    }

    pub fn get(&self, id: TicketId) -> Option<Ticket> {
        self.tickets.lock().unwrap().iter().find(|t| t.id == id).cloned()
    }
}

#[async_trait]
impl TicketRepository for InMemoryTickets {
    async fn insert(&self, ticket: &Ticket) -> Result<(), DomainError> {
        self.tickets.lock().unwrap().push(ticket.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TicketId) -> Result<Option<Ticket>, DomainError> {
        Ok(self.get(id))
    }

    async fn set_moderation(
        &self,
        id: TicketId,
        expected: ModerationState,
        target: ModerationState,
        note: Option<&str>,
    ) -> Result<TransitionOutcome<Ticket>, DomainError> {
        let mut tickets = self.tickets.lock().unwrap();
        match tickets.iter_mut().find(|t| t.id == id) {
            Some(t) if t.moderation == expected => {
                t.moderation = target;
                t.moderation_note = note.map(str::to_string);
                t.updated_at = Timestamp::now();
                Ok(TransitionOutcome::Applied(t.clone()))
            }
            _ => Ok(TransitionOutcome::Conflict),
        }
    }

    async fn set_verified(&self, id: TicketId) -> Result<TransitionOutcome<Ticket>, DomainError> {
        let mut tickets = self.tickets.lock().unwrap();
        match tickets.iter_mut().find(|t| t.id == id) {
            Some(t) if t.verification == VerificationState::Unverified => {
                t.verification = VerificationState::Verified;
                t.updated_at = Timestamp::now();
                Ok(TransitionOutcome::Applied(t.clone()))
            }
            _ => Ok(TransitionOutcome::Conflict),
        }
    }
}

pub struct InMemoryTransactions {
    transactions: Mutex<Vec<Transaction>>,
}

impl InMemoryTransactions {
    pub fn new() -> Self {
        Self {
            transactions: Mutex::new(Vec::new()),
        }
    }

    pub fn with_transaction(transaction: Transaction) -> Self {
        Self {
            transactions: Mutex::new(vec![transaction]),
        }
    }

    pub fn all(&self) -> Vec<Transaction> {
        self.transactions.lock().unwrap().clone()
    }

    /// Test backdoor: settle a transaction without the state-machine check.
    pub fn force_status(&self, id: TransactionId, status: TransactionStatus) {
        let mut transactions = self.transactions.lock().unwrap();
        if let Some(tx) = transactions.iter_mut().find(|t| t.id == id) {
            tx.status = status;
        }
    }
}

#[async_trait]
impl TransactionRepository for InMemoryTransactions {
    async fn insert(&self, transaction: &Transaction) -> Result<(), DomainError> {
        let mut transactions = self.transactions.lock().unwrap();
        if transactions.iter().any(|t| t.provider_ref == transaction.provider_ref) {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                "duplicate provider_ref",
            ));
        }
        transactions.push(transaction.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TransactionId) -> Result<Option<Transaction>, DomainError> {
        Ok(self.transactions.lock().unwrap().iter().find(|t| t.id == id).cloned())
    }

    async fn find_by_provider_ref(
        &self,
        provider_ref: &str,
    ) -> Result<Option<Transaction>, DomainError> {
        Ok(self
            .transactions
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.provider_ref == provider_ref)
            .cloned())
    }

    async fn find_open_by_ticket(
        &self,
        ticket_id: TicketId,
    ) -> Result<Option<Transaction>, DomainError> {
        Ok(self
            .transactions
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.ticket_id == ticket_id && t.is_open())
            .cloned())
    }

    async fn settle(
        &self,
        id: TransactionId,
        expected: TransactionStatus,
        target: TransactionStatus,
    ) -> Result<TransitionOutcome<Transaction>, DomainError> {
        let mut transactions = self.transactions.lock().unwrap();
        match transactions.iter_mut().find(|t| t.id == id) {
            Some(tx) if tx.status == expected => {
                tx.status = target;
                tx.updated_at = Timestamp::now();
                Ok(TransitionOutcome::Applied(tx.clone()))
            }
            _ => Ok(TransitionOutcome::Conflict),
        }
    }
}

#[async_trait]
impl AdmissionReader for InMemoryTransactions {
    async fn count_by_status(&self, statuses: &[TransactionStatus]) -> Result<u64, DomainError> {
        Ok(self
            .transactions
            .lock()
            .unwrap()
            .iter()
            .filter(|t| statuses.contains(&t.status))
            .count() as u64)
    }
}

pub struct InMemorySubmissions {
    submissions: Mutex<Vec<Submission>>,
}

impl InMemorySubmissions {
    pub fn new() -> Self {
        Self {
            submissions: Mutex::new(Vec::new()),
        }
    }

    pub fn with_submission(submission: Submission) -> Self {
        Self {
            submissions: Mutex::new(vec![submission]),
        }
    }

    pub fn get(&self, id: SubmissionId) -> Option<Submission> {
        self.submissions.lock().unwrap().iter().find(|s| s.id == id).cloned()
    }
}

#[async_trait]
impl SubmissionRepository for InMemorySubmissions {
    async fn insert(&self, submission: &Submission) -> Result<(), DomainError> {
        self.submissions.lock().unwrap().push(submission.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: SubmissionId) -> Result<Option<Submission>, DomainError> {
        Ok(self.get(id))
    }

    async fn find_pending_by_ticket(
        &self,
        ticket_id: TicketId,
    ) -> Result<Option<Submission>, DomainError> {
        Ok(self
            .submissions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.ticket_id == ticket_id && s.is_pending())
            .cloned())
    }

    async fn record_verdict(
        &self,
        id: SubmissionId,
        target: SubmissionState,
        feedback: &str,
    ) -> Result<TransitionOutcome<Submission>, DomainError> {
        let mut submissions = self.submissions.lock().unwrap();
        match submissions.iter_mut().find(|s| s.id == id) {
            Some(s) if s.is_pending() => {
                s.state = target;
                s.feedback = if feedback.is_empty() {
                    None
                } else {
                    Some(feedback.to_string())
                };
                s.updated_at = Timestamp::now();
                Ok(TransitionOutcome::Applied(s.clone()))
            }
            _ => Ok(TransitionOutcome::Conflict),
        }
    }
}

pub struct InMemoryTokens {
    tokens: Mutex<Vec<ActivationToken>>,
}

impl InMemoryTokens {
    pub fn new() -> Self {
        Self {
            tokens: Mutex::new(Vec::new()),
        }
    }

    pub fn with_token(token: ActivationToken) -> Self {
        Self {
            tokens: Mutex::new(vec![token]),
        }
    }

    pub fn all(&self) -> Vec<ActivationToken> {
        self.tokens.lock().unwrap().clone()
    }
}

#[async_trait]
impl ActivationTokenRepository for InMemoryTokens {
    async fn insert(&self, token: &ActivationToken) -> Result<(), DomainError> {
        self.tokens.lock().unwrap().push(token.clone());
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<ActivationToken>, DomainError> {
        Ok(self.tokens.lock().unwrap().iter().find(|t| t.token == token).cloned())
    }

    async fn consume(&self, token: &str, now: Timestamp) -> Result<ConsumeOutcome, DomainError> {
        let mut tokens = self.tokens.lock().unwrap();
        let Some(stored) = tokens.iter_mut().find(|t| t.token == token) else {
            return Ok(ConsumeOutcome::NotFound);
        };
        if stored.is_expired(now) {
            return Ok(ConsumeOutcome::Expired);
        }
        if stored.is_consumed() {
            return Ok(ConsumeOutcome::AlreadyConsumed);
        }
        stored.consumed_at = Some(now);
        Ok(ConsumeOutcome::Consumed(stored.clone()))
    }
}

pub struct RecordingCache {
    invalidated: Mutex<Vec<String>>,
    fail_all: bool,
}

impl RecordingCache {
    pub fn new() -> Self {
        Self {
            invalidated: Mutex::new(Vec::new()),
            fail_all: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            invalidated: Mutex::new(Vec::new()),
            fail_all: true,
        }
    }

    pub fn invalidated(&self) -> Vec<String> {
        self.invalidated.lock().unwrap().clone()
    }
}

#[async_trait]
impl CacheInvalidator for RecordingCache {
    async fn invalidate(&self, path: &str) -> Result<(), DomainError> {
        if self.fail_all {
            return Err(DomainError::new(ErrorCode::CacheError, "cache unavailable"));
        }
        self.invalidated.lock().unwrap().push(path.to_string());
        Ok(())
    }
}

pub struct RecordingSink {
    sent: Mutex<Vec<Notification>>,
    fail_all: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_all: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_all: true,
        }
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn send(&self, notification: &Notification) -> Result<(), DomainError> {
        if self.fail_all {
            return Err(DomainError::new(
                ErrorCode::NotificationError,
                "provider unavailable",
            ));
        }
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}
