//! Domain layer - pure business logic with no I/O.

pub mod activation;
pub mod foundation;
pub mod payment;
pub mod ticket;
