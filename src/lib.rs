//! Confreg - Conference Registration & Ticket Lifecycle Service
//!
//! This crate tracks registrations from payment attempt through
//! admission: payment reconciliation via signed provider webhooks,
//! competition submission moderation, account activation tokens, and
//! page-cache invalidation for the public site.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
