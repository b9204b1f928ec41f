//! Outbound adapters implementing domain ports.
//!
//! - **http**: reqwest client for the remote LoanLink REST API.
//!
//! Adapters translate between domain types and the wire format. They hold
//! no business rules.

pub mod http;
