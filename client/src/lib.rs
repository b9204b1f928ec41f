//! Typed client for the LoanLink micro-loan marketplace API.
//!
//! `domain` holds the marketplace model, the role gate and the services
//! that enforce business rules; `outbound::http` talks to the REST API;
//! `cli` and `config` back the `loanlink` binary.

pub mod cli;
pub mod config;
pub mod domain;
pub mod outbound;
