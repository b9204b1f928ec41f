//! Reqwest-backed adapter for the LoanLink REST API.
//!
//! One [`ApiClient`] implements every driven port. It attaches the signed-in
//! user's bearer token to each request and maps non-success responses onto
//! [`crate::domain::ports::RemoteApiError`], keeping the envelope's
//! `message` untouched.

mod applications;
mod catalogue;
mod client;
mod dto;
mod payments;
mod users;

pub use client::ApiClient;
