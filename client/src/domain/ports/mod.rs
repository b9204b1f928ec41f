//! Driven ports for the hexagonal boundary.
//!
//! The domain owns these traits; `outbound::http` implements them against
//! the remote API and tests substitute `mockall` doubles.

mod macros;
pub(crate) use macros::define_port_error;

mod loan_applications;
mod loan_catalogue;
mod payment_gateway;
mod remote_api_error;
mod user_directory;

#[cfg(test)]
pub use loan_applications::MockLoanApplications;
pub use loan_applications::{LoanApplications, StatusChange};
pub use loan_catalogue::LoanCatalogue;
#[cfg(test)]
pub use loan_catalogue::MockLoanCatalogue;
#[cfg(test)]
pub use payment_gateway::MockPaymentGateway;
pub use payment_gateway::{CheckoutRequest, CheckoutSession, PaymentGateway};
pub use remote_api_error::RemoteApiError;
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::UserDirectory;
