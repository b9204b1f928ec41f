//! Domain primitives, pure logic, ports and services.
//!
//! Purpose: model the marketplace (loan products, applications, users and
//! roles) independently of transport. Adapters under `outbound` implement
//! the driven ports in [`ports`]; the services here hold the business rules
//! and authorise every write before it leaves the process.
//!
//! Public surface:
//! - Value types and entities: [`LoanProduct`], [`LoanApplication`],
//!   [`UserAccount`], [`Role`].
//! - Pure logic: [`LoanFilter`], [`RoleGate`], [`Destination`].
//! - Services: [`CatalogueService`], [`ApplicationSubmissionService`],
//!   [`ReviewService`], [`AdminService`], [`SummaryService`],
//!   [`PaymentService`], [`SignInService`].

pub mod admin;
pub mod application;
pub mod catalogue;
pub mod catalogue_filter;
pub mod error;
pub mod loan;
pub mod navigation;
pub mod payment;
pub mod ports;
pub mod review;
pub mod role_gate;
pub mod session;
pub mod sign_in;
pub mod submission;
pub mod summary;
pub mod user;

mod service_support;
#[cfg(test)]
mod test_support;

pub use self::admin::{AdminService, RoleChange, Suspension, SuspensionValidationError};
pub use self::application::{
    ApplicantDetails, ApplicationId, ApplicationPayload, ApplicationStatus,
    ApplicationValidationError, FeeStatus, LoanApplication,
};
pub use self::catalogue::CatalogueService;
pub use self::catalogue_filter::{
    DEFAULT_MAX_AMOUNT, DEFAULT_MAX_INTEREST, LoanFilter, LoanSearch, categories,
};
pub use self::error::{Error, ErrorCode};
pub use self::loan::{
    Amount, INTEREST_RATE_MAX, InterestRate, LoanDraft, LoanId, LoanProduct, LoanValidationError,
    parse_emi_plans,
};
pub use self::navigation::{Access, Destination, MenuEntry, dashboard_menu};
pub use self::payment::PaymentService;
pub use self::review::{ReviewDecision, ReviewService};
pub use self::role_gate::{GateDecision, RoleGate, enter};
pub use self::session::{BearerToken, Session, SessionContext, SessionState, TokenValidationError};
pub use self::sign_in::SignInService;
pub use self::submission::{ALREADY_APPLIED, ApplicationSubmissionService, SubmissionOutcome};
pub use self::summary::{FeeCounts, PortfolioSummary, StatusCounts, SummaryService};
pub use self::user::{
    DISPLAY_NAME_MAX, DisplayName, Email, Role, UserAccount, UserId, UserValidationError,
};
