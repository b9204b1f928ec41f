//! Command-line surface of the `loanlink` binary.

use clap::{Args, Parser, Subcommand};

use crate::config::ClientSettings;
use crate::domain::{
    ApplicantDetails, ApplicationId, ApplicationStatus, DEFAULT_MAX_AMOUNT, DEFAULT_MAX_INTEREST,
    Destination, LoanDraft, LoanFilter, LoanId, LoanSearch, Role, parse_emi_plans,
};

/// `loanlink` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "loanlink",
    about = "Browse, apply for and manage micro-loans on a LoanLink marketplace",
    version
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,
    #[command(subcommand)]
    pub command: Command,
}

/// Flags that override configured settings.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Base URL of the LoanLink API.
    #[arg(long = "api-url", value_name = "url", global = true)]
    pub api_url: Option<String>,
    /// Per-request timeout in seconds.
    #[arg(long = "timeout-secs", value_name = "secs", global = true)]
    pub timeout_secs: Option<u64>,
    /// Emit logs as JSON lines.
    #[arg(long = "json-logs", global = true)]
    pub json_logs: bool,
    /// Email of the signed-in user; the token comes from `LOANLINK_TOKEN`.
    #[arg(long = "email", value_name = "email", global = true)]
    pub email: Option<String>,
}

impl GlobalArgs {
    /// Overlay explicitly passed flags on `settings`.
    pub fn apply_to(&self, settings: &mut ClientSettings) {
        if let Some(api_url) = &self.api_url {
            settings.api_url = Some(api_url.clone());
        }
        if let Some(secs) = self.timeout_secs {
            settings.request_timeout_secs = Some(secs);
        }
        if self.json_logs {
            settings.json_logs = true;
        }
        if let Some(email) = &self.email {
            settings.email = Some(email.clone());
        }
    }
}

/// Top-level commands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Browse and manage loan products.
    #[command(subcommand)]
    Loans(LoansCommand),
    /// Apply for a loan product.
    Apply {
        #[arg(value_name = "loan-id", value_parser = parse_loan_id)]
        loan: LoanId,
        #[command(flatten)]
        applicant: ApplicantArgs,
    },
    /// List loan applications.
    #[command(subcommand)]
    Applications(ApplicationsCommand),
    /// Approve a pending application.
    Approve {
        #[arg(value_name = "application-id", value_parser = parse_application_id)]
        application: ApplicationId,
    },
    /// Reject a pending application.
    Reject {
        #[arg(value_name = "application-id", value_parser = parse_application_id)]
        application: ApplicationId,
    },
    /// Administer user accounts.
    #[command(subcommand)]
    Users(UsersCommand),
    /// Pay application fees.
    #[command(subcommand)]
    Pay(PayCommand),
    /// Aggregate figures over every application and loan product.
    Summary,
    /// Inspect route permissions for the current session.
    #[command(subcommand)]
    Gate(GateCommand),
    /// Show the signed-in account.
    Whoami,
}

#[derive(Debug, Clone, Subcommand)]
pub enum LoansCommand {
    /// List loan products matching the catalogue filter.
    List(FilterArgs),
    /// List products featured on the home page.
    Home,
    /// List the distinct loan categories.
    Categories,
    /// Show one loan product.
    Show {
        #[arg(value_name = "loan-id", value_parser = parse_loan_id)]
        loan: LoanId,
    },
    /// List the products you created.
    Mine(SearchArgs),
    /// Add a loan product.
    Create(LoanArgs),
    /// Replace a loan product's editable fields.
    Update {
        #[arg(value_name = "loan-id", value_parser = parse_loan_id)]
        loan: LoanId,
        #[command(flatten)]
        fields: LoanArgs,
    },
    /// Delete a loan product.
    Delete {
        #[arg(value_name = "loan-id", value_parser = parse_loan_id)]
        loan: LoanId,
    },
    /// Feature or unfeature a loan product on the home page.
    Feature {
        #[arg(value_name = "loan-id", value_parser = parse_loan_id)]
        loan: LoanId,
        /// Remove the product from the home page instead.
        #[arg(long)]
        off: bool,
    },
}

/// Catalogue filter inputs.
#[derive(Debug, Clone, Args)]
pub struct FilterArgs {
    /// Case-insensitive text matched against title, category and description.
    #[arg(long, default_value = "")]
    pub query: String,
    /// Interest ceiling in percent.
    #[arg(long = "max-interest", default_value_t = DEFAULT_MAX_INTEREST)]
    pub max_interest: f64,
    /// Loan limit ceiling.
    #[arg(long = "max-amount", default_value_t = DEFAULT_MAX_AMOUNT)]
    pub max_amount: f64,
    /// Exact category; empty means any.
    #[arg(long, default_value = "")]
    pub category: String,
    /// Ignore the interest and amount ceilings.
    #[arg(long, conflicts_with_all = ["max_interest", "max_amount"])]
    pub all: bool,
}

impl FilterArgs {
    pub fn to_filter(&self) -> LoanFilter {
        let filter = if self.all {
            LoanFilter::unbounded()
        } else {
            LoanFilter::default()
                .with_max_interest(self.max_interest)
                .with_max_amount(self.max_amount)
        };
        filter
            .with_query(self.query.as_str())
            .with_category(self.category.as_str())
    }
}

/// Text search over your own products.
#[derive(Debug, Clone, Args)]
pub struct SearchArgs {
    #[arg(long, default_value = "")]
    pub query: String,
    #[arg(long, default_value = "")]
    pub category: String,
}

impl SearchArgs {
    pub fn to_search(&self) -> LoanSearch {
        LoanSearch::new(self.query.as_str(), self.category.as_str())
    }
}

/// Editable loan product fields.
#[derive(Debug, Clone, Args)]
pub struct LoanArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub category: String,
    /// Interest rate in percent.
    #[arg(long = "interest-rate")]
    pub interest_rate: f64,
    #[arg(long = "max-loan-limit")]
    pub max_loan_limit: f64,
    #[arg(long, default_value = "")]
    pub description: String,
    /// Comma-separated plan lengths in months, e.g. `3,6,12`.
    #[arg(long = "emi-plans", default_value = "")]
    pub emi_plans: String,
    #[arg(long = "image-url")]
    pub image_url: Option<String>,
    /// Feature the product on the home page.
    #[arg(long = "show-on-home")]
    pub show_on_home: bool,
}

impl LoanArgs {
    pub fn to_draft(&self) -> LoanDraft {
        LoanDraft {
            title: self.title.clone(),
            category: self.category.clone(),
            interest_rate: self.interest_rate,
            max_loan_limit: self.max_loan_limit,
            description: self.description.clone(),
            emi_plans: parse_emi_plans(&self.emi_plans),
            image_url: self.image_url.clone(),
            show_on_home: self.show_on_home,
        }
    }
}

/// Application form fields.
#[derive(Debug, Clone, Args)]
pub struct ApplicantArgs {
    #[arg(long = "first-name")]
    pub first_name: String,
    #[arg(long = "last-name")]
    pub last_name: String,
    #[arg(long = "contact-number")]
    pub contact_number: String,
    /// National ID or passport number.
    #[arg(long = "national-id")]
    pub national_id: String,
    #[arg(long = "amount")]
    pub requested_amount: f64,
    #[arg(long = "monthly-income")]
    pub monthly_income: f64,
    #[arg(long = "income-source")]
    pub income_source: String,
    #[arg(long)]
    pub reason: String,
    #[arg(long)]
    pub address: String,
    #[arg(long)]
    pub notes: Option<String>,
}

impl ApplicantArgs {
    pub fn to_details(&self) -> ApplicantDetails {
        ApplicantDetails {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            contact_number: self.contact_number.clone(),
            national_id: self.national_id.clone(),
            requested_amount: self.requested_amount,
            monthly_income: self.monthly_income,
            income_source: self.income_source.clone(),
            reason: self.reason.clone(),
            address: self.address.clone(),
            notes: self.notes.clone().filter(|notes| !notes.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum ApplicationsCommand {
    /// Your own applications.
    Mine,
    /// Applications awaiting review.
    Pending,
    /// Approved applications.
    Approved,
    /// Every application, optionally narrowed to one status.
    All {
        #[arg(long, value_parser = parse_status)]
        status: Option<ApplicationStatus>,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum UsersCommand {
    /// List every user.
    List,
    /// Show one user.
    Show { email: String },
    /// Change a user's role.
    Role {
        email: String,
        #[arg(value_parser = parse_role)]
        role: Role,
    },
    /// Suspend a user.
    Suspend {
        email: String,
        #[arg(long)]
        reason: String,
        #[arg(long)]
        feedback: String,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum PayCommand {
    /// Open a hosted checkout for an application fee.
    Checkout {
        #[arg(value_name = "application-id", value_parser = parse_application_id)]
        application: ApplicationId,
    },
    /// Confirm a completed checkout.
    Confirm {
        #[arg(value_name = "session-id")]
        session_id: String,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum GateCommand {
    /// Evaluate the route guard for a path such as `/dashboard/add-loan`.
    Check {
        #[arg(value_parser = parse_destination)]
        path: Destination,
    },
    /// List the dashboard menu for the current role.
    Menu,
}

fn parse_loan_id(raw: &str) -> Result<LoanId, String> {
    LoanId::new(raw).map_err(|error| error.to_string())
}

fn parse_application_id(raw: &str) -> Result<ApplicationId, String> {
    ApplicationId::new(raw).map_err(|error| error.to_string())
}

fn parse_status(raw: &str) -> Result<ApplicationStatus, String> {
    raw.parse::<ApplicationStatus>()
        .map_err(|error| error.to_string())
}

fn parse_role(raw: &str) -> Result<Role, String> {
    raw.parse::<Role>().map_err(|error| error.to_string())
}

fn parse_destination(raw: &str) -> Result<Destination, String> {
    Destination::parse(raw).ok_or_else(|| format!("no route matches {raw:?}"))
}
