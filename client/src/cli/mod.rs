//! Command execution for the `loanlink` binary.
//!
//! Each command names the route it stands in for; the route guard is
//! evaluated before any request leaves the process, then the matching
//! domain service does the work and the result is rendered as text.

mod args;
mod render;

use std::io::Write;
use std::sync::Arc;

use color_eyre::eyre::{Result, WrapErr, bail, eyre};
use mockable::{Clock, DefaultClock};
use tracing::debug;

pub use self::args::{
    ApplicantArgs, ApplicationsCommand, Cli, Command, FilterArgs, GateCommand, GlobalArgs,
    LoanArgs, LoansCommand, PayCommand, SearchArgs, UsersCommand,
};
use crate::config::ClientSettings;
use crate::domain::{
    AdminService, ApplicationId, ApplicationStatus, ApplicationSubmissionService,
    CatalogueService, Destination, Email, GateDecision, PaymentService, ReviewDecision,
    ReviewService, RoleChange, RoleGate, Session, SessionContext, SignInService, SummaryService,
    Suspension, dashboard_menu, enter,
};
use crate::outbound::http::ApiClient;

/// Signed-in (or anonymous) client ready to run commands.
pub struct App {
    client: Arc<ApiClient>,
    context: SessionContext,
    clock: Arc<dyn Clock>,
}

impl App {
    /// Assemble an app from parts.
    pub fn new(client: ApiClient, context: SessionContext, clock: Arc<dyn Clock>) -> Self {
        Self {
            client: Arc::new(client),
            context,
            clock,
        }
    }

    /// Build the HTTP client from `settings` and sign in when an identity
    /// is configured.
    pub async fn connect(settings: &ClientSettings) -> Result<Self> {
        let client = ApiClient::new(settings.api_url()?, settings.request_timeout()?)
            .wrap_err("build HTTP client")?;
        let Some((email, token)) = settings.credentials()? else {
            debug!("no identity configured; running signed out");
            return Ok(Self::new(
                client,
                SessionContext::signed_out(),
                Arc::new(DefaultClock),
            ));
        };

        let client = Arc::new(client.with_token(token.clone()));
        let mut context = SessionContext::signed_out();
        SignInService::new(Arc::clone(&client))
            .sign_in(&mut context, email, token)
            .await?;
        Ok(Self {
            client,
            context,
            clock: Arc::new(DefaultClock),
        })
    }

    /// Current session state.
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Run `command`, writing human-readable output to `out`.
    pub async fn run(&mut self, command: Command, out: &mut impl Write) -> Result<()> {
        if let Some(destination) = route_for(&command) {
            self.guard(&destination)?;
        }
        match command {
            Command::Loans(command) => self.run_loans(command, out).await,
            Command::Apply { loan, applicant } => {
                let actor = self.actor()?;
                let product = self.catalogue().get_loan(&loan).await?;
                let outcome = ApplicationSubmissionService::new(
                    Arc::clone(&self.client),
                    Arc::clone(&self.clock),
                )
                .submit(actor, &product, applicant.to_details())
                .await?;
                writeln!(
                    out,
                    "Application {} submitted for {}; next: {}",
                    outcome.application.id(),
                    product.title(),
                    outcome.next
                )?;
                Ok(())
            }
            Command::Applications(command) => self.run_applications(command, out).await,
            Command::Approve { application } => {
                self.decide(&application, ReviewDecision::Approve, out).await
            }
            Command::Reject { application } => {
                self.decide(&application, ReviewDecision::Reject, out).await
            }
            Command::Users(command) => self.run_users(command, out).await,
            Command::Pay(command) => self.run_pay(command, out).await,
            Command::Summary => {
                let service =
                    SummaryService::new(Arc::clone(&self.client), Arc::clone(&self.client));
                let summary = service.summarise(self.actor()?).await?;
                render::summary(out, &summary)?;
                Ok(())
            }
            Command::Gate(GateCommand::Check { path }) => {
                let decision =
                    RoleGate::for_destination(&path).evaluate(self.context.state(), &path);
                render::gate(out, &path, &decision)?;
                Ok(())
            }
            Command::Gate(GateCommand::Menu) => {
                render::menu(out, &dashboard_menu(self.actor()?.role()))?;
                Ok(())
            }
            Command::Whoami => {
                match self.context.session() {
                    Some(session) => render::account(out, session.account())?,
                    None => writeln!(out, "Signed out.")?,
                }
                Ok(())
            }
        }
    }

    async fn run_loans(&self, command: LoansCommand, out: &mut impl Write) -> Result<()> {
        let catalogue = self.catalogue();
        match command {
            LoansCommand::List(filter) => {
                render::loans(out, &catalogue.search(&filter.to_filter()).await?)?;
            }
            LoansCommand::Home => render::loans(out, &catalogue.home_loans().await?)?,
            LoansCommand::Categories => render::categories(out, &catalogue.categories().await?)?,
            LoansCommand::Show { loan } => render::loan(out, &catalogue.get_loan(&loan).await?)?,
            LoansCommand::Mine(search) => {
                let own = catalogue
                    .list_own_loans(self.actor()?, &search.to_search())
                    .await?;
                render::loans(out, &own)?;
            }
            LoansCommand::Create(fields) => {
                let id = catalogue
                    .create_loan(self.actor()?, &fields.to_draft())
                    .await?;
                writeln!(out, "Created loan {id}")?;
            }
            LoansCommand::Update { loan, fields } => {
                catalogue
                    .update_loan(self.actor()?, &loan, &fields.to_draft())
                    .await?;
                writeln!(out, "Updated loan {loan}")?;
            }
            LoansCommand::Delete { loan } => {
                catalogue.delete_loan(self.actor()?, &loan).await?;
                writeln!(out, "Deleted loan {loan}")?;
            }
            LoansCommand::Feature { loan, off } => {
                catalogue
                    .set_show_on_home(self.actor()?, &loan, !off)
                    .await?;
                let placement = if off { "removed from" } else { "added to" };
                writeln!(out, "Loan {loan} {placement} the home page")?;
            }
        }
        Ok(())
    }

    async fn run_applications(
        &self,
        command: ApplicationsCommand,
        out: &mut impl Write,
    ) -> Result<()> {
        let review = self.review();
        let actor = self.actor()?;
        let applications = match command {
            ApplicationsCommand::Mine => review.my_applications(actor).await?,
            ApplicationsCommand::Pending => {
                review
                    .list_by_status(actor, ApplicationStatus::Pending)
                    .await?
            }
            ApplicationsCommand::Approved => {
                review
                    .list_by_status(actor, ApplicationStatus::Approved)
                    .await?
            }
            ApplicationsCommand::All { status } => review.list_all(actor, status).await?,
        };
        render::applications(out, &applications)?;
        Ok(())
    }

    async fn decide(
        &self,
        application: &ApplicationId,
        decision: ReviewDecision,
        out: &mut impl Write,
    ) -> Result<()> {
        let change = self
            .review()
            .decide(self.actor()?, application, decision)
            .await?;
        writeln!(
            out,
            "Application {application} {status} at {at}",
            status = change.status,
            at = change.decided_at.to_rfc3339()
        )?;
        Ok(())
    }

    async fn run_users(&self, command: UsersCommand, out: &mut impl Write) -> Result<()> {
        let admin = AdminService::new(Arc::clone(&self.client));
        let actor = self.actor()?;
        match command {
            UsersCommand::List => render::users(out, &admin.list_users(actor).await?)?,
            UsersCommand::Show { email } => {
                render::account(out, &admin.get_user(actor, &parse_email(&email)?).await?)?;
            }
            UsersCommand::Role { email, role } => {
                let user = admin.get_user(actor, &parse_email(&email)?).await?;
                match admin.change_role(actor, &user, role).await? {
                    RoleChange::Updated => writeln!(out, "{email} is now {role}")?,
                    RoleChange::Unchanged => writeln!(out, "{email} is already {role}")?,
                }
            }
            UsersCommand::Suspend {
                email,
                reason,
                feedback,
            } => {
                let suspension = Suspension::new(reason, feedback)?;
                let user = admin.get_user(actor, &parse_email(&email)?).await?;
                admin.suspend(actor, user.id(), &suspension).await?;
                writeln!(out, "Suspended {email}")?;
            }
        }
        Ok(())
    }

    async fn run_pay(&self, command: PayCommand, out: &mut impl Write) -> Result<()> {
        let payments = PaymentService::new(Arc::clone(&self.client), Arc::clone(&self.client));
        match command {
            PayCommand::Checkout { application } => {
                let session = payments
                    .start_checkout(self.actor()?, &application)
                    .await?;
                writeln!(out, "Open {} to pay the application fee", session.url)?;
                if let Some(id) = session.session_id {
                    writeln!(out, "Checkout session: {id}")?;
                }
            }
            PayCommand::Confirm { session_id } => {
                let next = payments.confirm(&session_id).await?;
                writeln!(out, "Payment confirmed; next: {next}")?;
            }
        }
        Ok(())
    }

    fn guard(&mut self, destination: &Destination) -> Result<()> {
        match enter(&mut self.context, destination) {
            GateDecision::Render => Ok(()),
            GateDecision::RedirectToLogin { .. } => bail!(
                "{destination} requires signing in; configure LOANLINK_TOKEN and LOANLINK_EMAIL"
            ),
            GateDecision::RedirectToAccessDenied => {
                let role = self
                    .context
                    .session()
                    .map(Session::role)
                    .ok_or_else(|| eyre!("session disappeared during the route check"))?;
                bail!("{role} accounts cannot open {destination}")
            }
            GateDecision::Loading => bail!("the session is still resolving"),
        }
    }

    fn actor(&self) -> Result<&Session> {
        self.context
            .session()
            .ok_or_else(|| eyre!("this command requires signing in"))
    }

    fn catalogue(&self) -> CatalogueService<ApiClient> {
        CatalogueService::new(Arc::clone(&self.client))
    }

    fn review(&self) -> ReviewService<ApiClient> {
        ReviewService::new(Arc::clone(&self.client), Arc::clone(&self.clock))
    }
}

fn parse_email(raw: &str) -> Result<Email> {
    Email::new(raw).wrap_err_with(|| format!("invalid email {raw:?}"))
}

/// Route a command stands in for, when it has one.
///
/// Loan edits and deletions have no single route: both managers (own
/// products) and admins may perform them, so the services decide.
pub fn route_for(command: &Command) -> Option<Destination> {
    let destination = match command {
        Command::Loans(LoansCommand::List(_) | LoansCommand::Categories) => Destination::AllLoans,
        Command::Loans(LoansCommand::Home) => Destination::Home,
        Command::Loans(LoansCommand::Show { loan }) => Destination::LoanDetails(loan.clone()),
        Command::Loans(LoansCommand::Mine(_)) => Destination::ManageLoans,
        Command::Loans(LoansCommand::Create(_)) => Destination::AddLoan,
        Command::Loans(LoansCommand::Feature { .. }) => Destination::AdminAllLoans,
        Command::Loans(LoansCommand::Update { .. } | LoansCommand::Delete { .. }) => return None,
        Command::Apply { loan, .. } => Destination::ApplyLoan(loan.clone()),
        Command::Applications(ApplicationsCommand::Mine) => Destination::MyLoans,
        Command::Applications(ApplicationsCommand::Pending)
        | Command::Approve { .. }
        | Command::Reject { .. } => Destination::PendingApplications,
        Command::Applications(ApplicationsCommand::Approved) => Destination::ApprovedApplications,
        Command::Applications(ApplicationsCommand::All { .. }) => Destination::LoanApplications,
        Command::Users(UsersCommand::Show { .. }) => Destination::Profile,
        Command::Users(_) => Destination::ManageUsers,
        Command::Pay(_) => Destination::MyLoans,
        Command::Summary => Destination::DashboardHome,
        Command::Gate(_) | Command::Whoami => return None,
    };
    Some(destination)
}
