//! Plain-text rendering of command results.

use std::io::{self, Write};

use crate::domain::{
    Destination, GateDecision, LoanApplication, LoanProduct, MenuEntry, PortfolioSummary,
    UserAccount,
};

pub fn loans(out: &mut impl Write, loans: &[LoanProduct]) -> io::Result<()> {
    if loans.is_empty() {
        return writeln!(out, "No loans match.");
    }
    for loan in loans {
        writeln!(
            out,
            "{id}  {title} [{category}]  {rate}  up to {limit}{home}",
            id = loan.id(),
            title = loan.title(),
            category = loan.category(),
            rate = loan.interest_rate(),
            limit = loan.max_loan_limit(),
            home = if loan.show_on_home() { "  (home)" } else { "" },
        )?;
    }
    Ok(())
}

pub fn loan(out: &mut impl Write, loan: &LoanProduct) -> io::Result<()> {
    writeln!(out, "{}", loan.title())?;
    writeln!(out, "  id:            {}", loan.id())?;
    writeln!(out, "  category:      {}", loan.category())?;
    writeln!(out, "  interest rate: {}", loan.interest_rate())?;
    writeln!(out, "  max limit:     {}", loan.max_loan_limit())?;
    let plans = loan
        .emi_plans()
        .iter()
        .map(|months| format!("{months} months"))
        .collect::<Vec<_>>();
    if !plans.is_empty() {
        writeln!(out, "  EMI plans:     {}", plans.join(", "))?;
    }
    if let Some(owner) = loan.created_by() {
        writeln!(out, "  created by:    {owner}")?;
    }
    if !loan.description().trim().is_empty() {
        writeln!(out, "  {}", loan.description().trim())?;
    }
    Ok(())
}

pub fn categories(out: &mut impl Write, categories: &[String]) -> io::Result<()> {
    for category in categories {
        writeln!(out, "{category}")?;
    }
    Ok(())
}

pub fn applications(out: &mut impl Write, applications: &[LoanApplication]) -> io::Result<()> {
    if applications.is_empty() {
        return writeln!(out, "No applications.");
    }
    for application in applications {
        writeln!(
            out,
            "{id}  {title}  {applicant} <{email}>  {amount}  {status}  fee {fee}",
            id = application.id(),
            title = application.loan_title(),
            applicant = application.applicant().full_name(),
            email = application.user_email(),
            amount = application.applicant().requested_amount,
            status = application.status(),
            fee = application.fee_status(),
        )?;
    }
    Ok(())
}

pub fn users(out: &mut impl Write, users: &[UserAccount]) -> io::Result<()> {
    for user in users {
        account(out, user)?;
    }
    Ok(())
}

pub fn account(out: &mut impl Write, user: &UserAccount) -> io::Result<()> {
    match user.display_name() {
        Some(name) => writeln!(
            out,
            "{id}  {name} <{email}>  {role}",
            id = user.id(),
            email = user.email(),
            role = user.role()
        ),
        None => writeln!(
            out,
            "{id}  {email}  {role}",
            id = user.id(),
            email = user.email(),
            role = user.role()
        ),
    }
}

pub fn summary(out: &mut impl Write, summary: &PortfolioSummary) -> io::Result<()> {
    writeln!(out, "applications: {}", summary.applications)?;
    writeln!(
        out,
        "  pending {}  approved {}  rejected {}",
        summary.by_status.pending, summary.by_status.approved, summary.by_status.rejected
    )?;
    writeln!(
        out,
        "  fees unpaid {}  paid {}",
        summary.by_fee.unpaid, summary.by_fee.paid
    )?;
    writeln!(out, "requested total: {}", summary.total_requested)?;
    if let Some(average) = summary.average_requested {
        writeln!(out, "requested average: {average:.2}")?;
    }
    writeln!(out, "products per category:")?;
    for (category, count) in &summary.products_per_category {
        writeln!(out, "  {category}: {count}")?;
    }
    Ok(())
}

pub fn menu(out: &mut impl Write, entries: &[MenuEntry]) -> io::Result<()> {
    for entry in entries {
        writeln!(out, "{:<24}{}", entry.label, entry.destination)?;
    }
    Ok(())
}

pub fn gate(out: &mut impl Write, path: &Destination, decision: &GateDecision) -> io::Result<()> {
    match decision {
        GateDecision::Render => writeln!(out, "{path}: allowed"),
        GateDecision::Loading => writeln!(out, "{path}: waiting for the session"),
        GateDecision::RedirectToLogin { return_to } => {
            writeln!(
                out,
                "{path}: redirect to {} (then back to {return_to})",
                Destination::Login
            )
        }
        GateDecision::RedirectToAccessDenied => {
            writeln!(out, "{path}: redirect to {}", Destination::AccessDenied)
        }
    }
}
