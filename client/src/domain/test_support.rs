//! Shared fixtures for domain service tests.

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use super::{
    ApplicantDetails, ApplicationId, ApplicationPayload, BearerToken, Email, LoanApplication,
    LoanDraft, LoanId, LoanProduct, Role, Session, UserAccount,
};

/// Clock pinned to one instant.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn instant() -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).single() {
        Some(value) => value,
        None => panic!("fixture timestamp"),
    }
}

pub fn session(role: Role, email: &str) -> Session {
    let account = UserAccount::try_from_parts("u-1", email, role).expect("fixture account");
    Session::new(account, BearerToken::new("id-token").expect("fixture token"))
}

pub fn borrower() -> Session {
    session(Role::Borrower, "nusrat@loanlink.test")
}

pub fn manager() -> Session {
    session(Role::Manager, "manager@loanlink.test")
}

pub fn admin() -> Session {
    session(Role::Admin, "admin@loanlink.test")
}

pub fn draft(title: &str, category: &str) -> LoanDraft {
    LoanDraft {
        title: title.to_owned(),
        category: category.to_owned(),
        interest_rate: 9.2,
        max_loan_limit: 10_000.0,
        description: "Fast approval for urgent needs.".to_owned(),
        emi_plans: vec![3, 6, 12],
        image_url: None,
        show_on_home: false,
    }
}

pub fn loan(id: &str, created_by: Option<&str>) -> LoanProduct {
    LoanProduct::try_new(
        LoanId::new(id).expect("fixture loan id"),
        draft("Quick Assist Loan", "Emergency"),
        created_by.map(str::to_owned),
    )
    .expect("fixture loan")
}

pub fn applicant() -> ApplicantDetails {
    ApplicantDetails {
        first_name: "Nusrat".to_owned(),
        last_name: "Jahan".to_owned(),
        contact_number: "+8801700000000".to_owned(),
        national_id: "1990123456789".to_owned(),
        requested_amount: 8_000.0,
        monthly_income: 35_000.0,
        income_source: "Salary".to_owned(),
        reason: "Medical bills".to_owned(),
        address: "House 12, Road 4, Dhaka".to_owned(),
        notes: None,
    }
}

pub fn application(id: &str, loan_id: &str, requested_amount: f64) -> LoanApplication {
    let mut details = applicant();
    details.requested_amount = requested_amount;
    LoanApplication::new(
        ApplicationId::new(id).expect("fixture application id"),
        ApplicationPayload {
            loan_id: LoanId::new(loan_id).expect("fixture loan id"),
            loan_title: "Quick Assist Loan".to_owned(),
            interest_rate: 9.2,
            user_email: Email::new("nusrat@loanlink.test").expect("fixture email"),
            submitted_at: instant(),
            applicant: details,
        },
    )
}
