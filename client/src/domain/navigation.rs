//! Route table and role-keyed dashboard menu.
//!
//! Every navigable location is a [`Destination`]. Access rules live next to
//! the route so the gate and the menu read from one table.

use std::fmt;

use super::{LoanId, Role};

const ALL_ROLES: &[Role] = &Role::ALL;
const BORROWER: &[Role] = &[Role::Borrower];
const MANAGER: &[Role] = &[Role::Manager];
const ADMIN: &[Role] = &[Role::Admin];
const REVIEWERS: &[Role] = &[Role::Manager, Role::Admin];

/// Who may enter a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Anyone, signed in or not.
    Public,
    /// Signed-in users holding one of the listed roles.
    Roles(&'static [Role]),
}

impl Access {
    /// Whether `role` satisfies this rule.
    pub fn permits(self, role: Role) -> bool {
        match self {
            Self::Public => true,
            Self::Roles(roles) => roles.contains(&role),
        }
    }
}

/// Navigable location in the application.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Destination {
    /// Landing page.
    Home,
    /// Public loan catalogue.
    AllLoans,
    /// One loan product.
    LoanDetails(LoanId),
    /// Application form for a loan.
    ApplyLoan(LoanId),
    /// Sign-in page.
    Login,
    /// Sign-up page.
    Register,
    /// About page.
    About,
    /// Contact page.
    Contact,
    /// Shown when a role check fails.
    AccessDenied,
    /// Dashboard landing page.
    DashboardHome,
    /// Borrower's own applications.
    MyLoans,
    /// New loan product form.
    AddLoan,
    /// Manager's own loan products.
    ManageLoans,
    /// Applications awaiting review.
    PendingApplications,
    /// Approved applications.
    ApprovedApplications,
    /// User administration.
    ManageUsers,
    /// Every loan product, with home-page toggles.
    AdminAllLoans,
    /// Every application, filterable by status.
    LoanApplications,
    /// Signed-in user's profile.
    Profile,
    /// Account settings.
    Settings,
}

impl Destination {
    /// Access rule for the destination.
    ///
    /// Dashboard children already sit behind the dashboard gate, so their
    /// lists are the effective intersection.
    pub fn access(&self) -> Access {
        match self {
            Self::Home
            | Self::AllLoans
            | Self::LoanDetails(_)
            | Self::Login
            | Self::Register
            | Self::About
            | Self::Contact
            | Self::AccessDenied => Access::Public,
            Self::ApplyLoan(_) | Self::MyLoans => Access::Roles(BORROWER),
            Self::DashboardHome | Self::Profile | Self::Settings => Access::Roles(ALL_ROLES),
            Self::AddLoan | Self::ManageLoans => Access::Roles(MANAGER),
            Self::PendingApplications | Self::ApprovedApplications => Access::Roles(REVIEWERS),
            Self::ManageUsers | Self::AdminAllLoans | Self::LoanApplications => {
                Access::Roles(ADMIN)
            }
        }
    }

    /// Roles allowed to enter, or `None` for public destinations.
    pub fn allowed_roles(&self) -> Option<&'static [Role]> {
        match self.access() {
            Access::Public => None,
            Access::Roles(roles) => Some(roles),
        }
    }

    /// Route path.
    pub fn path(&self) -> String {
        match self {
            Self::LoanDetails(id) => format!("/loan-details/{id}"),
            Self::ApplyLoan(id) => format!("/apply-loan/{id}"),
            other => other.static_path().unwrap_or("/").to_owned(),
        }
    }

    fn static_path(&self) -> Option<&'static str> {
        let path = match self {
            Self::Home => "/",
            Self::AllLoans => "/all-loans",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::About => "/about",
            Self::Contact => "/contact",
            Self::AccessDenied => "/access-denied",
            Self::DashboardHome => "/dashboard",
            Self::MyLoans => "/dashboard/my-loans",
            Self::AddLoan => "/dashboard/add-loan",
            Self::ManageLoans => "/dashboard/manage-loans",
            Self::PendingApplications => "/dashboard/pending-loans",
            Self::ApprovedApplications => "/dashboard/approved-loans",
            Self::ManageUsers => "/dashboard/manage-users",
            Self::AdminAllLoans => "/dashboard/all-loans",
            Self::LoanApplications => "/dashboard/loan-applications",
            Self::Profile => "/dashboard/profile",
            Self::Settings => "/dashboard/settings",
            Self::LoanDetails(_) | Self::ApplyLoan(_) => return None,
        };
        Some(path)
    }

    /// Map a route path back to its destination.
    ///
    /// A single trailing slash is ignored. Unknown paths yield `None`.
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim();
        let normalised = match trimmed.strip_suffix('/') {
            Some(rest) if !rest.is_empty() => rest,
            _ => trimmed,
        };

        if let Some(id) = normalised.strip_prefix("/loan-details/") {
            return LoanId::new(id).ok().map(Self::LoanDetails);
        }
        if let Some(id) = normalised.strip_prefix("/apply-loan/") {
            return LoanId::new(id).ok().map(Self::ApplyLoan);
        }

        STATIC_DESTINATIONS
            .iter()
            .find(|destination| destination.static_path() == Some(normalised))
            .cloned()
    }
}

const STATIC_DESTINATIONS: [Destination; 18] = [
    Destination::Home,
    Destination::AllLoans,
    Destination::Login,
    Destination::Register,
    Destination::About,
    Destination::Contact,
    Destination::AccessDenied,
    Destination::DashboardHome,
    Destination::MyLoans,
    Destination::AddLoan,
    Destination::ManageLoans,
    Destination::PendingApplications,
    Destination::ApprovedApplications,
    Destination::ManageUsers,
    Destination::AdminAllLoans,
    Destination::LoanApplications,
    Destination::Profile,
    Destination::Settings,
];

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Dashboard sidebar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry {
    pub label: &'static str,
    pub destination: &'static Destination,
}

const MENU: [MenuEntry; 11] = [
    MenuEntry {
        label: "Home",
        destination: &Destination::DashboardHome,
    },
    MenuEntry {
        label: "My Loans",
        destination: &Destination::MyLoans,
    },
    MenuEntry {
        label: "Add Loan",
        destination: &Destination::AddLoan,
    },
    MenuEntry {
        label: "Manage Loans",
        destination: &Destination::ManageLoans,
    },
    MenuEntry {
        label: "Pending Applications",
        destination: &Destination::PendingApplications,
    },
    MenuEntry {
        label: "Approved Applications",
        destination: &Destination::ApprovedApplications,
    },
    MenuEntry {
        label: "Manage Users",
        destination: &Destination::ManageUsers,
    },
    MenuEntry {
        label: "All Loans",
        destination: &Destination::AdminAllLoans,
    },
    MenuEntry {
        label: "Loan Applications",
        destination: &Destination::LoanApplications,
    },
    MenuEntry {
        label: "Profile",
        destination: &Destination::Profile,
    },
    MenuEntry {
        label: "Settings",
        destination: &Destination::Settings,
    },
];

/// Sidebar entries visible to `role`, in menu order.
pub fn dashboard_menu(role: Role) -> Vec<MenuEntry> {
    MENU.iter()
        .copied()
        .filter(|entry| entry.destination.access().permits(role))
        .collect()
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn labels(role: Role) -> Vec<&'static str> {
        dashboard_menu(role).iter().map(|entry| entry.label).collect()
    }

    #[rstest]
    fn borrower_menu() {
        assert_eq!(
            labels(Role::Borrower),
            vec!["Home", "My Loans", "Profile", "Settings"]
        );
    }

    #[rstest]
    fn manager_menu() {
        assert_eq!(
            labels(Role::Manager),
            vec![
                "Home",
                "Add Loan",
                "Manage Loans",
                "Pending Applications",
                "Approved Applications",
                "Profile",
                "Settings"
            ]
        );
    }

    #[rstest]
    fn admin_menu() {
        assert_eq!(
            labels(Role::Admin),
            vec![
                "Home",
                "Pending Applications",
                "Approved Applications",
                "Manage Users",
                "All Loans",
                "Loan Applications",
                "Profile",
                "Settings"
            ]
        );
    }

    #[rstest]
    fn every_static_destination_round_trips_through_its_path() {
        for destination in STATIC_DESTINATIONS {
            assert_eq!(
                Destination::parse(&destination.path()),
                Some(destination.clone())
            );
        }
    }

    #[rstest]
    #[case(
        "/loan-details/65a0c1",
        Some(Destination::LoanDetails(LoanId::new("65a0c1").expect("id")))
    )]
    #[case("/apply-loan/65a0c1/", Some(Destination::ApplyLoan(LoanId::new("65a0c1").expect("id"))))]
    #[case("/dashboard/", Some(Destination::DashboardHome))]
    #[case("/", Some(Destination::Home))]
    #[case("/apply-loan/", None)]
    #[case("/faq", None)]
    fn parses_paths(#[case] path: &str, #[case] expected: Option<Destination>) {
        assert_eq!(Destination::parse(path), expected);
    }

    #[rstest]
    #[case(Destination::AllLoans, None)]
    #[case(Destination::ApplyLoan(LoanId::new("x").expect("id")), Some(BORROWER))]
    #[case(Destination::AddLoan, Some(MANAGER))]
    #[case(Destination::ManageUsers, Some(ADMIN))]
    #[case(Destination::Settings, Some(ALL_ROLES))]
    fn allow_lists(#[case] destination: Destination, #[case] expected: Option<&[Role]>) {
        assert_eq!(destination.allowed_roles(), expected);
    }
}
