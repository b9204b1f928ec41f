//! Catalogue filtering.
//!
//! Pure predicates over loan products. [`LoanFilter`] backs the public
//! "all loans" listing with its text box, category picker and the two
//! ceiling sliders. [`LoanSearch`] is the lighter text-and-category search
//! used by the management listings. Neither reorders its input.

use super::LoanProduct;

/// Default interest ceiling, in percent, matching the top of the slider.
pub const DEFAULT_MAX_INTEREST: f64 = 15.0;
/// Default amount ceiling, matching the top of the slider.
pub const DEFAULT_MAX_AMOUNT: f64 = 100_000.0;

/// Conjunctive filter over the public loan catalogue.
///
/// A loan is included when all of the following hold:
/// - its title or category contains `query`, ignoring case;
/// - its interest rate is at most `max_interest`;
/// - its maximum loan limit is at most `max_amount`;
/// - `category` is empty or equals the loan's category exactly.
///
/// # Examples
/// ```
/// use loanlink::domain::LoanFilter;
///
/// let filter = LoanFilter::default().with_query("quick").with_max_interest(10.0);
/// assert_eq!(filter.query(), "quick");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LoanFilter {
    query: String,
    max_interest: f64,
    max_amount: f64,
    category: String,
}

impl Default for LoanFilter {
    fn default() -> Self {
        Self {
            query: String::new(),
            max_interest: DEFAULT_MAX_INTEREST,
            max_amount: DEFAULT_MAX_AMOUNT,
            category: String::new(),
        }
    }
}

impl LoanFilter {
    /// Build a filter from all four inputs.
    pub fn new(
        query: impl Into<String>,
        max_interest: f64,
        max_amount: f64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            query: query.into(),
            max_interest,
            max_amount,
            category: category.into(),
        }
    }

    /// Filter that admits every loan.
    pub fn unbounded() -> Self {
        Self::new("", f64::INFINITY, f64::INFINITY, "")
    }

    /// Replace the free-text query.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Replace the interest ceiling.
    pub fn with_max_interest(mut self, max_interest: f64) -> Self {
        self.max_interest = max_interest;
        self
    }

    /// Replace the amount ceiling.
    pub fn with_max_amount(mut self, max_amount: f64) -> Self {
        self.max_amount = max_amount;
        self
    }

    /// Replace the category; an empty string means any category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Reset every input to its default.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Free-text query.
    pub fn query(&self) -> &str {
        self.query.as_str()
    }

    /// Inclusive interest ceiling.
    pub fn max_interest(&self) -> f64 {
        self.max_interest
    }

    /// Inclusive amount ceiling.
    pub fn max_amount(&self) -> f64 {
        self.max_amount
    }

    /// Category restriction; empty means any.
    pub fn category(&self) -> &str {
        self.category.as_str()
    }

    /// Whether `loan` satisfies every predicate.
    pub fn matches(&self, loan: &LoanProduct) -> bool {
        matches_text(loan, &self.query.to_lowercase())
            && loan.interest_rate().percent() <= self.max_interest
            && loan.max_loan_limit().value() <= self.max_amount
            && matches_category(loan, &self.category)
    }

    /// Loans satisfying the filter, in input order.
    pub fn apply<'a>(&self, loans: &'a [LoanProduct]) -> Vec<&'a LoanProduct> {
        loans.iter().filter(|loan| self.matches(loan)).collect()
    }
}

/// Text and category search used by the loan management listings.
///
/// The query is trimmed before matching; an empty query matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoanSearch {
    query: String,
    category: String,
}

impl LoanSearch {
    /// Build a search from a query and an optional exact category.
    pub fn new(query: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            category: category.into(),
        }
    }

    /// Loans matching the search, in input order.
    pub fn apply<'a>(&self, loans: &'a [LoanProduct]) -> Vec<&'a LoanProduct> {
        let needle = self.query.trim().to_lowercase();
        loans
            .iter()
            .filter(|loan| matches_text(loan, &needle) && matches_category(loan, &self.category))
            .collect()
    }
}

/// Distinct categories in first-seen order.
///
/// The "any category" choice is not included; callers represent it with an
/// empty category.
pub fn categories(loans: &[LoanProduct]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for loan in loans {
        let category = loan.category();
        if !seen.contains(&category) {
            seen.push(category);
        }
    }
    seen
}

/// `needle` must already be lowercase.
fn matches_text(loan: &LoanProduct, needle: &str) -> bool {
    needle.is_empty()
        || loan.title().to_lowercase().contains(needle)
        || loan.category().to_lowercase().contains(needle)
}

fn matches_category(loan: &LoanProduct, category: &str) -> bool {
    category.is_empty() || loan.category() == category
}
