//! Loan product model.
//!
//! Loan products are offer templates authored by managers. The remote API has
//! stored them under two naming schemes over time (`"Loan Title"` style keys
//! from the seed data and the add-loan form, camelCase keys from the
//! management screens). Edits patch camelCase keys onto older records, so one
//! document may carry both spellings of a field. Decoding reads every
//! spelling and prefers the camelCase one; encoding writes the camelCase
//! keys the management screens write.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Upper bound accepted for an interest rate, in percent.
pub const INTEREST_RATE_MAX: f64 = 100.0;

/// Validation errors raised while building loan products.
#[derive(Debug, Clone, PartialEq)]
pub enum LoanValidationError {
    EmptyId,
    EmptyTitle,
    EmptyCategory,
    InterestOutOfRange { value: f64 },
    InvalidAmount { value: f64 },
    InvalidEmiPlan { months: u32 },
    MissingField { field: &'static str },
    NotANumber { field: &'static str, raw: String },
}

impl fmt::Display for LoanValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "loan id must not be empty"),
            Self::EmptyTitle => write!(f, "loan title must not be empty"),
            Self::EmptyCategory => write!(f, "loan category must not be empty"),
            Self::InterestOutOfRange { value } => write!(
                f,
                "interest rate must be between 0 and {INTEREST_RATE_MAX} percent (got {value})"
            ),
            Self::InvalidAmount { value } => {
                write!(f, "amount must be a finite, non-negative number (got {value})")
            }
            Self::InvalidEmiPlan { months } => {
                write!(f, "EMI plans must be at least one month (got {months})")
            }
            Self::MissingField { field } => write!(f, "loan record has no {field}"),
            Self::NotANumber { field, raw } => write!(f, "loan {field} {raw:?} is not a number"),
        }
    }
}

impl std::error::Error for LoanValidationError {}

/// Opaque loan product identifier assigned by the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LoanId(String);

impl LoanId {
    /// Validate and construct a [`LoanId`].
    pub fn new(id: impl Into<String>) -> Result<Self, LoanValidationError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(LoanValidationError::EmptyId);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for LoanId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for LoanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<LoanId> for String {
    fn from(value: LoanId) -> Self {
        value.0
    }
}

impl TryFrom<String> for LoanId {
    type Error = LoanValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Annual interest rate expressed as a decimal percent (`9.2` means 9.2 %).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct InterestRate(f64);

impl InterestRate {
    /// Validate and construct an [`InterestRate`].
    pub fn new(percent: f64) -> Result<Self, LoanValidationError> {
        if !percent.is_finite() || !(0.0..=INTEREST_RATE_MAX).contains(&percent) {
            return Err(LoanValidationError::InterestOutOfRange { value: percent });
        }
        Ok(Self(percent))
    }

    /// Rate in percent.
    pub fn percent(self) -> f64 {
        self.0
    }
}

impl fmt::Display for InterestRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl From<InterestRate> for f64 {
    fn from(value: InterestRate) -> Self {
        value.0
    }
}

impl TryFrom<f64> for InterestRate {
    type Error = LoanValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Currency amount in the marketplace's single currency.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Amount(f64);

impl Amount {
    /// Validate and construct an [`Amount`].
    pub fn new(value: f64) -> Result<Self, LoanValidationError> {
        if !value.is_finite() || value < 0.0 {
            return Err(LoanValidationError::InvalidAmount { value });
        }
        Ok(Self(value))
    }

    /// Raw amount.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Amount> for f64 {
    fn from(value: Amount) -> Self {
        value.0
    }
}

impl TryFrom<f64> for Amount {
    type Error = LoanValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Parse a comma-separated list of EMI plan lengths in months.
///
/// Entries that are not whole numbers are dropped, matching what managers
/// type into the add-loan form.
///
/// # Examples
/// ```
/// use loanlink::domain::parse_emi_plans;
///
/// assert_eq!(parse_emi_plans("3, 6, twelve, 12"), vec![3, 6, 12]);
/// ```
pub fn parse_emi_plans(raw: &str) -> Vec<u32> {
    raw.split(',')
        .filter_map(|part| part.trim().parse::<u32>().ok())
        .collect()
}

/// Editable fields of a loan product, used to create or update one.
///
/// Serialises with the keys the API's other clients write and read
/// (`interest`, `availableEMIPlans`, `image`, `showHome`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanDraft {
    /// Product title shown in listings.
    pub title: String,
    /// Category used by the catalogue filter.
    pub category: String,
    /// Interest rate in percent.
    #[serde(rename = "interest")]
    pub interest_rate: f64,
    /// Largest amount a borrower may request.
    pub max_loan_limit: f64,
    /// Free-form description.
    pub description: String,
    /// Offered repayment plans, in months.
    #[serde(rename = "availableEMIPlans")]
    pub emi_plans: Vec<u32>,
    /// Hosted image URL.
    #[serde(rename = "image", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Whether the product is featured on the home page.
    #[serde(rename = "showHome")]
    pub show_on_home: bool,
}

impl LoanDraft {
    /// Check the draft against loan product invariants.
    pub fn validate(&self) -> Result<(), LoanValidationError> {
        if self.title.trim().is_empty() {
            return Err(LoanValidationError::EmptyTitle);
        }
        if self.category.trim().is_empty() {
            return Err(LoanValidationError::EmptyCategory);
        }
        InterestRate::new(self.interest_rate)?;
        Amount::new(self.max_loan_limit)?;
        if let Some(months) = self.emi_plans.iter().copied().find(|months| *months == 0) {
            return Err(LoanValidationError::InvalidEmiPlan { months });
        }
        Ok(())
    }
}

/// Loan product offered on the marketplace.
///
/// ## Invariants
/// - `title` and `category` are non-empty once trimmed.
/// - `interest_rate` lies within `0..=100` percent.
/// - `max_loan_limit` is finite and non-negative.
/// - EMI plans keep the order the author gave them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LoanProductWireDto", into = "LoanProductDto")]
pub struct LoanProduct {
    id: LoanId,
    title: String,
    category: String,
    interest_rate: InterestRate,
    max_loan_limit: Amount,
    description: String,
    emi_plans: Vec<u32>,
    image_url: Option<String>,
    created_by: Option<String>,
    show_on_home: bool,
}

impl LoanProduct {
    /// Build a product from a validated draft.
    pub fn try_new(
        id: LoanId,
        draft: LoanDraft,
        created_by: Option<String>,
    ) -> Result<Self, LoanValidationError> {
        draft.validate()?;
        let LoanDraft {
            title,
            category,
            interest_rate,
            max_loan_limit,
            description,
            emi_plans,
            image_url,
            show_on_home,
        } = draft;
        Ok(Self {
            id,
            title: title.trim().to_owned(),
            category: category.trim().to_owned(),
            interest_rate: InterestRate::new(interest_rate)?,
            max_loan_limit: Amount::new(max_loan_limit)?,
            description,
            emi_plans,
            image_url: image_url.filter(|url| !url.trim().is_empty()),
            created_by: created_by.filter(|owner| !owner.trim().is_empty()),
            show_on_home,
        })
    }

    /// Stable identifier.
    pub fn id(&self) -> &LoanId {
        &self.id
    }

    /// Product title.
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Product category.
    pub fn category(&self) -> &str {
        self.category.as_str()
    }

    /// Interest rate.
    pub fn interest_rate(&self) -> InterestRate {
        self.interest_rate
    }

    /// Largest amount a borrower may request.
    pub fn max_loan_limit(&self) -> Amount {
        self.max_loan_limit
    }

    /// Free-form description.
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Offered repayment plans, in months.
    pub fn emi_plans(&self) -> &[u32] {
        &self.emi_plans
    }

    /// Hosted image URL.
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    /// Identity (email) of the manager who authored the product.
    pub fn created_by(&self) -> Option<&str> {
        self.created_by.as_deref()
    }

    /// Whether the product is featured on the home page.
    pub fn show_on_home(&self) -> bool {
        self.show_on_home
    }

    /// Whether `email` authored this product.
    pub fn is_created_by(&self, email: &str) -> bool {
        self.created_by.as_deref() == Some(email)
    }

    /// Editable fields of this product, for round-tripping through an update.
    pub fn to_draft(&self) -> LoanDraft {
        LoanDraft {
            title: self.title.clone(),
            category: self.category.clone(),
            interest_rate: self.interest_rate.percent(),
            max_loan_limit: self.max_loan_limit.value(),
            description: self.description.clone(),
            emi_plans: self.emi_plans.clone(),
            image_url: self.image_url.clone(),
            show_on_home: self.show_on_home,
        }
    }
}

/// Identifiers arrive as strings or, for seed data, as numbers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

impl From<RawId> for String {
    fn from(value: RawId) -> Self {
        match value {
            RawId::Text(text) => text,
            RawId::Number(number) => number.to_string(),
        }
    }
}

/// Numbers typed into edit forms are sometimes stored as text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
}

impl RawNumber {
    fn into_f64(self, field: &'static str) -> Result<f64, LoanValidationError> {
        match self {
            Self::Number(value) => Ok(value),
            Self::Text(raw) => raw
                .trim()
                .parse()
                .map_err(|_| LoanValidationError::NotANumber { field, raw }),
        }
    }
}

/// Every spelling a stored loan record may use, each in its own slot.
#[derive(Debug, Clone, Deserialize)]
struct LoanProductWireDto {
    #[serde(rename = "_id")]
    document_id: Option<RawId>,
    id: Option<RawId>,
    title: Option<String>,
    #[serde(rename = "Loan Title")]
    legacy_title: Option<String>,
    category: Option<String>,
    #[serde(rename = "Loan Category")]
    legacy_category: Option<String>,
    interest: Option<RawNumber>,
    #[serde(rename = "interestRate")]
    interest_rate: Option<RawNumber>,
    #[serde(rename = "Interest")]
    legacy_interest: Option<RawNumber>,
    #[serde(rename = "maxLoanLimit")]
    max_loan_limit: Option<RawNumber>,
    #[serde(rename = "Max Loan Limit")]
    legacy_max_loan_limit: Option<RawNumber>,
    description: Option<String>,
    #[serde(rename = "availableEMIPlans")]
    emi_plans: Option<Vec<u32>>,
    #[serde(rename = "availableEmiPlans")]
    camel_emi_plans: Option<Vec<u32>>,
    image: Option<String>,
    #[serde(rename = "imageUrl")]
    image_url: Option<String>,
    #[serde(rename = "Loan Image")]
    legacy_image: Option<String>,
    #[serde(rename = "createdBy")]
    created_by: Option<String>,
    #[serde(rename = "showHome")]
    show_home: Option<bool>,
    #[serde(rename = "showOnHome")]
    show_on_home: Option<bool>,
}

/// First candidate with visible text.
fn first_text<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|text| !text.trim().is_empty())
}

fn first_number<const N: usize>(
    candidates: [Option<RawNumber>; N],
    field: &'static str,
) -> Result<f64, LoanValidationError> {
    candidates
        .into_iter()
        .flatten()
        .next()
        .ok_or(LoanValidationError::MissingField { field })?
        .into_f64(field)
}

impl TryFrom<LoanProductWireDto> for LoanProduct {
    type Error = LoanValidationError;

    fn try_from(value: LoanProductWireDto) -> Result<Self, Self::Error> {
        let id = value
            .document_id
            .or(value.id)
            .ok_or(LoanValidationError::EmptyId)?;
        let interest_rate = first_number(
            [value.interest, value.interest_rate, value.legacy_interest],
            "interest",
        )?;
        let max_loan_limit = first_number(
            [value.max_loan_limit, value.legacy_max_loan_limit],
            "max loan limit",
        )?;
        // Blank plan inputs reach the store as `[0]`.
        let emi_plans = value
            .emi_plans
            .or(value.camel_emi_plans)
            .unwrap_or_default()
            .into_iter()
            .filter(|months| *months > 0)
            .collect();
        let draft = LoanDraft {
            title: first_text([value.title, value.legacy_title]).unwrap_or_default(),
            category: first_text([value.category, value.legacy_category]).unwrap_or_default(),
            interest_rate,
            max_loan_limit,
            description: value.description.unwrap_or_default(),
            emi_plans,
            image_url: first_text([value.image, value.image_url, value.legacy_image]),
            show_on_home: value.show_home.or(value.show_on_home).unwrap_or(false),
        };
        Self::try_new(LoanId::new(String::from(id))?, draft, value.created_by)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoanProductDto {
    #[serde(rename = "_id")]
    id: String,
    title: String,
    category: String,
    interest: f64,
    max_loan_limit: f64,
    description: String,
    #[serde(rename = "availableEMIPlans")]
    emi_plans: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_by: Option<String>,
    show_home: bool,
}

impl From<LoanProduct> for LoanProductDto {
    fn from(value: LoanProduct) -> Self {
        Self {
            id: value.id.into(),
            title: value.title,
            category: value.category,
            interest: value.interest_rate.into(),
            max_loan_limit: value.max_loan_limit.into(),
            description: value.description,
            emi_plans: value.emi_plans,
            image: value.image_url,
            created_by: value.created_by,
            show_home: value.show_on_home,
        }
    }
}
