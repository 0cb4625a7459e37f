//! Core expense domain types and the rules a new expense must satisfy.

use std::{fmt::Display, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

/// Serde helpers for dates written as `YYYY-MM-DD`.
pub(crate) mod date_format {
    use time::Date;

    time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

    pub(crate) use iso_date::*;
}

/// Database identifier for an expense.
pub type ExpenseId = i64;

/// The latest year an expense may be recorded in when it is created.
pub const LATEST_YEAR: i32 = 2023;

/// The category for food.
pub const FOOD: &str = "食";
/// The category for clothing.
pub const CLOTHING: &str = "衣";
/// The category for housing.
pub const HOUSING: &str = "住";
/// The category for transportation.
pub const TRANSPORTATION: &str = "行";

/// Every category a new expense may use.
pub const CATEGORIES: [&str; 4] = [FOOD, CLOTHING, HOUSING, TRANSPORTATION];

/// The reasons a candidate expense is rejected on creation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A field was absent, or the amount was zero.
    #[error("All fields are required")]
    MissingFields,

    /// The category is not one of [CATEGORIES].
    #[error("Category must be 食, 衣, 住, 行")]
    InvalidCategory(String),

    /// The amount was negative.
    #[error("Amount must be greater than 0")]
    NonPositiveAmount(Decimal),

    /// The date falls after [LATEST_YEAR].
    #[error("Date must not be later than {latest}", latest = LATEST_YEAR)]
    DateTooLate(Date),
}

/// The category an expense is filed under.
///
/// Values built with [Category::new] are always one of [CATEGORIES].
/// Values read back from storage or taken from an update body are not
/// re-checked.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    /// Create a category from one of the fixed category names.
    ///
    /// # Errors
    ///
    /// Returns [ValidationError::InvalidCategory] if `name` is not in [CATEGORIES].
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        if CATEGORIES.contains(&name) {
            Ok(Self(name.to_owned()))
        } else {
            Err(ValidationError::InvalidCategory(name.to_owned()))
        }
    }

    /// Create a category without validation.
    ///
    /// This is used for rows read from the database and for full-record
    /// updates, neither of which go through the create rules.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for Category {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::new(s)
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID assigned by storage.
    pub id: ExpenseId,
    /// The day the money was spent.
    #[serde(with = "date_format")]
    pub date: Date,
    /// Free text, searched by case-sensitive substring.
    pub description: String,
    /// How much was spent.
    pub amount: Decimal,
    /// What the money was spent on.
    pub category: Category,
}

/// An expense that has passed the create rules but has no ID yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpense {
    date: Date,
    description: String,
    amount: Decimal,
    category: Category,
}

impl NewExpense {
    /// Check the candidate fields against the create rules.
    ///
    /// The rules are checked in order and the first failure is returned:
    /// every field must be present with a non-zero amount, the category must
    /// be one of [CATEGORIES], the amount must be positive and the year must
    /// be no later than [LATEST_YEAR].
    ///
    /// # Errors
    ///
    /// Returns the [ValidationError] for the first rule that fails.
    pub fn new(
        date: Option<Date>,
        description: Option<String>,
        amount: Option<Decimal>,
        category: Option<String>,
    ) -> Result<Self, ValidationError> {
        let (Some(date), Some(description), Some(amount), Some(category)) =
            (date, description, amount, category)
        else {
            return Err(ValidationError::MissingFields);
        };

        // A zero amount is treated the same as a missing one.
        if amount.is_zero() {
            return Err(ValidationError::MissingFields);
        }

        let category = Category::new(&category)?;

        if amount.is_sign_negative() {
            return Err(ValidationError::NonPositiveAmount(amount));
        }

        if date.year() > LATEST_YEAR {
            return Err(ValidationError::DateTooLate(date));
        }

        Ok(Self {
            date,
            description,
            amount,
            category,
        })
    }

    /// Create a new expense without validation.
    ///
    /// Used for seeding, which writes straight through the store.
    pub fn new_unchecked(
        date: Date,
        description: &str,
        amount: Decimal,
        category: Category,
    ) -> Self {
        Self {
            date,
            description: description.to_owned(),
            amount,
            category,
        }
    }

    /// The day the money was spent.
    pub fn date(&self) -> Date {
        self.date
    }

    /// The expense description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The amount spent, always positive.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// The expense category.
    pub fn category(&self) -> &Category {
        &self.category
    }

    /// Attach the ID assigned by storage.
    pub fn with_id(self, id: ExpenseId) -> Expense {
        Expense {
            id,
            date: self.date,
            description: self.description,
            amount: self.amount,
            category: self.category,
        }
    }
}
