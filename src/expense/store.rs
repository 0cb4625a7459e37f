//! Defines the expense store trait.

use std::ops::RangeInclusive;

use time::Date;

use crate::{
    Error,
    expense::{Expense, ExpenseId, NewExpense},
};

/// Handles the persistence of expenses.
///
/// The store assigns IDs and is responsible for durability. It does not
/// apply any of the create rules; those are checked before a [NewExpense]
/// can be built.
pub trait ExpenseStore {
    /// Retrieve every expense in the store.
    fn get_all(&self) -> Result<Vec<Expense>, Error>;

    /// Retrieve an expense by ID.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no expense with `id`.
    fn get(&self, id: ExpenseId) -> Result<Expense, Error>;

    /// Retrieve the expenses that match `query`.
    fn query(&self, query: ExpenseQuery) -> Result<Vec<Expense>, Error>;

    /// Add a new expense and return it with its generated ID.
    fn add(&mut self, expense: NewExpense) -> Result<Expense, Error>;

    /// Replace every field of the stored expense with the ID `expense.id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if the expense no longer exists when the
    /// write happens.
    fn update(&mut self, expense: &Expense) -> Result<(), Error>;

    /// Remove the expense with `id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no expense with `id`.
    fn remove(&mut self, id: ExpenseId) -> Result<(), Error>;

    /// Whether an expense with `id` exists.
    fn exists(&self, id: ExpenseId) -> Result<bool, Error>;

    /// The number of expenses in the store.
    fn count(&self) -> Result<u64, Error>;
}

/// Defines which expenses should be fetched from [ExpenseStore::query].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseQuery {
    /// Include expenses whose description contains this text (case-sensitive).
    /// An empty string matches every description.
    pub description: String,
    /// Include expenses dated within `date_range` (inclusive).
    pub date_range: RangeInclusive<Date>,
}

impl Default for ExpenseQuery {
    fn default() -> Self {
        Self {
            description: String::new(),
            date_range: Date::MIN..=Date::MAX,
        }
    }
}
