//! Expense records: validation, search, storage and the HTTP handlers.

mod domain;
mod handlers;
mod request;
mod service;
mod sqlite;
mod store;

pub use domain::{
    CATEGORIES, CLOTHING, Category, Expense, ExpenseId, FOOD, HOUSING, LATEST_YEAR, NewExpense,
    TRANSPORTATION, ValidationError,
};
pub use handlers::{
    create_expense_endpoint, delete_expense_endpoint, get_expense_endpoint,
    list_expenses_endpoint, search_expenses_endpoint, update_expense_endpoint,
};
pub use request::{CreateExpenseRequest, SearchParams, SearchQuery};
pub use service::{ExpenseService, MAX_SEARCH_RANGE_DAYS};
pub use sqlite::{SQLiteExpenseStore, create_expense_table};
pub use store::{ExpenseQuery, ExpenseStore};
