//! Populates an empty store with a few example expenses.

use rust_decimal::Decimal;
use time::macros::date;

use crate::{
    Error,
    expense::{Category, ExpenseStore, FOOD, NewExpense, TRANSPORTATION},
};

/// Add the example expenses if `store` has no expenses yet.
///
/// The examples are written straight to the store without going through the
/// create rules.
///
/// Returns whether any expenses were added.
///
/// # Errors
/// Returns an error if the store could not be read or written.
pub fn populate_if_empty<S>(store: &mut S) -> Result<bool, Error>
where
    S: ExpenseStore,
{
    if store.count()? > 0 {
        tracing::debug!("Expense store already has data, skipping seed");
        return Ok(false);
    }

    let food = Category::new_unchecked(FOOD);
    let transportation = Category::new_unchecked(TRANSPORTATION);

    let examples = [
        NewExpense::new_unchecked(date!(2021 - 01 - 01), "Lunch", Decimal::from(10), food.clone()),
        NewExpense::new_unchecked(
            date!(2021 - 01 - 02),
            "Bus",
            Decimal::from(5),
            transportation.clone(),
        ),
        NewExpense::new_unchecked(date!(2021 - 01 - 03), "Dinner", Decimal::from(15), food),
        NewExpense::new_unchecked(date!(2021 - 01 - 04), "Taxi", Decimal::from(20), transportation),
    ];

    for expense in examples {
        store.add(expense)?;
    }

    tracing::info!("Seeded expense store with example expenses");

    Ok(true)
}
