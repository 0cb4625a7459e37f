//! Implements a SQLite backed expense store.

use std::{
    str::FromStr,
    sync::{Arc, Mutex, MutexGuard},
};

use rusqlite::{Connection, Row, types::Type};
use rust_decimal::Decimal;

use crate::{
    Error,
    expense::{Category, Expense, ExpenseId, ExpenseQuery, ExpenseStore, NewExpense},
};

/// Stores expenses in a SQLite database.
///
/// The `expense` table must exist, see [create_expense_table].
#[derive(Debug, Clone)]
pub struct SQLiteExpenseStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteExpenseStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}

impl ExpenseStore for SQLiteExpenseStore {
    fn get_all(&self) -> Result<Vec<Expense>, Error> {
        let connection = self.lock()?;

        connection
            .prepare(
                "SELECT id, date, description, amount, category FROM expense ORDER BY id ASC;",
            )?
            .query_map([], map_row)?
            .map(|maybe_expense| maybe_expense.map_err(Error::from))
            .collect()
    }

    fn get(&self, id: ExpenseId) -> Result<Expense, Error> {
        let connection = self.lock()?;

        connection
            .prepare("SELECT id, date, description, amount, category FROM expense WHERE id = :id;")?
            .query_row(&[(":id", &id)], map_row)
            .map_err(|error| error.into())
    }

    /// Descriptions are matched with `instr`, which unlike `LIKE` is
    /// case-sensitive for every character.
    fn query(&self, query: ExpenseQuery) -> Result<Vec<Expense>, Error> {
        let connection = self.lock()?;
        let (start, end) = query.date_range.into_inner();

        connection
            .prepare(
                "SELECT id, date, description, amount, category FROM expense \
                WHERE (?1 = '' OR instr(description, ?1) > 0) \
                AND date BETWEEN ?2 AND ?3 \
                ORDER BY id ASC;",
            )?
            .query_map((query.description, start, end), map_row)?
            .map(|maybe_expense| maybe_expense.map_err(Error::from))
            .collect()
    }

    fn add(&mut self, expense: NewExpense) -> Result<Expense, Error> {
        let connection = self.lock()?;

        connection.execute(
            "INSERT INTO expense (date, description, amount, category) VALUES (?1, ?2, ?3, ?4);",
            (
                expense.date(),
                expense.description(),
                expense.amount().to_string(),
                expense.category().as_ref(),
            ),
        )?;

        let id = connection.last_insert_rowid();

        Ok(expense.with_id(id))
    }

    fn update(&mut self, expense: &Expense) -> Result<(), Error> {
        let connection = self.lock()?;

        let rows_affected = connection.execute(
            "UPDATE expense SET date = ?1, description = ?2, amount = ?3, category = ?4 \
            WHERE id = ?5;",
            (
                expense.date,
                &expense.description,
                expense.amount.to_string(),
                expense.category.as_ref(),
                expense.id,
            ),
        )?;

        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }

    fn remove(&mut self, id: ExpenseId) -> Result<(), Error> {
        let connection = self.lock()?;

        let rows_affected = connection.execute("DELETE FROM expense WHERE id = ?1;", [id])?;

        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }

    fn exists(&self, id: ExpenseId) -> Result<bool, Error> {
        let connection = self.lock()?;

        connection
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM expense WHERE id = ?1);",
                [id],
                |row| row.get(0),
            )
            .map_err(Error::from)
    }

    fn count(&self) -> Result<u64, Error> {
        let connection = self.lock()?;

        let count: i64 =
            connection.query_row("SELECT COUNT(*) FROM expense;", [], |row| row.get(0))?;

        Ok(count as u64)
    }
}

/// Initialize the expense table and indexes.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY,
            date TEXT NOT NULL,
            description TEXT NOT NULL,
            amount TEXT NOT NULL,
            category TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_expense_date ON expense(date);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    let raw_amount: String = row.get(3)?;
    let amount = Decimal::from_str(&raw_amount).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(error))
    })?;
    let raw_category: String = row.get(4)?;

    Ok(Expense {
        id: row.get(0)?,
        date: row.get(1)?,
        description: row.get(2)?,
        amount,
        category: Category::new_unchecked(&raw_category),
    })
}
