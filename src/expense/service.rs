//! The expense service: validation and search rules in front of an [ExpenseStore].

use axum::extract::FromRef;
use time::Date;

use crate::{
    AppState, Error,
    expense::{Expense, ExpenseId, ExpenseQuery, ExpenseStore, NewExpense, SQLiteExpenseStore},
};

/// The widest date range, in days, a search may span.
pub const MAX_SEARCH_RANGE_DAYS: i64 = 30;

/// Applies the expense rules and delegates storage to `S`.
#[derive(Debug, Clone)]
pub struct ExpenseService<S> {
    store: S,
}

impl<S> ExpenseService<S>
where
    S: ExpenseStore,
{
    /// Create a service that persists expenses in `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Every expense, in storage order.
    pub fn list(&self) -> Result<Vec<Expense>, Error> {
        self.store.get_all()
    }

    /// Find the expenses whose description contains `description` and whose
    /// date lies within `start_date..=end_date`.
    ///
    /// A missing `description` matches everything, a missing `start_date`
    /// means the earliest representable date and a missing `end_date` the
    /// latest.
    ///
    /// # Errors
    /// Returns [Error::InvalidRange] if both dates are given and they are more
    /// than [MAX_SEARCH_RANGE_DAYS] days apart.
    pub fn search(
        &self,
        description: Option<String>,
        start_date: Option<Date>,
        end_date: Option<Date>,
    ) -> Result<Vec<Expense>, Error> {
        if let (Some(start), Some(end)) = (start_date, end_date)
            && (end - start).whole_days() > MAX_SEARCH_RANGE_DAYS
        {
            return Err(Error::InvalidRange);
        }

        let query = ExpenseQuery {
            description: description.unwrap_or_default(),
            date_range: start_date.unwrap_or(Date::MIN)..=end_date.unwrap_or(Date::MAX),
        };

        self.store.query(query)
    }

    /// Get the expense with `id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no such expense.
    pub fn get(&self, id: ExpenseId) -> Result<Expense, Error> {
        self.store.get(id)
    }

    /// Persist a validated expense and return it with its new ID.
    pub fn create(&mut self, expense: NewExpense) -> Result<Expense, Error> {
        let expense = self.store.add(expense)?;
        tracing::info!("Created expense {}", expense.id);

        Ok(expense)
    }

    /// Replace the expense at `id` with `expense`.
    ///
    /// The create rules are not applied to the replacement.
    ///
    /// # Errors
    /// Returns:
    /// - [Error::IdMismatch] if `expense.id` is not `id`,
    /// - [Error::NotFound] if there is no expense at `id`, including when it
    ///   is removed between the existence check and the write.
    pub fn update(&mut self, id: ExpenseId, expense: Expense) -> Result<(), Error> {
        if id != expense.id {
            return Err(Error::IdMismatch {
                path_id: id,
                body_id: expense.id,
            });
        }

        if !self.store.exists(id)? {
            return Err(Error::NotFound);
        }

        self.store.update(&expense)?;
        tracing::info!("Updated expense {id}");

        Ok(())
    }

    /// Remove the expense at `id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no expense at `id`.
    pub fn delete(&mut self, id: ExpenseId) -> Result<(), Error> {
        self.store.remove(id)?;
        tracing::info!("Deleted expense {id}");

        Ok(())
    }
}

impl FromRef<AppState> for ExpenseService<SQLiteExpenseStore> {
    fn from_ref(state: &AppState) -> Self {
        Self::new(SQLiteExpenseStore::new(state.db_connection.clone()))
    }
}

#[cfg(test)]
mod expense_service_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use time::{Duration, macros::date};

    use crate::{
        Error,
        expense::{
            Category, Expense, ExpenseService, NewExpense, SQLiteExpenseStore,
            create_expense_table,
        },
        seed::populate_if_empty,
    };

    fn get_test_service() -> ExpenseService<SQLiteExpenseStore> {
        let connection = Connection::open_in_memory().unwrap();
        create_expense_table(&connection).expect("Could not create expense table");

        ExpenseService::new(SQLiteExpenseStore::new(Arc::new(Mutex::new(connection))))
    }

    fn get_seeded_service() -> ExpenseService<SQLiteExpenseStore> {
        let mut service = get_test_service();
        populate_if_empty(&mut service.store).expect("Could not seed expenses");
        service
    }

    fn find_by_description(
        service: &ExpenseService<SQLiteExpenseStore>,
        description: &str,
    ) -> Expense {
        service
            .list()
            .unwrap()
            .into_iter()
            .find(|expense| expense.description == description)
            .expect("seeded expense missing")
    }

    #[test]
    fn list_returns_seeded_expenses() {
        let service = get_seeded_service();

        assert_eq!(service.list().unwrap().len(), 4);
    }

    #[test]
    fn search_finds_single_day_match() {
        let service = get_seeded_service();

        let got = service
            .search(
                Some("Lunch".to_owned()),
                Some(date!(2021 - 01 - 01)),
                Some(date!(2021 - 01 - 01)),
            )
            .unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].description, "Lunch");
    }

    #[test]
    fn search_without_dates_matches_description_only() {
        let service = get_seeded_service();

        let got = service.search(Some("n".to_owned()), None, None).unwrap();

        let descriptions: Vec<_> = got.iter().map(|e| e.description.as_str()).collect();
        assert_eq!(descriptions, vec!["Lunch", "Dinner"]);
    }

    #[test]
    fn search_without_anything_returns_all() {
        let service = get_seeded_service();

        assert_eq!(service.search(None, None, None).unwrap().len(), 4);
    }

    #[test]
    fn search_with_only_start_date_is_open_ended() {
        let service = get_seeded_service();

        let got = service.search(None, Some(date!(2021 - 01 - 03)), None).unwrap();

        assert_eq!(got.len(), 2);
    }

    #[test]
    fn search_with_only_end_date_is_open_ended() {
        let service = get_seeded_service();

        let got = service.search(None, None, Some(date!(2021 - 01 - 01))).unwrap();

        assert_eq!(got.len(), 1);
    }

    #[test]
    fn search_range_of_30_days_succeeds() {
        let service = get_seeded_service();
        let start = date!(2021 - 01 - 01);

        let got = service.search(None, Some(start), Some(start + Duration::days(30)));

        assert_eq!(got.map(|expenses| expenses.len()), Ok(4));
    }

    #[test]
    fn search_range_of_31_days_fails() {
        let service = get_seeded_service();
        let start = date!(2021 - 01 - 01);

        let got = service.search(None, Some(start), Some(start + Duration::days(31)));

        assert_eq!(got, Err(Error::InvalidRange));
    }

    #[test]
    fn search_with_end_before_start_finds_nothing() {
        let service = get_seeded_service();

        let got = service
            .search(None, Some(date!(2021 - 01 - 04)), Some(date!(2021 - 01 - 01)))
            .unwrap();

        assert!(got.is_empty());
    }

    #[test]
    fn get_returns_expense() {
        let service = get_seeded_service();
        let lunch = find_by_description(&service, "Lunch");

        assert_eq!(service.get(lunch.id), Ok(lunch));
    }

    #[test]
    fn create_assigns_unique_ids() {
        let mut service = get_seeded_service();
        let new_expense = || {
            NewExpense::new(
                Some(date!(2021 - 01 - 05)),
                Some("Dinner".to_owned()),
                Some(Decimal::from(20)),
                Some("食".to_owned()),
            )
            .unwrap()
        };

        let first = service.create(new_expense()).unwrap();
        let second = service.create(new_expense()).unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(service.list().unwrap().len(), 6);
        assert_eq!(service.get(first.id), Ok(first));
    }

    #[test]
    fn update_replaces_expense() {
        let mut service = get_seeded_service();
        let mut lunch = find_by_description(&service, "Lunch");
        lunch.amount = Decimal::from(15);

        service.update(lunch.id, lunch.clone()).unwrap();

        assert_eq!(service.get(lunch.id).unwrap().amount, Decimal::from(15));
    }

    #[test]
    fn update_skips_create_rules() {
        let mut service = get_seeded_service();
        let mut lunch = find_by_description(&service, "Lunch");
        lunch.amount = Decimal::from(-3);
        lunch.category = Category::new_unchecked("Food");
        lunch.date = date!(2030 - 01 - 01);

        service.update(lunch.id, lunch.clone()).unwrap();

        assert_eq!(service.get(lunch.id), Ok(lunch));
    }

    #[test]
    fn update_with_mismatched_id_fails_and_leaves_record() {
        let mut service = get_seeded_service();
        let lunch = find_by_description(&service, "Lunch");
        let mut changed = lunch.clone();
        changed.id = lunch.id + 1;
        changed.amount = Decimal::from(99);

        let result = service.update(lunch.id, changed);

        assert_eq!(
            result,
            Err(Error::IdMismatch {
                path_id: lunch.id,
                body_id: lunch.id + 1
            })
        );
        assert_eq!(service.get(lunch.id), Ok(lunch));
    }

    #[test]
    fn update_missing_expense_returns_not_found() {
        let mut service = get_test_service();
        let expense = NewExpense::new_unchecked(
            date!(2021 - 01 - 01),
            "Ghost",
            Decimal::ONE,
            Category::new_unchecked("住"),
        )
        .with_id(42);

        assert_eq!(service.update(42, expense), Err(Error::NotFound));
    }

    #[test]
    fn delete_then_get_returns_not_found() {
        let mut service = get_seeded_service();
        let lunch = find_by_description(&service, "Lunch");

        service.delete(lunch.id).unwrap();

        assert_eq!(service.get(lunch.id), Err(Error::NotFound));
        assert_eq!(service.list().unwrap().len(), 3);
    }

    #[test]
    fn delete_missing_expense_returns_not_found() {
        let mut service = get_test_service();

        assert_eq!(service.delete(1), Err(Error::NotFound));
    }
}
