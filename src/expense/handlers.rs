//! Route handlers for the expense resource.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};

use crate::{
    Error, endpoints,
    expense::{
        CreateExpenseRequest, Expense, ExpenseId, ExpenseService, NewExpense, SQLiteExpenseStore,
        SearchParams, SearchQuery,
    },
};

type SQLiteExpenseService = ExpenseService<SQLiteExpenseStore>;

/// A route handler for listing every expense.
pub async fn list_expenses_endpoint(
    State(service): State<SQLiteExpenseService>,
) -> Result<Json<Vec<Expense>>, Error> {
    service.list().map(Json)
}

/// A route handler for searching expenses by description and date range.
///
/// Responds with 400 if a date cannot be parsed or the range is too wide.
pub async fn search_expenses_endpoint(
    State(service): State<SQLiteExpenseService>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Expense>>, Error> {
    let params = SearchParams::try_from(query)?;

    service
        .search(params.description, params.start_date, params.end_date)
        .map(Json)
}

/// A route handler for getting an expense by its database ID.
pub async fn get_expense_endpoint(
    State(service): State<SQLiteExpenseService>,
    Path(expense_id): Path<ExpenseId>,
) -> Result<Json<Expense>, Error> {
    service.get(expense_id).map(Json)
}

/// A route handler for creating an expense.
///
/// On success responds with 201, the new expense in the body and its URI in
/// the `Location` header. A body that cannot be parsed is a 400.
pub async fn create_expense_endpoint(
    State(mut service): State<SQLiteExpenseService>,
    request: Result<Json<CreateExpenseRequest>, JsonRejection>,
) -> Result<Response, Error> {
    let Json(request) = request?;
    let new_expense = NewExpense::try_from(request)?;
    let expense = service.create(new_expense)?;
    let location = endpoints::format_endpoint(endpoints::EXPENSE, expense.id);

    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(expense)).into_response())
}

/// A route handler for replacing an expense.
///
/// The body must be a complete expense; a body that cannot be parsed is a 400.
pub async fn update_expense_endpoint(
    State(mut service): State<SQLiteExpenseService>,
    Path(expense_id): Path<ExpenseId>,
    expense: Result<Json<Expense>, JsonRejection>,
) -> Result<StatusCode, Error> {
    let Json(expense) = expense?;
    service.update(expense_id, expense)?;

    Ok(StatusCode::NO_CONTENT)
}

/// A route handler for deleting an expense.
pub async fn delete_expense_endpoint(
    State(mut service): State<SQLiteExpenseService>,
    Path(expense_id): Path<ExpenseId>,
) -> Result<StatusCode, Error> {
    service.delete(expense_id)?;

    Ok(StatusCode::NO_CONTENT)
}
