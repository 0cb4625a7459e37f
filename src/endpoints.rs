//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/expense/{expense_id}', use [format_endpoint].

/// The route to list and create expenses.
pub const EXPENSES: &str = "/expense";
/// The route to search expenses by description and date range.
pub const SEARCH_EXPENSES: &str = "/expense/search";
/// The route to get, replace or delete a single expense.
pub const EXPENSE: &str = "/expense/{expense_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/expense/{expense_id}', '{expense_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::EXPENSES);
        assert_endpoint_is_valid_uri(endpoints::SEARCH_EXPENSES);
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::EXPENSE, 1));
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint(endpoints::EXPENSE, 12);

        assert_eq!(formatted_path, "/expense/12");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/expense/search", 1);

        assert_eq!(formatted_path, "/expense/search");
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint("/expense/{expense_id}/receipt", 1);

        assert_eq!(formatted_path, "/expense/1/receipt");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}
