//! Typed request bodies and query strings for the expense endpoints.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, macros::format_description};

use crate::{
    Error,
    expense::{NewExpense, domain::date_format},
};

/// The JSON body for creating an expense.
///
/// Every field is optional here so that a missing field is reported with
/// the same message as the other create rules instead of as a JSON error.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct CreateExpenseRequest {
    /// The date as `YYYY-MM-DD`.
    #[serde(default, with = "date_format::option")]
    pub date: Option<Date>,
    /// The description.
    #[serde(default)]
    pub description: Option<String>,
    /// The amount, as a JSON number or string.
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// One of the fixed category names.
    #[serde(default)]
    pub category: Option<String>,
}

impl TryFrom<CreateExpenseRequest> for NewExpense {
    type Error = Error;

    fn try_from(request: CreateExpenseRequest) -> Result<Self, Self::Error> {
        NewExpense::new(
            request.date,
            request.description,
            request.amount,
            request.category,
        )
        .map_err(Error::from)
    }
}

/// The raw query string for searching expenses.
///
/// Empty values are treated as absent.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    /// Text the description must contain.
    pub description: Option<String>,
    /// The first day to include, as `YYYY-MM-DD`.
    pub start_date: Option<String>,
    /// The last day to include, as `YYYY-MM-DD`.
    pub end_date: Option<String>,
}

/// A search query with its dates parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Text the description must contain.
    pub description: Option<String>,
    /// The first day to include.
    pub start_date: Option<Date>,
    /// The last day to include.
    pub end_date: Option<Date>,
}

impl TryFrom<SearchQuery> for SearchParams {
    type Error = Error;

    fn try_from(query: SearchQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            description: query.description.filter(|text| !text.is_empty()),
            start_date: parse_optional_date(query.start_date)?,
            end_date: parse_optional_date(query.end_date)?,
        })
    }
}

fn parse_optional_date(text: Option<String>) -> Result<Option<Date>, Error> {
    match text {
        None => Ok(None),
        Some(text) if text.trim().is_empty() => Ok(None),
        Some(text) => Date::parse(text.trim(), format_description!("[year]-[month]-[day]"))
            .map(Some)
            .map_err(|_| Error::InvalidDate(text)),
    }
}


#[cfg(test)]
mod search_query_tests {
    use time::macros::date;

    use crate::{
        Error,
        expense::{SearchParams, SearchQuery},
    };

    #[test]
    fn parses_dates() {
        let query = SearchQuery {
            description: Some("Lunch".to_owned()),
            start_date: Some("2021-01-01".to_owned()),
            end_date: Some("2021-01-31".to_owned()),
        };

        let params = SearchParams::try_from(query);

        assert_eq!(
            params,
            Ok(SearchParams {
                description: Some("Lunch".to_owned()),
                start_date: Some(date!(2021 - 01 - 01)),
                end_date: Some(date!(2021 - 01 - 31)),
            })
        );
    }

    #[test]
    fn empty_values_are_absent() {
        let query = SearchQuery {
            description: Some(String::new()),
            start_date: Some(String::new()),
            end_date: Some(" ".to_owned()),
        };

        let params = SearchParams::try_from(query).unwrap();

        assert_eq!(params.description, None);
        assert_eq!(params.start_date, None);
        assert_eq!(params.end_date, None);
    }

    #[test]
    fn invalid_date_fails() {
        let query = SearchQuery {
            start_date: Some("01/02/2021".to_owned()),
            ..Default::default()
        };

        let params = SearchParams::try_from(query);

        assert_eq!(params, Err(Error::InvalidDate("01/02/2021".to_owned())));
    }
}
