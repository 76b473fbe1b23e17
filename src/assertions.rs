//! Checks a scenario applies to an `ApiResponse`.
//!
//! Every check returns `Result<_, AssertionFailure>` so scenarios can chain
//! them with `?` and stop at the first mismatch.

use crate::api_client::ApiResponse;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

/// Validation errors carry this in `description`.
pub const INVALID_INPUT_DESCRIPTION: &str = "Invalid Input";
/// Authorization errors carry this in `title`.
pub const UNAUTHORIZED_TITLE: &str = "Unauthorized";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusExpectation {
    Exact(StatusCode),
    /// Any 2xx
    Success,
}

impl StatusExpectation {
    pub fn matches(&self, actual: StatusCode) -> bool {
        match self {
            StatusExpectation::Exact(expected) => *expected == actual,
            StatusExpectation::Success => actual.is_success(),
        }
    }
}

impl std::fmt::Display for StatusExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusExpectation::Exact(code) => write!(f, "{}", code.as_u16()),
            StatusExpectation::Success => write!(f, "2xx"),
        }
    }
}

impl From<StatusCode> for StatusExpectation {
    fn from(code: StatusCode) -> Self {
        StatusExpectation::Exact(code)
    }
}

/// A status expectation plus an optional partial-match on the body.
#[derive(Debug, Clone)]
pub struct ExpectedOutcome {
    pub status: StatusExpectation,
    pub body_contains: Option<Value>,
}

impl ExpectedOutcome {
    pub fn status(status: impl Into<StatusExpectation>) -> Self {
        Self {
            status: status.into(),
            body_contains: None,
        }
    }

    pub fn success() -> Self {
        Self::status(StatusExpectation::Success)
    }

    pub fn with_body_containing(mut self, subset: Value) -> Self {
        self.body_contains = Some(subset);
        self
    }

    pub fn invalid_input() -> Self {
        Self::status(StatusCode::BAD_REQUEST)
            .with_body_containing(serde_json::json!({ "description": INVALID_INPUT_DESCRIPTION }))
    }

    pub fn unauthorized() -> Self {
        Self::status(StatusCode::UNAUTHORIZED)
            .with_body_containing(serde_json::json!({ "title": UNAUTHORIZED_TITLE }))
    }

    pub fn not_found() -> Self {
        Self::status(StatusCode::NOT_FOUND)
    }

    /// Status first, then body.
    pub fn verify(&self, response: &ApiResponse) -> Result<(), AssertionFailure> {
        expect_status(response, self.status)?;
        if let Some(subset) = &self.body_contains {
            expect_body_contains(response, subset)?;
        }
        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum AssertionFailure {
    #[error("{request}: expected status {expected}, got {actual}")]
    Status {
        request: String,
        expected: StatusExpectation,
        actual: StatusCode,
    },
    #[error("{request}: response body {actual} does not contain {expected}")]
    Body {
        request: String,
        expected: Value,
        actual: Value,
    },
    #[error("{what} took {elapsed:?}, the limit is {limit:?}")]
    TooSlow {
        what: String,
        elapsed: Duration,
        limit: Duration,
    },
}

pub fn expect_status(
    response: &ApiResponse,
    expected: impl Into<StatusExpectation>,
) -> Result<(), AssertionFailure> {
    let expected = expected.into();
    if expected.matches(response.status) {
        Ok(())
    } else {
        Err(AssertionFailure::Status {
            request: response.request_line.clone(),
            expected,
            actual: response.status,
        })
    }
}

pub fn expect_body_contains(
    response: &ApiResponse,
    subset: &Value,
) -> Result<(), AssertionFailure> {
    let actual = response.body.clone().unwrap_or(Value::Null);
    if json_contains(&actual, subset) {
        Ok(())
    } else {
        Err(AssertionFailure::Body {
            request: response.request_line.clone(),
            expected: subset.clone(),
            actual,
        })
    }
}

/// Strictly below `limit`.
pub fn expect_within(
    what: impl Into<String>,
    elapsed: Duration,
    limit: Duration,
) -> Result<(), AssertionFailure> {
    if elapsed < limit {
        Ok(())
    } else {
        Err(AssertionFailure::TooSlow {
            what: what.into(),
            elapsed,
            limit,
        })
    }
}

/// Partial match: every key of `expected` is present in `actual` with an
/// equal value. Extra keys in `actual` are ignored, at every nesting level
/// of objects. Arrays and scalars compare by equality.
pub fn json_contains(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Object(actual), Value::Object(expected)) => {
            expected.iter().all(|(key, expected_value)| {
                actual
                    .get(key)
                    .is_some_and(|actual_value| json_contains(actual_value, expected_value))
            })
        }
        _ => actual == expected,
    }
}
