//! Response expectations for step definitions.
//!
//! Each check returns an [`AssertionError`] carrying the offending response,
//! so a failed step reports what the store actually said.

use thiserror::Error;

use crate::response::{ApiResponse, Listing};

#[derive(Debug, Error)]
pub enum AssertionError {
    #[error("expected status {expected}, got {actual}\n{response}")]
    Status {
        expected: u16,
        actual: u16,
        response: String,
    },

    #[error("expected a 2xx status, got {actual}\n{response}")]
    NotSuccess { actual: u16, response: String },

    #[error("expected message to contain one of {needles:?}, got '{message}'")]
    Message {
        needles: Vec<String>,
        message: String,
    },

    #[error("expected a list or page body\n{response}")]
    NotListing { response: String },

    #[error("no response has been received yet")]
    NoResponse,
}

pub type AssertionResult<T = ()> = Result<T, AssertionError>;

pub fn expect_status(response: &ApiResponse, expected: u16) -> AssertionResult {
    let actual = response.status_code();
    if actual == expected {
        Ok(())
    } else {
        Err(AssertionError::Status {
            expected,
            actual,
            response: response.to_string(),
        })
    }
}

pub fn expect_success(response: &ApiResponse) -> AssertionResult {
    if response.is_success() {
        Ok(())
    } else {
        Err(AssertionError::NotSuccess {
            actual: response.status_code(),
            response: response.to_string(),
        })
    }
}

/// Case-insensitive; any one needle is enough.
pub fn expect_message_contains(response: &ApiResponse, needles: &[&str]) -> AssertionResult {
    let message = response.message();
    let lowered = message.to_lowercase();
    if needles.iter().any(|needle| lowered.contains(&needle.to_lowercase())) {
        Ok(())
    } else {
        Err(AssertionError::Message {
            needles: needles.iter().map(|n| n.to_string()).collect(),
            message,
        })
    }
}

pub fn expect_listing(response: &ApiResponse) -> AssertionResult<Listing> {
    response.listing().ok_or_else(|| AssertionError::NotListing {
        response: response.to_string(),
    })
}

pub fn expect_response(response: Option<&ApiResponse>) -> AssertionResult<&ApiResponse> {
    response.ok_or(AssertionError::NoResponse)
}
