// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::forms::FieldErrors;
use thiserror::Error;

pub const SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";
pub const NO_PERMISSION: &str = "You do not have permission to view this page.";

/// Failures surfaced by [`crate::api::ApiClient`].
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{}", .0.summary())]
    Validation(FieldErrors),
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
    #[error("{0}")]
    Rejected(String),
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("not logged in; run `lendclip login` first")]
    NotAuthenticated,
    #[error("session store: {0}")]
    Store(#[from] rusqlite::Error),
}

impl ApiError {
    /// The server-supplied message, if the failure carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Forbidden(m)
            | ApiError::NotFound(m)
            | ApiError::Rejected(m)
            | ApiError::Server { message: m, .. } => Some(m.as_str()),
            ApiError::Validation(f) => f.get("submit"),
            _ => None,
        }
    }
}
