// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Errors exchanging credentials for a session.

use http::StatusCode;

pub use gax::error::CredentialsError;

/// A helper to create a retryable error.
pub(crate) fn retryable<T: std::error::Error + Send + Sync + 'static>(
    source: T,
) -> CredentialsError {
    CredentialsError::new(true, source)
}

/// A helper to create a non-retryable error.
pub(crate) fn non_retryable<T: std::error::Error + Send + Sync + 'static>(
    source: T,
) -> CredentialsError {
    CredentialsError::new(false, source)
}

pub(crate) fn non_retryable_from_str<T: Into<String>>(message: T) -> CredentialsError {
    CredentialsError::from_msg(false, message)
}

/// Classifies a failed exchange with the identity service.
pub(crate) fn from_http_status<T: Into<String>>(status: StatusCode, body: T) -> CredentialsError {
    CredentialsError::from_msg(
        is_retryable(status),
        format!(
            "the identity service rejected the credentials with status {status}: {}",
            body.into()
        ),
    )
}

pub(crate) fn is_retryable(c: StatusCode) -> bool {
    match c {
        // Internal server errors do not indicate that there is anything wrong
        // with our request, so a future attempt may succeed.
        StatusCode::INTERNAL_SERVER_ERROR
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::REQUEST_TIMEOUT
        | StatusCode::TOO_MANY_REQUESTS => true,
        _ => false,
    }
}
