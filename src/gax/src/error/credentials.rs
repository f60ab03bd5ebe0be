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

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// The identity service did not return a session for the credentials.
///
/// Authentication strategies make a single attempt. They report the outcome
/// of that attempt with this type, and let the caller decide what to do next:
///
/// * A rejected username, password or key pair is not retryable. Fix the
///   credentials before trying again.
/// * A busy or unavailable identity service (HTTP 408, 429, 500 or 503), or a
///   connection failure, is retryable.
/// * A response without a token, or one that is not a valid session, is not
///   retryable.
///
/// # Example
/// ```
/// # use stratus_gax::error::CredentialsError;
/// let err = CredentialsError::from_msg(true, "identity service unavailable");
/// assert!(err.is_retryable());
/// assert!(err.to_string().contains("identity service unavailable"));
/// ```
#[derive(Clone, Debug)]
pub struct CredentialsError {
    is_retryable: bool,
    detail: Detail,
}

#[derive(Clone, Debug)]
enum Detail {
    Message(String),
    Source(Arc<dyn Error + Send + Sync>),
}

impl CredentialsError {
    /// Wraps the error that stopped the exchange, such as a transport failure
    /// or a response that cannot be decoded.
    ///
    /// The wrapped error is available as the [source][Error::source].
    pub fn new<T: Error + Send + Sync + 'static>(is_retryable: bool, source: T) -> Self {
        Self {
            is_retryable,
            detail: Detail::Source(Arc::new(source)),
        }
    }

    /// Describes why the exchange failed, typically with the status and body
    /// returned by the identity service.
    ///
    /// # Example
    /// ```
    /// # use stratus_gax::error::CredentialsError;
    /// let err = CredentialsError::from_msg(false, "401 Unauthorized: bad password");
    /// assert!(!err.is_retryable());
    /// ```
    pub fn from_msg<T: Into<String>>(is_retryable: bool, message: T) -> Self {
        Self {
            is_retryable,
            detail: Detail::Message(message.into()),
        }
    }

    /// Returns `true` if a new exchange with the same credentials may succeed.
    pub fn is_retryable(&self) -> bool {
        self.is_retryable
    }
}

impl Error for CredentialsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.detail {
            Detail::Message(_) => None,
            Detail::Source(e) => Some(e.as_ref()),
        }
    }
}

impl Display for CredentialsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let outlook = if self.is_retryable {
            "a later attempt may succeed"
        } else {
            "retrying with the same credentials will not succeed"
        };
        f.write_str("cannot exchange credentials for a session, ")?;
        f.write_str(outlook)?;
        match &self.detail {
            Detail::Message(m) => write!(f, ": {m}"),
            Detail::Source(e) => write!(f, ": {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;
    use test_case::test_case;

    #[test_case(ErrorKind::ConnectionRefused, true; "connection refused")]
    #[test_case(ErrorKind::InvalidData, false; "garbled response")]
    fn wraps_exchange_failure(kind: ErrorKind, retryable: bool) {
        let err = CredentialsError::new(retryable, std::io::Error::new(kind, "test-only"));
        assert_eq!(err.is_retryable(), retryable, "{err}");
        let got = err
            .source()
            .and_then(|e| e.downcast_ref::<std::io::Error>())
            .map(|e| e.kind());
        assert_eq!(got, Some(kind), "{err:?}");
        assert!(err.to_string().contains("test-only"), "{err}");
    }

    #[test]
    fn identity_service_rejection() {
        let err = CredentialsError::from_msg(false, "401 Unauthorized: invalid password");
        assert!(!err.is_retryable(), "{err}");
        assert!(err.source().is_none(), "{err:?}");
        let got = err.to_string();
        assert!(got.contains("will not succeed: 401 Unauthorized"), "{got}");
    }

    #[test]
    fn identity_service_unavailable() {
        let err = CredentialsError::from_msg(true, "503 Service Unavailable");
        let got = err.to_string();
        assert!(got.contains("a later attempt may succeed: 503"), "{got}");
    }

    #[test]
    fn clones_share_the_source() {
        let err = CredentialsError::new(true, std::io::Error::other("test-only-reset"));
        let clone = err.clone();
        let (a, b) = (err.source(), clone.source());
        assert!(
            matches!((a, b), (Some(a), Some(b)) if std::ptr::addr_eq(a, b)),
            "{err:?}"
        );
    }
}
