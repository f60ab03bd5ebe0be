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

use super::{CredentialsError, EndpointError};
use http::HeaderMap;
use std::error::Error as StdError;

type BoxError = Box<dyn StdError + Send + Sync>;

/// The core error returned by all client libraries.
///
/// The client libraries report errors from multiple sources. The credentials
/// may be rejected by the identity service, the caller may give up waiting
/// for a (still running) authentication exchange, the configured region may
/// not offer the requested services, the transport may be unable to complete
/// the request, or the service may respond with an error.
///
/// Most applications will just return the error or log it, without any further
/// action. However, some applications may need to interrogate the error
/// details. This type offers a series of predicates to determine the error
/// kind. The type also offers accessors to query the most common error details.
/// Applications can query the error [source][std::error::Error::source] for
/// deeper information.
///
/// # Example
/// ```
/// use stratus_gax::error::Error;
/// match example_function() {
///     Err(e) if e.is_timeout() => { println!("not enough time {e}"); },
///     Err(e) if e.http_status_code() == Some(404) => { println!("not found {e}"); },
///     Err(e) => { println!("some other error {e}"); },
///     Ok(_) => { println!("success, how boring"); },
/// }
///
/// fn example_function() -> Result<String, Error> {
///     // ... details omitted ...
///     # Err(Error::http(404, http::HeaderMap::new(), bytes::Bytes::from_static(b"NOT FOUND")))
/// }
/// ```
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    source: Option<BoxError>,
}

impl Error {
    /// Creates an error representing a timeout.
    ///
    /// # Example
    /// ```
    /// use std::error::Error as _;
    /// use stratus_gax::error::Error;
    /// let error = Error::timeout("simulated timeout");
    /// assert!(error.is_timeout());
    /// assert!(error.source().is_some());
    /// ```
    pub fn timeout<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Timeout,
            source: Some(source.into()),
        }
    }

    /// The caller stopped waiting before the operation completed.
    ///
    /// This is always a client-side generated error. It does **not** imply
    /// that the operation failed. When returned from `authenticate()` the
    /// credential exchange continues in the background, and a later call may
    /// find that it completed successfully.
    ///
    /// # Troubleshooting
    ///
    /// The most common cause of this problem is setting a timeout value that is
    /// based on the observed latency when the identity service is not under
    /// load. Consider increasing the timeout value to handle temporary latency
    /// increases too.
    pub fn is_timeout(&self) -> bool {
        matches!(self.kind, ErrorKind::Timeout)
    }

    /// Creates an error representing a failed credential exchange.
    pub fn authentication(source: CredentialsError) -> Self {
        Self {
            kind: ErrorKind::Authentication,
            source: Some(source.into()),
        }
    }

    /// The credentials could not be exchanged for a session.
    ///
    /// # Troubleshooting
    ///
    /// Typically this indicates wrong credentials, a wrong tenant, or the wrong
    /// authentication mode for the identity service. The source of the error
    /// is a [CredentialsError] that includes the response from the service.
    /// Use [CredentialsError::is_retryable] to decide if a new attempt may
    /// succeed.
    pub fn is_authentication(&self) -> bool {
        matches!(self.kind, ErrorKind::Authentication)
    }

    /// Creates an error representing a problem resolving a service endpoint.
    ///
    /// # Example
    /// ```
    /// use stratus_gax::error::{EndpointError, Error};
    /// let error = Error::endpoint(EndpointError::InvalidRegion { region: "r1".into() });
    /// assert!(error.is_endpoint());
    /// assert!(matches!(error.endpoint_details(), Some(EndpointError::InvalidRegion { .. })));
    /// ```
    pub fn endpoint(source: EndpointError) -> Self {
        Self {
            kind: ErrorKind::Endpoint(Box::new(source)),
            source: None,
        }
    }

    /// The requested service endpoint cannot be resolved.
    ///
    /// # Troubleshooting
    ///
    /// Review the region in your credentials. Use [Error::endpoint_details] to
    /// find out if the region is unknown, or if it lacks some services. When
    /// other regions offer the missing services the error lists them.
    pub fn is_endpoint(&self) -> bool {
        matches!(self.kind, ErrorKind::Endpoint(_))
    }

    /// The details of an endpoint resolution problem, if any.
    pub fn endpoint_details(&self) -> Option<&EndpointError> {
        match &self.kind {
            ErrorKind::Endpoint(e) => Some(e.as_ref()),
            _ => None,
        }
    }

    /// Creates an error representing a deserialization problem.
    ///
    /// # Example
    /// ```
    /// use std::error::Error as _;
    /// use stratus_gax::error::Error;
    /// let error = Error::deser("simulated problem");
    /// assert!(error.is_deserialization());
    /// assert!(error.source().is_some());
    /// ```
    pub fn deser<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Deserialization,
            source: Some(source.into()),
        }
    }

    /// The response could not be deserialized.
    ///
    /// This is always a client-side generated error. Note that the request
    /// completed, and it may have changed state in the service.
    pub fn is_deserialization(&self) -> bool {
        matches!(self.kind, ErrorKind::Deserialization)
    }

    /// Creates an error representing a serialization problem.
    ///
    /// # Example
    /// ```
    /// use std::error::Error as _;
    /// use stratus_gax::error::Error;
    /// let error = Error::ser("simulated problem");
    /// assert!(error.is_serialization());
    /// assert!(error.source().is_some());
    /// ```
    pub fn ser<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Serialization,
            source: Some(source.into()),
        }
    }

    /// The request could not be serialized.
    ///
    /// This is always a client-side generated error, generated before the
    /// request is made. This error is never transient.
    pub fn is_serialization(&self) -> bool {
        matches!(self.kind, ErrorKind::Serialization)
    }

    /// The HTTP status code, if any, associated with this error.
    ///
    /// # Example
    /// ```
    /// use stratus_gax::error::Error;
    /// let e = search_for_thing("the thing");
    /// if let Some(code) = e.http_status_code() {
    ///     if code == 404 {
    ///         println!("cannot find the thing, more details in {e}");
    ///     }
    /// }
    ///
    /// fn search_for_thing(name: &str) -> Error {
    ///     # Error::http(400, http::HeaderMap::new(), bytes::Bytes::from_static(b"NOT FOUND"))
    /// }
    /// ```
    pub fn http_status_code(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::Transport(d) => d.as_ref().status_code,
            _ => None,
        }
    }

    /// The headers, if any, associated with this error.
    pub fn http_headers(&self) -> Option<&http::HeaderMap> {
        match &self.kind {
            ErrorKind::Transport(d) => d.as_ref().headers.as_ref(),
            _ => None,
        }
    }

    /// The payload, if any, associated with this error.
    ///
    /// Services often describe the problem in the body of a non-2xx response.
    /// The client libraries never discard that body.
    pub fn http_payload(&self) -> Option<&bytes::Bytes> {
        match &self.kind {
            ErrorKind::Transport(d) => d.payload.as_ref(),
            _ => None,
        }
    }

    /// A non-2xx response from the service.
    ///
    /// # Example
    /// ```
    /// use stratus_gax::error::Error;
    /// let error = Error::http(503, http::HeaderMap::new(), bytes::Bytes::from_static(b"try again"));
    /// assert!(error.is_transport());
    /// assert_eq!(error.http_status_code(), Some(503));
    /// ```
    pub fn http(status_code: u16, headers: HeaderMap, payload: bytes::Bytes) -> Self {
        let details = TransportDetails {
            status_code: Some(status_code),
            headers: Some(headers),
            payload: Some(payload),
        };
        let kind = ErrorKind::Transport(Box::new(details));
        Self { kind, source: None }
    }

    /// A problem in the transport layer without a full HTTP response.
    ///
    /// Examples include: a refused connection, a broken connection after the
    /// request is sent, or a failure reading the response body.
    pub fn io<T: Into<BoxError>>(source: T) -> Self {
        let details = TransportDetails {
            status_code: None,
            headers: None,
            payload: None,
        };
        Self {
            kind: ErrorKind::Transport(Box::new(details)),
            source: Some(source.into()),
        }
    }

    /// A problem in the transport layer without a full HTTP response.
    ///
    /// # Troubleshooting
    ///
    /// This indicates a problem completing the request. Verify the endpoint is
    /// reachable from your network.
    pub fn is_io(&self) -> bool {
        matches!(
        &self.kind,
        ErrorKind::Transport(d) if matches!(**d, TransportDetails {
            status_code: None,
            headers: None,
            payload: None,
        }))
    }

    /// A problem in the transport layer, including non-2xx responses.
    pub fn is_transport(&self) -> bool {
        matches!(&self.kind, ErrorKind::Transport { .. })
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.kind, &self.source) {
            (ErrorKind::Serialization, Some(e)) => write!(f, "cannot serialize the request {e}"),
            (ErrorKind::Deserialization, Some(e)) => {
                write!(f, "cannot deserialize the response {e}")
            }
            (ErrorKind::Authentication, Some(e)) => {
                write!(f, "cannot authenticate {e}")
            }
            (ErrorKind::Timeout, Some(e)) => {
                write!(f, "the operation exceeded its deadline {e}")
            }
            (ErrorKind::Endpoint(e), _) => write!(f, "cannot resolve the service endpoint: {e}"),
            (ErrorKind::Transport(details), _) => details.display(self.source(), f),
            (_, None) => unreachable!("no constructor allows this"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ErrorKind::Endpoint(e) => Some(e.as_ref()),
            _ => self
                .source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn std::error::Error)),
        }
    }
}

/// The type of error held by an [Error] instance.
#[derive(Debug)]
enum ErrorKind {
    Serialization,
    Deserialization,
    Authentication,
    Timeout,
    Endpoint(Box<EndpointError>),
    Transport(Box<TransportDetails>),
}

#[derive(Debug)]
struct TransportDetails {
    status_code: Option<u16>,
    headers: Option<HeaderMap>,
    payload: Option<bytes::Bytes>,
}

impl TransportDetails {
    fn display(
        &self,
        source: Option<&(dyn StdError + 'static)>,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match (source, &self) {
            (
                _,
                TransportDetails {
                    status_code: Some(code),
                    payload: Some(p),
                    ..
                },
            ) => {
                if let Ok(message) = std::str::from_utf8(p.as_ref()) {
                    write!(f, "the HTTP transport reports a [{code}] error: {message}")
                } else {
                    write!(f, "the HTTP transport reports a [{code}] error: {p:?}")
                }
            }
            (Some(source), _) => {
                write!(f, "the transport reports an error: {source}")
            }
            (None, _) => unreachable!("no Error constructor allows this"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[derive(Debug, thiserror::Error)]
    #[error("test-only-source")]
    struct TestSource;

    static_assertions::assert_impl_all!(Error: Send, Sync);

    #[test]
    fn timeout() {
        let error = Error::timeout(TestSource);
        assert!(error.is_timeout(), "{error:?}");
        assert!(!error.is_authentication(), "{error:?}");
        let got = error.source().and_then(|e| e.downcast_ref::<TestSource>());
        assert!(got.is_some(), "{error:?}");
        assert!(error.to_string().contains("test-only-source"), "{error}");

        assert!(error.http_headers().is_none(), "{error:?}");
        assert!(error.http_status_code().is_none(), "{error:?}");
        assert!(error.http_payload().is_none(), "{error:?}");
        assert!(error.endpoint_details().is_none(), "{error:?}");
    }

    #[test]
    fn authentication() {
        let source = CredentialsError::from_msg(false, "test-message");
        let error = Error::authentication(source);
        assert!(error.is_authentication(), "{error:?}");
        assert!(!error.is_timeout(), "{error:?}");
        let got = error
            .source()
            .and_then(|e| e.downcast_ref::<CredentialsError>());
        assert!(matches!(got, Some(c) if !c.is_retryable()), "{error:?}");
        assert!(error.to_string().contains("test-message"), "{error}");
    }

    #[test]
    fn endpoint() {
        let error = Error::endpoint(EndpointError::ServiceNotAvailable {
            service_type: "compute".into(),
        });
        assert!(error.is_endpoint(), "{error:?}");
        assert!(
            matches!(
                error.endpoint_details(),
                Some(EndpointError::ServiceNotAvailable { service_type }) if service_type == "compute"
            ),
            "{error:?}"
        );
        let got = error
            .source()
            .and_then(|e| e.downcast_ref::<EndpointError>());
        assert!(got.is_some(), "{error:?}");
        assert!(error.to_string().contains("compute"), "{error}");
        assert!(error.http_status_code().is_none(), "{error:?}");
    }

    #[test]
    fn serialization() {
        let error = Error::ser(TestSource);
        assert!(error.is_serialization(), "{error:?}");
        assert!(error.to_string().contains("test-only-source"), "{error}");

        let error = Error::deser(TestSource);
        assert!(error.is_deserialization(), "{error:?}");
        assert!(!error.is_serialization(), "{error:?}");
        assert!(error.to_string().contains("test-only-source"), "{error}");
    }

    #[test]
    fn http() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "content-type",
            http::HeaderValue::from_static("application/json"),
        );
        let payload = bytes::Bytes::from_static(b"NOT FOUND");
        let error = Error::http(404, headers.clone(), payload.clone());
        assert!(error.is_transport(), "{error:?}");
        assert!(!error.is_io(), "{error:?}");
        assert!(error.source().is_none(), "{error:?}");
        assert_eq!(error.http_status_code(), Some(404));
        assert_eq!(error.http_headers(), Some(&headers));
        assert_eq!(error.http_payload(), Some(&payload));
        let got = error.to_string();
        assert!(got.contains("[404]"), "{got}");
        assert!(got.contains("NOT FOUND"), "{got}");
    }

    #[test]
    fn http_binary_payload() {
        let payload = bytes::Bytes::from_static(&[0xff, 0xfe, 0x00]);
        let error = Error::http(500, HeaderMap::new(), payload);
        let got = error.to_string();
        assert!(got.contains("[500]"), "{got}");
    }

    #[test]
    fn io() {
        let error = Error::io(TestSource);
        assert!(error.is_io(), "{error:?}");
        assert!(error.is_transport(), "{error:?}");
        assert!(error.http_status_code().is_none(), "{error:?}");
        assert!(error.source().is_some(), "{error:?}");
        assert!(error.to_string().contains("test-only-source"), "{error}");
    }
}
