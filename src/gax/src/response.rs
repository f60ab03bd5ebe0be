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

//! Response types.
//!
//! This module contains types related to service responses. Notably it
//! contains the `Response` type itself.
//!
//! # Examples
//!
//! Creating a response for mocks
//!
//! ```
//! # use stratus_gax::Result;
//! # use stratus_gax::response::Response;
//! struct Server {
//!   // ...
//! }
//!
//! fn make_mock_response(body: Server) -> Result<Response<Server>> {
//!     Ok(Response::from(body))
//! }
//! ```

/// Represents a service response.
///
/// A response consists of a body (potentially the unit type), and some
/// metadata: the status code and headers.
#[derive(Clone, Debug)]
pub struct Response<T> {
    parts: Parts,
    body: T,
}

impl<T> Response<T> {
    /// Creates a response from the body.
    ///
    /// The status code is `200 OK` and there are no headers.
    ///
    /// # Example
    /// ```
    /// # use stratus_gax::response::Response;
    /// let response = Response::from(String::from("hello"));
    /// assert_eq!(response.body(), "hello");
    /// assert_eq!(response.status(), http::StatusCode::OK);
    /// ```
    pub fn from(body: T) -> Self {
        Self {
            body,
            parts: Parts::default(),
        }
    }

    /// Creates a response from the given parts.
    pub fn from_parts(parts: Parts, body: T) -> Self {
        Self { parts, body }
    }

    /// Returns the status code.
    pub fn status(&self) -> http::StatusCode {
        self.parts.status
    }

    /// Returns the headers associated with this response.
    pub fn headers(&self) -> &http::HeaderMap {
        &self.parts.headers
    }

    /// Returns the body associated with this response.
    pub fn body(&self) -> &T {
        &self.body
    }

    /// Decomposes the response into its parts and body.
    pub fn into_parts(self) -> (Parts, T) {
        (self.parts, self.body)
    }

    /// Extract the body from the response.
    pub fn into_body(self) -> T {
        self.body
    }
}

/// Component parts of a response.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct Parts {
    /// The status code of the response.
    pub status: http::StatusCode,

    /// The HTTP headers of the response.
    pub headers: http::HeaderMap,
}

impl Default for Parts {
    fn default() -> Self {
        Self {
            status: http::StatusCode::OK,
            headers: http::HeaderMap::new(),
        }
    }
}

impl Parts {
    /// Create a new instance.
    pub fn new() -> Self {
        Parts::default()
    }

    /// Set the status code.
    pub fn set_status(mut self, v: http::StatusCode) -> Self {
        self.status = v;
        self
    }

    /// Set the headers.
    pub fn set_headers<V>(mut self, v: V) -> Self
    where
        V: Into<http::HeaderMap>,
    {
        self.headers = v.into();
        self
    }
}
