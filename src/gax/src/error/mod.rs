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

//! Errors returned by the client libraries.
//!
//! The client libraries distinguish between errors exchanging credentials for
//! a session, errors waiting for such an exchange, errors resolving a service
//! endpoint from the session catalog, and errors returned by the transport or
//! the service itself.
//!
//! # Examples
//!
//! ```
//! use stratus_gax::error::{EndpointError, Error};
//! fn handle_error(e: Error) {
//!     match e.endpoint_details() {
//!         Some(EndpointError::MissingServices { suggested, .. }) => {
//!             println!("try one of these regions instead: {suggested:?}");
//!         }
//!         _ => println!("{e}"),
//!     }
//! }
//! ```

mod core_error;
mod credentials;
mod endpoint;
pub use core_error::*;
pub use credentials::*;
pub use endpoint::*;
