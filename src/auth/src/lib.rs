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

//! Stratus Cloud Client Libraries for Rust - Authentication and Endpoints
//!
//! **WARNING:** this crate is under active development. We expect multiple
//! breaking changes in the upcoming releases.
//!
//! This crate exchanges long-lived [credentials] for a short-lived session,
//! and uses the session to resolve service endpoints and sign requests. The
//! resource-specific clients consume a [client::Client] to find their
//! endpoints and issue their requests.
//!
//! The exchange happens at most once at a time per client, no matter how many
//! tasks call [client::Client::authenticate] concurrently. The session is
//! published atomically: readers see either the previous session or the new
//! one, never a mix of both.

pub mod build_errors;

pub mod credentials;

pub mod errors;

pub mod client;

/// Sessions returned by a successful authentication.
pub mod session;

pub mod region;

pub mod http;

pub mod public;

pub(crate) mod authenticator;

pub(crate) mod constants;

pub use constants::{COMPUTE_SERVICE, DEFAULT_AUTH_TIMEOUT, OBJECT_STORE_SERVICE};
