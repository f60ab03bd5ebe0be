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

//! Stratus Cloud Client Libraries for Rust - core helpers.
//!
//! This crate contains the types shared by the Stratus client libraries: the
//! error model returned by every operation, the response wrapper returned by
//! the request dispatcher, and a small set of runtime helpers.
//!
//! Applications rarely depend on this crate directly. The client crates
//! re-export the types they need.

/// An alias of [std::result::Result] where the error is always [crate::error::Error].
///
/// This is the result type used by all functions that authenticate or make
/// requests.
pub type Result<T> = std::result::Result<T, crate::error::Error>;

/// The core error types used by the client libraries.
pub mod error;

pub mod response;

/// Run work in the background while bounding how long the caller waits.
pub mod timeout;
