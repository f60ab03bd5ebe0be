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

use std::time::Duration;

/// How long `authenticate()` waits for a credential exchange by default.
pub const DEFAULT_AUTH_TIMEOUT: Duration = Duration::from_secs(30);

/// The header carrying the session token in signed requests.
pub(crate) const AUTH_TOKEN_HEADER: &str = "x-auth-token";

// Legacy authentication headers.
pub(crate) const LEGACY_USER_HEADER: &str = "x-auth-user";
pub(crate) const LEGACY_KEY_HEADER: &str = "x-auth-key";
pub(crate) const LEGACY_MANAGEMENT_URL_HEADER: &str = "x-server-management-url";
pub(crate) const LEGACY_STORAGE_URL_HEADER: &str = "x-storage-url";

/// The service type for compute endpoints.
pub const COMPUTE_SERVICE: &str = "compute";
/// The service type for object storage endpoints.
pub const OBJECT_STORE_SERVICE: &str = "object-store";

pub(crate) const DEFAULT_USER_AGENT: &str = concat!("stratus-rust/", env!("CARGO_PKG_VERSION"));
