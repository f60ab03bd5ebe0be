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

use std::collections::HashMap;
use std::fmt::{Debug, Formatter};

/// Maps a service type to its endpoint URL.
pub type ServiceUrls = HashMap<String, String>;

/// Maps a region name to the service endpoints it offers.
pub type RegionServiceUrls = HashMap<String, ServiceUrls>;

/// The result of a successful authentication.
///
/// A session is immutable once created. Re-authenticating produces a new
/// session that replaces the previous one as a whole.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionDetails {
    pub(crate) token: String,
    pub(crate) tenant_id: String,
    pub(crate) user_id: String,
    pub(crate) region_service_urls: RegionServiceUrls,
}

impl SessionDetails {
    /// Creates a new session.
    ///
    /// Applications rarely need this function, other than to test code that
    /// consumes sessions.
    pub fn new<T, U, V>(
        token: T,
        tenant_id: U,
        user_id: V,
        region_service_urls: RegionServiceUrls,
    ) -> Self
    where
        T: Into<String>,
        U: Into<String>,
        V: Into<String>,
    {
        Self {
            token: token.into(),
            tenant_id: tenant_id.into(),
            user_id: user_id.into(),
            region_service_urls,
        }
    }

    /// The session token sent with signed requests.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The id of the tenant the session is scoped to. Empty in legacy mode.
    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    /// The id of the authenticated user. Empty in legacy mode.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The service catalog, keyed by the region names advertised by the server.
    pub fn region_service_urls(&self) -> &RegionServiceUrls {
        &self.region_service_urls
    }
}

impl Debug for SessionDetails {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionDetails")
            .field("token", &"[censored]")
            .field("tenant_id", &self.tenant_id)
            .field("user_id", &self.user_id)
            .field("region_service_urls", &self.region_service_urls)
            .finish()
    }
}
