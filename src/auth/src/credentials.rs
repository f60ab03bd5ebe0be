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

//! Credentials and authentication modes.
//!
//! [Credentials] are the long-lived inputs exchanged for a session token. They
//! are created once, typically at application startup, and never mutated.
//! [AuthMode] selects how the exchange happens.
//!
//! # Example
//! ```
//! # use stratus_auth::credentials::{AuthMode, Credentials};
//! let credentials = Credentials::new("https://identity.example.com/v2.0", "alice", "s3cr3t")
//!     .with_region("zone1.RegionOne")
//!     .with_tenant_name("project-a");
//! let mode: AuthMode = "userpass".parse().unwrap();
//! assert_eq!(mode, AuthMode::UserPass);
//! assert_eq!(credentials.region(), "zone1.RegionOne");
//! ```

use crate::build_errors::Error as BuilderError;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

type BuildResult<T> = std::result::Result<T, BuilderError>;

const URL_VARS: &[&str] = &["OS_AUTH_URL"];
const USER_VARS: &[&str] = &["OS_USERNAME", "NOVA_USERNAME", "OS_ACCESS_KEY", "NOVA_API_KEY"];
const SECRETS_VARS: &[&str] = &["OS_PASSWORD", "NOVA_PASSWORD", "OS_SECRET_KEY", "NOVA_API_KEY"];
const TENANT_VARS: &[&str] = &["OS_TENANT_NAME", "NOVA_PROJECT_ID"];
const REGION_VARS: &[&str] = &["OS_REGION_NAME", "NOVA_REGION"];

/// The inputs to exchange for a session.
///
/// The `user` and `secrets` fields hold a username and password in
/// [AuthMode::Legacy] and [AuthMode::UserPass], and an access key and secret
/// key in [AuthMode::KeyPair].
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    url: String,
    user: String,
    secrets: String,
    region: String,
    tenant_name: String,
}

impl Credentials {
    /// Creates credentials for the identity service at `url`.
    ///
    /// The region and tenant name are empty.
    pub fn new<U, N, S>(url: U, user: N, secrets: S) -> Self
    where
        U: Into<String>,
        N: Into<String>,
        S: Into<String>,
    {
        Self {
            url: url.into(),
            user: user.into(),
            secrets: secrets.into(),
            region: String::new(),
            tenant_name: String::new(),
        }
    }

    /// Sets the region used to resolve service endpoints.
    pub fn with_region<V: Into<String>>(mut self, v: V) -> Self {
        self.region = v.into();
        self
    }

    /// Sets the tenant (project) name sent to the identity service.
    pub fn with_tenant_name<V: Into<String>>(mut self, v: V) -> Self {
        self.tenant_name = v.into();
        self
    }

    /// Loads the credentials from the environment.
    ///
    /// Each field is read from the first non-empty variable in its list:
    ///
    /// | Field       | Variables                                                  |
    /// | ----------- | ---------------------------------------------------------- |
    /// | url         | `OS_AUTH_URL`                                              |
    /// | user        | `OS_USERNAME`, `NOVA_USERNAME`, `OS_ACCESS_KEY`, `NOVA_API_KEY` |
    /// | secrets     | `OS_PASSWORD`, `NOVA_PASSWORD`, `OS_SECRET_KEY`, `NOVA_API_KEY` |
    /// | tenant name | `OS_TENANT_NAME`, `NOVA_PROJECT_ID`                        |
    /// | region      | `OS_REGION_NAME`, `NOVA_REGION`                            |
    ///
    /// The tenant name and region default to empty strings. Returns an error
    /// naming the missing variables if the url, user, or secrets are not set.
    pub fn from_env() -> BuildResult<Self> {
        let url = first_env(URL_VARS);
        let user = first_env(USER_VARS);
        let secrets = first_env(SECRETS_VARS);
        let mut missing = Vec::new();
        if url.is_none() {
            missing.push(URL_VARS.join(" or "));
        }
        if user.is_none() {
            missing.push(USER_VARS.join(" or "));
        }
        if secrets.is_none() {
            missing.push(SECRETS_VARS.join(" or "));
        }
        match (url, user, secrets) {
            (Some(url), Some(user), Some(secrets)) => Ok(Self::new(url, user, secrets)
                .with_region(first_env(REGION_VARS).unwrap_or_default())
                .with_tenant_name(first_env(TENANT_VARS).unwrap_or_default())),
            _ => Err(BuilderError::loading(format!(
                "required environment variables not set: {}",
                missing.join(", ")
            ))),
        }
    }

    /// The URL of the identity service.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The username or access key.
    pub fn user(&self) -> &str {
        &self.user
    }

    /// The password or secret key.
    pub fn secrets(&self) -> &str {
        &self.secrets
    }

    /// The region used to resolve service endpoints.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// The tenant (project) name.
    pub fn tenant_name(&self) -> &str {
        &self.tenant_name
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("url", &self.url)
            .field("user", &self.user)
            .field("secrets", &"[censored]")
            .field("region", &self.region)
            .field("tenant_name", &self.tenant_name)
            .finish()
    }
}

fn first_env(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|v| !v.is_empty())
}

/// Selects the strategy used to exchange [Credentials] for a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum AuthMode {
    /// Single-region deployments using the legacy token endpoint.
    Legacy,
    /// Username and password against a multi-tenant identity service.
    #[default]
    UserPass,
    /// Access key and secret key against a multi-tenant identity service.
    KeyPair,
}

impl AuthMode {
    fn as_str(&self) -> &'static str {
        match self {
            AuthMode::Legacy => "legacy",
            AuthMode::UserPass => "userpass",
            AuthMode::KeyPair => "keypair",
        }
    }
}

impl Display for AuthMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthMode {
    type Err = BuilderError;

    fn from_str(s: &str) -> BuildResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "legacy" => Ok(AuthMode::Legacy),
            "userpass" => Ok(AuthMode::UserPass),
            "keypair" => Ok(AuthMode::KeyPair),
            _ => Err(BuilderError::unknown_mode(s)),
        }
    }
}
