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

//! Strategies for multi-tenant identity services.
//!
//! Both strategies post to the `tokens` resource of the identity service and
//! receive the same response: a token scoped to the tenant, the user id, and
//! a service catalog listing the endpoints of every service in every region.

use super::{Authenticator, Result, map_send_error, to_credentials_error};
use crate::credentials::Credentials;
use crate::errors::{CredentialsError, non_retryable_from_str};
use crate::http::ReqwestClient;
use crate::session::{RegionServiceUrls, SessionDetails};
use serde::{Deserialize, Serialize};

/// Authenticates with a username and password.
#[derive(Debug)]
pub(crate) struct UserPass {
    client: ReqwestClient,
}

impl UserPass {
    pub(crate) fn new(client: ReqwestClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Authenticator for UserPass {
    async fn auth(&self, credentials: &Credentials) -> Result<SessionDetails> {
        let request = AuthRequest {
            auth: AuthBody {
                password_credentials: Some(PasswordCredentials {
                    username: credentials.user(),
                    password: credentials.secrets(),
                }),
                api_access_key_credentials: None,
                tenant_name: credentials.tenant_name(),
            },
        };
        exchange(&self.client, credentials, &request).await
    }
}

/// Authenticates with an access key and a secret key.
#[derive(Debug)]
pub(crate) struct KeyPair {
    client: ReqwestClient,
}

impl KeyPair {
    pub(crate) fn new(client: ReqwestClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Authenticator for KeyPair {
    async fn auth(&self, credentials: &Credentials) -> Result<SessionDetails> {
        let request = AuthRequest {
            auth: AuthBody {
                password_credentials: None,
                api_access_key_credentials: Some(KeyPairCredentials {
                    access_key: credentials.user(),
                    secret_key: credentials.secrets(),
                }),
                tenant_name: credentials.tenant_name(),
            },
        };
        exchange(&self.client, credentials, &request).await
    }
}

async fn exchange(
    client: &ReqwestClient,
    credentials: &Credentials,
    request: &AuthRequest<'_>,
) -> Result<SessionDetails> {
    let url = crate::region::make_url(credentials.url(), &["tokens"]);
    tracing::debug!(url = %url, "requesting session from identity service");
    let response = client
        .request(http::Method::POST, &url)
        .json(request)
        .send()
        .await
        .map_err(map_send_error)?;
    if !response.status().is_success() {
        return Err(to_credentials_error(response).await);
    }
    let response = response.json::<AuthResponse>().await.map_err(|e| {
        let retryable = !e.is_decode();
        CredentialsError::new(retryable, e)
    })?;
    response.into_session()
}

#[derive(Debug, Serialize)]
struct AuthRequest<'a> {
    auth: AuthBody<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    password_credentials: Option<PasswordCredentials<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_access_key_credentials: Option<KeyPairCredentials<'a>>,
    tenant_name: &'a str,
}

#[derive(Debug, Serialize)]
struct PasswordCredentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct KeyPairCredentials<'a> {
    access_key: &'a str,
    secret_key: &'a str,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    access: Access,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Access {
    token: Token,
    #[serde(default)]
    user: Option<User>,
    #[serde(default)]
    service_catalog: Vec<Service>,
}

#[derive(Debug, Deserialize)]
struct Token {
    #[serde(default)]
    id: String,
    #[serde(default)]
    tenant: Option<Tenant>,
}

#[derive(Debug, Deserialize)]
struct Tenant {
    #[serde(default)]
    id: String,
}

#[derive(Debug, Deserialize)]
struct User {
    #[serde(default)]
    id: String,
}

#[derive(Debug, Deserialize)]
struct Service {
    #[serde(rename = "type")]
    service_type: String,
    #[serde(default)]
    endpoints: Vec<Endpoint>,
}

#[derive(Debug, Deserialize)]
struct Endpoint {
    #[serde(default)]
    region: String,
    #[serde(rename = "publicURL")]
    public_url: String,
}

impl AuthResponse {
    fn into_session(self) -> Result<SessionDetails> {
        let access = self.access;
        if access.token.id.is_empty() {
            return Err(non_retryable_from_str(
                "the identity service response does not include a token",
            ));
        }
        let mut region_service_urls = RegionServiceUrls::new();
        for service in access.service_catalog {
            for endpoint in service.endpoints {
                region_service_urls
                    .entry(endpoint.region)
                    .or_default()
                    .insert(service.service_type.clone(), endpoint.public_url);
            }
        }
        Ok(SessionDetails::new(
            access.token.id,
            access.token.tenant.map(|t| t.id).unwrap_or_default(),
            access.user.map(|u| u.id).unwrap_or_default(),
            region_service_urls,
        ))
    }
}
