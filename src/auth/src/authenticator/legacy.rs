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

use super::{Authenticator, Result, map_send_error, to_credentials_error};
use crate::constants::*;
use crate::credentials::Credentials;
use crate::errors::non_retryable_from_str;
use crate::http::ReqwestClient;
use crate::session::{RegionServiceUrls, ServiceUrls, SessionDetails};
use http::HeaderMap;

/// Authenticates single-region deployments.
///
/// The token endpoint answers with headers only: the session token, the
/// management URL used for compute, and optionally a storage URL. All the
/// endpoints are published under the empty region name.
#[derive(Debug)]
pub(crate) struct Legacy {
    client: ReqwestClient,
}

impl Legacy {
    pub(crate) fn new(client: ReqwestClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Authenticator for Legacy {
    async fn auth(&self, credentials: &Credentials) -> Result<SessionDetails> {
        tracing::debug!(url = credentials.url(), "requesting legacy session");
        let response = self
            .client
            .request(http::Method::GET, credentials.url())
            .header(LEGACY_USER_HEADER, credentials.user())
            .header(LEGACY_KEY_HEADER, credentials.secrets())
            .send()
            .await
            .map_err(map_send_error)?;
        if !response.status().is_success() {
            return Err(to_credentials_error(response).await);
        }

        let headers = response.headers();
        let token = header(headers, AUTH_TOKEN_HEADER)?;
        let management = header(headers, LEGACY_MANAGEMENT_URL_HEADER)?;
        let storage = header(headers, LEGACY_STORAGE_URL_HEADER).unwrap_or_else(|_| {
            format!("{}/{OBJECT_STORE_SERVICE}", management.trim_end_matches('/'))
        });
        let services = ServiceUrls::from([
            (COMPUTE_SERVICE.to_string(), management),
            (OBJECT_STORE_SERVICE.to_string(), storage),
        ]);
        let region_service_urls = RegionServiceUrls::from([(String::new(), services)]);
        Ok(SessionDetails::new(token, "", "", region_service_urls))
    }
}

fn header(headers: &HeaderMap, name: &str) -> Result<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            non_retryable_from_str(format!("missing or invalid {name} header in response"))
        })
}
