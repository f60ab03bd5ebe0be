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

//! Unsigned access to public endpoints.

use crate::build_errors::Error as BuilderError;
use crate::constants::DEFAULT_USER_AGENT;
use crate::http::ReqwestClient;
use gax::Result;
use gax::response::Response;

/// Sends requests without credentials to a fixed base URL.
///
/// Some deployments publish resources, such as public containers in object
/// storage, that need no session. Responses are classified exactly like the
/// ones returned by [Client::send][crate::client::Client::send].
///
/// # Example
/// ```no_run
/// # use stratus_auth::http::NoBody;
/// # use stratus_auth::public::PublicClient;
/// # tokio_test::block_on(async {
/// let client = PublicClient::new("https://storage.example.com/v1/public")?;
/// let listing = client
///     .send::<NoBody, serde_json::Value>(http::Method::GET, &["container"], None)
///     .await?;
/// println!("{:?}", listing.body());
/// # Ok::<(), anyhow::Error>(())
/// # });
/// ```
#[derive(Clone, Debug)]
pub struct PublicClient {
    base_url: String,
    http: ReqwestClient,
}

impl PublicClient {
    /// Creates a client for the endpoints under `base_url`.
    pub fn new<V: Into<String>>(base_url: V) -> std::result::Result<Self, BuilderError> {
        Self::with_http_client(base_url, reqwest::Client::new())
    }

    /// Creates a client for the endpoints under `base_url`, using `client` for
    /// all requests.
    pub fn with_http_client<V: Into<String>>(
        base_url: V,
        client: reqwest::Client,
    ) -> std::result::Result<Self, BuilderError> {
        let base_url = base_url.into();
        url::Url::parse(&base_url).map_err(BuilderError::parsing)?;
        Ok(Self {
            base_url,
            http: ReqwestClient::new(client, DEFAULT_USER_AGENT)?,
        })
    }

    /// The base URL of all requests.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends an unsigned request to the base URL with `parts` appended.
    pub async fn send<I, O>(
        &self,
        method: http::Method,
        parts: &[&str],
        body: Option<&I>,
    ) -> Result<Response<O>>
    where
        I: serde::ser::Serialize + ?Sized,
        O: serde::de::DeserializeOwned + Default,
    {
        let url = crate::region::make_url(&self.base_url, parts);
        let builder = self.http.request(method, &url);
        self.http.execute(builder, body, None).await
    }
}
