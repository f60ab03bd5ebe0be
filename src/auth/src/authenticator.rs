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

//! Strategies to exchange credentials for a session.

mod identity;
mod legacy;

use crate::credentials::{AuthMode, Credentials};
use crate::errors::CredentialsError;
use crate::http::ReqwestClient;
use crate::session::SessionDetails;
use std::sync::Arc;

pub(crate) type Result<T> = std::result::Result<T, CredentialsError>;

/// Exchanges [Credentials] for a [SessionDetails].
///
/// Implementations make a single attempt: they never retry, and they report
/// rejected credentials or malformed responses as errors, never as an empty
/// session.
#[async_trait::async_trait]
pub(crate) trait Authenticator: std::fmt::Debug + Send + Sync {
    async fn auth(&self, credentials: &Credentials) -> Result<SessionDetails>;
}

/// Returns the strategy for `mode`.
pub(crate) fn for_mode(mode: AuthMode, client: ReqwestClient) -> Arc<dyn Authenticator> {
    match mode {
        AuthMode::Legacy => Arc::new(legacy::Legacy::new(client)),
        AuthMode::UserPass => Arc::new(identity::UserPass::new(client)),
        AuthMode::KeyPair => Arc::new(identity::KeyPair::new(client)),
    }
}

// Failures to build the request will fail again, anything else may be
// a transient network problem.
fn map_send_error(e: reqwest::Error) -> CredentialsError {
    if e.is_builder() {
        return crate::errors::non_retryable(e);
    }
    crate::errors::retryable(e)
}

async fn to_credentials_error(response: reqwest::Response) -> CredentialsError {
    let status = response.status();
    match response.text().await {
        Ok(body) => crate::errors::from_http_status(status, body),
        Err(e) => CredentialsError::new(crate::errors::is_retryable(status), e),
    }
}
