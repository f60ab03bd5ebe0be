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

//! The authenticating client.
//!
//! A [Client] exchanges its [Credentials] for a session at most once at a
//! time, caches the session, and uses it to resolve service endpoints and to
//! sign requests.
//!
//! # Example
//! ```no_run
//! # use stratus_auth::client::Client;
//! # use stratus_auth::credentials::{AuthMode, Credentials};
//! # tokio_test::block_on(async {
//! let client = Client::builder(Credentials::from_env()?)
//!     .with_auth_mode(AuthMode::UserPass)
//!     .with_required_service_types(["compute", "object-store"])
//!     .build()?;
//! client.authenticate().await?;
//! let url = client.make_service_url("compute", &["servers"])?;
//! println!("listing servers at {url}");
//! # Ok::<(), anyhow::Error>(())
//! # });
//! ```

use crate::authenticator::{self, Authenticator};
use crate::build_errors::Error as BuilderError;
use crate::constants::{DEFAULT_AUTH_TIMEOUT, DEFAULT_USER_AGENT};
use crate::credentials::{AuthMode, Credentials};
use crate::http::ReqwestClient;
use crate::session::SessionDetails;
use gax::Result;
use gax::error::{EndpointError, Error};
use gax::response::Response;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard, watch};

type BuildResult<T> = std::result::Result<T, BuilderError>;

/// The states of the authentication state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum AuthStatus {
    /// No exchange has completed, or the last session was rejected.
    #[default]
    Unauthenticated,
    /// An exchange is in flight.
    Authenticating,
    /// The last exchange succeeded.
    Authenticated,
    /// The last exchange failed. The next call to
    /// [authenticate][Client::authenticate] tries again.
    Failed,
}

#[derive(Clone, Debug, Default)]
struct AuthState {
    status: AuthStatus,
    session: Option<Arc<SessionDetails>>,
}

/// Configures and creates a [Client].
pub struct Builder {
    credentials: Credentials,
    mode: AuthMode,
    http_client: Option<reqwest::Client>,
    timeout: Duration,
    required_service_types: BTreeSet<String>,
    user_agent: Option<String>,
    authenticator: Option<Arc<dyn Authenticator>>,
}

impl Builder {
    fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            mode: AuthMode::default(),
            http_client: None,
            timeout: DEFAULT_AUTH_TIMEOUT,
            required_service_types: BTreeSet::new(),
            user_agent: None,
            authenticator: None,
        }
    }

    /// Sets the strategy used to exchange the credentials.
    ///
    /// The default is [AuthMode::UserPass].
    pub fn with_auth_mode(mut self, v: AuthMode) -> Self {
        self.mode = v;
        self
    }

    /// Sets the HTTP client used for all requests, including authentication.
    pub fn with_http_client(mut self, v: reqwest::Client) -> Self {
        self.http_client = Some(v);
        self
    }

    /// Sets how long [Client::authenticate] waits for an exchange.
    ///
    /// Timing out does not cancel the exchange. The default is
    /// [DEFAULT_AUTH_TIMEOUT].
    pub fn with_auth_timeout(mut self, v: Duration) -> Self {
        self.timeout = v;
        self
    }

    /// Sets the service types the configured region must offer.
    pub fn with_required_service_types<I, S>(mut self, v: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_service_types = v.into_iter().map(Into::into).collect();
        self
    }

    /// Overrides the `User-Agent` header sent with every request.
    pub fn with_user_agent<V: Into<String>>(mut self, v: V) -> Self {
        self.user_agent = Some(v.into());
        self
    }

    #[cfg(test)]
    pub(crate) fn with_authenticator(mut self, v: Arc<dyn Authenticator>) -> Self {
        self.authenticator = Some(v);
        self
    }

    /// Creates the client.
    ///
    /// Fails if the identity service URL is missing or cannot be parsed, or if
    /// the `User-Agent` is not a valid header value. No network requests are
    /// made until the client is used.
    pub fn build(self) -> BuildResult<Client> {
        if self.credentials.url().is_empty() {
            return Err(BuilderError::missing_field("url"));
        }
        url::Url::parse(self.credentials.url()).map_err(BuilderError::parsing)?;
        let user_agent = self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
        let http = ReqwestClient::new(self.http_client.unwrap_or_default(), user_agent)?;
        let authenticator = self
            .authenticator
            .unwrap_or_else(|| authenticator::for_mode(self.mode, http.clone()));
        let (tx_state, rx_state) = watch::channel(AuthState::default());
        let (tx_required, rx_required) = watch::channel(self.required_service_types);
        let inner = ClientInner {
            credentials: self.credentials,
            mode: self.mode,
            authenticator,
            timeout: self.timeout,
            http,
            guard: Arc::new(Mutex::new(())),
            tx_state,
            rx_state,
            tx_required,
            rx_required,
        };
        Ok(Client {
            inner: Arc::new(inner),
        })
    }
}

/// An authenticating client.
///
/// Cloning a client is cheap, all the clones share the same session.
#[derive(Clone, Debug)]
pub struct Client {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    credentials: Credentials,
    mode: AuthMode,
    authenticator: Arc<dyn Authenticator>,
    timeout: Duration,
    http: ReqwestClient,
    // Held by the in-flight exchange, even after its caller timed out.
    guard: Arc<Mutex<()>>,
    tx_state: watch::Sender<AuthState>,
    rx_state: watch::Receiver<AuthState>,
    tx_required: watch::Sender<BTreeSet<String>>,
    rx_required: watch::Receiver<BTreeSet<String>>,
}

impl Client {
    /// Returns a builder for a client using `credentials`.
    pub fn builder(credentials: Credentials) -> Builder {
        Builder::new(credentials)
    }

    /// The credentials exchanged by this client.
    pub fn credentials(&self) -> &Credentials {
        &self.inner.credentials
    }

    /// The authentication strategy used by this client.
    pub fn auth_mode(&self) -> AuthMode {
        self.inner.mode
    }

    /// Ensures the client holds a valid session.
    ///
    /// Returns immediately if the client is already authenticated. Otherwise
    /// waits for any in-flight exchange, and starts a new exchange unless the
    /// in-flight one succeeded. Only one exchange runs at a time, no matter
    /// how many callers are waiting.
    ///
    /// The wait for the exchange is bounded by the authentication timeout.
    /// On timeout this returns an error for which [Error::is_timeout] is
    /// `true`, but the exchange keeps running and publishes its result when
    /// it completes. A later call may then succeed without a new exchange.
    pub async fn authenticate(&self) -> Result<()> {
        if self.is_authenticated() {
            return Ok(());
        }
        let guard = self.inner.guard.clone().lock_owned().await;
        if self.is_authenticated() {
            return Ok(());
        }
        self.inner
            .tx_state
            .send_modify(|s| s.status = AuthStatus::Authenticating);

        let inner = self.inner.clone();
        let work = async move {
            let _exchange = InFlightExchange {
                inner: inner.clone(),
                _guard: guard,
            };
            tracing::debug!(mode = %inner.mode, "starting credentials exchange");
            match inner.authenticator.auth(&inner.credentials).await {
                Ok(session) => {
                    inner.tx_state.send_replace(AuthState {
                        status: AuthStatus::Authenticated,
                        session: Some(Arc::new(session)),
                    });
                    tracing::debug!(mode = %inner.mode, "credentials exchange completed");
                    Ok(())
                }
                Err(e) => {
                    // The previous session, if any, stays in place.
                    inner
                        .tx_state
                        .send_modify(|s| s.status = AuthStatus::Failed);
                    tracing::debug!(mode = %inner.mode, error = %e, "credentials exchange failed");
                    Err(e)
                }
            }
        };

        match gax::timeout::run_with_timeout(self.inner.timeout, work).await {
            Some(result) => result.map_err(Error::authentication),
            None => {
                tracing::warn!(
                    timeout = ?self.inner.timeout,
                    "timed out waiting for the credentials exchange, it continues in the background"
                );
                Err(Error::timeout(format!(
                    "the credentials exchange did not complete within {:?}",
                    self.inner.timeout
                )))
            }
        }
    }

    /// Returns `true` if the last exchange succeeded and its session was not
    /// rejected since.
    pub fn is_authenticated(&self) -> bool {
        self.status() == AuthStatus::Authenticated
    }

    /// The current state of the authentication state machine.
    pub fn status(&self) -> AuthStatus {
        self.inner.rx_state.borrow().status
    }

    /// The cached session, if any exchange ever succeeded.
    ///
    /// The session is an immutable snapshot. Re-authenticating publishes a
    /// new session, it never modifies a published one.
    pub fn session(&self) -> Option<Arc<SessionDetails>> {
        self.inner.rx_state.borrow().session.clone()
    }

    /// The session token, empty until authenticated.
    pub fn token(&self) -> String {
        self.session()
            .map(|s| s.token().to_string())
            .unwrap_or_default()
    }

    /// The tenant id of the session, empty until authenticated.
    pub fn tenant_id(&self) -> String {
        self.session()
            .map(|s| s.tenant_id().to_string())
            .unwrap_or_default()
    }

    /// The user id of the session, empty until authenticated.
    pub fn user_id(&self) -> String {
        self.session()
            .map(|s| s.user_id().to_string())
            .unwrap_or_default()
    }

    /// Sets the service types the configured region must offer.
    ///
    /// Set these before resolving endpoints. Calls to
    /// [make_service_url][Self::make_service_url] racing with this function
    /// use either the previous or the new set.
    pub fn set_required_service_types<I, S>(&self, v: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner
            .tx_required
            .send_replace(v.into_iter().map(Into::into).collect());
    }

    /// The service types the configured region must offer.
    pub fn required_service_types(&self) -> BTreeSet<String> {
        self.inner.rx_required.borrow().clone()
    }

    /// Returns the endpoint of `service_type` in the configured region, with
    /// `parts` appended as path segments.
    ///
    /// This never makes network requests. It fails with
    /// [EndpointError::NotAuthenticated] if no session was ever cached.
    pub fn make_service_url(&self, service_type: &str, parts: &[&str]) -> Result<String> {
        let session = self
            .session()
            .ok_or_else(|| Error::endpoint(EndpointError::NotAuthenticated))?;
        let required = self.inner.rx_required.borrow();
        let base = crate::region::resolve(
            session.region_service_urls(),
            self.inner.credentials.region(),
            &required,
            service_type,
        )
        .map_err(Error::endpoint)?;
        Ok(crate::region::make_url(base, parts))
    }

    /// Sends a request signed with the session token.
    ///
    /// Authenticates first if needed. If the service rejects the token with
    /// `401 Unauthorized`, the client re-authenticates and retries the request
    /// once. Successful responses are deserialized from JSON, use
    /// [serde_json::Value] to receive arbitrary payloads and
    /// [NoBody][crate::http::NoBody] for requests without a body.
    pub async fn send<I, O>(
        &self,
        method: http::Method,
        url: &str,
        body: Option<&I>,
    ) -> Result<Response<O>>
    where
        I: serde::ser::Serialize + ?Sized,
        O: serde::de::DeserializeOwned + Default,
    {
        let session = self.signing_session().await?;
        let builder = self.inner.http.request(method.clone(), url);
        match self
            .inner
            .http
            .execute(builder, body, Some(session.token()))
            .await
        {
            Err(e) if e.http_status_code() == Some(401) => {
                tracing::debug!(%method, url, "session rejected, re-authenticating");
                self.invalidate(&session).await;
                let session = self.signing_session().await?;
                let builder = self.inner.http.request(method, url);
                self.inner
                    .http
                    .execute(builder, body, Some(session.token()))
                    .await
            }
            r => r,
        }
    }

    async fn signing_session(&self) -> Result<Arc<SessionDetails>> {
        self.authenticate().await?;
        self.session()
            .ok_or_else(|| Error::endpoint(EndpointError::NotAuthenticated))
    }

    /// Marks `session` as rejected, unless it was already replaced.
    async fn invalidate(&self, session: &Arc<SessionDetails>) {
        let _guard = self.inner.guard.lock().await;
        self.inner.tx_state.send_if_modified(|s| match &s.session {
            Some(current)
                if s.status == AuthStatus::Authenticated && Arc::ptr_eq(current, session) =>
            {
                s.status = AuthStatus::Unauthenticated;
                true
            }
            _ => false,
        });
    }
}

/// Owns the authentication guard while an exchange runs.
///
/// Dropping it with the status still `Authenticating` means the exchange never
/// published a result, as when the strategy panics. The status becomes
/// `Failed` before the guard is released.
struct InFlightExchange {
    inner: Arc<ClientInner>,
    _guard: OwnedMutexGuard<()>,
}

impl Drop for InFlightExchange {
    fn drop(&mut self) {
        let abandoned = self.inner.tx_state.send_if_modified(|s| {
            if s.status != AuthStatus::Authenticating {
                return false;
            }
            s.status = AuthStatus::Failed;
            true
        });
        if abandoned {
            tracing::warn!(mode = %self.inner.mode, "credentials exchange ended without a result");
        }
    }
}
