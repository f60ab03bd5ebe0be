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

//! Sends HTTP requests and classifies their responses.
//!
//! Signed requests are issued through [Client::send][crate::client::Client::send],
//! unsigned requests through [PublicClient::send][crate::public::PublicClient::send].
//! Both deserialize successful responses as JSON, and turn any other response
//! into an error carrying the status code, headers, and raw payload.

use crate::build_errors::Error as BuilderError;
use gax::Result;
use gax::error::Error;
use gax::response::{Parts, Response};
use http::HeaderValue;

/// Use as the request body type for requests without a body.
#[derive(Clone, Copy, Debug, serde::Serialize)]
pub struct NoBody;

#[derive(Clone, Debug)]
pub(crate) struct ReqwestClient {
    inner: reqwest::Client,
    user_agent: HeaderValue,
}

impl ReqwestClient {
    pub(crate) fn new(
        inner: reqwest::Client,
        user_agent: &str,
    ) -> std::result::Result<Self, BuilderError> {
        let user_agent = HeaderValue::from_str(user_agent).map_err(BuilderError::parsing)?;
        Ok(Self { inner, user_agent })
    }

    /// Starts a request with the common headers.
    pub(crate) fn request(&self, method: http::Method, url: &str) -> reqwest::RequestBuilder {
        self.inner
            .request(method, url)
            .header(http::header::USER_AGENT, self.user_agent.clone())
    }

    /// Sends a request, optionally signed with `token`.
    pub(crate) async fn execute<I, O>(
        &self,
        mut builder: reqwest::RequestBuilder,
        body: Option<&I>,
        token: Option<&str>,
    ) -> Result<Response<O>>
    where
        I: serde::ser::Serialize + ?Sized,
        O: serde::de::DeserializeOwned + Default,
    {
        if let Some(body) = body {
            builder = builder.json(body);
        }
        if let Some(token) = token {
            let value = HeaderValue::from_str(token).map_err(Error::ser)?;
            builder = builder.header(crate::constants::AUTH_TOKEN_HEADER, value);
        }
        let response = builder.send().await.map_err(map_send_error)?;
        if !response.status().is_success() {
            return to_http_error(response).await;
        }
        to_http_response(response).await
    }
}

fn map_send_error(err: reqwest::Error) -> Error {
    match err {
        e if e.is_timeout() => Error::timeout(e),
        e if e.is_builder() => Error::ser(e),
        e => Error::io(e),
    }
}

pub(crate) async fn to_http_error<O>(response: reqwest::Response) -> Result<O> {
    let status_code = response.status().as_u16();
    let response = http::Response::from(response);
    let (parts, body) = response.into_parts();

    let body = http_body_util::BodyExt::collect(body)
        .await
        .map_err(Error::io)?
        .to_bytes();
    Err(Error::http(status_code, parts.headers, body))
}

async fn to_http_response<O: serde::de::DeserializeOwned + Default>(
    response: reqwest::Response,
) -> Result<Response<O>> {
    let status = response.status();
    let response = http::Response::from(response);
    let (parts, body) = response.into_parts();

    let body = http_body_util::BodyExt::collect(body)
        .await
        .map_err(Error::io)?;

    // Many endpoints answer with an empty body, most notably on 204 No Content.
    let response = match body.to_bytes() {
        content if content.is_empty() => O::default(),
        content => serde_json::from_slice::<O>(&content).map_err(Error::deser)?,
    };

    Ok(Response::from_parts(
        Parts::new().set_status(status).set_headers(parts.headers),
        response,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{HeaderMap, StatusCode};
    use httptest::{Expectation, Server, matchers::*, responders::*};
    use serde_json::{Value, json};
    use test_case::test_case;

    type TestResult = anyhow::Result<()>;

    fn test_client() -> anyhow::Result<ReqwestClient> {
        Ok(ReqwestClient::new(reqwest::Client::new(), "test-agent/1.0")?)
    }

    fn resp_from_code_content(
        code: StatusCode,
        content: &str,
    ) -> http::Result<reqwest::Response> {
        let http_resp = http::Response::builder()
            .header("Content-Type", "application/json")
            .status(code)
            .body(content.to_string())?;
        Ok(http_resp.into())
    }

    #[tokio::test]
    async fn http_error_bytes() -> TestResult {
        let response = resp_from_code_content(StatusCode::BAD_REQUEST, r#"{"error": "bad"}"#)?;
        let err = to_http_error::<()>(response).await.unwrap_err();
        assert!(err.is_transport(), "{err:?}");
        assert_eq!(err.http_status_code(), Some(400));
        let mut want = HeaderMap::new();
        want.insert("content-type", HeaderValue::from_static("application/json"));
        assert_eq!(err.http_headers(), Some(&want));
        assert_eq!(
            err.http_payload(),
            Some(bytes::Bytes::from(r#"{"error": "bad"}"#)).as_ref()
        );
        Ok(())
    }

    #[tokio::test]
    #[test_case(StatusCode::OK, "{}"; "200 with empty object")]
    #[test_case(StatusCode::NO_CONTENT, ""; "204 with empty content")]
    #[test_case(StatusCode::ACCEPTED, ""; "202 with empty content")]
    async fn empty_content(code: StatusCode, content: &str) -> TestResult {
        let response = resp_from_code_content(code, content)?;
        let response = to_http_response::<Value>(response).await?;
        assert_eq!(response.status(), code);
        assert!(
            matches!(response.body(), Value::Null) || response.body() == &json!({}),
            "{response:?}"
        );
        Ok(())
    }

    #[tokio::test]
    async fn bad_json() -> TestResult {
        let response = resp_from_code_content(StatusCode::OK, "not json")?;
        let err = to_http_response::<Value>(response).await.unwrap_err();
        assert!(err.is_deserialization(), "{err:?}");
        Ok(())
    }

    #[tokio::test]
    async fn execute_signed() -> TestResult {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("POST", "/servers"),
                request::headers(contains(("x-auth-token", "test-token"))),
                request::headers(contains(("user-agent", "test-agent/1.0"))),
                request::body(json_decoded(eq(json!({"name": "vm-1"})))),
            ])
            .respond_with(json_encoded(json!({"id": "server-123"}))),
        );

        let client = test_client()?;
        let builder = client.request(http::Method::POST, &server.url_str("/servers"));
        let response = client
            .execute::<Value, Value>(builder, Some(&json!({"name": "vm-1"})), Some("test-token"))
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body(), &json!({"id": "server-123"}));
        Ok(())
    }

    #[tokio::test]
    async fn execute_unsigned_error() -> TestResult {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("GET", "/missing"),
                request::headers(not(contains(key("x-auth-token")))),
            ])
            .respond_with(status_code(404).body("not here")),
        );

        let client = test_client()?;
        let builder = client.request(http::Method::GET, &server.url_str("/missing"));
        let err = client
            .execute::<NoBody, Value>(builder, None, None)
            .await
            .unwrap_err();
        assert_eq!(err.http_status_code(), Some(404));
        assert_eq!(
            err.http_payload(),
            Some(bytes::Bytes::from_static(b"not here")).as_ref()
        );
        Ok(())
    }

    #[test]
    fn bad_user_agent() {
        let err = ReqwestClient::new(reqwest::Client::new(), "bad\nagent").unwrap_err();
        assert!(err.is_parsing(), "{err:?}");
    }
}
