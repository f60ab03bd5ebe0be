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

#[cfg(test)]
mod tests {
    use httptest::{Expectation, Server, cycle, matchers::*, responders::*};
    use serde_json::{Value, json};
    use stratus_auth::client::{AuthStatus, Client};
    use stratus_auth::credentials::{AuthMode, Credentials};
    use stratus_auth::http::NoBody;

    type TestResult = anyhow::Result<()>;

    fn catalog(server: &Server, token: &str) -> Value {
        json!({
            "access": {
                "token": {"id": token, "tenant": {"id": "tenant-123"}},
                "user": {"id": "user-456"},
                "serviceCatalog": [
                    {
                        "type": "compute",
                        "name": "nova",
                        "endpoints": [
                            {"region": "RegionOne", "publicURL": server.url_str("/compute/v2")},
                        ]
                    },
                    {
                        "type": "object-store",
                        "name": "swift",
                        "endpoints": [
                            {"region": "RegionOne", "publicURL": server.url_str("/storage/v1")},
                            {"region": "RegionTwo", "publicURL": server.url_str("/storage-two/v1")},
                        ]
                    },
                ]
            }
        })
    }

    fn userpass_client(server: &Server, region: &str) -> anyhow::Result<Client> {
        let credentials = Credentials::new(server.url_str("/identity/v2.0"), "alice", "s3cr3t")
            .with_tenant_name("tenant-a")
            .with_region(region);
        let client = Client::builder(credentials)
            .with_auth_mode(AuthMode::UserPass)
            .with_required_service_types(["compute", "object-store"])
            .build()?;
        Ok(client)
    }

    #[tokio::test]
    async fn userpass_end_to_end() -> TestResult {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("POST", "/identity/v2.0/tokens"),
                request::headers(contains(key("user-agent"))),
            ])
            .times(1)
            .respond_with(json_encoded(catalog(&server, "token-1"))),
        );
        server.expect(
            Expectation::matching(all_of![
                request::method_path("GET", "/compute/v2/servers"),
                request::headers(contains(("x-auth-token", "token-1"))),
            ])
            .respond_with(json_encoded(json!({"servers": [{"id": "server-1"}]}))),
        );

        // The zone prefix is removed to match the catalog.
        let client = userpass_client(&server, "zone1.RegionOne")?;
        client.authenticate().await?;
        assert_eq!(client.status(), AuthStatus::Authenticated);
        assert_eq!(client.token(), "token-1");
        assert_eq!(client.tenant_id(), "tenant-123");
        assert_eq!(client.user_id(), "user-456");

        let url = client.make_service_url("compute", &["servers"])?;
        assert_eq!(url, server.url_str("/compute/v2/servers"));
        let response = client
            .send::<NoBody, Value>(http::Method::GET, &url, None)
            .await?;
        assert_eq!(
            response.body(),
            &json!({"servers": [{"id": "server-1"}]})
        );
        Ok(())
    }

    #[tokio::test]
    async fn send_authenticates_on_demand() -> TestResult {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("POST", "/identity/v2.0/tokens"))
                .times(1)
                .respond_with(json_encoded(catalog(&server, "token-1"))),
        );
        server.expect(
            Expectation::matching(all_of![
                request::method_path("PUT", "/storage/v1/container"),
                request::headers(contains(("x-auth-token", "token-1"))),
            ])
            .respond_with(status_code(201)),
        );

        let client = userpass_client(&server, "RegionOne")?;
        let response = client
            .send::<NoBody, Value>(
                http::Method::PUT,
                &server.url_str("/storage/v1/container"),
                None,
            )
            .await?;
        assert_eq!(response.status(), http::StatusCode::CREATED);
        assert!(client.is_authenticated());
        Ok(())
    }

    #[tokio::test]
    async fn reauthenticates_on_unauthorized() -> TestResult {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("POST", "/identity/v2.0/tokens"))
                .times(2)
                .respond_with(cycle![
                    json_encoded(catalog(&server, "token-1")),
                    json_encoded(catalog(&server, "token-2")),
                ]),
        );
        server.expect(
            Expectation::matching(all_of![
                request::method_path("GET", "/compute/v2/servers"),
                request::headers(contains(("x-auth-token", "token-1"))),
            ])
            .times(1)
            .respond_with(status_code(401)),
        );
        server.expect(
            Expectation::matching(all_of![
                request::method_path("GET", "/compute/v2/servers"),
                request::headers(contains(("x-auth-token", "token-2"))),
            ])
            .times(1)
            .respond_with(json_encoded(json!({"servers": []}))),
        );

        let client = userpass_client(&server, "RegionOne")?;
        client.authenticate().await?;
        let url = client.make_service_url("compute", &["servers"])?;
        let response = client
            .send::<NoBody, Value>(http::Method::GET, &url, None)
            .await?;
        assert_eq!(response.body(), &json!({"servers": []}));
        assert_eq!(client.token(), "token-2");
        Ok(())
    }

    #[tokio::test]
    async fn service_errors_are_returned() -> TestResult {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("POST", "/identity/v2.0/tokens"))
                .respond_with(json_encoded(catalog(&server, "token-1"))),
        );
        server.expect(
            Expectation::matching(request::method_path("GET", "/compute/v2/servers/missing"))
                .respond_with(status_code(404).body(r#"{"itemNotFound": {"code": 404}}"#)),
        );

        let client = userpass_client(&server, "RegionOne")?;
        let url = client.make_service_url("compute", &["servers", "missing"]);
        assert!(url.is_err(), "{url:?}");
        client.authenticate().await?;
        let url = client.make_service_url("compute", &["servers", "missing"])?;
        let err = client
            .send::<NoBody, Value>(http::Method::GET, &url, None)
            .await
            .unwrap_err();
        assert_eq!(err.http_status_code(), Some(404));
        assert_eq!(
            err.http_payload(),
            Some(bytes::Bytes::from_static(br#"{"itemNotFound": {"code": 404}}"#)).as_ref()
        );
        Ok(())
    }

    #[tokio::test]
    async fn missing_services_suggest_regions() -> TestResult {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("POST", "/identity/v2.0/tokens"))
                .respond_with(json_encoded(catalog(&server, "token-1"))),
        );

        let client = userpass_client(&server, "RegionTwo")?;
        client.authenticate().await?;
        let err = client.make_service_url("object-store", &[]).unwrap_err();
        assert!(err.is_endpoint(), "{err:?}");
        let got = err.to_string();
        assert!(got.contains("missing: compute"), "{got}");
        assert!(got.contains("suitable instead: RegionOne"), "{got}");

        client.set_required_service_types(["object-store"]);
        assert_eq!(
            client.make_service_url("object-store", &[])?,
            server.url_str("/storage-two/v1")
        );
        Ok(())
    }

    #[tokio::test]
    async fn rejected_credentials() -> TestResult {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("POST", "/identity/v2.0/tokens"))
                .times(2)
                .respond_with(status_code(401).body("invalid credentials")),
        );

        let client = userpass_client(&server, "RegionOne")?;
        let err = client.authenticate().await.unwrap_err();
        assert!(err.is_authentication(), "{err:?}");
        assert_eq!(client.status(), AuthStatus::Failed);
        assert_eq!(client.token(), "");

        // A failed exchange is not terminal, sending a request tries again.
        let err = client
            .send::<NoBody, Value>(http::Method::GET, &server.url_str("/compute/v2"), None)
            .await
            .unwrap_err();
        assert!(err.is_authentication(), "{err:?}");
        Ok(())
    }

    #[tokio::test]
    async fn legacy_end_to_end() -> TestResult {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("GET", "/auth/v1.0"),
                request::headers(contains(("x-auth-user", "alice"))),
                request::headers(contains(("x-auth-key", "api-key"))),
            ])
            .respond_with(
                status_code(204)
                    .insert_header("X-Auth-Token", "legacy-token")
                    .insert_header("X-Server-Management-Url", server.url_str("/v1.1/12345")),
            ),
        );
        server.expect(
            Expectation::matching(all_of![
                request::method_path("DELETE", "/v1.1/12345/servers/42"),
                request::headers(contains(("x-auth-token", "legacy-token"))),
            ])
            .respond_with(status_code(204)),
        );

        let credentials = Credentials::new(server.url_str("/auth/v1.0"), "alice", "api-key");
        let client = Client::builder(credentials)
            .with_auth_mode(AuthMode::Legacy)
            .with_required_service_types(["compute", "object-store"])
            .with_user_agent("my-app/1.0")
            .build()?;
        client.authenticate().await?;
        assert_eq!(client.tenant_id(), "");
        assert_eq!(
            client.make_service_url("object-store", &[])?,
            server.url_str("/v1.1/12345/object-store")
        );

        let url = client.make_service_url("compute", &["servers", "42"])?;
        let response = client
            .send::<NoBody, Value>(http::Method::DELETE, &url, None)
            .await?;
        assert_eq!(response.status(), http::StatusCode::NO_CONTENT);
        assert_eq!(response.body(), &Value::Null);
        Ok(())
    }
}
