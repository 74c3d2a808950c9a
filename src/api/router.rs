use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::admin;
use super::health;
use super::state::AppState;
use super::v1;

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Chat adapter API
        .nest("/v1", v1::create_v1_router())
        // Admin API
        .nest("/admin", admin::create_admin_router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::domain::taxonomy::{TaxonomyDocument, TaxonomyDocumentId};
    use crate::infrastructure::storage::StorageFactory;
    use axum::body::{to_bytes, Body};
    use axum::extract::ConnectInfo;
    use std::net::SocketAddr;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const ADMIN_TOKEN: &str = "admin";

    async fn app() -> Router {
        let state = crate::build_app_state(StorageFactory::in_memory(), &AppConfig::default());

        state
            .catalog
            .seed(vec![
                (
                    TaxonomyDocumentId::Programs,
                    TaxonomyDocument::from_value(json!({"list": ["cs"]})),
                ),
                (
                    TaxonomyDocumentId::Terms,
                    TaxonomyDocument::from_value(json!({"cs": ["term1"], "2023_cs": ["term0"]})),
                ),
            ])
            .await
            .unwrap();

        create_router(state)
    }

    fn request(method: &str, uri: &str, body: Option<Value>, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("x-admin-token", token);
        }

        match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, body)
    }

    fn new_file() -> Value {
        json!({
            "file_id": "tg-100",
            "display_name": "Networks Lab",
            "original_name": "lab.pdf",
            "program": "cs",
            "term": "term1",
            "subject": "Networks",
            "lecture": "L1"
        })
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let app = app().await;

        let (status, body) = send(&app, request("GET", "/health", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (status, body) = send(&app, request("GET", "/ready", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["checks"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_navigation_flow() {
        let app = app().await;

        let (status, screen) = send(&app, request("POST", "/v1/sessions/7/start", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(screen["state"], "select_program");
        assert_eq!(screen["keyboard"][0][0]["data"], "program:cs");

        let (_, screen) = send(
            &app,
            request(
                "POST",
                "/v1/sessions/7/actions",
                Some(json!({"data": "program:cs"})),
                None,
            ),
        )
        .await;
        assert_eq!(screen["state"], "select_term");
        assert_eq!(screen["keyboard"][0][0]["data"], "term:term0");
        assert_eq!(screen["keyboard"][1][0]["data"], "term:term1");

        let (_, session) = send(&app, request("GET", "/v1/sessions/7", None, None)).await;
        assert_eq!(session["path"]["program"], "cs");
    }

    #[tokio::test]
    async fn test_bad_action_body_uses_error_envelope() {
        let app = app().await;

        let (status, body) = send(
            &app,
            request("POST", "/v1/sessions/7/actions", Some(json!({"nope": 1})), None),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "json_parse_error");
    }

    #[tokio::test]
    async fn test_admin_requires_token() {
        let app = app().await;

        let (status, body) = send(&app, request("GET", "/admin/mailbox", None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["type"], "authentication_error");

        let (status, _) = send(&app, request("GET", "/admin/mailbox", None, Some(ADMIN_TOKEN))).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_admin_lockout() {
        let app = app().await;

        for _ in 0..3 {
            let (status, _) =
                send(&app, request("GET", "/admin/mailbox", None, Some("wrong"))).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
        }

        let (status, body) =
            send(&app, request("GET", "/admin/mailbox", None, Some(ADMIN_TOKEN))).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["error"]["type"], "rate_limit_error");
    }

    #[tokio::test]
    async fn test_admin_lockout_ignores_rotating_forwarded_for() {
        let app = app().await;
        let peer: SocketAddr = "192.0.2.10:50000".parse().unwrap();

        let mut statuses = Vec::new();
        for i in 0..5 {
            let mut request = request("GET", "/admin/mailbox", None, Some("wrong"));
            request
                .headers_mut()
                .insert("x-forwarded-for", format!("10.0.0.{}", i).parse().unwrap());
            request.extensions_mut().insert(ConnectInfo(peer));

            let (status, _) = send(&app, request).await;
            statuses.push(status);
        }

        assert_eq!(
            statuses,
            vec![
                StatusCode::UNAUTHORIZED,
                StatusCode::UNAUTHORIZED,
                StatusCode::UNAUTHORIZED,
                StatusCode::TOO_MANY_REQUESTS,
                StatusCode::TOO_MANY_REQUESTS,
            ]
        );
    }

    #[tokio::test]
    async fn test_create_search_and_download() {
        let app = app().await;

        let (status, created) = send(
            &app,
            request("POST", "/admin/files", Some(new_file()), Some(ADMIN_TOKEN)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["file_type"], "PDF");
        assert_eq!(created["name_lower"], "networks lab");
        let id = created["id"].as_str().unwrap().to_string();

        let (_, found) = send(&app, request("GET", "/v1/search?q=Net", None, None)).await;
        assert_eq!(found["total"], 1);
        assert_eq!(found["results"][0]["id"], id.as_str());

        let (_, inline) = send(&app, request("GET", "/v1/search?q=ne&inline=true", None, None)).await;
        assert_eq!(inline["total"], 0);
        assert_eq!(inline["min_chars"], 3);

        let (status, file) = send(&app, request("GET", &format!("/v1/files/{}", id), None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(file["file_id"], "tg-100");

        let (_, subjects) = send(&app, request("GET", "/admin/taxonomy/subjects", None, Some(ADMIN_TOKEN))).await;
        assert_eq!(subjects["document"]["cs_term1"], json!(["Networks"]));
    }

    #[tokio::test]
    async fn test_create_rejects_bad_extension() {
        let app = app().await;
        let mut file = new_file();
        file["original_name"] = json!("virus.exe");

        let (status, body) = send(
            &app,
            request("POST", "/admin/files", Some(file), Some(ADMIN_TOKEN)),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Invalid file type: .exe");
    }

    #[tokio::test]
    async fn test_report_rate_limit() {
        let app = app().await;

        let (_, created) = send(
            &app,
            request("POST", "/admin/files", Some(new_file()), Some(ADMIN_TOKEN)),
        )
        .await;
        let uri = format!("/v1/files/{}/report", created["id"].as_str().unwrap());

        for remaining in [2, 1, 0] {
            let (status, receipt) =
                send(&app, request("POST", &uri, Some(json!({"user_id": 5})), None)).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(receipt["remaining"], remaining);
        }

        let response = app
            .clone()
            .oneshot(request("POST", &uri, Some(json!({"user_id": 5})), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(response.headers().contains_key("retry-after"));
    }

    #[tokio::test]
    async fn test_taxonomy_options_and_unknown_document() {
        let app = app().await;

        let (status, body) = send(
            &app,
            request("GET", "/admin/taxonomy/options?level=term&program=cs", None, Some(ADMIN_TOKEN)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["lookup_key"], "cs");
        assert_eq!(body["options"], json!(["term0", "term1"]));

        let (status, _) = send(
            &app,
            request("GET", "/admin/taxonomy/bogus", None, Some(ADMIN_TOKEN)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_mailbox_round_trip() {
        let app = app().await;

        let (status, _) = send(
            &app,
            request(
                "PUT",
                "/admin/mailbox",
                Some(json!({"file_id": "tg-9", "file_name": "notes.pdf"})),
                Some(ADMIN_TOKEN),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, entry) = send(&app, request("GET", "/admin/mailbox", None, Some(ADMIN_TOKEN))).await;
        assert_eq!(entry["last_uploaded_file_id"], "tg-9");
        assert_eq!(entry["last_uploaded_file_name"], "notes.pdf");
    }

    #[tokio::test]
    async fn test_delete_lecture() {
        let app = app().await;

        send(
            &app,
            request("POST", "/admin/files", Some(new_file()), Some(ADMIN_TOKEN)),
        )
        .await;

        let (status, body) = send(
            &app,
            request(
                "DELETE",
                "/admin/lectures",
                Some(json!({"program": "cs", "term": "term1", "subject": "Networks", "lecture": "L1"})),
                Some(ADMIN_TOKEN),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["deleted_files"], 1);
        assert_eq!(body["lecture_removed"], true);
    }
}
