//! HTTP behavior of the backend client against a mock server.

#![allow(clippy::unwrap_used)] // Test code

use eventos_client::{
    ApiError, AuthToken, CreateEnrollmentRequest, ErrorCategory, EventosBackend, EventosClient,
    LoginRequest, PageRequest,
};
use eventos_core::types::{EnrollmentId, EnrollmentStatus, EventId, Role};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USER_ID: &str = "8b0a4c3e-2f51-4c1a-9d0e-3b1f6a2d7c10";
const EVENT_ID: &str = "0f6d2a71-5c3b-4e8e-8a55-9c2e1b7d4f03";
const ENROLLMENT_ID: &str = "c2a9e5d4-7b16-4f0a-b3e8-1d5c6a9f2e77";

fn token() -> AuthToken {
    AuthToken::new("tok-1")
}

fn event_json(current: u32) -> serde_json::Value {
    json!({
        "id": EVENT_ID,
        "title": "Rust Meetup",
        "description": "Monthly meetup",
        "startDateTime": "2025-07-01T18:00:00",
        "endDateTime": "2025-07-01T21:00:00",
        "location": "Lisboa",
        "capacity": 2,
        "organizerId": USER_ID,
        "currentEnrollments": current
    })
}

fn enrollment_json(status: &str) -> serde_json::Value {
    json!({
        "id": ENROLLMENT_ID,
        "eventId": EVENT_ID,
        "participantId": USER_ID,
        "status": status,
        "enrollmentDate": "2025-06-01T10:00:00"
    })
}

#[tokio::test]
async fn login_unwraps_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users/login"))
        .and(body_json(json!({ "email": "ana@example.com", "password": "secret1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Login realizado com sucesso",
            "data": {
                "token": "tok-1",
                "user": {
                    "id": USER_ID,
                    "name": "Ana",
                    "email": "ana@example.com",
                    "type": "PARTICIPANTE"
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = EventosClient::new(server.uri());
    let login = client
        .login(&LoginRequest::new("ana@example.com", "secret1"))
        .await
        .unwrap();

    assert_eq!(login.token, token());
    assert_eq!(login.user.role, Role::Participant);
    assert_eq!(login.user.id.to_string(), USER_ID);
}

#[tokio::test]
async fn list_events_sends_bearer_and_paging() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/events"))
        .and(header("authorization", "Bearer tok-1"))
        .and(query_param("page", "0"))
        .and(query_param("size", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "content": [event_json(1)],
                "totalPages": 1,
                "totalElements": 1,
                "size": 100,
                "number": 0
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = EventosClient::new(server.uri());
    let page = client.list_events(&token(), PageRequest::first(100)).await.unwrap();

    assert_eq!(page.total_elements, 1);
    assert_eq!(page.content[0].current_enrollments, 1);
    assert_eq!(page.content[0].id.to_string(), EVENT_ID);
}

#[tokio::test]
async fn search_passes_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/events/search"))
        .and(query_param("query", "rust"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "content": [], "totalPages": 0, "totalElements": 0, "size": 100, "number": 0 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = EventosClient::new(server.uri());
    let page = client
        .search_events(&token(), "rust", PageRequest::first(100))
        .await
        .unwrap();
    assert!(page.content.is_empty());
}

#[tokio::test]
async fn create_enrollment_posts_event_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/enrollments"))
        .and(body_json(json!({ "eventId": EVENT_ID })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Inscrição realizada com sucesso",
            "data": enrollment_json("PENDING")
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = EventosClient::new(server.uri());
    let request = CreateEnrollmentRequest {
        event_id: EVENT_ID.parse::<EventId>().unwrap(),
    };
    let enrollment = client.create_enrollment(&token(), &request).await.unwrap();
    assert_eq!(enrollment.status, EnrollmentStatus::Pending);
}

#[tokio::test]
async fn confirm_and_reject_use_put() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(format!("/api/v1/enrollments/{ENROLLMENT_ID}/confirm")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": enrollment_json("CONFIRMED")
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("/api/v1/enrollments/{ENROLLMENT_ID}/reject")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": enrollment_json("CANCELED")
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = EventosClient::new(server.uri());
    let id: EnrollmentId = ENROLLMENT_ID.parse().unwrap();

    let confirmed = client.confirm_enrollment(&token(), id).await.unwrap();
    assert_eq!(confirmed.status, EnrollmentStatus::Confirmed);

    let rejected = client.reject_enrollment(&token(), id).await.unwrap();
    assert_eq!(rejected.status, EnrollmentStatus::Canceled);
}

#[tokio::test]
async fn cancel_without_body_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(format!("/api/v1/enrollments/{ENROLLMENT_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Inscrição cancelada com sucesso"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = EventosClient::new(server.uri());
    let result = client
        .cancel_enrollment(&token(), ENROLLMENT_ID.parse().unwrap())
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn json_error_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(format!("/api/v1/enrollments/{ENROLLMENT_ID}/confirm")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "success": false,
            "error": "Evento lotado"
        })))
        .mount(&server)
        .await;

    let client = EventosClient::new(server.uri());
    let err = client
        .confirm_enrollment(&token(), ENROLLMENT_ID.parse().unwrap())
        .await
        .unwrap_err();

    assert_eq!(err.message(), "Evento lotado");
    assert_eq!(err.category(), ErrorCategory::StateConflict);
}

#[tokio::test]
async fn plain_text_and_empty_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/events/my-events"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Acesso negado"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/enrollments/my-enrollments"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = EventosClient::new(server.uri());

    let err = client.my_events(&token(), PageRequest::default()).await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Forbidden {
            message: "Acesso negado".to_string()
        }
    );
    assert_eq!(err.category(), ErrorCategory::Authorization);

    let err = client
        .my_enrollments(&token(), PageRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.message(), "HTTP error! status: 500");
    assert_eq!(err.category(), ErrorCategory::Transport);
}

#[tokio::test]
async fn missing_data_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/events/{EVENT_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    let client = EventosClient::new(server.uri());
    let err = client
        .get_event(&token(), EVENT_ID.parse().unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn unreachable_backend_is_transport() {
    // Port 9 (discard) is never served in the test environment
    let client = EventosClient::new("http://127.0.0.1:9");
    let err = client
        .check_email_availability("ana@example.com")
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Transport);
}

#[tokio::test]
async fn check_email_and_validate_password_return_flags() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/check-email"))
        .and(query_param("email", "ana@example.com"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "data": false })),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/api/users/{USER_ID}/validate-password")))
        .and(query_param("password", "secret1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": true })),
        )
        .mount(&server)
        .await;

    let client = EventosClient::new(server.uri());
    assert!(!client.check_email_availability("ana@example.com").await.unwrap());
    assert!(
        client
            .validate_password(&token(), USER_ID.parse().unwrap(), "secret1")
            .await
            .unwrap()
    );
}
