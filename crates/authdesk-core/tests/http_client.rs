//! `HttpClient` against a mock auth service.

use authdesk_core::api::{AuthApi, Credentials, HttpClient, ProfilePatch, RegistrationInput};
use authdesk_core::ErrorKind;
use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

fn client(server: &MockServer) -> HttpClient {
    HttpClient::new(&format!("{}/api/auth", server.uri())).unwrap()
}

#[tokio::test]
async fn test_login_posts_credentials() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "email": "a@b.com", "password": "secret1" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "token": "t1", "userId": "u1" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let grant = client(&server)
        .login(&Credentials {
            email: "a@b.com".to_string(),
            password: "secret1".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(grant.token, "t1");
    assert_eq!(grant.user_id, "u1");
}

#[tokio::test]
async fn test_register_omits_unset_optional_fields() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .and(body_json(json!({
            "name": "Al",
            "email": "al@example.com",
            "password": "secret1",
            "age": 40,
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "token": "nt1", "userId": "n1" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let input = RegistrationInput {
        name: "Al".to_string(),
        email: "al@example.com".to_string(),
        password: "secret1".to_string(),
        age: Some(40),
        ..Default::default()
    };
    let grant = client(&server).register(&input).await.unwrap();
    assert_eq!(grant.user_id, "n1");
}

#[tokio::test]
async fn test_register_conflict_uses_backend_message() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({ "message": "User already exists" })),
        )
        .mount(&server)
        .await;

    let err = client(&server)
        .register(&RegistrationInput::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Server);
    assert_eq!(err.status, Some(409));
    assert_eq!(err.message, "User already exists");
}

#[tokio::test]
async fn test_error_without_message_uses_fallback() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client(&server)
        .register(&RegistrationInput::default())
        .await
        .unwrap_err();

    assert_eq!(err.message, "Signup failed");
    assert_eq!(err.status, Some(500));
}

#[tokio::test]
async fn test_fetch_profile_sends_bearer_and_normalizes_dob() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/profile/u1"))
        .and(header("authorization", "Bearer t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Ada",
            "email": "a@b.com",
            "dob": "1815-12-10T00:00:00.000Z",
            "contact": "+44 20 7946 0958",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let record = client(&server).fetch_profile("u1", "t1").await.unwrap();

    assert_eq!(record.user_id, "u1");
    assert_eq!(record.dob, NaiveDate::from_ymd_opt(1815, 12, 10));
    assert_eq!(record.age, None);
}

#[tokio::test]
async fn test_fetch_profile_unauthorized() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/profile/u1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client(&server).fetch_profile("u1", "bad").await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Authentication);
    assert!(err.is_unauthorized());
    assert_eq!(err.message, "Failed to fetch profile");
}

#[tokio::test]
async fn test_update_profile_twice_yields_same_record() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/auth/profile/u1"))
        .and(header("authorization", "Bearer t1"))
        .and(body_json(json!({ "name": "Ada Lovelace" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "userId": "u1",
            "name": "Ada Lovelace",
            "email": "a@b.com",
        })))
        .expect(2)
        .mount(&server)
        .await;

    let api = client(&server);
    let patch = ProfilePatch {
        name: Some("Ada Lovelace".to_string()),
        ..Default::default()
    };
    let first = api.update_profile("u1", &patch, "t1").await.unwrap();
    let second = api.update_profile("u1", &patch, "t1").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.name, "Ada Lovelace");
}

#[tokio::test]
async fn test_update_profile_sends_null_for_cleared_contact() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/auth/profile/u1"))
        .and(body_json(json!({ "age": 36, "contact": null })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "userId": "u1",
            "name": "Ada",
            "email": "a@b.com",
            "age": 36,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let patch = ProfilePatch {
        age: Some(Some(36)),
        contact: Some(None),
        ..Default::default()
    };
    let record = client(&server)
        .update_profile("u1", &patch, "t1")
        .await
        .unwrap();

    assert_eq!(record.contact, None);
    assert_eq!(record.age, Some(36));
}

#[tokio::test]
async fn test_logout_accepts_any_success_body() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .and(header("authorization", "Bearer t1"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let ack = client(&server).logout("t1").await.unwrap();
    assert_eq!(ack.message, None);
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .map(|listener| listener.local_addr().unwrap().port());
    let Ok(port) = port else {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    };
    // listener dropped; nothing is accepting on `port` now
    let api = HttpClient::new(&format!("http://127.0.0.1:{port}/api/auth")).unwrap();

    let err = api
        .login(&Credentials {
            email: "a@b.com".to_string(),
            password: "secret1".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Network);
    assert_eq!(err.message, "Login failed");
    assert_eq!(err.status, None);
}
