mod common;

use reqwest::StatusCode;
use serde_json::Value;

use common::{ADMIN_EMAIL, TestServer};

#[tokio::test]
async fn test_register_login_and_profile() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    server.register("ada@example.com", "secret-pw").await;
    let cookie = server.login("ada@example.com", "secret-pw").await;

    let resp: Value = client
        .get(format!("{}/api/v1/profile", server.base_url))
        .header("Cookie", &cookie)
        .send()
        .await
        .expect("profile request")
        .json()
        .await
        .expect("parse profile");

    assert_eq!(resp["data"]["email"], "ada@example.com");
    assert_eq!(resp["data"]["role"], "USER");
    // The stored hash must never appear in any payload
    assert!(resp["data"].get("password_hash").is_none());
    assert!(resp["data"].get("password").is_none());
}

#[tokio::test]
async fn test_login_failures_are_uniform() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    server.register("bob@example.com", "secret-pw").await;

    let wrong_password = client
        .post(format!("{}/api/v1/auth/login", server.base_url))
        .json(&serde_json::json!({ "email": "bob@example.com", "password": "wrong" }))
        .send()
        .await
        .expect("login");
    let unknown_email = client
        .post(format!("{}/api/v1/auth/login", server.base_url))
        .json(&serde_json::json!({ "email": "nobody@example.com", "password": "secret-pw" }))
        .send()
        .await
        .expect("login");

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);

    let a: Value = wrong_password.json().await.expect("body");
    let b: Value = unknown_email.json().await.expect("body");
    // Identical error bodies: no signal about which part was wrong
    assert_eq!(a["error"], b["error"]);
}

#[tokio::test]
async fn test_register_validation() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let too_long = "x".repeat(65);
    let cases = [
        ("not-an-email", "secret-pw"),
        ("short@example.com", "five5"),
        ("long@example.com", too_long.as_str()),
    ];
    for (email, password) in cases {
        let resp = client
            .post(format!("{}/api/v1/auth/register", server.base_url))
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "first_name": "A",
                "last_name": "B"
            }))
            .send()
            .await
            .expect("register");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "case {email}");
    }

    // Boundary lengths 6 and 64 are accepted
    for (email, password) in [
        ("six@example.com", "x".repeat(6)),
        ("sixtyfour@example.com", "x".repeat(64)),
    ] {
        let resp = client
            .post(format!("{}/api/v1/auth/register", server.base_url))
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "first_name": "A",
                "last_name": "B"
            }))
            .send()
            .await
            .expect("register");
        assert_eq!(resp.status(), StatusCode::CREATED, "case {email}");
    }
}

#[tokio::test]
async fn test_duplicate_email_conflict() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    server.register("dup@example.com", "secret-pw").await;

    let resp = client
        .post(format!("{}/api/v1/auth/register", server.base_url))
        .json(&serde_json::json!({
            "email": "dup@example.com",
            "password": "other-pw",
            "first_name": "A",
            "last_name": "B"
        }))
        .send()
        .await
        .expect("register");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_logout_invalidates_session() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    server.register("carol@example.com", "secret-pw").await;
    let cookie = server.login("carol@example.com", "secret-pw").await;

    let resp = client
        .post(format!("{}/api/v1/auth/logout", server.base_url))
        .header("Cookie", &cookie)
        .send()
        .await
        .expect("logout");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .get(format!("{}/api/v1/profile", server.base_url))
        .header("Cookie", &cookie)
        .send()
        .await
        .expect("profile");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_trip_lifecycle() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    server.register("trips@example.com", "secret-pw").await;
    let cookie = server.login("trips@example.com", "secret-pw").await;

    let resp = client
        .post(format!("{}/api/v1/trips", server.base_url))
        .header("Cookie", &cookie)
        .json(&serde_json::json!({
            "name": "Spring Break",
            "locations": ["Miami", "Orlando"]
        }))
        .send()
        .await
        .expect("save trip");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.expect("body");
    let trip_id = body["data"]["trip_id"].as_i64().expect("trip id");

    let resp: Value = client
        .get(format!("{}/api/v1/trips", server.base_url))
        .header("Cookie", &cookie)
        .send()
        .await
        .expect("list trips")
        .json()
        .await
        .expect("body");
    let trips = resp["data"].as_array().expect("trips array");
    assert_eq!(trips.len(), 1);
    assert_eq!(trips[0]["trip_id"].as_i64(), Some(trip_id));
    assert_eq!(trips[0]["name"], "Spring Break");
    assert_eq!(
        trips[0]["locations"],
        serde_json::json!(["Miami", "Orlando"])
    );

    let resp: Value = client
        .delete(format!("{}/api/v1/trips/{}", server.base_url, trip_id))
        .header("Cookie", &cookie)
        .send()
        .await
        .expect("delete trip")
        .json()
        .await
        .expect("body");
    assert_eq!(resp["data"]["success"], true);
    assert_eq!(resp["data"]["deleted_trip_id"].as_i64(), Some(trip_id));

    let resp: Value = client
        .get(format!("{}/api/v1/trips", server.base_url))
        .header("Cookie", &cookie)
        .send()
        .await
        .expect("list trips")
        .json()
        .await
        .expect("body");
    assert!(resp["data"].as_array().expect("trips array").is_empty());
}

#[tokio::test]
async fn test_trip_requires_session_and_ownership() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{}/api/v1/trips", server.base_url))
        .send()
        .await
        .expect("list trips");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    server.register("owner@example.com", "secret-pw").await;
    server.register("intruder@example.com", "secret-pw").await;
    let owner_cookie = server.login("owner@example.com", "secret-pw").await;
    let intruder_cookie = server.login("intruder@example.com", "secret-pw").await;

    let body: Value = client
        .post(format!("{}/api/v1/trips", server.base_url))
        .header("Cookie", &owner_cookie)
        .json(&serde_json::json!({ "name": "Private Trip", "locations": ["Reykjavik"] }))
        .send()
        .await
        .expect("save trip")
        .json()
        .await
        .expect("body");
    let trip_id = body["data"]["trip_id"].as_i64().expect("trip id");

    // A different user may not delete someone else's trip
    let resp = client
        .delete(format!("{}/api/v1/trips/{}", server.base_url, trip_id))
        .header("Cookie", &intruder_cookie)
        .send()
        .await
        .expect("delete trip");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = client
        .delete(format!("{}/api/v1/trips/99999", server.base_url))
        .header("Cookie", &owner_cookie)
        .send()
        .await
        .expect("delete trip");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_empty_trip_name_rejected() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    server.register("blank@example.com", "secret-pw").await;
    let cookie = server.login("blank@example.com", "secret-pw").await;

    let resp = client
        .post(format!("{}/api/v1/trips", server.base_url))
        .header("Cookie", &cookie)
        .json(&serde_json::json!({ "name": "", "locations": ["Miami"] }))
        .send()
        .await
        .expect("save trip");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_user_management() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let user_id = server.register("managed@example.com", "secret-pw").await;
    let admin_cookie = server.admin_cookie().await;

    let resp: Value = client
        .get(format!("{}/api/v1/admin/users", server.base_url))
        .header("Cookie", &admin_cookie)
        .send()
        .await
        .expect("list users")
        .json()
        .await
        .expect("body");
    let users = resp["data"].as_array().expect("users array");
    assert_eq!(users.len(), 2); // bootstrap admin + registered user
    assert!(users.iter().any(|u| u["email"] == ADMIN_EMAIL));

    let resp = client
        .patch(format!(
            "{}/api/v1/admin/users/{}",
            server.base_url, user_id
        ))
        .header("Cookie", &admin_cookie)
        .json(&serde_json::json!({
            "email": "renamed@example.com",
            "first_name": "Re",
            "last_name": "Named"
        }))
        .send()
        .await
        .expect("update user");
    assert!(resp.status().is_success());

    let resp = client
        .patch(format!("{}/api/v1/admin/users/99999", server.base_url))
        .header("Cookie", &admin_cookie)
        .json(&serde_json::json!({
            "email": "ghost@example.com",
            "first_name": "G",
            "last_name": "H"
        }))
        .send()
        .await
        .expect("update user");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp: Value = client
        .delete(format!(
            "{}/api/v1/admin/users/{}",
            server.base_url, user_id
        ))
        .header("Cookie", &admin_cookie)
        .send()
        .await
        .expect("delete user")
        .json()
        .await
        .expect("body");
    assert_eq!(resp["data"]["success"], true);
    assert_eq!(resp["data"]["deleted_id"].as_i64(), Some(user_id));

    // The deleted account can no longer log in
    let resp = client
        .post(format!("{}/api/v1/auth/login", server.base_url))
        .json(&serde_json::json!({ "email": "renamed@example.com", "password": "secret-pw" }))
        .send()
        .await
        .expect("login");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_routes_forbidden_for_users() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    server.register("plain@example.com", "secret-pw").await;
    let cookie = server.login("plain@example.com", "secret-pw").await;

    let resp = client
        .get(format!("{}/api/v1/admin/users", server.base_url))
        .header("Cookie", &cookie)
        .send()
        .await
        .expect("list users");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = client
        .get(format!("{}/api/v1/admin/users", server.base_url))
        .send()
        .await
        .expect("list users");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_weather_unconfigured_returns_503() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    server.register("sunny@example.com", "secret-pw").await;
    let cookie = server.login("sunny@example.com", "secret-pw").await;

    let resp = client
        .get(format!("{}/api/v1/weather?city=Miami", server.base_url))
        .header("Cookie", &cookie)
        .send()
        .await
        .expect("weather");
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}
