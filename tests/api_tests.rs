//! Integration tests for the account, linking, evaluation, and chat endpoints.

use std::collections::HashSet;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use amparo::config::Config;
use http_body_util::BodyExt;
use tower::ServiceExt;

async fn spawn_app() -> Router {
    let db_path =
        std::env::temp_dir().join(format!("amparo-api-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());

    let state = amparo::api::create_app_state_from_config(config)
        .await
        .expect("Failed to create app state");

    amparo::api::router(state)
}

/// Registers an account and returns the `data` payload (`token` + `user`).
async fn register(app: &Router, name: &str, email: &str, role: &str) -> serde_json::Value {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/register")
                .header("Content-Type", mime::APPLICATION_JSON.as_ref())
                .body(Body::from(
                    serde_json::json!({
                        "name": name,
                        "email": email,
                        "password": "hunter2hunter2",
                        "role": role,
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body_json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(body_json["success"].as_bool().unwrap_or(false));
    body_json["data"].clone()
}

async fn link_patient(app: &Router, caregiver_token: &str, code: &str) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/users/link-patient")
                .header("Authorization", format!("Bearer {}", caregiver_token))
                .header("Content-Type", mime::APPLICATION_JSON.as_ref())
                .body(Body::from(
                    serde_json::json!({ "patientCode": code }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_register_login_flow() {
    let app = spawn_app().await;

    let caregiver = register(&app, "Clara", "clara@example.com", "caregiver").await;
    assert!(!caregiver["token"].as_str().unwrap().is_empty());
    assert_eq!(caregiver["user"]["role"], "caregiver");
    assert!(caregiver["user"]["patientCode"].is_null());

    // Same email again, even under another role, is a conflict.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/register")
                .header("Content-Type", mime::APPLICATION_JSON.as_ref())
                .body(Body::from(
                    serde_json::json!({
                        "name": "Impostor",
                        "email": "clara@example.com",
                        "password": "hunter2hunter2",
                        "role": "patient",
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body_json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body_json["success"], false);
    assert_eq!(body_json["error"], "Email is already registered");
    assert!(body_json.get("data").is_none());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/login")
                .header("Content-Type", mime::APPLICATION_JSON.as_ref())
                .body(Body::from(
                    serde_json::json!({
                        "email": "clara@example.com",
                        "password": "hunter2hunter2",
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body_json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(!body_json["data"]["token"].as_str().unwrap().is_empty());
    assert_eq!(body_json["data"]["user"]["email"], "clara@example.com");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/login")
                .header("Content-Type", mime::APPLICATION_JSON.as_ref())
                .body(Body::from(
                    serde_json::json!({
                        "email": "clara@example.com",
                        "password": "wrong-password",
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body_json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body_json["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_register_validation() {
    let app = spawn_app().await;

    let cases = [
        serde_json::json!({
            "name": "Pat",
            "email": "pat@example.com",
            "password": "short",
            "role": "patient",
        }),
        serde_json::json!({
            "name": "Pat",
            "email": "not-an-email",
            "password": "hunter2hunter2",
            "role": "patient",
        }),
        serde_json::json!({
            "name": "   ",
            "email": "pat@example.com",
            "password": "hunter2hunter2",
            "role": "patient",
        }),
    ];

    for case in cases {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/register")
                    .header("Content-Type", mime::APPLICATION_JSON.as_ref())
                    .body(Body::from(case.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body_json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body_json["success"], false);
        assert!(body_json["error"].is_string());
    }
}

#[tokio::test]
async fn test_requests_without_valid_token_are_rejected() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/users/me")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/users/me")
                .header("Authorization", "Bearer not-a-real-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // A raw token without the Bearer prefix does not count.
    let caregiver = register(&app, "Clara", "clara@example.com", "caregiver").await;
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/users/me")
                .header("Authorization", caregiver["token"].as_str().unwrap())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_patient_code_link_flow() {
    let app = spawn_app().await;

    let patient = register(&app, "Pat", "pat@example.com", "patient").await;
    let caregiver = register(&app, "Clara", "clara@example.com", "caregiver").await;
    let caregiver_token = caregiver["token"].as_str().unwrap();

    let code = patient["user"]["patientCode"].as_str().unwrap();
    assert_eq!(code.len(), 8);

    let response = link_patient(&app, caregiver_token, "WRONG123").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = link_patient(&app, caregiver_token, code).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body_json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body_json["data"]["id"], patient["user"]["id"]);
    assert_eq!(body_json["data"]["name"], "Pat");

    // Linking the same patient twice is a conflict.
    let response = link_patient(&app, caregiver_token, code).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/users/patients")
                .header("Authorization", format!("Bearer {}", caregiver_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body_json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let patients = body_json["data"].as_array().unwrap();
    assert_eq!(patients.len(), 1);
    assert_eq!(patients[0]["id"], patient["user"]["id"]);
}

#[tokio::test]
async fn test_register_with_code_links_immediately() {
    let app = spawn_app().await;

    let patient = register(&app, "Pat", "pat@example.com", "patient").await;
    let code = patient["user"]["patientCode"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/register")
                .header("Content-Type", mime::APPLICATION_JSON.as_ref())
                .body(Body::from(
                    serde_json::json!({
                        "name": "Clara",
                        "email": "clara@example.com",
                        "password": "hunter2hunter2",
                        "role": "caregiver",
                        "patientCode": code,
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body_json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let caregiver_token = body_json["data"]["token"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/users/patients")
                .header("Authorization", format!("Bearer {}", caregiver_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body_json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body_json["data"].as_array().unwrap().len(), 1);

    // A bad code is skipped rather than failing the registration.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/register")
                .header("Content-Type", mime::APPLICATION_JSON.as_ref())
                .body(Body::from(
                    serde_json::json!({
                        "name": "Carl",
                        "email": "carl@example.com",
                        "password": "hunter2hunter2",
                        "role": "caregiver",
                        "patientCode": "NOPE1234",
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body_json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let carl_token = body_json["data"]["token"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/users/patients")
                .header("Authorization", format!("Bearer {}", carl_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body_json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body_json["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_role_gates() {
    let app = spawn_app().await;

    let patient = register(&app, "Pat", "pat@example.com", "patient").await;
    let caregiver = register(&app, "Clara", "clara@example.com", "caregiver").await;
    let patient_token = patient["token"].as_str().unwrap();
    let caregiver_token = caregiver["token"].as_str().unwrap();

    // Caregiver-only routes reject patients.
    let response = link_patient(&app, patient_token, "ABCD1234").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/users/patients")
                .header("Authorization", format!("Bearer {}", patient_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Patient-only routes reject caregivers.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/reminders/active")
                .header("Authorization", format!("Bearer {}", caregiver_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/evaluations/submit")
                .header("Authorization", format!("Bearer {}", caregiver_token))
                .header("Content-Type", mime::APPLICATION_JSON.as_ref())
                .body(Body::from(
                    serde_json::json!({ "score": 3, "totalQuestions": 5 }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_profile_never_exposes_password_hash() {
    let app = spawn_app().await;

    let patient = register(&app, "Pat", "pat@example.com", "patient").await;
    let user = patient["user"].as_object().unwrap();
    assert!(user.get("passwordHash").is_none());
    assert!(user.get("password").is_none());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/users/me")
                .header(
                    "Authorization",
                    format!("Bearer {}", patient["token"].as_str().unwrap()),
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body_json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    let me = body_json["data"].as_object().unwrap();
    assert_eq!(me["email"], "pat@example.com");
    assert_eq!(me["role"], "patient");
    assert!(me["patientCode"].is_string());
    assert!(me["createdAt"].is_string());
    assert!(me.get("passwordHash").is_none());
}

#[tokio::test]
async fn test_question_draw() {
    let app = spawn_app().await;

    let patient = register(&app, "Pat", "pat@example.com", "patient").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/evaluations/questions")
                .header(
                    "Authorization",
                    format!("Bearer {}", patient["token"].as_str().unwrap()),
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body_json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    let questions = body_json["data"].as_array().unwrap();
    assert_eq!(questions.len(), 5);

    let mut ids = HashSet::new();
    for question in questions {
        assert!(ids.insert(question["id"].as_i64().unwrap()));
        assert!(question["questionText"].is_string());
        assert!(question["option1"].is_string());
        assert!(question["option2"].is_string());
        assert!(question["option3"].is_string());
        assert!(question["option4"].is_string());
        assert!(question["category"].is_string());

        // The client grades locally, so the answer key ships with the draw.
        let correct = question["correctOption"].as_i64().unwrap();
        assert!((1..=4).contains(&correct));
    }
}

#[tokio::test]
async fn test_submit_and_monthly_history() {
    let app = spawn_app().await;

    let patient = register(&app, "Pat", "pat@example.com", "patient").await;
    let patient_token = patient["token"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/evaluations/submit")
                .header("Authorization", format!("Bearer {}", patient_token))
                .header("Content-Type", mime::APPLICATION_JSON.as_ref())
                .body(Body::from(
                    serde_json::json!({ "score": 4, "totalQuestions": 5 }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body_json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body_json["data"]["score"], 4);
    assert_eq!(body_json["data"]["totalQuestions"], 5);
    assert_eq!(body_json["data"]["patientId"], patient["user"]["id"]);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/evaluations/history/me/monthly")
                .header("Authorization", format!("Bearer {}", patient_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body_json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    let history = body_json["data"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["score"], 4);
    assert!(history[0]["completedAt"].is_string());

    // Tallies that cannot come from a real quiz are rejected.
    let bad_submissions = [
        serde_json::json!({ "score": 6, "totalQuestions": 5 }),
        serde_json::json!({ "score": -1, "totalQuestions": 5 }),
        serde_json::json!({ "score": 0, "totalQuestions": 0 }),
    ];

    for submission in bad_submissions {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/evaluations/submit")
                    .header("Authorization", format!("Bearer {}", patient_token))
                    .header("Content-Type", mime::APPLICATION_JSON.as_ref())
                    .body(Body::from(submission.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_caregiver_history_requires_link() {
    let app = spawn_app().await;

    let patient = register(&app, "Pat", "pat@example.com", "patient").await;
    let caregiver = register(&app, "Clara", "clara@example.com", "caregiver").await;
    let patient_token = patient["token"].as_str().unwrap();
    let caregiver_token = caregiver["token"].as_str().unwrap();
    let patient_id = patient["user"]["id"].as_i64().unwrap();

    for (score, total) in [(3, 5), (5, 5)] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/evaluations/submit")
                    .header("Authorization", format!("Bearer {}", patient_token))
                    .header("Content-Type", mime::APPLICATION_JSON.as_ref())
                    .body(Body::from(
                        serde_json::json!({ "score": score, "totalQuestions": total })
                            .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let history_uri = format!("/evaluations/history/caregiver/{}", patient_id);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(&history_uri)
                .header("Authorization", format!("Bearer {}", caregiver_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let code = patient["user"]["patientCode"].as_str().unwrap();
    let response = link_patient(&app, caregiver_token, code).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(&history_uri)
                .header("Authorization", format!("Bearer {}", caregiver_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body_json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body_json["data"].as_array().unwrap().len(), 2);

    // Patients cannot read the caregiver view, even for themselves.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(&history_uri)
                .header("Authorization", format!("Bearer {}", patient_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_chat_roundtrip() {
    let app = spawn_app().await;

    let patient = register(&app, "Pat", "pat@example.com", "patient").await;
    let caregiver = register(&app, "Clara", "clara@example.com", "caregiver").await;
    let patient_token = patient["token"].as_str().unwrap();
    let caregiver_token = caregiver["token"].as_str().unwrap();
    let patient_id = patient["user"]["id"].as_i64().unwrap();
    let caregiver_id = caregiver["user"]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/chat")
                .header("Authorization", format!("Bearer {}", caregiver_token))
                .header("Content-Type", mime::APPLICATION_JSON.as_ref())
                .body(Body::from(
                    serde_json::json!({
                        "receiverId": patient_id,
                        "content": "Did you take the morning pills?",
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body_json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body_json["data"]["senderId"], caregiver_id);
    assert_eq!(body_json["data"]["receiverId"], patient_id);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/chat")
                .header("Authorization", format!("Bearer {}", patient_token))
                .header("Content-Type", mime::APPLICATION_JSON.as_ref())
                .body(Body::from(
                    serde_json::json!({
                        "receiverId": caregiver_id,
                        "content": "Yes, just now.",
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Both sides read the same conversation, oldest first.
    for token in [caregiver_token, patient_token] {
        let contact_id = if token == caregiver_token {
            patient_id
        } else {
            caregiver_id
        };

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/chat?contactId={}", contact_id))
                    .header("Authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body_json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        let messages = body_json["data"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["content"], "Did you take the morning pills?");
        assert_eq!(messages[1]["content"], "Yes, just now.");
    }

    // Blank messages and unknown receivers are rejected.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/chat")
                .header("Authorization", format!("Bearer {}", caregiver_token))
                .header("Content-Type", mime::APPLICATION_JSON.as_ref())
                .body(Body::from(
                    serde_json::json!({ "receiverId": patient_id, "content": "   " })
                        .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/chat")
                .header("Authorization", format!("Bearer {}", caregiver_token))
                .header("Content-Type", mime::APPLICATION_JSON.as_ref())
                .body(Body::from(
                    serde_json::json!({ "receiverId": 99999, "content": "Anyone there?" })
                        .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
