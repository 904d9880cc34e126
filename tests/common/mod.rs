use std::net::TcpListener;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use quiz_portal_api::email::LogMailer;
use quiz_portal_api::models::Course;
use quiz_portal_api::run;
use quiz_portal_api::state::AppState;

#[allow(dead_code)]
pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool,
    pub api_client: reqwest::Client,
}

pub async fn spawn_app() -> TestApp {
    dotenv::dotenv().ok();
    // Randomize database
    let pool = configure_database().await;

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let state = AppState {
        db: pool.clone(),
        mailer: Arc::new(LogMailer),
        jwt_secret: "test-secret".to_string(),
        recommended_courses: vec![Course {
            id: Uuid::new_v4(),
            title: "Getting Started with Quizzes".to_string(),
            description: Some("How scoring and categories work".to_string()),
            link: "https://courses.example.com/getting-started".to_string(),
            subject_category: "General".to_string(),
        }],
    };

    let server = run(listener, state).expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        db_pool: pool,
        api_client: reqwest::Client::new(),
    }
}

async fn configure_database() -> PgPool {
    let connection = PgPoolOptions::new()
        .connect_with(
            std::env::var("DATABASE_URL")
                .expect("DATABASE_URL must be set")
                .parse::<sqlx::postgres::PgConnectOptions>()
                .expect("Failed to parse DATABASE_URL")
                .database("postgres"),
        )
        .await
        .expect("Failed to connect to Postgres");

    let database_name = format!("test_{}", Uuid::new_v4().to_string().replace('-', ""));

    sqlx::query(&format!("CREATE DATABASE \"{}\"", database_name))
        .execute(&connection)
        .await
        .expect("Failed to create database");

    let pool = PgPoolOptions::new()
        .connect_with(
            std::env::var("DATABASE_URL")
                .expect("DATABASE_URL must be set")
                .parse::<sqlx::postgres::PgConnectOptions>()
                .expect("Failed to parse DATABASE_URL")
                .database(&database_name),
        )
        .await
        .expect("Failed to connect to new database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    pool
}

#[allow(dead_code)]
pub async fn register_user(app: &TestApp, email: &str, password: &str) {
    let body = serde_json::json!({
        "email": email,
        "password": password,
        "firstName": "Test",
        "lastName": "User"
    });

    let response = app
        .api_client
        .post(&format!("{}/api/auth/register", &app.address))
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());
}

/// Delivery is a logging stub in tests, so the OTP is read straight from the
/// database.
#[allow(dead_code)]
pub async fn fetch_otp(app: &TestApp, email: &str) -> String {
    sqlx::query_scalar::<_, Option<String>>("SELECT otp FROM users WHERE email = $1")
        .bind(email)
        .fetch_one(&app.db_pool)
        .await
        .expect("Failed to fetch OTP")
        .expect("No OTP stored for user")
}

#[allow(dead_code)]
pub async fn fetch_reset_otp(app: &TestApp, email: &str) -> String {
    sqlx::query_scalar::<_, Option<String>>("SELECT reset_otp FROM users WHERE email = $1")
        .bind(email)
        .fetch_one(&app.db_pool)
        .await
        .expect("Failed to fetch reset OTP")
        .expect("No reset OTP stored for user")
}

#[allow(dead_code)]
pub async fn verify_user(app: &TestApp, email: &str) {
    let otp = fetch_otp(app, email).await;
    let response = app
        .api_client
        .post(&format!("{}/api/auth/verify-otp", &app.address))
        .json(&serde_json::json!({ "email": email, "otp": otp }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());
}

#[allow(dead_code)]
pub async fn login_user(app: &TestApp, email: &str, password: &str) -> serde_json::Value {
    let response = app
        .api_client
        .post(&format!("{}/api/auth/login", &app.address))
        .json(&serde_json::json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());
    response.json().await.expect("Failed to read JSON")
}

/// Full register -> verify -> login round trip; returns (email, user id, token).
#[allow(dead_code)]
pub async fn register_verified_user(app: &TestApp) -> (String, String, String) {
    let email = format!("user_{}@example.com", Uuid::new_v4());
    let password = "password123";

    register_user(app, &email, password).await;
    verify_user(app, &email).await;

    let json = login_user(app, &email, password).await;
    let user_id = json["user"]["id"].as_str().unwrap().to_string();
    let token = json["token"].as_str().unwrap().to_string();

    (email, user_id, token)
}
