use crate::common::spawn_app;
use uuid::Uuid;

mod common;

async fn upload_quiz(app: &common::TestApp, body: serde_json::Value) -> reqwest::Response {
    app.api_client
        .post(&format!("{}/api/quiz/upload", &app.address))
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request.")
}

fn sample_quiz(category: &str, sub_category: &str) -> serde_json::Value {
    serde_json::json!({
        "question": "What does NAV stand for?",
        "options": ["Net Asset Value", "New Asset Venture", "Nominal Annual Value"],
        "correctAnswer": "Net Asset Value",
        "explanation": "NAV is the per-unit value of a fund.",
        "category": category,
        "subCategory": sub_category,
        "subjectCategory": "Equity",
        "topicCategory": "Basics"
    })
}

#[tokio::test]
async fn upload_and_fetch_by_tags_works() {
    let app = spawn_app().await;

    let response = upload_quiz(&app, sample_quiz("Finance", "MF")).await;
    assert_eq!(200, response.status().as_u16());
    let json: serde_json::Value = response.json().await.unwrap();
    assert_eq!(json["message"], "Quiz uploaded successfully");

    // Two-tag lookup
    let response = app
        .api_client
        .get(&format!("{}/api/quiz/Finance/MF", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());
    let quizzes: serde_json::Value = response.json().await.unwrap();
    assert_eq!(quizzes.as_array().unwrap().len(), 1);
    assert_eq!(quizzes[0]["question"], "What does NAV stand for?");
    assert_eq!(quizzes[0]["correctAnswer"], "Net Asset Value");

    // Three- and four-tag lookups narrow on the deeper tags
    let response = app
        .api_client
        .get(&format!("{}/api/quiz/Finance/MF/Equity", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());

    let response = app
        .api_client
        .get(&format!("{}/api/quiz/Finance/MF/Equity/Basics", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());

    let response = app
        .api_client
        .get(&format!("{}/api/quiz/Finance/MF/Equity/Advanced", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn tag_match_is_case_insensitive() {
    let app = spawn_app().await;
    upload_quiz(&app, sample_quiz("Finance", "MF")).await;

    let response = app
        .api_client
        .get(&format!("{}/api/quiz/FINANCE/mf", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn tag_match_is_exact_not_substring() {
    let app = spawn_app().await;
    upload_quiz(&app, sample_quiz("Finance", "MF")).await;

    // A prefix of a stored tag must not match.
    let response = app
        .api_client
        .get(&format!("{}/api/quiz/Fin/MF", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(404, response.status().as_u16());

    let response = app
        .api_client
        .get(&format!("{}/api/quiz/Finance/M", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn upload_stores_trimmed_tags() {
    let app = spawn_app().await;
    upload_quiz(&app, sample_quiz("  Finance  ", " MF ")).await;

    let response = app
        .api_client
        .get(&format!("{}/api/quiz/Finance/MF", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(200, response.status().as_u16());
    let quizzes: serde_json::Value = response.json().await.unwrap();
    assert_eq!(quizzes[0]["category"], "Finance");
    assert_eq!(quizzes[0]["subCategory"], "MF");
}

#[tokio::test]
async fn upload_without_question_fails() {
    let app = spawn_app().await;

    let response = upload_quiz(
        &app,
        serde_json::json!({
            "options": ["A", "B"],
            "correctAnswer": "A",
            "category": "Finance",
            "subCategory": "MF"
        }),
    )
    .await;
    assert_eq!(400, response.status().as_u16());

    // Blank counts as missing too.
    let response = upload_quiz(
        &app,
        serde_json::json!({
            "question": "   ",
            "options": ["A", "B"],
            "correctAnswer": "A"
        }),
    )
    .await;
    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn upload_without_correct_answer_fails() {
    let app = spawn_app().await;

    let response = upload_quiz(
        &app,
        serde_json::json!({
            "question": "What does NAV stand for?",
            "options": ["A", "B"]
        }),
    )
    .await;

    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn update_quiz_works() {
    let app = spawn_app().await;
    upload_quiz(&app, sample_quiz("Finance", "MF")).await;

    let quiz_id = sqlx::query_scalar::<_, Uuid>("SELECT id FROM quizzes WHERE question = $1")
        .bind("What does NAV stand for?")
        .fetch_one(&app.db_pool)
        .await
        .unwrap();

    let response = app
        .api_client
        .put(&format!("{}/api/quiz/{}", &app.address, quiz_id))
        .json(&serde_json::json!({
            "question": "What is net asset value?",
            "subCategory": "NISM"
        }))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(200, response.status().as_u16());
    let updated: serde_json::Value = response.json().await.unwrap();
    assert_eq!(updated["question"], "What is net asset value?");
    assert_eq!(updated["subCategory"], "NISM");
    // Untouched fields survive.
    assert_eq!(updated["category"], "Finance");
    assert_eq!(updated["correctAnswer"], "Net Asset Value");
}

#[tokio::test]
async fn update_non_existent_quiz_fails() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .put(&format!("{}/api/quiz/{}", &app.address, Uuid::new_v4()))
        .json(&serde_json::json!({ "question": "New question" }))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn delete_quiz_works() {
    let app = spawn_app().await;
    upload_quiz(&app, sample_quiz("Finance", "MF")).await;

    let quiz_id = sqlx::query_scalar::<_, Uuid>("SELECT id FROM quizzes WHERE question = $1")
        .bind("What does NAV stand for?")
        .fetch_one(&app.db_pool)
        .await
        .unwrap();

    let response = app
        .api_client
        .delete(&format!("{}/api/quiz/{}", &app.address, quiz_id))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(204, response.status().as_u16());

    let response = app
        .api_client
        .get(&format!("{}/api/quiz/Finance/MF", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn delete_non_existent_quiz_fails() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .delete(&format!("{}/api/quiz/{}", &app.address, Uuid::new_v4()))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(404, response.status().as_u16());
}
