use actix_web::{web, HttpResponse, Responder};
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::auth;
use crate::error::ApiError;
use crate::models::{
    Course, EmailRequest, LeaderboardEntry, LeaderboardParams, LoginRequest, LoginResponse,
    LoginUser, MessageResponse, Quiz, QuizResult, QuizStatusResponse, RecommendedCoursesResponse,
    RegisterRequest, ResetPasswordRequest, SubmitResultRequest, UpdateProfileRequest,
    UpdateProfileResponse, UpdateQuizRequest, UploadQuizRequest, User, UserProfile,
    VerifyOtpRequest,
};
use crate::state::AppState;

const VERIFY_OTP_TTL_MINUTES: i64 = 5;
const RESET_OTP_TTL_MINUTES: i64 = 10;

/// Trims a value and drops it when blank, so " " counts as missing.
fn required_trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn optional_trimmed(value: &Option<String>) -> Option<String> {
    value.as_deref().map(|s| s.trim().to_string())
}

fn ok_message(message: &str) -> HttpResponse {
    HttpResponse::Ok().json(MessageResponse {
        message: message.to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    responses((status = 200, description = "Health Check", body = String))
)]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("OK")
}

#[utoipa::path(
    get,
    path = "/api/quiz/welcome",
    tag = "System",
    responses((status = 200, description = "Greeting", body = String))
)]
pub async fn welcome() -> impl Responder {
    HttpResponse::Ok().body("Welcome to the Quiz!")
}

// ===== Quiz Catalog =====

#[utoipa::path(
    post,
    path = "/api/quiz/upload",
    tag = "Catalog",
    request_body = UploadQuizRequest,
    responses(
        (status = 200, description = "Quiz uploaded", body = MessageResponse),
        (status = 400, description = "Missing question or correct answer", body = MessageResponse),
        (status = 500, description = "Internal Server Error", body = MessageResponse)
    )
)]
pub async fn upload_quiz(
    data: web::Data<AppState>,
    req: web::Json<UploadQuizRequest>,
) -> Result<HttpResponse, ApiError> {
    let question = required_trimmed(&req.question);
    let correct_answer = required_trimmed(&req.correct_answer);

    let (Some(question), Some(correct_answer)) = (question, correct_answer) else {
        return Err(ApiError::Validation(
            "Question and correct answer are required.".to_string(),
        ));
    };

    sqlx::query(
        r#"
        INSERT INTO quizzes
            (id, question, options, correct_answer, explanation,
             category, sub_category, subject_category, topic_category)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(question)
    .bind(req.options.clone().unwrap_or_default())
    .bind(correct_answer)
    .bind(&req.explanation)
    .bind(optional_trimmed(&req.category))
    .bind(optional_trimmed(&req.sub_category))
    .bind(optional_trimmed(&req.subject_category))
    .bind(optional_trimmed(&req.topic_category))
    .execute(&data.db)
    .await?;

    Ok(ok_message("Quiz uploaded successfully"))
}

/// Shared tag lookup: provided tags must match case-insensitively as full
/// strings, absent tags are unconstrained.
async fn find_quizzes(
    data: &AppState,
    category: &str,
    sub_category: &str,
    subject_category: Option<&str>,
    topic_category: Option<&str>,
) -> Result<HttpResponse, ApiError> {
    let quizzes = sqlx::query_as::<_, Quiz>(
        r#"
        SELECT id, question, options, correct_answer, explanation,
               category, sub_category, subject_category, topic_category
        FROM quizzes
        WHERE LOWER(category) = LOWER($1)
          AND LOWER(sub_category) = LOWER($2)
          AND ($3::TEXT IS NULL OR LOWER(subject_category) = LOWER($3))
          AND ($4::TEXT IS NULL OR LOWER(topic_category) = LOWER($4))
        "#,
    )
    .bind(category.trim())
    .bind(sub_category.trim())
    .bind(subject_category.map(str::trim))
    .bind(topic_category.map(str::trim))
    .fetch_all(&data.db)
    .await?;

    if quizzes.is_empty() {
        return Err(ApiError::NotFound("No quiz found.".to_string()));
    }

    Ok(HttpResponse::Ok().json(quizzes))
}

#[utoipa::path(
    get,
    path = "/api/quiz/{category}/{sub_category}",
    tag = "Catalog",
    params(
        ("category" = String, Path, description = "Category tag"),
        ("sub_category" = String, Path, description = "Sub-category tag")
    ),
    responses(
        (status = 200, description = "Matching quizzes", body = Vec<Quiz>),
        (status = 404, description = "No quiz found", body = MessageResponse)
    )
)]
pub async fn get_quizzes_by_two_tags(
    data: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (category, sub_category) = path.into_inner();
    find_quizzes(&data, &category, &sub_category, None, None).await
}

#[utoipa::path(
    get,
    path = "/api/quiz/{category}/{sub_category}/{subject_category}",
    tag = "Catalog",
    params(
        ("category" = String, Path, description = "Category tag"),
        ("sub_category" = String, Path, description = "Sub-category tag"),
        ("subject_category" = String, Path, description = "Subject-category tag")
    ),
    responses(
        (status = 200, description = "Matching quizzes", body = Vec<Quiz>),
        (status = 404, description = "No quiz found", body = MessageResponse)
    )
)]
pub async fn get_quizzes_by_three_tags(
    data: web::Data<AppState>,
    path: web::Path<(String, String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (category, sub_category, subject_category) = path.into_inner();
    find_quizzes(&data, &category, &sub_category, Some(&subject_category), None).await
}

#[utoipa::path(
    get,
    path = "/api/quiz/{category}/{sub_category}/{subject_category}/{topic_category}",
    tag = "Catalog",
    params(
        ("category" = String, Path, description = "Category tag"),
        ("sub_category" = String, Path, description = "Sub-category tag"),
        ("subject_category" = String, Path, description = "Subject-category tag"),
        ("topic_category" = String, Path, description = "Topic-category tag")
    ),
    responses(
        (status = 200, description = "Matching quizzes", body = Vec<Quiz>),
        (status = 404, description = "No quiz found", body = MessageResponse)
    )
)]
pub async fn get_quizzes_by_four_tags(
    data: web::Data<AppState>,
    path: web::Path<(String, String, String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (category, sub_category, subject_category, topic_category) = path.into_inner();
    find_quizzes(
        &data,
        &category,
        &sub_category,
        Some(&subject_category),
        Some(&topic_category),
    )
    .await
}

#[utoipa::path(
    put,
    path = "/api/quiz/{id}",
    tag = "Catalog",
    request_body = UpdateQuizRequest,
    params(("id" = Uuid, Path, description = "Quiz ID")),
    responses(
        (status = 200, description = "Quiz updated", body = Quiz),
        (status = 404, description = "Quiz not found", body = MessageResponse)
    )
)]
pub async fn update_quiz(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<UpdateQuizRequest>,
) -> Result<HttpResponse, ApiError> {
    let quiz_id = path.into_inner();

    let result = sqlx::query(
        r#"
        UPDATE quizzes SET
            question = COALESCE($1::TEXT, question),
            options = COALESCE($2::TEXT[], options),
            correct_answer = COALESCE($3::TEXT, correct_answer),
            explanation = COALESCE($4::TEXT, explanation),
            category = COALESCE($5::TEXT, category),
            sub_category = COALESCE($6::TEXT, sub_category),
            subject_category = COALESCE($7::TEXT, subject_category),
            topic_category = COALESCE($8::TEXT, topic_category)
        WHERE id = $9
        "#,
    )
    .bind(required_trimmed(&req.question))
    .bind(&req.options)
    .bind(required_trimmed(&req.correct_answer))
    .bind(&req.explanation)
    .bind(optional_trimmed(&req.category))
    .bind(optional_trimmed(&req.sub_category))
    .bind(optional_trimmed(&req.subject_category))
    .bind(optional_trimmed(&req.topic_category))
    .bind(quiz_id)
    .execute(&data.db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("Quiz not found".to_string()));
    }

    let quiz = sqlx::query_as::<_, Quiz>(
        r#"
        SELECT id, question, options, correct_answer, explanation,
               category, sub_category, subject_category, topic_category
        FROM quizzes WHERE id = $1
        "#,
    )
    .bind(quiz_id)
    .fetch_one(&data.db)
    .await?;

    Ok(HttpResponse::Ok().json(quiz))
}

#[utoipa::path(
    delete,
    path = "/api/quiz/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "Quiz ID")),
    responses(
        (status = 204, description = "Quiz deleted"),
        (status = 404, description = "Quiz not found", body = MessageResponse)
    )
)]
pub async fn delete_quiz(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let quiz_id = path.into_inner();

    let result = sqlx::query("DELETE FROM quizzes WHERE id = $1")
        .bind(quiz_id)
        .execute(&data.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("Quiz not found".to_string()));
    }

    Ok(HttpResponse::NoContent().finish())
}

// ===== Quiz Result Ledger =====

#[utoipa::path(
    get,
    path = "/api/quiz/status/{email}/{category}/{sub_category}",
    tag = "Ledger",
    params(
        ("email" = String, Path, description = "User email"),
        ("category" = String, Path, description = "Category tag"),
        ("sub_category" = String, Path, description = "Sub-category tag")
    ),
    responses((status = 200, description = "Whether the quiz was taken", body = QuizStatusResponse))
)]
pub async fn check_quiz_status(
    data: web::Data<AppState>,
    path: web::Path<(String, String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (email, category, sub_category) = path.into_inner();

    let quiz_taken = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM quiz_results
            WHERE user_email = $1
              AND LOWER(category) = LOWER($2)
              AND LOWER(sub_category) = LOWER($3)
        )
        "#,
    )
    .bind(email.trim())
    .bind(category.trim())
    .bind(sub_category.trim())
    .fetch_one(&data.db)
    .await?;

    Ok(HttpResponse::Ok().json(QuizStatusResponse { quiz_taken }))
}

#[utoipa::path(
    post,
    path = "/api/quiz/submit",
    tag = "Ledger",
    request_body = SubmitResultRequest,
    responses(
        (status = 200, description = "Result saved", body = MessageResponse),
        (status = 400, description = "Missing required fields", body = MessageResponse),
        (status = 409, description = "Quiz already submitted", body = MessageResponse)
    )
)]
pub async fn submit_result(
    data: web::Data<AppState>,
    req: web::Json<SubmitResultRequest>,
) -> Result<HttpResponse, ApiError> {
    let user = required_trimmed(&req.user);
    let category = required_trimmed(&req.category);
    let sub_category = required_trimmed(&req.sub_category);

    let (Some(user), Some(category), Some(sub_category), Some(score), Some(total), Some(answers)) =
        (user, category, sub_category, req.score, req.total, req.answers.clone())
    else {
        return Err(ApiError::Validation("Missing required fields.".to_string()));
    };

    // The unique index on (user_email, lower(category), lower(sub_category))
    // is the arbiter: of two racing submissions exactly one row lands.
    let result = sqlx::query(
        r#"
        INSERT INTO quiz_results
            (id, user_email, category, sub_category, subject_category,
             topic_category, score, total, answers, date)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        ON CONFLICT (user_email, LOWER(category), LOWER(sub_category)) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&user)
    .bind(&category)
    .bind(&sub_category)
    .bind(optional_trimmed(&req.subject_category))
    .bind(optional_trimmed(&req.topic_category))
    .bind(score)
    .bind(total)
    .bind(&answers)
    .bind(Utc::now())
    .execute(&data.db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::Conflict("Quiz already submitted.".to_string()));
    }

    Ok(ok_message("Quiz result saved successfully."))
}

#[utoipa::path(
    get,
    path = "/api/quiz/history/{user_email}",
    tag = "Ledger",
    params(("user_email" = String, Path, description = "User email")),
    responses((status = 200, description = "Results, newest first", body = Vec<QuizResult>))
)]
pub async fn quiz_history(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_email = path.into_inner();

    let results = sqlx::query_as::<_, QuizResult>(
        r#"
        SELECT id, user_email, category, sub_category, subject_category,
               topic_category, score, total, answers, date
        FROM quiz_results
        WHERE user_email = $1
        ORDER BY date DESC
        "#,
    )
    .bind(user_email.trim())
    .fetch_all(&data.db)
    .await?;

    Ok(HttpResponse::Ok().json(results))
}

#[utoipa::path(
    get,
    path = "/api/leaderboard",
    tag = "Ledger",
    params(LeaderboardParams),
    responses((status = 200, description = "Top users by best score", body = Vec<LeaderboardEntry>))
)]
pub async fn leaderboard(
    data: web::Data<AppState>,
    params: web::Query<LeaderboardParams>,
) -> Result<HttpResponse, ApiError> {
    let limit = params.limit.unwrap_or(10).max(1);

    // Ties on the best score break on email so order stays deterministic.
    let entries = sqlx::query_as::<_, LeaderboardEntry>(
        r#"
        SELECT user_email, MAX(score) AS highest_score, COUNT(*) AS total_quizzes
        FROM quiz_results
        GROUP BY user_email
        ORDER BY highest_score DESC, user_email ASC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(&data.db)
    .await?;

    Ok(HttpResponse::Ok().json(entries))
}

// ===== Courses =====

#[utoipa::path(
    get,
    path = "/api/courses/{subject_category}",
    tag = "Courses",
    params(("subject_category" = String, Path, description = "Subject-category tag")),
    responses(
        (status = 200, description = "Matching courses", body = Vec<Course>),
        (status = 404, description = "No courses found", body = MessageResponse)
    )
)]
pub async fn courses_by_subject(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let subject_category = path.into_inner();

    let courses = sqlx::query_as::<_, Course>(
        r#"
        SELECT id, title, description, link, subject_category
        FROM courses
        WHERE LOWER(subject_category) = LOWER($1)
        ORDER BY title
        "#,
    )
    .bind(subject_category.trim())
    .fetch_all(&data.db)
    .await?;

    if courses.is_empty() {
        return Err(ApiError::NotFound("No courses found.".to_string()));
    }

    Ok(HttpResponse::Ok().json(courses))
}

// ===== Auth / profile =====

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registered, OTP sent", body = MessageResponse),
        (status = 400, description = "Missing email or password", body = MessageResponse),
        (status = 409, description = "Email already registered", body = MessageResponse)
    )
)]
pub async fn register(
    data: web::Data<AppState>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let email = req.email.trim().to_string();
    if email.is_empty() || req.password.is_empty() {
        return Err(ApiError::Validation(
            "Email and password are required.".to_string(),
        ));
    }

    let password_hash =
        auth::hash_password(&req.password).map_err(|e| ApiError::Internal(e.to_string()))?;
    let otp = auth::generate_otp();
    let otp_expires = Utc::now() + Duration::minutes(VERIFY_OTP_TTL_MINUTES);

    let insert = sqlx::query(
        r#"
        INSERT INTO users
            (id, email, first_name, last_name, dob, gender, experience,
             password_hash, otp, otp_expires)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&email)
    .bind(&req.first_name)
    .bind(&req.last_name)
    .bind(req.dob)
    .bind(&req.gender)
    .bind(&req.experience)
    .bind(&password_hash)
    .bind(&otp)
    .bind(otp_expires)
    .execute(&data.db)
    .await;

    match insert {
        Ok(_) => {}
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            return Err(ApiError::Conflict("Email already registered.".to_string()));
        }
        Err(e) => return Err(e.into()),
    }

    data.mailer.deliver(
        &email,
        "Your OTP Code",
        &format!("Your OTP is: {}", otp),
    );

    Ok(ok_message("Registered successfully. OTP sent to your email."))
}

#[utoipa::path(
    post,
    path = "/api/auth/verify-otp",
    tag = "Auth",
    request_body = VerifyOtpRequest,
    responses(
        (status = 200, description = "Email verified", body = MessageResponse),
        (status = 400, description = "Unknown user, wrong or expired OTP", body = MessageResponse)
    )
)]
pub async fn verify_otp(
    data: web::Data<AppState>,
    req: web::Json<VerifyOtpRequest>,
) -> Result<HttpResponse, ApiError> {
    let user = fetch_user_by_email(&data, &req.email)
        .await?
        .ok_or_else(|| ApiError::Validation("User not found".to_string()))?;

    if user.is_verified {
        return Err(ApiError::Validation("Already verified".to_string()));
    }
    if user.otp.as_deref() != Some(req.otp.as_str()) {
        return Err(ApiError::Validation("Invalid OTP".to_string()));
    }
    match user.otp_expires {
        Some(expires) if expires >= Utc::now() => {}
        _ => return Err(ApiError::Validation("OTP expired".to_string())),
    }

    sqlx::query(
        "UPDATE users SET is_verified = TRUE, otp = NULL, otp_expires = NULL WHERE id = $1",
    )
    .bind(user.id)
    .execute(&data.db)
    .await?;

    Ok(ok_message("Email verified successfully!"))
}

#[utoipa::path(
    post,
    path = "/api/auth/resend-otp",
    tag = "Auth",
    request_body = EmailRequest,
    responses(
        (status = 200, description = "OTP resent", body = MessageResponse),
        (status = 404, description = "User not found", body = MessageResponse)
    )
)]
pub async fn resend_otp(
    data: web::Data<AppState>,
    req: web::Json<EmailRequest>,
) -> Result<HttpResponse, ApiError> {
    let user = fetch_user_by_email(&data, &req.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let otp = auth::generate_otp();
    let otp_expires = Utc::now() + Duration::minutes(VERIFY_OTP_TTL_MINUTES);

    sqlx::query("UPDATE users SET otp = $1, otp_expires = $2 WHERE id = $3")
        .bind(&otp)
        .bind(otp_expires)
        .bind(user.id)
        .execute(&data.db)
        .await?;

    data.mailer.deliver(
        &user.email,
        "Your OTP Code (Resent)",
        &format!("Your new OTP is: {}", otp),
    );

    Ok(ok_message("OTP resent successfully!"))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = MessageResponse),
        (status = 403, description = "Email not verified", body = MessageResponse)
    )
)]
pub async fn login(
    data: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let user = fetch_user_by_email(&data, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    if !user.is_verified {
        return Err(ApiError::Forbidden("Email not verified".to_string()));
    }

    if !auth::verify_password(&user.password_hash, &req.password) {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = auth::create_token(user.id, &data.jwt_secret)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        token,
        user: LoginUser {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            role: user.role,
        },
    }))
}

#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    tag = "Auth",
    request_body = EmailRequest,
    responses(
        (status = 200, description = "Reset OTP sent", body = MessageResponse),
        (status = 404, description = "User not found", body = MessageResponse)
    )
)]
pub async fn forgot_password(
    data: web::Data<AppState>,
    req: web::Json<EmailRequest>,
) -> Result<HttpResponse, ApiError> {
    let user = fetch_user_by_email(&data, &req.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let reset_otp = auth::generate_otp();
    let reset_otp_expires = Utc::now() + Duration::minutes(RESET_OTP_TTL_MINUTES);

    sqlx::query("UPDATE users SET reset_otp = $1, reset_otp_expires = $2 WHERE id = $3")
        .bind(&reset_otp)
        .bind(reset_otp_expires)
        .bind(user.id)
        .execute(&data.db)
        .await?;

    data.mailer.deliver(
        &user.email,
        "Password Reset OTP",
        &format!(
            "Your password reset OTP is {}. It expires in {} minutes.",
            reset_otp, RESET_OTP_TTL_MINUTES
        ),
    );

    Ok(ok_message("OTP sent to your email"))
}

fn check_reset_otp(user: &User, otp: &str) -> Result<(), ApiError> {
    if user.reset_otp.as_deref() != Some(otp) {
        return Err(ApiError::Validation("Invalid OTP".to_string()));
    }
    match user.reset_otp_expires {
        Some(expires) if expires >= Utc::now() => Ok(()),
        _ => Err(ApiError::Validation("OTP expired".to_string())),
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/verify-reset-otp",
    tag = "Auth",
    request_body = VerifyOtpRequest,
    responses(
        (status = 200, description = "OTP verified", body = MessageResponse),
        (status = 400, description = "Wrong or expired OTP", body = MessageResponse),
        (status = 404, description = "User not found", body = MessageResponse)
    )
)]
pub async fn verify_reset_otp(
    data: web::Data<AppState>,
    req: web::Json<VerifyOtpRequest>,
) -> Result<HttpResponse, ApiError> {
    let user = fetch_user_by_email(&data, &req.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    check_reset_otp(&user, &req.otp)?;

    Ok(ok_message("OTP verified"))
}

#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    tag = "Auth",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = MessageResponse),
        (status = 400, description = "Wrong or expired OTP", body = MessageResponse),
        (status = 404, description = "User not found", body = MessageResponse)
    )
)]
pub async fn reset_password(
    data: web::Data<AppState>,
    req: web::Json<ResetPasswordRequest>,
) -> Result<HttpResponse, ApiError> {
    let user = fetch_user_by_email(&data, &req.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    check_reset_otp(&user, &req.otp)?;

    let password_hash =
        auth::hash_password(&req.new_password).map_err(|e| ApiError::Internal(e.to_string()))?;

    sqlx::query(
        r#"
        UPDATE users
        SET password_hash = $1, reset_otp = NULL, reset_otp_expires = NULL
        WHERE id = $2
        "#,
    )
    .bind(&password_hash)
    .bind(user.id)
    .execute(&data.db)
    .await?;

    Ok(ok_message("Password reset successful"))
}

#[utoipa::path(
    get,
    path = "/api/auth/{id}",
    tag = "Auth",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User profile", body = UserProfile),
        (status = 401, description = "Invalid or missing token"),
        (status = 404, description = "User not found", body = MessageResponse)
    ),
    security(("jwt" = []))
)]
pub async fn get_profile(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
    _: auth::JwtMiddleware,
) -> Result<HttpResponse, ApiError> {
    let user = fetch_user_by_id(&data, path.into_inner())
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(UserProfile::from(user)))
}

#[utoipa::path(
    post,
    path = "/api/auth/{id}/update-profile",
    tag = "Auth",
    request_body = UpdateProfileRequest,
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Profile updated", body = UpdateProfileResponse),
        (status = 401, description = "Invalid or missing token"),
        (status = 404, description = "User not found", body = MessageResponse)
    ),
    security(("jwt" = []))
)]
pub async fn update_profile(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<UpdateProfileRequest>,
    _: auth::JwtMiddleware,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();

    let result = sqlx::query(
        r#"
        UPDATE users SET
            first_name = COALESCE($1::TEXT, first_name),
            last_name = COALESCE($2::TEXT, last_name),
            dob = COALESCE($3::DATE, dob),
            gender = COALESCE($4::TEXT, gender),
            experience = COALESCE($5::TEXT, experience),
            profile_image = COALESCE($6::TEXT, profile_image)
        WHERE id = $7
        "#,
    )
    .bind(&req.first_name)
    .bind(&req.last_name)
    .bind(req.dob)
    .bind(&req.gender)
    .bind(&req.experience)
    .bind(&req.profile_image)
    .bind(user_id)
    .execute(&data.db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    let user = fetch_user_by_id(&data, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(UpdateProfileResponse {
        message: "Profile updated successfully".to_string(),
        user: UserProfile::from(user),
    }))
}

#[utoipa::path(
    get,
    path = "/api/auth/{id}/recommended-courses",
    tag = "Auth",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Recommended courses", body = RecommendedCoursesResponse),
        (status = 401, description = "Invalid or missing token")
    ),
    security(("jwt" = []))
)]
pub async fn recommended_courses(
    data: web::Data<AppState>,
    _path: web::Path<Uuid>,
    _: auth::JwtMiddleware,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(RecommendedCoursesResponse {
        courses: data.recommended_courses.clone(),
    }))
}

const USER_COLUMNS: &str = r#"
    id, email, first_name, last_name, dob, gender, experience, profile_image,
    password_hash, is_verified, otp, otp_expires, reset_otp, reset_otp_expires,
    role, created_at
"#;

async fn fetch_user_by_email(data: &AppState, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE email = $1",
        USER_COLUMNS
    ))
    .bind(email.trim())
    .fetch_optional(&data.db)
    .await
}

async fn fetch_user_by_id(data: &AppState, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
        .bind(id)
        .fetch_optional(&data.db)
        .await
}
