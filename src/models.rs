use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// A single question entity. The four tag fields classify it hierarchically
/// (category -> subCategory -> subjectCategory -> topicCategory).
#[derive(Debug, Serialize, Deserialize, Clone, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: Uuid,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub subject_category: Option<String>,
    pub topic_category: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadQuizRequest {
    pub question: Option<String>,
    pub options: Option<Vec<String>>,
    pub correct_answer: Option<String>,
    pub explanation: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub subject_category: Option<String>,
    pub topic_category: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuizRequest {
    pub question: Option<String>,
    pub options: Option<Vec<String>>,
    pub correct_answer: Option<String>,
    pub explanation: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub subject_category: Option<String>,
    pub topic_category: Option<String>,
}

/// One user's attempt at a tagged quiz set. `user` is the submitter's email,
/// kept as a plain string to match the original wire contract.
#[derive(Debug, Serialize, Deserialize, Clone, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub id: Uuid,
    #[sqlx(rename = "user_email")]
    pub user: String,
    pub category: String,
    pub sub_category: String,
    pub subject_category: Option<String>,
    pub topic_category: Option<String>,
    pub score: i32,
    pub total: i32,
    #[schema(value_type = Object)]
    pub answers: serde_json::Value,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResultRequest {
    pub user: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub subject_category: Option<String>,
    pub topic_category: Option<String>,
    pub score: Option<i32>,
    pub total: Option<i32>,
    #[schema(value_type = Object)]
    pub answers: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizStatusResponse {
    pub quiz_taken: bool,
}

/// Aggregated leaderboard row. The `_id` field name is part of the original
/// API contract.
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    #[serde(rename = "_id")]
    #[sqlx(rename = "user_email")]
    pub user: String,
    pub highest_score: i32,
    pub total_quizzes: i64,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct LeaderboardParams {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub link: String,
    pub subject_category: String,
}

#[derive(Debug, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub dob: Option<NaiveDate>,
    pub gender: Option<String>,
    pub experience: Option<String>,
    pub profile_image: Option<String>,
    pub password_hash: String,
    pub is_verified: bool,
    pub otp: Option<String>,
    pub otp_expires: Option<DateTime<Utc>>,
    pub reset_otp: Option<String>,
    pub reset_otp_expires: Option<DateTime<Utc>>,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Public view of a user. Never carries the password hash or OTP state.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub dob: Option<NaiveDate>,
    pub gender: Option<String>,
    pub experience: Option<String>,
    pub profile_image: Option<String>,
    pub is_verified: bool,
    pub role: String,
}

impl From<User> for UserProfile {
    fn from(u: User) -> Self {
        UserProfile {
            id: u.id,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            dob: u.dob,
            gender: u.gender,
            experience: u.experience,
            profile_image: u.profile_image,
            is_verified: u.is_verified,
            role: u.role,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub dob: Option<NaiveDate>,
    pub gender: Option<String>,
    pub experience: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct EmailRequest {
    pub email: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginUser {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: LoginUser,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: String,
    pub otp: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub dob: Option<NaiveDate>,
    pub gender: Option<String>,
    pub experience: Option<String>,
    pub profile_image: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UpdateProfileResponse {
    pub message: String,
    pub user: UserProfile,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecommendedCoursesResponse {
    pub courses: Vec<Course>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
