use actix_web::dev::Server;
use actix_web::{middleware, web, App, HttpServer};
use std::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod auth;
pub mod config;
pub mod email;
pub mod error;
pub mod handlers;
pub mod models;
pub mod state;

use crate::models::{
    Course, EmailRequest, LeaderboardEntry, LoginRequest, LoginResponse, LoginUser, MessageResponse, Quiz,
    QuizResult, QuizStatusResponse, RecommendedCoursesResponse, RegisterRequest,
    ResetPasswordRequest, SubmitResultRequest, UpdateProfileRequest, UpdateProfileResponse,
    UpdateQuizRequest, UploadQuizRequest, UserProfile, VerifyOtpRequest,
};
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health_check,
        handlers::welcome,
        handlers::upload_quiz,
        handlers::get_quizzes_by_two_tags,
        handlers::get_quizzes_by_three_tags,
        handlers::get_quizzes_by_four_tags,
        handlers::update_quiz,
        handlers::delete_quiz,
        handlers::check_quiz_status,
        handlers::submit_result,
        handlers::quiz_history,
        handlers::leaderboard,
        handlers::courses_by_subject,
        handlers::register,
        handlers::verify_otp,
        handlers::resend_otp,
        handlers::login,
        handlers::forgot_password,
        handlers::verify_reset_otp,
        handlers::reset_password,
        handlers::get_profile,
        handlers::update_profile,
        handlers::recommended_courses,
    ),
    components(
        schemas(
            Quiz, UploadQuizRequest, UpdateQuizRequest,
            QuizResult, SubmitResultRequest, QuizStatusResponse, LeaderboardEntry,
            Course, RecommendedCoursesResponse,
            RegisterRequest, VerifyOtpRequest, EmailRequest, LoginRequest, LoginResponse, LoginUser,
            ResetPasswordRequest, UpdateProfileRequest, UpdateProfileResponse, UserProfile,
            MessageResponse
        )
    ),
    tags(
        (name = "System", description = "System endpoints"),
        (name = "Catalog", description = "Quiz content storage and retrieval"),
        (name = "Ledger", description = "Quiz results, status and leaderboard"),
        (name = "Courses", description = "Recommended course lookup"),
        (name = "Auth", description = "Registration, OTP verification and sessions")
    )
)]
pub struct ApiDoc;

pub fn run(listener: TcpListener, state: AppState) -> Result<Server, std::io::Error> {
    let data = web::Data::new(state);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(middleware::Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
            .route("/health", web::get().to(handlers::health_check))
            .service(
                web::scope("/api/auth")
                    .route("/register", web::post().to(handlers::register))
                    .route("/verify-otp", web::post().to(handlers::verify_otp))
                    .route("/resend-otp", web::post().to(handlers::resend_otp))
                    .route("/login", web::post().to(handlers::login))
                    .route("/forgot-password", web::post().to(handlers::forgot_password))
                    .route("/verify-reset-otp", web::post().to(handlers::verify_reset_otp))
                    .route("/reset-password", web::post().to(handlers::reset_password))
                    .route(
                        "/{id}/recommended-courses",
                        web::get().to(handlers::recommended_courses),
                    )
                    .route("/{id}/update-profile", web::post().to(handlers::update_profile))
                    .route("/{id}", web::get().to(handlers::get_profile)),
            )
            .service(
                // Literal segments before the tag catch-alls: actix matches
                // routes in registration order.
                web::scope("/api/quiz")
                    .route("/welcome", web::get().to(handlers::welcome))
                    .route("/upload", web::post().to(handlers::upload_quiz))
                    .route("/submit", web::post().to(handlers::submit_result))
                    .route(
                        "/status/{email}/{category}/{sub_category}",
                        web::get().to(handlers::check_quiz_status),
                    )
                    .route("/history/{user_email}", web::get().to(handlers::quiz_history))
                    .route("/{id}", web::put().to(handlers::update_quiz))
                    .route("/{id}", web::delete().to(handlers::delete_quiz))
                    .route(
                        "/{category}/{sub_category}",
                        web::get().to(handlers::get_quizzes_by_two_tags),
                    )
                    .route(
                        "/{category}/{sub_category}/{subject_category}",
                        web::get().to(handlers::get_quizzes_by_three_tags),
                    )
                    .route(
                        "/{category}/{sub_category}/{subject_category}/{topic_category}",
                        web::get().to(handlers::get_quizzes_by_four_tags),
                    ),
            )
            .service(
                web::scope("/api/leaderboard").route("", web::get().to(handlers::leaderboard)),
            )
            .service(
                web::scope("/api/courses").route(
                    "/{subject_category}",
                    web::get().to(handlers::courses_by_subject),
                ),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
