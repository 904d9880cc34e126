use std::sync::Arc;

use sqlx::PgPool;

use crate::email::Mailer;
use crate::models::Course;

pub struct AppState {
    pub db: PgPool,
    pub mailer: Arc<dyn Mailer>,
    pub jwt_secret: String,
    /// Read-only recommendation set loaded at startup.
    pub recommended_courses: Vec<Course>,
}
