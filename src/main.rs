use std::net::TcpListener;
use std::path::Path;
use std::sync::Arc;

use env_logger::Env;
use serde::Deserialize;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;
use walkdir::WalkDir;

use quiz_portal_api::config::Config;
use quiz_portal_api::email::LogMailer;
use quiz_portal_api::models::Course;
use quiz_portal_api::run;
use quiz_portal_api::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CourseSeed {
    title: String,
    description: Option<String>,
    link: String,
    subject_category: String,
}

fn load_course_seeds(dir: &Path) -> Vec<CourseSeed> {
    let mut seeds = Vec::new();

    for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
        if entry.path().extension().map_or(false, |ext| ext == "json") {
            let path = entry.path();
            log::info!("Loading seed file: {:?}", path);

            let content = match std::fs::read_to_string(path) {
                Ok(c) => c,
                Err(e) => {
                    log::error!("Failed to read seed file {:?}: {}", path, e);
                    continue;
                }
            };

            match serde_json::from_str::<Vec<CourseSeed>>(&content) {
                Ok(mut batch) => seeds.append(&mut batch),
                Err(e) => log::error!("Failed to parse seed JSON {:?}: {}", path, e),
            }
        }
    }

    seeds
}

/// Upserts course fixtures keyed by link, so reboots don't duplicate rows.
async fn seed_courses(db: &PgPool, seed_dir: &str) -> Result<(), sqlx::Error> {
    let dir = Path::new(seed_dir).join("courses");
    if !dir.exists() {
        log::info!("No course seed directory at {:?}, skipping", dir);
        return Ok(());
    }

    let seeds = load_course_seeds(&dir);
    let count = seeds.len();

    for seed in seeds {
        sqlx::query(
            r#"
            INSERT INTO courses (id, title, description, link, subject_category)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (link) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&seed.title)
        .bind(&seed.description)
        .bind(&seed.link)
        .bind(&seed.subject_category)
        .execute(db)
        .await?;
    }

    log::info!("Seeded {} courses", count);
    Ok(())
}

fn load_recommended_courses(seed_dir: &str) -> Vec<Course> {
    let path = Path::new(seed_dir).join("recommended.json");
    let content = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) => {
            log::info!("No recommended courses at {:?}: {}", path, e);
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<CourseSeed>>(&content) {
        Ok(seeds) => seeds
            .into_iter()
            .map(|s| Course {
                id: Uuid::new_v4(),
                title: s.title,
                description: s.description,
                link: s.link,
                subject_category: s.subject_category,
            })
            .collect(),
        Err(e) => {
            log::error!("Failed to parse {:?}: {}", path, e);
            Vec::new()
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::load();

    let db = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to Postgres");

    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .expect("Failed to run migrations");

    seed_courses(&db, &config.seed_dir)
        .await
        .expect("Failed to seed courses");

    let recommended_courses = load_recommended_courses(&config.seed_dir);
    log::info!("Loaded {} recommended courses", recommended_courses.len());

    let state = AppState {
        db,
        mailer: Arc::new(LogMailer),
        jwt_secret: config.jwt_secret,
        recommended_courses,
    };

    log::info!("Starting server at http://{}", config.bind_addr);
    log::info!("Swagger UI available at /swagger-ui/");

    let listener = TcpListener::bind(&config.bind_addr)?;
    run(listener, state)?.await
}
