use actix_web::{web, App, HttpServer};
use fml_backend::routes;
use fml_backend::{AppState, DraftConfig};
use sea_orm::Database;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment:
    // - Docker: Set via docker-compose env_file or docker run --env-file
    // - Local dev: Source env files manually (e.g., set -a; . ./.env; set +a)
    let host = std::env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("BACKEND_PORT")
        .unwrap_or_else(|_| "3001".to_string())
        .parse::<u16>()
        .unwrap_or_else(|_| {
            eprintln!("❌ BACKEND_PORT must be a valid port number");
            std::process::exit(1);
        });

    println!("🚀 Starting FML Backend on http://{}:{}", host, port);

    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("❌ DATABASE_URL must be set");
            std::process::exit(1);
        }
    };

    let db = match Database::connect(&database_url).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("❌ Failed to connect to database: {e}");
            std::process::exit(1);
        }
    };

    println!("✅ Database connected");

    let draft_config = match DraftConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Invalid draft configuration: {e}");
            std::process::exit(1);
        }
    };

    // Wrap AppState with web::Data before passing to HttpServer
    let data = web::Data::new(AppState::new(db, draft_config));

    HttpServer::new(move || App::new().app_data(data.clone()).configure(routes::configure))
        .bind((host.as_str(), port))?
        .run()
        .await
}
