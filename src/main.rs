use axum::routing::{get, post};
use axum::Router;
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use dialer_api::config;
use dialer_api::database::models::user::{NewUser, Role};
use dialer_api::database::{DatabaseManager, UserRepository};
use dialer_api::middleware::session_auth_middleware;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, SESSION_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting dialer API in {:?} mode", config.environment);

    match DatabaseManager::migrate().await {
        Ok(()) => {
            if let Err(e) = bootstrap_admin().await {
                tracing::warn!("Admin bootstrap failed: {}", e);
            }
        }
        // Keep serving; /health reports degraded until the database is back
        Err(e) => tracing::warn!("Database not ready at startup: {}", e),
    }

    let app = app();

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("dialer API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    let router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(session_routes())
        // Authenticated API
        .merge(api_routes());

    let router = if config::config().server.enable_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    router.layer(TraceLayer::new_for_http())
}

fn session_routes() -> Router {
    use dialer_api::handlers::public::session;

    Router::new()
        .route("/auth/login", post(session::login))
        .route("/auth/logout", post(session::logout))
}

/// Everything under /api sits behind the session middleware; the admin role
/// check for the directory routes happens inside the handlers.
fn api_routes() -> Router {
    use dialer_api::handlers::elevated::users;
    use dialer_api::handlers::protected::profile;

    Router::new()
        .route("/api/user/profile", get(profile::profile_get))
        .route(
            "/api/admin/users",
            get(users::users_list)
                .post(users::users_create)
                .put(users::users_update),
        )
        .layer(axum::middleware::from_fn(session_auth_middleware))
}

/// Seed an administrator account from the environment so a fresh deployment
/// has a way into the admin panel. No-op when the variables are unset or the
/// account already exists.
async fn bootstrap_admin() -> anyhow::Result<()> {
    let (Ok(email), Ok(password)) = (
        std::env::var("DIALER_ADMIN_EMAIL"),
        std::env::var("DIALER_ADMIN_PASSWORD"),
    ) else {
        return Ok(());
    };

    let repository = UserRepository::shared().await?;
    if repository.find_by_email(&email).await?.is_none() {
        repository
            .create(NewUser {
                email: email.clone(),
                password,
                name: Some("Administrator".to_string()),
                role: Role::Admin,
                number: None,
                extension_id: None,
                host: None,
                port: None,
                secret: None,
            })
            .await?;
        tracing::info!("Bootstrapped admin account {}", email);
    }

    Ok(())
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "name": "Dialer API",
        "version": version,
        "description": "Backend core for a browser-based VoIP dialer",
        "endpoints": {
            "home": "/ (public)",
            "session": "/auth/login, /auth/logout (public)",
            "profile": "/api/user/profile (authenticated)",
            "directory": "/api/admin/users (admin only)",
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
