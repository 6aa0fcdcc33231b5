//! HTTP backend of the alumni network: accounts, mutual connection requests,
//! and the post, job, event and location collections, stored in sled.

use std::net::SocketAddr;

use axum::{
    routing::{delete, get, post, put},
    Extension, Router,
};
use tokio::signal::{self, ctrl_c};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

pub mod accounts;
pub mod auth;
pub mod config;
pub mod connections;
pub mod error;
pub mod events;
pub mod jobs;
pub mod locations;
pub mod posts;
pub mod state;
pub mod store;
pub mod users;
pub mod utils;

pub use config::Config;
pub use state::State;

pub fn app(state: State) -> Router {
    let users = Router::new()
        .route("/", post(accounts::register))
        .route("/login", post(accounts::login))
        .route("/logout", post(accounts::logout))
        .route("/profile", get(accounts::get_profile).put(accounts::update_profile))
        .route("/profile/password", put(accounts::update_password))
        .route("/profile/:id", get(accounts::get_profile_by_id))
        .route("/explore-connect", get(accounts::explore_connect))
        .route("/alumni-connect", get(accounts::alumni_connect))
        .route("/students-connect", get(accounts::students_connect))
        .route("/connect/request/:id", put(connections::send_request))
        .route("/connect/accept/:id", put(connections::accept_request))
        .route("/connect/cancel/:id", put(connections::cancel_request))
        .route("/connect/decline/:id", put(connections::decline_request))
        .route("/connections", get(connections::list_connections))
        .route("/connections-list/:user_id", get(accounts::connections_list))
        .route("/registered-events", get(events::registered_events));

    let posts = Router::new()
        .route("/", get(posts::list_posts).post(posts::create_post))
        .route("/delete/:id", delete(posts::delete_post));

    let jobs = Router::new()
        .route("/", get(jobs::list_jobs))
        .route("/addjob", post(jobs::add_job));

    let events = Router::new()
        .route("/", get(events::list_events).post(events::create_event))
        .route("/:event_id/register", put(events::register_event))
        .route("/:event_id/unregister", put(events::unregister_event))
        .route("/:event_id/is-registered", get(events::is_registered));

    let locations = Router::new().route(
        "/",
        get(locations::list_locations).post(locations::add_location),
    );

    Router::new()
        .route("/", get(root))
        .nest("/api/users", users)
        .nest("/api/posts", posts)
        .nest("/api/jobs", jobs)
        .nest("/api/events", events)
        .nest("/api/locations", locations)
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn root() -> &'static str {
    "Hello!"
}

pub async fn start_server(config: Config) -> anyhow::Result<()> {
    info!("Opening database at {}", config.db_path);
    let state = State::open(&config)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on {addr}");
    axum::Server::try_bind(&addr)?
        .serve(app(state).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
