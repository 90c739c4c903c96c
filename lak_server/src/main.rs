//! HTTP server for the Lyss/Busswil collection calendar.
//!
//! The API lives under `/api`; everything else is served from the `static`
//! directory (the lookup UI). The database path can be overridden with the
//! `ABFALLKALENDER_DB` environment variable.

use std::env;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{routing::get, Router};
use lak_core::store::Store;
use tower_http::services::ServeDir;

mod route;

/// Shared request state: the SQLite store behind a lock.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<Store>>,
}

#[tokio::main]
async fn main() {
    let db_path =
        env::var("ABFALLKALENDER_DB").unwrap_or_else(|_| String::from("abfallkalender.db"));
    let store = Store::open(&db_path).expect("failed to open database");
    let state = AppState {
        store: Arc::new(Mutex::new(store)),
    };
    let app = Router::new()
        .route("/api/streets", get(route::streets::handler))
        .route("/api/schedule", get(route::schedule::handler))
        .route("/api/ics", get(route::ics::handler))
        .fallback_service(ServeDir::new("static"))
        .with_state(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], 8008));
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .unwrap();
}
