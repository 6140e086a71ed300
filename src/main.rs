#[macro_use]
extern crate lazy_static;

use std::collections::HashMap;
use std::env::args;
use std::sync::Mutex;

use axum::extract::{Path, Query};
use axum::{
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use log::{error, info, warn};
use tower_http::cors::{Any, CorsLayer};

use crate::capture::capture_group;
use crate::config::Config;
use crate::export::{export_text, import_text, EXPORT_FILENAME};
use crate::models::group::{Group, Tab};
use crate::models::responses::{CaptureResponse, UpdateResponse};
use crate::models::theme::Theme;
use crate::repository::GroupRepository;
use crate::share::build_share_html;
use crate::store::SessionStore;

mod capture;
mod config;
mod export;
mod logger;
mod repository;
mod share;
mod store;

mod models {
    pub mod group;
    pub mod responses;
    pub mod theme;
}

lazy_static! {
    pub static ref CONFIG_INSTANCE: Mutex<Config> = Mutex::new(Config::new());
    pub static ref REPOSITORY_INSTANCE: Mutex<GroupRepository> = Mutex::new({
        let settings = CONFIG_INSTANCE.lock().unwrap().settings.clone();
        GroupRepository::new(SessionStore::new("./data", settings))
    });
}

#[tokio::main]
async fn main() {
    logger::setup_logger().unwrap();
    info!("Starting server... at {}", chrono::Utc::now());
    let params: Vec<String> = args().collect();
    if params.len() < 2 {
        println!("Usage: {} <port>", params[0]);
        error!("Error: missing port number");
        return;
    }

    // check data directory
    let current_dir = std::env::current_dir().unwrap();
    println!("Current directory: {:?}", current_dir);
    let data_dir = current_dir.join("data");
    if !data_dir.exists() {
        std::fs::create_dir(data_dir.clone()).unwrap();
        println!("Create data directory: {:?}", data_dir);
        warn!("Warning: missing data directory and created");
    }
    // check history directory
    let history_dir = data_dir.join("history");
    if !history_dir.exists() {
        std::fs::create_dir(history_dir.clone()).unwrap();
        println!("Create history directory: {:?}", history_dir);
        warn!("Warning: missing history directory and created");
    }

    let port = params[1].parse::<u16>().unwrap();
    println!("Listening on port {}", port);
    info!("Listening on port {}", port);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    // build our application with a route
    let app = Router::new()
        .route("/", get(root))
        .route("/api/", get(root))
        .route("/api/groups", get(get_groups))
        .route("/api/capture", post(capture_tabs).options(options_handler))
        .route("/api/groups/:id/rename", post(rename_group).options(options_handler))
        .route("/api/groups/:id/lock", post(lock_group).options(options_handler))
        .route("/api/groups/:id/star", post(star_group).options(options_handler))
        .route("/api/groups/:id/delete", post(delete_group).options(options_handler))
        .route(
            "/api/groups/:id/tabs/:index/delete",
            post(delete_tab).options(options_handler),
        )
        .route("/api/groups/:id/reorder", post(reorder_group).options(options_handler))
        .route("/api/export", get(export_groups))
        .route("/api/import", post(import_groups).options(options_handler))
        .route("/api/share", get(share_groups))
        .route("/api/theme", get(get_theme))
        .route("/api/theme", post(set_theme).options(options_handler))
        .layer(cors);

    match tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await {
        Ok(listener) => match axum::serve(listener, app).await {
            Ok(_) => {
                println!("Server started");
                info!("Web server started");
            }
            Err(e) => {
                println!("Error: {}", e);
                error!("Error: {}", e);
            }
        },
        Err(e) => {
            println!("Error: {}", e);
            error!("Error: {}", e);
        }
    }
}

// basic handler that responds with a static string
async fn root() -> (StatusCode, Json<String>) {
    let message = format!(
        "version: {}, {}",
        env!("CARGO_PKG_VERSION"),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    (StatusCode::OK, Json(message))
}

async fn get_groups(
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Vec<Group>>) {
    let filter = params.get("filter").map(String::as_str).unwrap_or("");
    let repository = REPOSITORY_INSTANCE.lock().unwrap();
    match repository.list(filter) {
        Ok(groups) => (StatusCode::OK, Json(groups)),
        Err(e) => {
            error!("Error listing groups: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(Vec::new()))
        }
    }
}

// The new group is persisted before the response goes out; the client
// must not close the originating tabs until it has the 200.
async fn capture_tabs(Json(payload): Json<Vec<Tab>>) -> (StatusCode, Json<CaptureResponse>) {
    let group = match capture_group(&payload) {
        Some(group) => group,
        None => {
            info!("Capture skipped: none of {} submitted tabs capturable", payload.len());
            return (
                StatusCode::OK,
                Json(CaptureResponse {
                    message: "No capturable tabs".to_string(),
                    updated_at: chrono::Utc::now(),
                    group: None,
                }),
            );
        }
    };

    let repository = REPOSITORY_INSTANCE.lock().unwrap();
    match repository.add(group.clone()) {
        Ok(()) => {
            info!("Captured group {} with {} tabs", group.id, group.tabs.len());
            (
                StatusCode::OK,
                Json(CaptureResponse {
                    message: "OK".to_string(),
                    updated_at: chrono::Utc::now(),
                    group: Some(group),
                }),
            )
        }
        Err(e) => {
            error!("Error saving captured group: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(CaptureResponse {
                    message: format!("Error saving group: {}", e),
                    updated_at: chrono::Utc::now(),
                    group: None,
                }),
            )
        }
    }
}

async fn rename_group(
    Path(id): Path<i64>,
    Json(payload): Json<String>,
) -> (StatusCode, Json<UpdateResponse>) {
    let repository = REPOSITORY_INSTANCE.lock().unwrap();
    update_result("rename", repository.rename(id, &payload))
}

async fn lock_group(Path(id): Path<i64>) -> (StatusCode, Json<UpdateResponse>) {
    let repository = REPOSITORY_INSTANCE.lock().unwrap();
    update_result("toggle lock", repository.toggle_lock(id))
}

async fn star_group(Path(id): Path<i64>) -> (StatusCode, Json<UpdateResponse>) {
    let repository = REPOSITORY_INSTANCE.lock().unwrap();
    update_result("toggle star", repository.toggle_star(id))
}

async fn delete_group(Path(id): Path<i64>) -> (StatusCode, Json<UpdateResponse>) {
    let repository = REPOSITORY_INSTANCE.lock().unwrap();
    update_result("delete group", repository.delete_group(id))
}

async fn delete_tab(Path((id, index)): Path<(i64, usize)>) -> (StatusCode, Json<UpdateResponse>) {
    let repository = REPOSITORY_INSTANCE.lock().unwrap();
    update_result("delete tab", repository.delete_tab(id, index))
}

async fn reorder_group(
    Path(id): Path<i64>,
    Json(payload): Json<Vec<Tab>>,
) -> (StatusCode, Json<UpdateResponse>) {
    let repository = REPOSITORY_INSTANCE.lock().unwrap();
    update_result("reorder tabs", repository.reorder_tabs(id, payload))
}

async fn export_groups() -> Response {
    let repository = REPOSITORY_INSTANCE.lock().unwrap();
    match repository.all_groups() {
        Ok(groups) => Response::builder()
            .status(StatusCode::OK)
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .header(
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILENAME),
            )
            .body(axum::body::Body::from(export_text(&groups)))
            .unwrap(),
        Err(e) => {
            error!("Error exporting groups: {}", e);
            Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .body(axum::body::Body::from(format!("Error: {}", e)))
                .unwrap()
        }
    }
}

async fn import_groups(body: String) -> (StatusCode, Json<UpdateResponse>) {
    let groups = import_text(&body);
    let count = groups.len();
    let repository = REPOSITORY_INSTANCE.lock().unwrap();
    match repository.add_many(groups) {
        Ok(()) => {
            info!("Imported {} group{}", count, if count == 1 { "" } else { "s" });
            (
                StatusCode::OK,
                Json(UpdateResponse::new(format!("Imported {} groups", count))),
            )
        }
        Err(e) => {
            error!("Error importing groups: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(UpdateResponse::new(format!("Error importing groups: {}", e))),
            )
        }
    }
}

// never persisted back; rendered from a snapshot of the collection
async fn share_groups() -> Response {
    let repository = REPOSITORY_INSTANCE.lock().unwrap();
    match repository.all_groups() {
        Ok(groups) => Response::builder()
            .status(StatusCode::OK)
            .header(CONTENT_TYPE, "text/html; charset=utf-8")
            .body(axum::body::Body::from(build_share_html(&groups)))
            .unwrap(),
        Err(e) => {
            error!("Error building share page: {}", e);
            Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .body(axum::body::Body::from(format!("Error: {}", e)))
                .unwrap()
        }
    }
}

async fn get_theme() -> (StatusCode, Json<Theme>) {
    let repository = REPOSITORY_INSTANCE.lock().unwrap();
    match repository.theme() {
        Ok(theme) => (StatusCode::OK, Json(theme)),
        Err(e) => {
            error!("Error reading theme: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(Theme::Auto))
        }
    }
}

async fn set_theme(Json(payload): Json<Theme>) -> (StatusCode, Json<UpdateResponse>) {
    let repository = REPOSITORY_INSTANCE.lock().unwrap();
    update_result("set theme", repository.set_theme(payload))
}

fn update_result(
    operation: &str,
    result: Result<(), std::io::Error>,
) -> (StatusCode, Json<UpdateResponse>) {
    match result {
        Ok(()) => (StatusCode::OK, Json(UpdateResponse::new("OK"))),
        Err(e) => {
            error!("Error during {}: {}", operation, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(UpdateResponse::new(format!("Error during {}: {}", operation, e))),
            )
        }
    }
}

async fn options_handler() -> Response {
    Response::builder()
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
        .body(axum::body::Body::empty())
        .unwrap()
}
