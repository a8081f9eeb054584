// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tabula_api::{
    ApiError, DepartmentPayload, FormattedTimetable, GenerateTimetableRequest, GenerationGuard,
    GenerationPermit, ImportTimetableRequest, RoomPayload, SubjectPayload, TeacherPayload,
    format_document, translate_persistence_error,
};
use tabula_domain::{Department, Room, Subject, Teacher, TimetableDocument};
use tabula_engine::{DepartmentSnapshot, EngineError};
use tabula_persistence::SqliteStore;
use tokio::sync::Mutex;
use tracing::{error, info};

/// Tabula Server - HTTP server for the Tabula timetable engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The store wrapped in a Mutex to allow safe concurrent access.
    store: Arc<Mutex<SqliteStore>>,
    /// Tracks in-flight generation runs per department and academic year.
    guard: Arc<GenerationGuard>,
}

/// Optional department filter accepted by list endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
struct DepartmentFilter {
    /// Restrict the listing to one department.
    department_id: Option<i64>,
}

/// Error body sent to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Stable machine-readable error kind.
    kind: String,
    /// Human-readable error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The stable error kind.
    kind: &'static str,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            kind: self.kind.to_string(),
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::Domain(_)
            | ApiError::ImportSchema { .. }
            | ApiError::ImportReference { .. }
            | ApiError::ImportConflict { .. } => StatusCode::BAD_REQUEST,
            ApiError::Engine(engine) => match engine {
                EngineError::InfeasibleSchedule { .. }
                | EngineError::StepBudgetExhausted { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                EngineError::AssemblyInvariant { .. } => {
                    error!(error = %engine, "generation produced an inconsistent document");
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                _ => StatusCode::BAD_REQUEST,
            },
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Duplicate { .. }
            | ApiError::ReferencedByTimetable { .. }
            | ApiError::GenerationInProgress { .. } => StatusCode::CONFLICT,
            ApiError::Internal { .. } => {
                error!(error = %err, "internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

// ---- department handlers ----

async fn handle_create_department(
    AxumState(state): AxumState<AppState>,
    Json(payload): Json<DepartmentPayload>,
) -> Result<Json<Department>, HttpError> {
    let store = state.store.lock().await;
    tabula_api::create_department(&store, &payload)
        .map(Json)
        .map_err(HttpError::from)
}

async fn handle_list_departments(
    AxumState(state): AxumState<AppState>,
) -> Result<Json<Vec<Department>>, HttpError> {
    let store = state.store.lock().await;
    store
        .list_departments()
        .map(Json)
        .map_err(|e| HttpError::from(translate_persistence_error(e)))
}

async fn handle_get_department(
    AxumState(state): AxumState<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Department>, HttpError> {
    let store = state.store.lock().await;
    store
        .get_department(id)
        .map(Json)
        .map_err(|e| HttpError::from(translate_persistence_error(e)))
}

async fn handle_update_department(
    AxumState(state): AxumState<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<DepartmentPayload>,
) -> Result<Json<Department>, HttpError> {
    let store = state.store.lock().await;
    tabula_api::update_department(&store, id, &payload)
        .map(Json)
        .map_err(HttpError::from)
}

async fn handle_delete_department(
    AxumState(state): AxumState<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, HttpError> {
    let store = state.store.lock().await;
    tabula_api::delete_department(&store, id)
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(HttpError::from)
}

// ---- teacher handlers ----

async fn handle_create_teacher(
    AxumState(state): AxumState<AppState>,
    Json(payload): Json<TeacherPayload>,
) -> Result<Json<Teacher>, HttpError> {
    let store = state.store.lock().await;
    tabula_api::create_teacher(&store, &payload)
        .map(Json)
        .map_err(HttpError::from)
}

async fn handle_list_teachers(
    AxumState(state): AxumState<AppState>,
) -> Result<Json<Vec<Teacher>>, HttpError> {
    let store = state.store.lock().await;
    store
        .list_teachers()
        .map(Json)
        .map_err(|e| HttpError::from(translate_persistence_error(e)))
}

async fn handle_get_teacher(
    AxumState(state): AxumState<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Teacher>, HttpError> {
    let store = state.store.lock().await;
    store
        .get_teacher(id)
        .map(Json)
        .map_err(|e| HttpError::from(translate_persistence_error(e)))
}

async fn handle_update_teacher(
    AxumState(state): AxumState<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<TeacherPayload>,
) -> Result<Json<Teacher>, HttpError> {
    let store = state.store.lock().await;
    tabula_api::update_teacher(&store, id, &payload)
        .map(Json)
        .map_err(HttpError::from)
}

async fn handle_delete_teacher(
    AxumState(state): AxumState<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, HttpError> {
    let store = state.store.lock().await;
    tabula_api::delete_teacher(&store, id)
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(HttpError::from)
}

// ---- room handlers ----

async fn handle_create_room(
    AxumState(state): AxumState<AppState>,
    Json(payload): Json<RoomPayload>,
) -> Result<Json<Room>, HttpError> {
    let store = state.store.lock().await;
    tabula_api::create_room(&store, &payload)
        .map(Json)
        .map_err(HttpError::from)
}

async fn handle_list_rooms(
    AxumState(state): AxumState<AppState>,
) -> Result<Json<Vec<Room>>, HttpError> {
    let store = state.store.lock().await;
    store
        .list_rooms()
        .map(Json)
        .map_err(|e| HttpError::from(translate_persistence_error(e)))
}

async fn handle_get_room(
    AxumState(state): AxumState<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Room>, HttpError> {
    let store = state.store.lock().await;
    store
        .get_room(id)
        .map(Json)
        .map_err(|e| HttpError::from(translate_persistence_error(e)))
}

async fn handle_update_room(
    AxumState(state): AxumState<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<RoomPayload>,
) -> Result<Json<Room>, HttpError> {
    let store = state.store.lock().await;
    tabula_api::update_room(&store, id, &payload)
        .map(Json)
        .map_err(HttpError::from)
}

async fn handle_delete_room(
    AxumState(state): AxumState<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, HttpError> {
    let store = state.store.lock().await;
    tabula_api::delete_room(&store, id)
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(HttpError::from)
}

// ---- subject handlers ----

async fn handle_create_subject(
    AxumState(state): AxumState<AppState>,
    Json(payload): Json<SubjectPayload>,
) -> Result<Json<Subject>, HttpError> {
    let store = state.store.lock().await;
    tabula_api::create_subject(&store, &payload)
        .map(Json)
        .map_err(HttpError::from)
}

async fn handle_list_subjects(
    AxumState(state): AxumState<AppState>,
    Query(filter): Query<DepartmentFilter>,
) -> Result<Json<Vec<Subject>>, HttpError> {
    let store = state.store.lock().await;
    let subjects = match filter.department_id {
        Some(department_id) => store.list_subjects_for_department(department_id),
        None => store.list_subjects(),
    };
    subjects
        .map(Json)
        .map_err(|e| HttpError::from(translate_persistence_error(e)))
}

async fn handle_get_subject(
    AxumState(state): AxumState<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Subject>, HttpError> {
    let store = state.store.lock().await;
    store
        .get_subject(id)
        .map(Json)
        .map_err(|e| HttpError::from(translate_persistence_error(e)))
}

async fn handle_update_subject(
    AxumState(state): AxumState<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<SubjectPayload>,
) -> Result<Json<Subject>, HttpError> {
    let store = state.store.lock().await;
    tabula_api::update_subject(&store, id, &payload)
        .map(Json)
        .map_err(HttpError::from)
}

async fn handle_delete_subject(
    AxumState(state): AxumState<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, HttpError> {
    let store = state.store.lock().await;
    tabula_api::delete_subject(&store, id)
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(HttpError::from)
}

// ---- timetable handlers ----

async fn handle_generate_timetable(
    AxumState(state): AxumState<AppState>,
    Json(request): Json<GenerateTimetableRequest>,
) -> Result<Json<TimetableDocument>, HttpError> {
    // Permit before the store lock: a duplicate request must get a 409
    // immediately, not queue behind this run on the store mutex.
    let _permit: GenerationPermit = tabula_api::acquire_generation_permit(&state.guard, &request)?;

    let snapshot: DepartmentSnapshot = {
        let store = state.store.lock().await;
        tabula_api::load_generation_snapshot(&store, &request)?
    };
    // The solve itself needs no store access.
    let document: TimetableDocument = tabula_api::run_generation(&snapshot, &request)?;

    let store = state.store.lock().await;
    tabula_api::store_generated_document(&store, &document)
        .map(Json)
        .map_err(HttpError::from)
}

async fn handle_import_timetable(
    AxumState(state): AxumState<AppState>,
    Json(request): Json<ImportTimetableRequest>,
) -> Result<Json<TimetableDocument>, HttpError> {
    let store = state.store.lock().await;
    tabula_api::import_timetable(&store, &request)
        .map(Json)
        .map_err(HttpError::from)
}

async fn handle_list_timetables(
    AxumState(state): AxumState<AppState>,
    Query(filter): Query<DepartmentFilter>,
) -> Result<Json<Vec<TimetableDocument>>, HttpError> {
    let store = state.store.lock().await;
    let documents = match filter.department_id {
        Some(department_id) => store.list_timetables_for_department(department_id),
        None => store.list_timetables(),
    };
    documents
        .map(Json)
        .map_err(|e| HttpError::from(translate_persistence_error(e)))
}

async fn handle_get_timetable(
    AxumState(state): AxumState<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TimetableDocument>, HttpError> {
    let store = state.store.lock().await;
    store
        .get_timetable(id)
        .map(Json)
        .map_err(|e| HttpError::from(translate_persistence_error(e)))
}

async fn handle_delete_timetable(
    AxumState(state): AxumState<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, HttpError> {
    let store = state.store.lock().await;
    store
        .delete_timetable(id)
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(|e| HttpError::from(translate_persistence_error(e)))
}

async fn handle_get_formatted_timetable(
    AxumState(state): AxumState<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<FormattedTimetable>, HttpError> {
    let store = state.store.lock().await;
    let document: TimetableDocument = store
        .get_timetable(id)
        .map_err(|e| HttpError::from(translate_persistence_error(e)))?;
    Ok(Json(format_document(&document)))
}

fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/departments", post(handle_create_department))
        .route("/api/departments", get(handle_list_departments))
        .route("/api/departments/{id}", get(handle_get_department))
        .route("/api/departments/{id}", put(handle_update_department))
        .route("/api/departments/{id}", delete(handle_delete_department))
        .route("/api/teachers", post(handle_create_teacher))
        .route("/api/teachers", get(handle_list_teachers))
        .route("/api/teachers/{id}", get(handle_get_teacher))
        .route("/api/teachers/{id}", put(handle_update_teacher))
        .route("/api/teachers/{id}", delete(handle_delete_teacher))
        .route("/api/rooms", post(handle_create_room))
        .route("/api/rooms", get(handle_list_rooms))
        .route("/api/rooms/{id}", get(handle_get_room))
        .route("/api/rooms/{id}", put(handle_update_room))
        .route("/api/rooms/{id}", delete(handle_delete_room))
        .route("/api/subjects", post(handle_create_subject))
        .route("/api/subjects", get(handle_list_subjects))
        .route("/api/subjects/{id}", get(handle_get_subject))
        .route("/api/subjects/{id}", put(handle_update_subject))
        .route("/api/subjects/{id}", delete(handle_delete_subject))
        .route("/api/generate-timetable", post(handle_generate_timetable))
        .route("/api/timetables/import", post(handle_import_timetable))
        .route("/api/timetables", get(handle_list_timetables))
        .route("/api/timetables/{id}", get(handle_get_timetable))
        .route("/api/timetables/{id}", delete(handle_delete_timetable))
        .route(
            "/api/timetables/{id}/formatted",
            get(handle_get_formatted_timetable),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Tabula Server");

    // Initialize the store (in-memory or file-based based on CLI argument)
    let store: SqliteStore = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        SqliteStore::open(db_path)?
    } else {
        info!("Using in-memory database");
        SqliteStore::new_in_memory()?
    };

    let app_state: AppState = AppState {
        store: Arc::new(Mutex::new(store)),
        guard: Arc::new(GenerationGuard::new()),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    /// Helper to create test app state with an in-memory store.
    fn create_test_app_state() -> AppState {
        let store: SqliteStore =
            SqliteStore::new_in_memory().expect("Failed to create in-memory store");
        AppState {
            store: Arc::new(Mutex::new(store)),
            guard: Arc::new(GenerationGuard::new()),
        }
    }

    async fn send_json(
        app: &Router,
        method: &str,
        uri: &str,
        body: &Value,
    ) -> (HttpStatusCode, Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_string(body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status: HttpStatusCode = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: Value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn send_get(app: &Router, uri: &str) -> (HttpStatusCode, Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status: HttpStatusCode = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: Value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    /// Seeds a department with enough teachers, rooms, and subjects for a
    /// feasible schedule, returning the department id.
    async fn seed_department(app: &Router) -> i64 {
        let (status, department) = send_json(
            app,
            "POST",
            "/api/departments",
            &json!({
                "name": "Computer",
                "academic_year": "2025-2026",
                "num_branches": 2,
                "class_size": 60
            }),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        let dept_id: i64 = department["id"].as_i64().unwrap();

        for (code, name) in [("SBR", "S. Raskar"), ("SJN", "S. Jain")] {
            let (status, _) = send_json(
                app,
                "POST",
                "/api/teachers",
                &json!({"code": code, "name": name}),
            )
            .await;
            assert_eq!(status, HttpStatusCode::OK);
        }
        for (number, capacity, kind) in [("204", 60, "classroom"), ("LAB-2", 30, "lab")] {
            let (status, _) = send_json(
                app,
                "POST",
                "/api/rooms",
                &json!({"number": number, "capacity": capacity, "kind": kind}),
            )
            .await;
            assert_eq!(status, HttpStatusCode::OK);
        }
        let (status, _) = send_json(
            app,
            "POST",
            "/api/subjects",
            &json!({
                "code": "ML",
                "name": "Machine Learning",
                "department_id": dept_id,
                "year": "SE",
                "kind": "lecture",
                "occurrences_per_week": 2
            }),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        let (status, _) = send_json(
            app,
            "POST",
            "/api/subjects",
            &json!({
                "code": "ML-LAB",
                "name": "Machine Learning Lab",
                "department_id": dept_id,
                "year": "SE",
                "kind": "practical"
            }),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);

        dept_id
    }

    #[tokio::test]
    async fn test_department_crud_over_http() {
        let app: Router = build_router(create_test_app_state());

        let (status, created) = send_json(
            &app,
            "POST",
            "/api/departments",
            &json!({
                "name": "Computer",
                "academic_year": "2025-2026",
                "num_branches": 3,
                "class_size": 72
            }),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        let id: i64 = created["id"].as_i64().unwrap();

        let (status, listed) = send_get(&app, "/api/departments").await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let (status, updated) = send_json(
            &app,
            "PUT",
            &format!("/api/departments/{id}"),
            &json!({
                "name": "Computer",
                "academic_year": "2025-2026",
                "num_branches": 3,
                "class_size": 80
            }),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(updated["class_size"], 80);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/departments/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_invalid_department_payload_is_bad_request() {
        let app: Router = build_router(create_test_app_state());
        let (status, body) = send_json(
            &app,
            "POST",
            "/api/departments",
            &json!({
                "name": "",
                "academic_year": "2025-2026",
                "num_branches": 3,
                "class_size": 72
            }),
        )
        .await;
        assert_eq!(status, HttpStatusCode::BAD_REQUEST);
        assert_eq!(body["error"], true);
        assert_eq!(body["kind"], "validation");
    }

    #[tokio::test]
    async fn test_duplicate_teacher_code_is_conflict() {
        let app: Router = build_router(create_test_app_state());
        let body: Value = json!({"code": "SBR", "name": "S. Raskar"});

        let (status, _) = send_json(&app, "POST", "/api/teachers", &body).await;
        assert_eq!(status, HttpStatusCode::OK);
        let (status, error) = send_json(&app, "POST", "/api/teachers", &body).await;
        assert_eq!(status, HttpStatusCode::CONFLICT);
        assert_eq!(error["kind"], "duplicate");
    }

    #[tokio::test]
    async fn test_unknown_resource_is_not_found() {
        let app: Router = build_router(create_test_app_state());
        let (status, body) = send_get(&app, "/api/teachers/42").await;
        assert_eq!(status, HttpStatusCode::NOT_FOUND);
        assert_eq!(body["kind"], "not_found");
    }

    #[tokio::test]
    async fn test_generate_timetable_end_to_end() {
        let app: Router = build_router(create_test_app_state());
        let dept_id: i64 = seed_department(&app).await;

        let (status, document) = send_json(
            &app,
            "POST",
            "/api/generate-timetable",
            &json!({"department_id": dept_id, "academic_year": "2025-2026"}),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        let timetable_id: i64 = document["id"].as_i64().unwrap();
        assert!(document["timetable"]["SE_Main"].is_object());

        let (status, listed) = send_get(&app, "/api/timetables").await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 1);

        // Department filters on the list endpoints.
        let (status, filtered) =
            send_get(&app, &format!("/api/timetables?department_id={dept_id}")).await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(filtered.as_array().unwrap().len(), 1);
        let (status, filtered) = send_get(&app, "/api/timetables?department_id=999").await;
        assert_eq!(status, HttpStatusCode::OK);
        assert!(filtered.as_array().unwrap().is_empty());
        let (status, subjects) =
            send_get(&app, &format!("/api/subjects?department_id={dept_id}")).await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(subjects.as_array().unwrap().len(), 2);

        let (status, fetched) = send_get(&app, &format!("/api/timetables/{timetable_id}")).await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(fetched, document);

        let (status, formatted) =
            send_get(&app, &format!("/api/timetables/{timetable_id}/formatted")).await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(
            formatted["SE_Main"]["MONDAY"]["11:00 am - 11:15 am"],
            "BREAK"
        );
        assert!(formatted["SE_Class"].is_object());
    }

    #[tokio::test]
    async fn test_concurrent_generation_conflicts_instead_of_queuing() {
        let state: AppState = create_test_app_state();
        let app: Router = build_router(state.clone());
        let dept_id: i64 = seed_department(&app).await;
        let body: Value = json!({"department_id": dept_id, "academic_year": "2025-2026"});

        // Hold the store lock so the first request parks on it after
        // claiming the generation permit.
        let store_guard = state.store.lock().await;
        let first = tokio::spawn({
            let app: Router = app.clone();
            let body: Value = body.clone();
            async move { send_json(&app, "POST", "/api/generate-timetable", &body).await }
        });
        // Wait until the first request holds the permit.
        loop {
            match state.guard.try_acquire(dept_id, "2025-2026") {
                Some(permit) => {
                    drop(permit);
                    tokio::task::yield_now().await;
                }
                None => break,
            }
        }

        // The duplicate is rejected without touching the store.
        let (status, rejected) = send_json(&app, "POST", "/api/generate-timetable", &body).await;
        assert_eq!(status, HttpStatusCode::CONFLICT);
        assert_eq!(rejected["kind"], "generation_in_progress");

        drop(store_guard);
        let (status, _) = first.await.unwrap();
        assert_eq!(status, HttpStatusCode::OK);
    }

    #[tokio::test]
    async fn test_generate_for_unknown_department_is_not_found() {
        let app: Router = build_router(create_test_app_state());
        let (status, body) = send_json(
            &app,
            "POST",
            "/api/generate-timetable",
            &json!({"department_id": 42, "academic_year": "2025-2026"}),
        )
        .await;
        assert_eq!(status, HttpStatusCode::NOT_FOUND);
        assert_eq!(body["kind"], "not_found");
    }

    #[tokio::test]
    async fn test_infeasible_schedule_is_unprocessable() {
        let app: Router = build_router(create_test_app_state());
        let dept_id: i64 = seed_department(&app).await;

        // Shrink every classroom below the class size.
        let (status, rooms) = send_get(&app, "/api/rooms").await;
        assert_eq!(status, HttpStatusCode::OK);
        let room_id: i64 = rooms[0]["id"].as_i64().unwrap();
        let (status, _) = send_json(
            &app,
            "PUT",
            &format!("/api/rooms/{room_id}"),
            &json!({"number": "204", "capacity": 10, "kind": "classroom"}),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);

        let (status, body) = send_json(
            &app,
            "POST",
            "/api/generate-timetable",
            &json!({"department_id": dept_id, "academic_year": "2025-2026"}),
        )
        .await;
        assert_eq!(status, HttpStatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["kind"], "infeasible_schedule");
        assert!(body["message"].as_str().unwrap().contains("ML"));
    }

    #[tokio::test]
    async fn test_referenced_teacher_delete_is_conflict() {
        let app: Router = build_router(create_test_app_state());
        let dept_id: i64 = seed_department(&app).await;
        let (status, _) = send_json(
            &app,
            "POST",
            "/api/generate-timetable",
            &json!({"department_id": dept_id, "academic_year": "2025-2026"}),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);

        let (_, teachers) = send_get(&app, "/api/teachers").await;
        let teacher_id: i64 = teachers[0]["id"].as_i64().unwrap();
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/teachers/{teacher_id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_import_with_bad_structure_is_bad_request() {
        let app: Router = build_router(create_test_app_state());
        let dept_id: i64 = seed_department(&app).await;

        let (status, body) = send_json(
            &app,
            "POST",
            "/api/timetables/import",
            &json!({
                "department_id": dept_id,
                "academic_year": "2025-2026",
                "timetable": {"XX_Main": {}}
            }),
        )
        .await;
        assert_eq!(status, HttpStatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "import_schema");
        assert!(body["message"].as_str().unwrap().contains("XX_Main"));
    }

    #[tokio::test]
    async fn test_delete_timetable_over_http() {
        let app: Router = build_router(create_test_app_state());
        let dept_id: i64 = seed_department(&app).await;
        let (_, document) = send_json(
            &app,
            "POST",
            "/api/generate-timetable",
            &json!({"department_id": dept_id, "academic_year": "2025-2026"}),
        )
        .await;
        let timetable_id: i64 = document["id"].as_i64().unwrap();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/timetables/{timetable_id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::NO_CONTENT);

        let (status, listed) = send_get(&app, "/api/timetables").await;
        assert_eq!(status, HttpStatusCode::OK);
        assert!(listed.as_array().unwrap().is_empty());
    }
}
