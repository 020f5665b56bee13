use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::db::SchoolStorage;
use crate::handlers::{attendance, records, students};

#[derive(Clone)]
pub struct HomeroomState {
    pub storage: SchoolStorage,
}

impl HomeroomState {
    pub fn new(storage: SchoolStorage) -> Self {
        Self { storage }
    }
}

fn api_router() -> Router<HomeroomState> {
    Router::new()
        .route(
            "/students",
            get(students::list_students).post(students::create_student),
        )
        .route(
            "/students/{id}",
            get(students::get_student)
                .put(students::update_student)
                .delete(students::delete_student),
        )
        .route("/attendance", post(attendance::save_attendance))
        .route("/attendance/{date}", get(attendance::attendance_by_date))
        .route(
            "/attendance/stats/{student_id}",
            get(attendance::attendance_stats),
        )
        .route("/records", post(records::create_record))
        // GET takes a student id, DELETE a record id
        .route(
            "/records/{id}",
            get(records::list_records).delete(records::delete_record),
        )
}

pub fn homeroom_router(state: HomeroomState, server: &ServerConfig) -> Router {
    let router = Router::new().nest("/api", api_router());
    let router = match server.static_dir.as_ref() {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };
    router
        .layer(DefaultBodyLimit::max(server.body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
