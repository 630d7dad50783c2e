use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use clinica_core::AppError;
use clinica_domain::{Client, Exam, Patient};
use tower_http::trace::TraceLayer;
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::handlers::records::{
    create_record_handler, delete_record_handler, get_record_handler, list_records_handler,
    update_record_handler,
};
use crate::handlers::{clinics, health, permissions, users};
use crate::state::AppState;
use crate::{auth, middleware};

mod cors;


pub fn build_router<S>(
    app_state: AppState,
    frontend_url: &str,
    session_layer: SessionManagerLayer<S>,
) -> Result<Router, AppError>
where
    S: SessionStore + Clone,
{
    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me_handler))
        .route("/api/clinics/current", get(clinics::current_clinic_handler))
        .route(
            "/api/permissions",
            get(permissions::list_permissions_handler),
        )
        .route(
            "/api/users",
            get(users::search_users_handler).post(users::upsert_user_handler),
        )
        .route(
            "/api/users/{user_id}/permissions",
            get(users::get_user_permissions_handler).put(users::update_user_permissions_handler),
        )
        .route(
            "/api/users/{user_id}/permissions/{permission}",
            post(users::grant_user_permission_handler)
                .delete(users::revoke_user_permission_handler),
        )
        .merge(record_routes::<Client>("/api/clients"))
        .merge(record_routes::<Patient>("/api/patients"))
        .merge(record_routes::<Exam>("/api/exams"))
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_auth,
        ));

    let cors_layer = cors::build_cors_layer(frontend_url)?;

    Ok(Router::new()
        .route("/health", get(health::health_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .route("/api/clinics", post(clinics::create_clinic_handler))
        .merge(protected_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .layer(session_layer)
        .with_state(app_state))
}

fn record_routes<R>(base_path: &str) -> Router<AppState>
where
    R: crate::handlers::records::RecordEndpoint,
{
    Router::new()
        .route(
            base_path,
            get(list_records_handler::<R>).post(create_record_handler::<R>),
        )
        .route(
            &format!("{base_path}/{{record_id}}"),
            get(get_record_handler::<R>)
                .put(update_record_handler::<R>)
                .delete(delete_record_handler::<R>),
        )
}
