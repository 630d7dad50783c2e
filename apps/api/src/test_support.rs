use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::header::{CONTENT_TYPE, COOKIE, ORIGIN, SET_COOKIE};
use axum::http::{Method, Request, StatusCode};
use clinica_application::{
    ClinicRepository, NewUser, PasswordHasher, UserRecord, UserRepository,
};
use clinica_core::{AppResult, ClinicId, Role};
use clinica_domain::{Permission, PermissionSet};
use clinica_infrastructure::InMemoryRepository;
use serde_json::Value;
use tower::ServiceExt;
use tower_sessions::MemoryStore;

use crate::api_router::build_router;
use crate::api_services::{RepositorySet, assemble_app_state, configure_session_layer};

pub(crate) const FRONTEND_URL: &str = "http://localhost:3000";
pub(crate) const PASSWORD: &str = "s3cret-pass";

/// Reversible stand-in for Argon2, which is too slow for router tests.
struct PlainPasswordHasher;

impl PasswordHasher for PlainPasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        Ok(format!("plain:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        Ok(hash == format!("plain:{password}"))
    }
}

pub(crate) struct TestApp {
    router: Router,
    pub(crate) repository: Arc<InMemoryRepository>,
}

impl TestApp {
    pub(crate) fn new() -> Self {
        let repository = Arc::new(InMemoryRepository::new());
        let state = assemble_app_state(
            RepositorySet::in_memory(repository.clone()),
            Arc::new(PlainPasswordHasher),
            None,
            FRONTEND_URL.to_owned(),
        );
        let session_layer = configure_session_layer(MemoryStore::default(), false);

        let Ok(router) = build_router(state, FRONTEND_URL, session_layer) else {
            panic!("router should build");
        };

        Self { router, repository }
    }

    pub(crate) async fn seed_account(&self, email: &str, role: Role) -> UserRecord {
        let created = UserRepository::create(
            self.repository.as_ref(),
            NewUser {
                name: email.split('@').next().unwrap_or("user").to_owned(),
                email: email.to_owned(),
                role,
                password_hash: format!("plain:{PASSWORD}"),
            },
        )
        .await;

        let Ok(user) = created else {
            panic!("account should be created");
        };
        user
    }

    /// Seeds an administrator owning a fresh clinic.
    pub(crate) async fn seed_owner(&self, email: &str) -> (UserRecord, ClinicId) {
        let owner = self.seed_account(email, Role::Master).await;
        let clinic = self
            .repository
            .create_with_owner("Clinica Teste", owner.id)
            .await;

        let Ok(clinic) = clinic else {
            panic!("clinic should be created");
        };
        (owner, clinic.id())
    }

    pub(crate) async fn seed_member(
        &self,
        email: &str,
        clinic_id: ClinicId,
        permissions: &[Permission],
    ) -> UserRecord {
        let user = self.seed_account(email, Role::User).await;
        self.repository
            .insert_membership(
                user.id,
                clinic_id,
                permissions.iter().copied().collect::<PermissionSet>(),
            )
            .await;
        user
    }

    /// Logs in and returns the session cookie.
    pub(crate) async fn login(&self, email: &str) -> String {
        let (status, _, cookie) = self
            .call(
                Method::POST,
                "/auth/login",
                None,
                Some(serde_json::json!({"email": email, "password": PASSWORD})),
                true,
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        let Some(cookie) = cookie else {
            panic!("login should set a session cookie");
        };
        cookie
    }

    pub(crate) async fn send(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let (status, body, _) = self.call(method, uri, cookie, body, true).await;
        (status, body)
    }

    pub(crate) async fn send_without_origin(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let (status, body, _) = self.call(method, uri, cookie, body, false).await;
        (status, body)
    }

    async fn call(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
        with_origin: bool,
    ) -> (StatusCode, Value, Option<String>) {
        let mut builder = Request::builder().method(method).uri(uri);
        if with_origin {
            builder = builder.header(ORIGIN, FRONTEND_URL);
        }
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }

        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        };
        let Ok(request) = request else {
            panic!("request should build");
        };

        let Ok(response) = self.router.clone().oneshot(request).await;

        let status = response.status();
        let cookie = response
            .headers()
            .get(SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(ToOwned::to_owned);

        let Ok(bytes) = to_bytes(response.into_body(), usize::MAX).await else {
            panic!("response body should be readable");
        };
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        (status, body, cookie)
    }
}
