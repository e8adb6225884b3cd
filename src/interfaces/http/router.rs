//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    middleware,
    routing::{delete, get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{GroupService, UserService};
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::interfaces::http::common::{MessageResponse, StorageErrorResponse};
use crate::interfaces::http::middleware::{auth_middleware, AuthState};
use crate::interfaces::http::modules::{
    auth, groups, health, metrics, request_id::request_id_middleware, users,
};

/// Unified state for the `/api/v1` routes.
/// Axum extracts the specific handler state via `FromRef`.
#[derive(Clone)]
pub struct ApiState {
    pub user_service: Arc<UserService>,
    pub group_service: Arc<GroupService>,
    pub auth: AuthState,
}

// -- FromRef implementations so each handler keeps its own State<T> extractor --

impl FromRef<ApiState> for auth::AuthHandlerState {
    fn from_ref(s: &ApiState) -> Self {
        auth::AuthHandlerState {
            user_service: Arc::clone(&s.user_service),
        }
    }
}

impl FromRef<ApiState> for users::UserHandlerState {
    fn from_ref(s: &ApiState) -> Self {
        users::UserHandlerState {
            user_service: Arc::clone(&s.user_service),
        }
    }
}

impl FromRef<ApiState> for groups::GroupHandlerState {
    fn from_ref(s: &ApiState) -> Self {
        groups::GroupHandlerState {
            group_service: Arc::clone(&s.group_service),
        }
    }
}

impl FromRef<ApiState> for AuthState {
    fn from_ref(s: &ApiState) -> Self {
        s.auth.clone()
    }
}

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token from /api/v1/login"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        metrics::prometheus_metrics,
        // Auth
        auth::login,
        // Users
        users::create_user,
        users::get_user,
        users::delete_user,
        users::attach_group,
        users::detach_group,
        // Groups
        groups::create_group,
        groups::get_group,
        groups::delete_group,
    ),
    components(
        schemas(
            // Common
            MessageResponse,
            StorageErrorResponse,
            // Health
            health::HealthResponse,
            health::ComponentHealth,
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            // Users
            users::UserDto,
            users::GroupRefDto,
            users::CreateUserRequest,
            users::MembershipRequest,
            // Groups
            groups::GroupDto,
            groups::UserRefDto,
            groups::CreateGroupRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check and metrics"),
        (name = "Authentication", description = "Login (JWT)"),
        (name = "Users", description = "User management and group membership"),
        (name = "Groups", description = "Group management"),
    ),
    info(
        title = "Roster API",
        version = "1.0.0",
        description = "REST API for managing users, groups and their memberships",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    user_service: Arc<UserService>,
    group_service: Arc<GroupService>,
    jwt_config: JwtConfig,
    db: DatabaseConnection,
    prometheus_handle: PrometheusHandle,
) -> Router {
    let auth_state = AuthState {
        jwt_config,
        user_service: Arc::clone(&user_service),
    };

    let api_state = ApiState {
        user_service,
        group_service,
        auth: auth_state.clone(),
    };

    // Collection paths are registered with and without the trailing slash.
    let protected_routes = Router::new()
        // --- Users ---
        .route("/api/v1/users", post(users::create_user))
        .route("/api/v1/users/", post(users::create_user))
        .route(
            "/api/v1/users/{id}",
            get(users::get_user).delete(users::delete_user),
        )
        .route("/api/v1/users/{id}/attach-group", post(users::attach_group))
        .route(
            "/api/v1/users/{id}/detach-group",
            delete(users::detach_group),
        )
        // --- Groups ---
        .route("/api/v1/groups", post(groups::create_group))
        .route("/api/v1/groups/", post(groups::create_group))
        .route(
            "/api/v1/groups/{id}",
            get(groups::get_group).delete(groups::delete_group),
        )
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware))
        .with_state(api_state.clone());

    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/api/v1/login", post(auth::login))
        .with_state(api_state);

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health::HealthState {
            db,
            started_at: Arc::new(Instant::now()),
        });

    let metrics_routes = Router::new()
        .route("/metrics", get(metrics::prometheus_metrics))
        .with_state(metrics::MetricsState {
            handle: prometheus_handle,
        });

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(swagger_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .merge(auth_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::domain::{RepositoryProvider, Role};
    use crate::infrastructure::crypto::PasswordHasher;
    use crate::infrastructure::database::repositories::test_support::test_db;
    use crate::infrastructure::SeaOrmRepositoryProvider;

    struct TestApp {
        router: Router,
        admin_token: String,
        user_token: String,
    }

    async fn test_app() -> TestApp {
        let db = test_db().await;
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let jwt_config = JwtConfig::default();
        let user_service = Arc::new(UserService::new(
            repos.clone(),
            PasswordHasher::new(4),
            jwt_config.clone(),
        ));
        let group_service = Arc::new(GroupService::new(repos));

        user_service
            .create_user_with_roles("admin@example.com", "admin", "pass_1234", vec![Role::Admin])
            .await
            .unwrap();
        user_service
            .create_user("reader@x.com", "Reader", "secret")
            .await
            .unwrap();
        let admin_token = user_service
            .login("admin@example.com", "pass_1234")
            .await
            .unwrap()
            .token;
        let user_token = user_service.login("reader@x.com", "secret").await.unwrap().token;

        let handle = PrometheusBuilder::new().build_recorder().handle();
        let router = create_api_router(user_service, group_service, jwt_config, db, handle);

        TestApp {
            router,
            admin_token,
            user_token,
        }
    }

    async fn call(
        app: &TestApp,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let req = match body {
            Some(body) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => req.body(Body::empty()).unwrap(),
        };

        let resp = app.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = test_app().await;
        let (status, body) = call(&app, "GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["database"]["status"], "ok");
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let app = test_app().await;
        let (status, body) = call(&app, "GET", "/api-doc/openapi.json", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/api/v1/users/{id}/attach-group"].is_object());
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let app = test_app().await;
        let (status, body) = call(
            &app,
            "POST",
            "/api/v1/login",
            None,
            Some(json!({"email": "admin@example.com", "password": "nope"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid credentials");
    }

    #[tokio::test]
    async fn reads_need_a_token_and_mutations_need_admin() {
        let app = test_app().await;

        let (status, _) = call(&app, "GET", "/api/v1/users/1", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = call(
            &app,
            "GET",
            "/api/v1/users/1",
            Some(&app.user_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["fullName"], "admin");
        assert_eq!(body["roles"], json!(["ROLE_USER", "ROLE_ADMIN"]));
        assert!(body.get("password").is_none());

        let (status, _) = call(
            &app,
            "POST",
            "/api/v1/groups/",
            Some(&app.user_token),
            Some(json!({"name": "eng"})),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = call(
            &app,
            "DELETE",
            "/api/v1/users/1",
            Some(&app.user_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn forbidden_is_decided_before_the_body_is_parsed() {
        let app = test_app().await;
        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/users/")
            .header(header::AUTHORIZATION, format!("Bearer {}", app.user_token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("not json"))
            .unwrap();

        let resp = app.router.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn collection_paths_work_with_and_without_trailing_slash() {
        let app = test_app().await;

        let (status, body) = call(
            &app,
            "POST",
            "/api/v1/groups",
            Some(&app.admin_token),
            Some(json!({"name": "eng"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["name"], "eng");
        assert!(body["createdAt"].is_string());
        assert_eq!(body["users"], json!([]));

        let (status, body) = call(
            &app,
            "POST",
            "/api/v1/groups/",
            Some(&app.admin_token),
            Some(json!({"name": "eng"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["message"], "Group already exists!");
    }

    #[tokio::test]
    async fn invalid_user_payload_is_422() {
        let app = test_app().await;
        let (status, body) = call(
            &app,
            "POST",
            "/api/v1/users/",
            Some(&app.admin_token),
            Some(json!({"email": "nope", "full_name": "", "password": "x"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["message"].as_str().unwrap().contains("email"));
    }

    #[tokio::test]
    async fn created_user_shows_base_role_and_snake_case_input() {
        let app = test_app().await;
        let (status, body) = call(
            &app,
            "POST",
            "/api/v1/users/",
            Some(&app.admin_token),
            Some(json!({"email": "alice@x.com", "full_name": "Alice", "password": "secret"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["email"], "alice@x.com");
        assert_eq!(body["fullName"], "Alice");
        assert_eq!(body["roles"], json!(["ROLE_USER"]));
        assert_eq!(body["groups"], json!([]));
    }

    #[tokio::test]
    async fn missing_resources_are_conflicts() {
        let app = test_app().await;

        let (status, body) =
            call(&app, "GET", "/api/v1/groups/99", Some(&app.admin_token), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["message"], "Group does not exist!");

        let (status, body) =
            call(&app, "DELETE", "/api/v1/users/99", Some(&app.admin_token), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["message"], "User does not exist!");
    }

    #[tokio::test]
    async fn ids_outside_the_i32_range_are_missing_not_malformed() {
        let app = test_app().await;

        let (status, body) = call(
            &app,
            "GET",
            "/api/v1/users/3000000000",
            Some(&app.admin_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["message"], "User does not exist!");

        let (status, body) =
            call(&app, "GET", "/api/v1/groups/abc", Some(&app.admin_token), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["message"], "Group does not exist!");

        let (status, body) = call(
            &app,
            "POST",
            "/api/v1/users/3000000000/attach-group",
            Some(&app.admin_token),
            Some(json!({"group_id": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["message"], "User does not exist!");
    }
}
