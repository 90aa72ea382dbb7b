// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

pub fn create_router(app_state: AppState) -> Router {
    // Rotas de autenticação (login é público)
    let auth_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .route(
            "/me",
            get(handlers::auth::get_me).layer(axum_middleware::from_fn_with_state(
                app_state.clone(),
                auth_guard,
            )),
        );

    let user_routes = Router::new()
        .route("/"
               ,post(handlers::users::create_user)
               .get(handlers::users::list_users)
        )
        .route("/{id}", put(handlers::users::update_user));

    let device_routes = Router::new()
        .route("/"
               ,post(handlers::devices::create_device)
               .get(handlers::devices::list_devices)
        )
        .route("/{id}"
               ,get(handlers::devices::get_device)
               .put(handlers::devices::update_device)
               .delete(handlers::devices::delete_device)
        )
        .route("/{id}/state", get(handlers::devices::get_current_state))
        .route("/{id}/history", get(handlers::devices::device_history))
        .route("/{id}/maintenance", get(handlers::devices::device_maintenance_orders))
        .route("/{id}/movements", post(handlers::devices::record_movement))
        .route("/{id}/return", post(handlers::devices::return_device));

    let movement_routes = Router::new()
        .route("/", get(handlers::movements::search_movements))
        .route("/{id}", get(handlers::movements::get_movement));

    let maintenance_routes = Router::new()
        .route("/"
               ,post(handlers::maintenance::open_order)
               .get(handlers::maintenance::list_open_orders)
        )
        .route("/{id}", put(handlers::maintenance::update_order))
        .route("/{id}/close", post(handlers::maintenance::close_order));

    let employee_routes = Router::new()
        .route("/"
               ,post(handlers::employees::create_employee)
               .get(handlers::employees::list_employees)
        )
        .route("/by-code/{code}", get(handlers::employees::get_employee_by_code))
        .route("/{id}"
               ,get(handlers::employees::get_employee)
               .put(handlers::employees::update_employee)
               .delete(handlers::employees::delete_employee)
        );

    let catalog_routes = Router::new()
        .route("/sectors"
               ,post(handlers::catalog::create_sector)
               .get(handlers::catalog::list_sectors)
        )
        .route("/sectors/{id}", put(handlers::catalog::rename_sector))
        .route("/brands"
               ,post(handlers::catalog::create_brand)
               .get(handlers::catalog::list_brands)
        )
        .route("/brands/{id}", put(handlers::catalog::rename_brand))
        .route("/models"
               ,post(handlers::catalog::create_model)
               .get(handlers::catalog::list_models)
        )
        .route("/models/{id}", put(handlers::catalog::rename_model));

    let gmail_routes = Router::new()
        .route("/"
               ,post(handlers::gmail::create_account)
               .get(handlers::gmail::list_accounts)
        )
        .route("/{id}", put(handlers::gmail::update_account));

    let backup_routes = Router::new()
        .route("/", get(handlers::backup::create_backup))
        .route("/restore", post(handlers::backup::restore_backup));

    let document_routes = Router::new()
        .route("/handover/{entry_id}", post(handlers::documents::handover_document))
        .route("/handover/{entry_id}/pdf", post(handlers::documents::handover_pdf));

    let chat_routes = Router::new()
        .route("/intent", post(handlers::chat::handle_intent))
        .route("/message", post(handlers::chat::handle_message));

    // Tudo abaixo de /api (exceto login e health) exige token
    let protected = Router::new()
        .nest("/users", user_routes)
        .nest("/devices", device_routes)
        .nest("/movements", movement_routes)
        .nest("/maintenance", maintenance_routes)
        .nest("/employees", employee_routes)
        .nest("/catalog", catalog_routes)
        .nest("/gmail-accounts", gmail_routes)
        .nest("/backup", backup_routes)
        .nest("/documents", document_routes)
        .nest("/chat", chat_routes)
        .route("/dashboard/summary", get(handlers::dashboard::get_summary))
        .route("/import/{entity}", post(handlers::transfer::import_rows))
        .route("/export/{entity}", get(handlers::transfer::export_rows))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api", protected)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}
