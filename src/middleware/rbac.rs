// src/middleware/rbac.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use std::marker::PhantomData;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::auth::UserRole,
};

/// Perfil mínimo exigido por uma rota.
pub trait RoleDef: Send + Sync + 'static {
    fn role() -> UserRole;
}

/// Guardião: rejeita com 403 quando o perfil do usuário é inferior a `T`.
pub struct RequireRole<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let locale = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok())
            .map(Locale::from_header)
            .unwrap_or_default();

        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::InvalidToken.to_api_error(&locale, &app_state.i18n_store))?;

        let required = T::role();
        if !user.0.role.allows(required) {
            tracing::warn!(
                "Acesso negado: '{}' ({}) precisa de {}",
                user.0.login,
                user.0.role.as_str(),
                required.as_str()
            );
            return Err(AppError::Forbidden(required.as_str()).to_api_error(&locale, &app_state.i18n_store));
        }

        Ok(RequireRole(PhantomData))
    }
}

// ---
// PERFIS (TIPOS)
// ---

pub struct RoleEditor;
impl RoleDef for RoleEditor {
    fn role() -> UserRole { UserRole::Editor }
}

pub struct RoleAdmin;
impl RoleDef for RoleAdmin {
    fn role() -> UserRole { UserRole::Admin }
}
