// src/utils/admin.rs

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};

use crate::config::Config;
use crate::error::AppError;

/// Axum Middleware: Admin Authorization.
///
/// Validates the 'Authorization: Bearer <token>' header against
/// `ADMIN_TOKEN`. Without a configured token the admin routes are open,
/// which is only meant for local development. A missing token is a 401,
/// a wrong one a 403; both carry the usual JSON error body.
pub async fn admin_middleware(
    State(config): State<Config>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = config.admin_token.as_deref() else {
        return Ok(next.run(req).await);
    };

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match token {
        Some(token) if token == expected => Ok(next.run(req).await),
        Some(_) => Err(AppError::Forbidden("Invalid admin token".to_string())),
        None => Err(AppError::AuthError("Missing admin token".to_string())),
    }
}
