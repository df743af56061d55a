use axum::{
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::env;

use crate::error::ApiError;

fn unauthorized(message: &str) -> Response {
    ApiError::new(StatusCode::UNAUTHORIZED, message).into_response()
}

/// Bearer-token check applied to every API route.
///
/// Accepted tokens come from the comma-separated `API_TOKENS` environment
/// variable. A token must be at least 32 characters long and consist of
/// alphanumerics, hyphens and underscores.
pub async fn auth_middleware(headers: HeaderMap, request: Request, next: Next) -> Response {
    let header = match headers.get("authorization") {
        Some(value) => match value.to_str() {
            Ok(value) => value,
            Err(_) => return unauthorized("Invalid Authorization header format."),
        },
        None => {
            return unauthorized("Missing Authorization header. Please provide a Bearer token.")
        }
    };

    let Some(token) = header.strip_prefix("Bearer ") else {
        return unauthorized(
            "Authorization header must use Bearer scheme (e.g., 'Authorization: Bearer <token>').",
        );
    };
    let token = token.trim();

    if token.len() < 32
        || !token
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return unauthorized("Invalid token format.");
    }

    let configured = match env::var("API_TOKENS") {
        Ok(raw) => raw,
        Err(_) => {
            tracing::error!("API_TOKENS environment variable not set");
            return ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Authentication is not properly configured on the server.",
            )
            .into_response();
        }
    };

    let valid = configured
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .any(|t| t == token);

    if !valid {
        return unauthorized("Invalid or expired token.");
    }

    next.run(request).await
}
