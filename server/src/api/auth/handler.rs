//! Authentication Handlers
//!
//! Handles login, password reset and current-user lookup

use std::time::Duration;

use axum::{Extension, Json, extract::State};
use serde::Serialize;

use crate::auth::{CurrentUser, hash_password, verify_password};
use crate::core::ServerState;
use crate::db::repository::{password_reset, role, user};
use crate::mailer;
use crate::security_log;
use crate::utils::{AppError, AppResult};

// Re-use shared DTOs for API consistency
use shared::client::{
    CurrentUserResponse, ForgotPasswordRequest, LoginRequest, LoginResponse, ResetPasswordRequest,
    UserInfo,
};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// POST /api/auth/login - 登录
///
/// Authenticates email + password and returns a JWT token
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let email = req.email.clone();

    let account = user::find_by_email(&state.pool, &email).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Unified error message to prevent account enumeration
    let account = match account {
        Some(u) => {
            if !u.is_active {
                return Err(AppError::forbidden("Account has been disabled".to_string()));
            }
            if u.banned {
                security_log!("WARN", "login_banned", email = email.clone());
                return Err(AppError::forbidden("Account has been banned".to_string()));
            }

            let password_valid = verify_password(&req.password, &u.password_hash)?;
            if !password_valid {
                security_log!("WARN", "login_failed", email = email.clone());
                tracing::warn!(email = %email, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }

            u
        }
        None => {
            security_log!("WARN", "login_failed", email = email.clone());
            tracing::warn!(email = %email, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    // Fetch role information for the permission list
    let role = role::find_by_name(&state.pool, &account.role)
        .await?
        .ok_or_else(|| AppError::internal(format!("Role {} not found", account.role)))?;

    if !role.is_active {
        return Err(AppError::forbidden("Role has been disabled".to_string()));
    }

    let jwt_service = state.get_jwt_service();
    let token = jwt_service
        .generate_token(
            account.id,
            &account.username,
            &account.display_name,
            &role.name,
            &role.permissions,
        )
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    security_log!("INFO", "login_success", user_id = account.id, email = email.clone());
    tracing::info!(
        user_id = account.id,
        username = %account.username,
        role = %role.name,
        "User logged in successfully"
    );

    Ok(Json(LoginResponse {
        token,
        user: UserInfo {
            id: account.id.to_string(),
            username: account.username,
            display_name: account.display_name,
            role: role.name,
            permissions: role.permissions,
        },
    }))
}

/// GET /api/auth/me - 当前用户
pub async fn me(
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<CurrentUserResponse>> {
    Ok(Json(CurrentUserResponse {
        id: current_user.id.to_string(),
        username: current_user.username,
        role: current_user.role,
        permissions: current_user.permissions,
    }))
}

#[derive(Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

/// POST /api/auth/logout - 登出
///
/// Tokens are stateless; the client discards its copy. Kept for API
/// symmetry and audit logging.
pub async fn logout(
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<LogoutResponse>> {
    security_log!("INFO", "logout", user_id = current_user.id);
    Ok(Json(LogoutResponse { success: true }))
}

#[derive(Serialize)]
pub struct ForgotPasswordResponse {
    pub success: bool,
}

/// POST /api/auth/forgot-password - 发送重置邮件
///
/// Always answers success so callers cannot probe which emails exist.
pub async fn forgot_password(
    State(state): State<ServerState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> AppResult<Json<ForgotPasswordResponse>> {
    let Some(account) = user::find_by_email(&state.pool, &req.email).await? else {
        tracing::info!(email = %req.email, "Password reset requested for unknown email");
        return Ok(Json(ForgotPasswordResponse { success: true }));
    };

    if !account.is_active || account.banned {
        return Ok(Json(ForgotPasswordResponse { success: true }));
    }

    let token = password_reset::issue(&state.pool, account.id).await?;

    // Template type is a pure function of the callback URL's typ parameter
    let template = mailer::resolve_template(req.callback_url.as_deref());
    let link = format!(
        "{}/reset-password?token={}",
        state.config.app_base_url.trim_end_matches('/'),
        token
    );

    if let Err(e) = state
        .mailer
        .send_template(
            &account.email,
            template,
            &[
                ("name", account.display_name.as_str()),
                ("link", link.as_str()),
                ("token", token.as_str()),
            ],
        )
        .await
    {
        // The token is already stored; a mail failure should not reveal it
        tracing::error!(error = %e, "Failed to send password reset email");
    }

    security_log!("INFO", "password_reset_requested", user_id = account.id);
    Ok(Json(ForgotPasswordResponse { success: true }))
}

#[derive(Serialize)]
pub struct ResetPasswordResponse {
    pub success: bool,
}

/// POST /api/auth/reset-password - 使用令牌重置密码
pub async fn reset_password(
    State(state): State<ServerState>,
    Json(req): Json<ResetPasswordRequest>,
) -> AppResult<Json<ResetPasswordResponse>> {
    if req.new_password.len() < 8 {
        return Err(AppError::validation(
            "Password must be at least 8 characters",
        ));
    }
    if req.new_password.len() > crate::utils::validation::MAX_PASSWORD_LEN {
        return Err(AppError::validation("Password is too long"));
    }

    let user_id = password_reset::consume(&state.pool, &req.token).await?;

    let new_hash = hash_password(&req.new_password)?;
    user::set_password_hash(&state.pool, user_id, &new_hash).await?;

    security_log!("INFO", "password_reset_completed", user_id = user_id);

    // Best-effort confirmation email
    if let Ok(Some(account)) = user::find_by_id(&state.pool, user_id).await {
        let _ = state
            .mailer
            .send_template(
                &account.email,
                mailer::EmailTemplate::ResetPassword,
                &[("name", account.display_name.as_str())],
            )
            .await;
    }

    Ok(Json(ResetPasswordResponse { success: true }))
}
