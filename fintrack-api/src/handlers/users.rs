use crate::auth::AuthKeys;
use crate::database::{users as db, Database};
use crate::errors::ApiError;
use actix_web::{web, HttpResponse, Result as ActixResult};
use fintrack_types::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use std::sync::Arc;
use tracing::info;

pub async fn register(
    db: web::Data<Arc<Database>>,
    request: web::Json<RegisterRequest>,
) -> ActixResult<HttpResponse> {
    let req = request.into_inner();

    if req.name.trim().is_empty() || req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::Validation("All fields are required".to_string()).into());
    }

    if db::find_by_email(db.async_connection.clone(), &req.email)
        .await
        .map_err(ApiError::Internal)?
        .is_some()
    {
        return Err(
            ApiError::Validation("User already exists, please login".to_string()).into(),
        );
    }

    let password_hash = bcrypt::hash(&req.password, bcrypt::DEFAULT_COST)
        .map_err(|e| ApiError::Internal(anyhow::Error::new(e)))?;

    let user = db::insert_user(db.async_connection.clone(), &req.name, &req.email, &password_hash)
        .await
        .map_err(ApiError::Internal)?;

    info!("Registered user {} ({})", user.id, user.email);

    Ok(HttpResponse::Created().json(RegisterResponse {
        message: "User registered successfully".to_string(),
        user,
    }))
}

pub async fn login(
    db: web::Data<Arc<Database>>,
    keys: web::Data<AuthKeys>,
    request: web::Json<LoginRequest>,
) -> ActixResult<HttpResponse> {
    let req = request.into_inner();

    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::Validation("All fields are required".to_string()).into());
    }

    let Some((user, password_hash)) = db::find_by_email(db.async_connection.clone(), &req.email)
        .await
        .map_err(ApiError::Internal)?
    else {
        return Err(ApiError::Validation("Invalid email".to_string()).into());
    };

    let matches = bcrypt::verify(&req.password, &password_hash)
        .map_err(|e| ApiError::Internal(anyhow::Error::new(e)))?;
    if !matches {
        return Err(ApiError::Validation("Invalid password".to_string()).into());
    }

    let token = keys
        .issue_token(user.id, &user.email)
        .map_err(ApiError::Internal)?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        message: "User logged in successfully".to_string(),
        token,
    }))
}
