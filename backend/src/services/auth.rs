//! Authentication service for user registration, login, and token management

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use shared::models::UserRole;
use shared::validation;

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    jwt_secret: String,
    access_token_expiry: i64,
    refresh_token_expiry: i64,
}

/// Input for registering a new account. Industry accounts also create
/// the tenant record.
#[derive(Debug, Deserialize)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub industry_name: Option<String>,
    pub industry_code: Option<String>,
    pub industry_cnpj: Option<String>,
    pub industry_phone: Option<String>,
}

/// Response after successful registration
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub industry_id: Option<Uuid>,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Input for login
#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Input for token refresh
#[derive(Debug, Deserialize)]
pub struct RefreshInput {
    pub refresh_token: String,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    pub role: String,
    pub industry_id: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

/// Authentication tokens
#[derive(Debug, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// User info from database
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    role: String,
    password_hash: String,
    industry_id: Option<Uuid>,
    is_active: bool,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            jwt_secret: config.jwt.secret.clone(),
            access_token_expiry: config.jwt.access_token_expiry,
            refresh_token_expiry: config.jwt.refresh_token_expiry,
        }
    }

    /// Register a new account
    pub async fn register(&self, input: RegisterInput) -> AppResult<RegisterResponse> {
        if let Err(msg) = validation::validate_email(&input.email) {
            return Err(AppError::Validation {
                field: "email".to_string(),
                message: msg.to_string(),
                message_pt: "Formato de e-mail inválido".to_string(),
            });
        }
        if let Err(msg) = validation::validate_password(&input.password) {
            return Err(AppError::Validation {
                field: "password".to_string(),
                message: msg.to_string(),
                message_pt: "A senha deve ter pelo menos 8 caracteres".to_string(),
            });
        }

        // Industry accounts carry the tenant record with them
        if input.role == UserRole::Industry {
            let code = input.industry_code.as_deref().unwrap_or("");
            if input.industry_name.as_deref().unwrap_or("").trim().is_empty() {
                return Err(AppError::Validation {
                    field: "industry_name".to_string(),
                    message: "Industry name is required for industry accounts".to_string(),
                    message_pt: "Nome da indústria é obrigatório".to_string(),
                });
            }
            if let Err(msg) = validation::validate_industry_code(code) {
                return Err(AppError::Validation {
                    field: "industry_code".to_string(),
                    message: msg.to_string(),
                    message_pt: "Código da indústria inválido".to_string(),
                });
            }
            if let Some(ref cnpj) = input.industry_cnpj {
                if let Err(msg) = validation::validate_cnpj(cnpj) {
                    return Err(AppError::Validation {
                        field: "industry_cnpj".to_string(),
                        message: msg.to_string(),
                        message_pt: "CNPJ inválido".to_string(),
                    });
                }
            }
            if let Some(ref phone) = input.industry_phone {
                if let Err(msg) = validation::validate_brazilian_phone(phone) {
                    return Err(AppError::Validation {
                        field: "industry_phone".to_string(),
                        message: msg.to_string(),
                        message_pt: "Número de telefone brasileiro inválido".to_string(),
                    });
                }
            }
        }

        let email_taken =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(&input.email)
                .fetch_one(&self.db)
                .await?;
        if email_taken {
            return Err(AppError::DuplicateEntry("email".to_string()));
        }

        let password_hash = hash(&input.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let mut tx = self.db.begin().await?;

        let industry_id = if input.role == UserRole::Industry {
            let code_taken = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM industries WHERE code = $1)",
            )
            .bind(input.industry_code.as_deref())
            .fetch_one(&mut *tx)
            .await?;
            if code_taken {
                return Err(AppError::DuplicateEntry("industry code".to_string()));
            }

            let id = sqlx::query_scalar::<_, Uuid>(
                "INSERT INTO industries (name, code, cnpj, phone) VALUES ($1, $2, $3, $4) RETURNING id",
            )
            .bind(input.industry_name.as_deref())
            .bind(input.industry_code.as_deref())
            .bind(input.industry_cnpj.as_deref())
            .bind(input.industry_phone.as_deref())
            .fetch_one(&mut *tx)
            .await?;
            Some(id)
        } else {
            None
        };

        let user_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO users (name, email, password_hash, role, industry_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&password_hash)
        .bind(input.role.as_str())
        .bind(industry_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        let tokens = self.generate_tokens(user_id, input.role, industry_id)?;

        tracing::info!(user_id = %user_id, role = %input.role, "Account registered");

        Ok(RegisterResponse {
            user_id,
            industry_id,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: tokens.token_type,
            expires_in: tokens.expires_in,
        })
    }

    /// Authenticate a user and issue tokens
    pub async fn login(&self, input: LoginInput) -> AppResult<AuthTokens> {
        let user = sqlx::query_as::<_, UserRow>(
            "SELECT id, role, password_hash, industry_id, is_active FROM users WHERE email = $1",
        )
        .bind(&input.email)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

        if !user.is_active {
            return Err(AppError::InvalidCredentials);
        }

        let valid = verify(&input.password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;
        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        let role = UserRole::parse(&user.role)
            .ok_or_else(|| AppError::Internal(format!("Unknown user role: {}", user.role)))?;

        self.generate_tokens(user.id, role, user.industry_id)
    }

    /// Exchange a refresh token for fresh tokens
    pub async fn refresh(&self, input: RefreshInput) -> AppResult<AuthTokens> {
        let claims = self.decode_token(&input.refresh_token)?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidToken)?;

        let user = sqlx::query_as::<_, UserRow>(
            "SELECT id, role, password_hash, industry_id, is_active FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidToken)?;

        if !user.is_active {
            return Err(AppError::InvalidToken);
        }

        let role = UserRole::parse(&user.role)
            .ok_or_else(|| AppError::Internal(format!("Unknown user role: {}", user.role)))?;

        self.generate_tokens(user.id, role, user.industry_id)
    }

    fn generate_tokens(
        &self,
        user_id: Uuid,
        role: UserRole,
        industry_id: Option<Uuid>,
    ) -> AppResult<AuthTokens> {
        let now = Utc::now();

        let access_claims = Claims {
            sub: user_id.to_string(),
            role: role.as_str().to_string(),
            industry_id: industry_id.map(|id| id.to_string()),
            exp: (now + Duration::seconds(self.access_token_expiry)).timestamp(),
            iat: now.timestamp(),
        };
        let refresh_claims = Claims {
            sub: user_id.to_string(),
            role: role.as_str().to_string(),
            industry_id: industry_id.map(|id| id.to_string()),
            exp: (now + Duration::seconds(self.refresh_token_expiry)).timestamp(),
            iat: now.timestamp(),
        };

        let key = EncodingKey::from_secret(self.jwt_secret.as_bytes());
        let access_token = encode(&Header::default(), &access_claims, &key)
            .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))?;
        let refresh_token = encode(&Header::default(), &refresh_claims, &key)
            .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))?;

        Ok(AuthTokens {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
        })
    }

    fn decode_token(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => AppError::InvalidToken,
        })
    }
}
