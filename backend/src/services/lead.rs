//! Lead management service

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::Lead;
use shared::validation;

/// Lead service for managing prospective customers
#[derive(Clone)]
pub struct LeadService {
    db: PgPool,
}

/// Input for capturing a lead
#[derive(Debug, Deserialize)]
pub struct CreateLeadInput {
    pub name: String,
    pub contact: String,
    pub email: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct LeadRow {
    id: Uuid,
    name: String,
    contact: String,
    email: Option<String>,
    created_by: Uuid,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl LeadRow {
    fn into_model(self) -> Lead {
        Lead {
            id: self.id,
            name: self.name,
            contact: self.contact,
            email: self.email,
            created_by: self.created_by,
            notes: self.notes,
            created_at: self.created_at,
        }
    }
}

impl LeadService {
    /// Create a new LeadService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Capture a new lead
    pub async fn create(&self, actor_id: Uuid, input: CreateLeadInput) -> AppResult<Lead> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Lead name cannot be empty".to_string(),
                message_pt: "O nome do lead não pode estar vazio".to_string(),
            });
        }
        // Contact is free-form: a Brazilian phone or an email address
        if validation::validate_brazilian_phone(&input.contact).is_err()
            && validation::validate_email(&input.contact).is_err()
        {
            return Err(AppError::Validation {
                field: "contact".to_string(),
                message: "Contact must be a valid phone number or email".to_string(),
                message_pt: "O contato deve ser um telefone ou e-mail válido".to_string(),
            });
        }
        if let Some(ref email) = input.email {
            if validation::validate_email(email).is_err() {
                return Err(AppError::Validation {
                    field: "email".to_string(),
                    message: "Invalid email format".to_string(),
                    message_pt: "Formato de e-mail inválido".to_string(),
                });
            }
        }

        let row = sqlx::query_as::<_, LeadRow>(
            r#"
            INSERT INTO leads (name, contact, email, created_by, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, contact, email, created_by, notes, created_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.contact)
        .bind(&input.email)
        .bind(actor_id)
        .bind(&input.notes)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into_model())
    }

    /// Get a lead by ID
    pub async fn get(&self, id: Uuid) -> AppResult<Lead> {
        let row = sqlx::query_as::<_, LeadRow>(
            "SELECT id, name, contact, email, created_by, notes, created_at FROM leads WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Lead".to_string()))?;

        Ok(row.into_model())
    }

    /// List leads captured by an actor
    pub async fn list(&self, actor_id: Uuid) -> AppResult<Vec<Lead>> {
        let rows = sqlx::query_as::<_, LeadRow>(
            r#"
            SELECT id, name, contact, email, created_by, notes, created_at
            FROM leads
            WHERE created_by = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(actor_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(LeadRow::into_model).collect())
    }
}
