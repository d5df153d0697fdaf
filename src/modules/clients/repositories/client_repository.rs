use sqlx::MySqlPool;
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::clients::models::{Client, ClientRequest};

/// MySQL access for clients. Every query is scoped by the owner id.
pub struct ClientRepository {
    pool: MySqlPool,
}

impl ClientRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, owner_id: &str, request: &ClientRequest) -> Result<Client> {
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO clients (id, owner_id, name, gstin, address, state, contact)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(owner_id)
        .bind(&request.name)
        .bind(&request.gstin)
        .bind(&request.address)
        .bind(&request.state)
        .bind(&request.contact)
        .execute(&self.pool)
        .await?;

        Ok(Client {
            id,
            name: request.name.clone(),
            gstin: request.gstin.clone(),
            address: request.address.clone(),
            state: request.state.clone(),
            contact: request.contact.clone(),
        })
    }

    pub async fn find_by_id(&self, owner_id: &str, id: &str) -> Result<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, name, gstin, address, state, contact
            FROM clients
            WHERE owner_id = ? AND id = ?
            "#,
        )
        .bind(owner_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    pub async fn list(&self, owner_id: &str) -> Result<Vec<Client>> {
        let clients = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, name, gstin, address, state, contact
            FROM clients
            WHERE owner_id = ?
            ORDER BY name
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(clients)
    }

    pub async fn update(&self, owner_id: &str, id: &str, request: &ClientRequest) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE clients
            SET name = ?, gstin = ?, address = ?, state = ?, contact = ?
            WHERE owner_id = ? AND id = ?
            "#,
        )
        .bind(&request.name)
        .bind(&request.gstin)
        .bind(&request.address)
        .bind(&request.state)
        .bind(&request.contact)
        .bind(owner_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Client with id '{}' not found",
                id
            )));
        }

        Ok(())
    }

    pub async fn delete(&self, owner_id: &str, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM clients WHERE owner_id = ? AND id = ?")
            .bind(owner_id)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Client with id '{}' not found",
                id
            )));
        }

        Ok(())
    }
}
