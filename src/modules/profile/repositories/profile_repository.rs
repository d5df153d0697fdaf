use chrono::Utc;
use sqlx::MySqlPool;

use crate::core::Result;
use crate::modules::profile::models::{BusinessProfile, BusinessProfileRequest};

pub struct ProfileRepository {
    pool: MySqlPool,
}

impl ProfileRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, owner_id: &str) -> Result<Option<BusinessProfile>> {
        let profile = sqlx::query_as::<_, BusinessProfile>(
            r#"
            SELECT name, gstin, address, state, contact, upi_id
            FROM business_profiles
            WHERE owner_id = ?
            "#,
        )
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// One profile per owner; writing replaces the previous one.
    pub async fn upsert(
        &self,
        owner_id: &str,
        request: &BusinessProfileRequest,
    ) -> Result<BusinessProfile> {
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO business_profiles (owner_id, name, gstin, address, state, contact, upi_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                name = VALUES(name), gstin = VALUES(gstin), address = VALUES(address),
                state = VALUES(state), contact = VALUES(contact), upi_id = VALUES(upi_id),
                updated_at = VALUES(updated_at)
            "#,
        )
        .bind(owner_id)
        .bind(&request.name)
        .bind(&request.gstin)
        .bind(&request.address)
        .bind(&request.state)
        .bind(&request.contact)
        .bind(&request.upi_id)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(BusinessProfile {
            name: request.name.clone(),
            gstin: request.gstin.clone(),
            address: request.address.clone(),
            state: request.state.clone(),
            contact: request.contact.clone(),
            upi_id: request.upi_id.clone(),
        })
    }
}
