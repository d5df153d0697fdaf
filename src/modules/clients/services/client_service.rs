use std::sync::Arc;

use crate::core::{AppError, Result};
use crate::modules::clients::models::{Client, ClientRequest};
use crate::modules::clients::repositories::ClientRepository;
use crate::modules::invoices::repositories::InvoiceRepository;

/// Client business logic: CRUD plus the referential-integrity guard.
pub struct ClientService {
    client_repo: Arc<ClientRepository>,
    invoice_repo: Arc<InvoiceRepository>,
}

impl ClientService {
    pub fn new(client_repo: Arc<ClientRepository>, invoice_repo: Arc<InvoiceRepository>) -> Self {
        Self {
            client_repo,
            invoice_repo,
        }
    }

    pub async fn create_client(&self, owner_id: &str, request: ClientRequest) -> Result<Client> {
        request.validate()?;
        self.client_repo.create(owner_id, &request).await
    }

    pub async fn get_client(&self, owner_id: &str, id: &str) -> Result<Client> {
        self.client_repo
            .find_by_id(owner_id, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Client with id '{}' not found", id)))
    }

    pub async fn list_clients(&self, owner_id: &str) -> Result<Vec<Client>> {
        self.client_repo.list(owner_id).await
    }

    pub async fn update_client(
        &self,
        owner_id: &str,
        id: &str,
        request: ClientRequest,
    ) -> Result<Client> {
        request.validate()?;
        self.client_repo.update(owner_id, id, &request).await?;
        self.get_client(owner_id, id).await
    }

    /// Deletes a client unless any invoice still references them.
    /// The store has no foreign keys into the snapshot columns, so the
    /// guard lives here.
    pub async fn delete_client(&self, owner_id: &str, id: &str) -> Result<()> {
        if self.invoice_repo.client_in_use(owner_id, id).await? {
            return Err(AppError::integrity(
                "This client cannot be deleted as they are associated with one or more invoices.",
            ));
        }

        self.client_repo.delete(owner_id, id).await
    }
}
