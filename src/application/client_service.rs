use std::sync::Arc;

use uuid::Uuid;

use crate::domain::client::{Client, ClientInput, OrderSnapshot};
use crate::domain::errors::DomainError;
use crate::domain::ports::ClientRepository;

#[derive(Clone)]
pub struct ClientService {
    clients: Arc<dyn ClientRepository>,
}

impl ClientService {
    pub fn new(clients: Arc<dyn ClientRepository>) -> Self {
        Self { clients }
    }

    pub fn list(&self) -> Result<Vec<Client>, DomainError> {
        self.clients.list()
    }

    pub fn get(&self, id: Uuid) -> Result<Client, DomainError> {
        self.clients
            .find_by_id(id)?
            .ok_or(DomainError::NotFound("Client"))
    }

    pub fn create(&self, input: ClientInput) -> Result<Client, DomainError> {
        let client = self.clients.create(input.normalized()?)?;
        log::info!("Client {} ({}) created", client.id, client.email);
        Ok(client)
    }

    pub fn update(&self, id: Uuid, input: ClientInput) -> Result<Client, DomainError> {
        self.clients
            .update(id, input.normalized()?)?
            .ok_or(DomainError::NotFound("Client"))
    }

    /// Deleting a client also removes their orders.
    pub fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        if !self.clients.delete(id)? {
            return Err(DomainError::NotFound("Client"));
        }
        log::info!("Client {} deleted", id);
        Ok(())
    }

    pub fn last_order(&self, id: Uuid) -> Result<Option<OrderSnapshot>, DomainError> {
        Ok(self.get(id)?.last_order)
    }
}
