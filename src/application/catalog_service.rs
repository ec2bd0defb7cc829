use std::sync::Arc;

use uuid::Uuid;

use crate::domain::catalog::{Item, ItemInput};
use crate::domain::errors::DomainError;
use crate::domain::ports::ItemRepository;

#[derive(Clone)]
pub struct CatalogService {
    items: Arc<dyn ItemRepository>,
}

impl CatalogService {
    pub fn new(items: Arc<dyn ItemRepository>) -> Self {
        Self { items }
    }

    pub fn list(&self) -> Result<Vec<Item>, DomainError> {
        self.items.list()
    }

    pub fn get(&self, id: Uuid) -> Result<Item, DomainError> {
        self.items
            .find_by_id(id)?
            .ok_or(DomainError::NotFound("Item"))
    }

    pub fn create(&self, input: ItemInput) -> Result<Item, DomainError> {
        input.validate()?;
        let item = self.items.create(input)?;
        log::info!("Item {} '{}' created at {}", item.id, item.name, item.unit_price);
        Ok(item)
    }

    /// A price change here applies to new orders only; existing lines keep
    /// their snapshot.
    pub fn update(&self, id: Uuid, input: ItemInput) -> Result<Item, DomainError> {
        input.validate()?;
        self.items
            .update(id, input)?
            .ok_or(DomainError::NotFound("Item"))
    }

    pub fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        if !self.items.delete(id)? {
            return Err(DomainError::NotFound("Item"));
        }
        log::info!("Item {} deleted", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use bigdecimal::BigDecimal;

    use super::*;
    use crate::infrastructure::memory::InMemoryItemRepository;

    fn input(price: i32) -> ItemInput {
        ItemInput {
            name: "Filter beans".to_string(),
            category: "Coffee".to_string(),
            unit_price: BigDecimal::from(price),
            weight_grams: 500,
            picture_url: None,
            description: Some("Light roast".to_string()),
        }
    }

    #[test]
    fn create_then_update_price() {
        let svc = CatalogService::new(Arc::new(InMemoryItemRepository::default()));
        let item = svc.create(input(180)).expect("create");
        let updated = svc.update(item.id, input(200)).expect("update");
        assert_eq!(updated.unit_price, BigDecimal::from(200));
        assert_eq!(svc.list().expect("list").len(), 1);
    }

    #[test]
    fn invalid_item_is_never_stored() {
        let svc = CatalogService::new(Arc::new(InMemoryItemRepository::default()));
        assert!(matches!(
            svc.create(input(-1)).unwrap_err(),
            DomainError::InvalidInput(_)
        ));
        assert!(svc.list().expect("list").is_empty());
    }

    #[test]
    fn deleting_twice_reports_not_found() {
        let svc = CatalogService::new(Arc::new(InMemoryItemRepository::default()));
        let item = svc.create(input(10)).expect("create");
        svc.delete(item.id).expect("delete");
        assert!(matches!(
            svc.delete(item.id).unwrap_err(),
            DomainError::NotFound("Item")
        ));
    }
}
