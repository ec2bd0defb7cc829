use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::catalog::{Item, ItemInput};
use crate::domain::errors::DomainError;
use crate::domain::ports::ItemRepository;
use crate::schema::items;

use super::models::{ItemChangeset, ItemRow, NewItemRow};

pub struct DieselItemRepository {
    pool: DbPool,
}

impl DieselItemRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl ItemRepository for DieselItemRepository {
    fn create(&self, input: ItemInput) -> Result<Item, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(items::table)
            .values(&NewItemRow {
                id: Uuid::new_v4(),
                name: input.name,
                category: input.category,
                unit_price: input.unit_price,
                weight_grams: input.weight_grams,
                picture_url: input.picture_url,
                description: input.description,
            })
            .returning(ItemRow::as_returning())
            .get_result(&mut conn)?;
        Ok(row.into())
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Item>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = items::table
            .filter(items::id.eq(id))
            .select(ItemRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(Item::from))
    }

    fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Item>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = items::table
            .filter(items::id.eq_any(ids))
            .select(ItemRow::as_select())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(Item::from).collect())
    }

    fn list(&self) -> Result<Vec<Item>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = items::table
            .select(ItemRow::as_select())
            .order(items::name.asc())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(Item::from).collect())
    }

    fn update(&self, id: Uuid, input: ItemInput) -> Result<Option<Item>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::update(items::table.filter(items::id.eq(id)))
            .set(&ItemChangeset {
                name: input.name,
                category: input.category,
                unit_price: input.unit_price,
                weight_grams: input.weight_grams,
                picture_url: input.picture_url,
                description: input.description,
            })
            .returning(ItemRow::as_returning())
            .get_result(&mut conn)
            .optional()?;
        Ok(row.map(Item::from))
    }

    fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let deleted = diesel::delete(items::table.filter(items::id.eq(id))).execute(&mut conn)?;
        Ok(deleted > 0)
    }
}
