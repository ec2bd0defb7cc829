use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::client::{normalize_email, Client, ClientInput, OrderSnapshot};
use crate::domain::errors::DomainError;
use crate::domain::ports::ClientRepository;
use crate::schema::clients;

use super::models::{ClientChangeset, ClientRow, NewClientRow};

diesel::define_sql_function!(fn lower(x: diesel::sql_types::Text) -> diesel::sql_types::Text);

pub struct DieselClientRepository {
    pool: DbPool,
}

impl DieselClientRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn duplicate_email(e: DieselError, email: &str) -> DomainError {
    match e {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            DomainError::Precondition(format!("a client with email {} already exists", email))
        }
        other => other.into(),
    }
}

impl ClientRepository for DieselClientRepository {
    fn create(&self, input: ClientInput) -> Result<Client, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(clients::table)
            .values(&NewClientRow {
                id: Uuid::new_v4(),
                name: input.name,
                address: input.address,
                vat_id: input.vat_id,
                phone: input.phone,
                email: input.email.clone(),
                notes: input.notes,
            })
            .returning(ClientRow::as_returning())
            .get_result(&mut conn)
            .map_err(|e| duplicate_email(e, &input.email))?;
        Ok(row.into_domain())
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = clients::table
            .filter(clients::id.eq(id))
            .select(ClientRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(ClientRow::into_domain))
    }

    fn find_by_email(&self, email: &str) -> Result<Option<Client>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = clients::table
            .filter(lower(clients::email).eq(normalize_email(email)))
            .select(ClientRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(ClientRow::into_domain))
    }

    fn list(&self) -> Result<Vec<Client>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = clients::table
            .select(ClientRow::as_select())
            .order(clients::name.asc())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(ClientRow::into_domain).collect())
    }

    fn update(&self, id: Uuid, input: ClientInput) -> Result<Option<Client>, DomainError> {
        let mut conn = self.pool.get()?;

        let email = input.email.clone();
        let row = diesel::update(clients::table.filter(clients::id.eq(id)))
            .set(&ClientChangeset {
                name: input.name,
                address: input.address,
                vat_id: input.vat_id,
                phone: input.phone,
                email: input.email,
                notes: input.notes,
            })
            .returning(ClientRow::as_returning())
            .get_result(&mut conn)
            .optional()
            .map_err(|e| duplicate_email(e, &email))?;
        Ok(row.map(ClientRow::into_domain))
    }

    fn set_last_order(&self, id: Uuid, snapshot: OrderSnapshot) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        let json = serde_json::to_value(&snapshot)
            .map_err(|e| DomainError::Remote(format!("cannot encode order snapshot: {}", e)))?;
        diesel::update(clients::table.filter(clients::id.eq(id)))
            .set(clients::last_order_json.eq(Some(json)))
            .execute(&mut conn)?;
        Ok(())
    }

    fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let deleted = diesel::delete(clients::table.filter(clients::id.eq(id))).execute(&mut conn)?;
        Ok(deleted > 0)
    }
}
