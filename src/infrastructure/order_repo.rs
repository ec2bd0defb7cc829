use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{ListResult, NewOrder, Order, OrderChanges, OrderFilter, OrderStatus};
use crate::domain::ports::OrderRepository;
use crate::schema::{order_items, orders};

use super::models::{NewOrderLineRow, NewOrderRow, OrderLineRow, OrderRow};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Remote(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Remote(e.to_string())
    }
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Load the lines for `rows` and assemble domain orders, keeping row order.
fn with_lines(conn: &mut PgConnection, rows: Vec<OrderRow>) -> Result<Vec<Order>, DomainError> {
    let lines = OrderLineRow::belonging_to(&rows)
        .select(OrderLineRow::as_select())
        .order(order_items::position.asc())
        .load(conn)?;

    lines
        .grouped_by(&rows)
        .into_iter()
        .zip(rows)
        .map(|(lines, row)| row.into_domain(lines))
        .collect()
}

fn find_one(conn: &mut PgConnection, id: Uuid) -> Result<Option<Order>, DomainError> {
    let row = orders::table
        .filter(orders::id.eq(id))
        .select(OrderRow::as_select())
        .first(conn)
        .optional()?;

    match row {
        Some(row) => Ok(with_lines(conn, vec![row])?.pop()),
        None => Ok(None),
    }
}

impl OrderRepository for DieselOrderRepository {
    fn create(&self, order: NewOrder) -> Result<Order, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. Insert the order
            diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    id: order.id,
                    client_id: order.client_id,
                    delivery_date: order.delivery_date,
                    status: order.status.as_str().to_string(),
                    notes: order.notes.clone(),
                    total: order.total.clone(),
                    merged_from: order.merged_from.clone(),
                })
                .execute(conn)?;

            // 2. Insert the line snapshots
            let new_lines = NewOrderLineRow::from_lines(order.id, &order.lines);
            if !new_lines.is_empty() {
                diesel::insert_into(order_items::table)
                    .values(&new_lines)
                    .execute(conn)?;
            }

            find_one(conn, order.id)?.ok_or(DomainError::NotFound("Order"))
        })
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;
        find_one(&mut conn, id)
    }

    fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = orders::table
            .filter(orders::id.eq_any(ids))
            .select(OrderRow::as_select())
            .load(&mut conn)?;
        with_lines(&mut conn, rows)
    }

    fn list(&self, filter: &OrderFilter, page: i64, limit: i64) -> Result<ListResult, DomainError> {
        let mut conn = self.pool.get()?;

        let offset = (page - 1) * limit;
        conn.transaction::<_, DomainError, _>(|conn| {
            let mut count_query = orders::table.into_boxed();
            let mut rows_query = orders::table.into_boxed();
            if let Some(client_id) = filter.client_id {
                count_query = count_query.filter(orders::client_id.eq(client_id));
                rows_query = rows_query.filter(orders::client_id.eq(client_id));
            }
            if let Some(status) = filter.status {
                count_query = count_query.filter(orders::status.eq(status.as_str()));
                rows_query = rows_query.filter(orders::status.eq(status.as_str()));
            }

            let total: i64 = count_query.count().get_result(conn)?;

            let rows = rows_query
                .select(OrderRow::as_select())
                .order(orders::created_at.desc())
                .limit(limit)
                .offset(offset)
                .load(conn)?;

            Ok(ListResult {
                items: with_lines(conn, rows)?,
                total,
            })
        })
    }

    fn list_all(&self) -> Result<Vec<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = orders::table
            .select(OrderRow::as_select())
            .order(orders::delivery_date.asc())
            .load(&mut conn)?;
        with_lines(&mut conn, rows)
    }

    fn list_merged(&self) -> Result<Vec<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = orders::table
            .filter(orders::merged_from.ne(Vec::<Uuid>::new()))
            .select(OrderRow::as_select())
            .load(&mut conn)?;
        with_lines(&mut conn, rows)
    }

    fn update(&self, id: Uuid, changes: OrderChanges) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let updated = diesel::update(orders::table.filter(orders::id.eq(id)))
                .set((
                    orders::delivery_date.eq(changes.delivery_date),
                    orders::status.eq(changes.status.as_str()),
                    orders::notes.eq(changes.notes.clone()),
                    orders::total.eq(changes.total.clone()),
                    orders::updated_at.eq(Utc::now()),
                ))
                .execute(conn)?;
            if updated == 0 {
                return Ok(None);
            }

            diesel::delete(order_items::table.filter(order_items::order_id.eq(id)))
                .execute(conn)?;
            let new_lines = NewOrderLineRow::from_lines(id, &changes.lines);
            if !new_lines.is_empty() {
                diesel::insert_into(order_items::table)
                    .values(&new_lines)
                    .execute(conn)?;
            }

            find_one(conn, id)
        })
    }

    fn set_status(&self, id: Uuid, status: OrderStatus) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let updated = diesel::update(orders::table.filter(orders::id.eq(id)))
            .set((
                orders::status.eq(status.as_str()),
                orders::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;
        if updated == 0 {
            return Ok(None);
        }
        find_one(&mut conn, id)
    }

    fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let deleted = diesel::delete(orders::table.filter(orders::id.eq(id))).execute(&mut conn)?;
        Ok(deleted > 0)
    }

    fn delete_many(&self, ids: &[Uuid]) -> Result<usize, DomainError> {
        let mut conn = self.pool.get()?;

        let deleted =
            diesel::delete(orders::table.filter(orders::id.eq_any(ids))).execute(&mut conn)?;
        Ok(deleted)
    }
}
