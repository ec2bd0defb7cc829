//! Planning for the order merge.
//!
//! `plan_merge` checks every precondition and builds the replacement order
//! without touching storage, so a rejected merge never has side effects.

use std::collections::HashSet;

use chrono::NaiveDate;
use uuid::Uuid;

use super::errors::DomainError;
use super::order::{compute_order_total, NewOrder, Order, OrderStatus, OrderTotals};

#[derive(Debug, Clone)]
pub struct MergePlan {
    pub merged: NewOrder,
    pub source_ids: Vec<Uuid>,
    pub totals: OrderTotals,
}

/// Collapse duplicate ids while keeping the order they were given in.
pub fn distinct_ids(order_ids: &[Uuid]) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    order_ids
        .iter()
        .copied()
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Build the merged order from `sources`, which must be the orders named by
/// `order_ids` (in any order).
pub fn plan_merge(
    order_ids: &[Uuid],
    sources: &[Order],
    new_delivery_date: NaiveDate,
    today: NaiveDate,
) -> Result<MergePlan, DomainError> {
    let ids = distinct_ids(order_ids);
    if ids.len() < 2 {
        return Err(DomainError::Precondition(
            "at least two distinct orders are required to merge".to_string(),
        ));
    }
    if new_delivery_date < today {
        return Err(DomainError::Precondition(format!(
            "delivery date {} is in the past",
            new_delivery_date
        )));
    }

    let mut ordered = Vec::with_capacity(ids.len());
    for id in &ids {
        let order = sources
            .iter()
            .find(|o| o.id == *id)
            .ok_or(DomainError::NotFound("Order"))?;
        ordered.push(order);
    }

    let client_id = ordered[0].client_id;
    if ordered.iter().any(|o| o.client_id != client_id) {
        return Err(DomainError::Precondition(
            "orders belong to different clients".to_string(),
        ));
    }
    if let Some(o) = ordered.iter().find(|o| o.status != OrderStatus::Pending) {
        return Err(DomainError::Precondition(format!(
            "order {} is {} and cannot be merged",
            o.id, o.status
        )));
    }

    // Lines are concatenated as-is: same item in two sources stays two lines,
    // each with its own snapshotted price.
    let lines: Vec<_> = ordered.iter().flat_map(|o| o.lines.iter().cloned()).collect();
    let totals = compute_order_total(&lines)?;

    let notes: Vec<&str> = ordered
        .iter()
        .filter_map(|o| o.notes.as_deref())
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .collect();

    let merged = NewOrder {
        id: Uuid::new_v4(),
        client_id,
        lines,
        delivery_date: new_delivery_date,
        status: OrderStatus::Pending,
        notes: if notes.is_empty() {
            None
        } else {
            Some(notes.join("\n"))
        },
        total: totals.persisted_total(),
        merged_from: ids.clone(),
    };

    Ok(MergePlan {
        merged,
        source_ids: ids,
        totals,
    })
}
