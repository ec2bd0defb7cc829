//! Revenue reports over a delivery-date range.
//!
//! Product revenue is the undiscounted line value (`quantity × unit_price`);
//! client revenue is the persisted, discounted order total. Orders already
//! superseded by a merged order are skipped so revenue is never counted twice.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};
use chrono::{Datelike, Duration, NaiveDate};
use uuid::Uuid;

use super::catalog::Item;
use super::client::Client;
use super::discount::round_money;
use super::errors::DomainError;
use super::order::Order;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
}

impl Period {
    pub fn as_str(self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
        }
    }
}

impl FromStr for Period {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Period::Daily),
            "weekly" => Ok(Period::Weekly),
            "monthly" => Ok(Period::Monthly),
            other => Err(DomainError::InvalidInput(format!(
                "unknown report period '{}'",
                other
            ))),
        }
    }
}

/// Bucket key: the day, the Monday starting the week, or `YYYY-MM`.
pub fn period_key(date: NaiveDate, period: Period) -> String {
    match period {
        Period::Daily => date.format("%Y-%m-%d").to_string(),
        Period::Weekly => {
            let offset = date.weekday().num_days_from_monday() as i64;
            (date - Duration::days(offset)).format("%Y-%m-%d").to_string()
        }
        Period::Monthly => format!("{}-{:02}", date.year(), date.month()),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PeriodValue {
    pub period: String,
    pub value: BigDecimal,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductReport {
    pub item_id: Uuid,
    pub item_name: String,
    pub category: String,
    pub total_revenue: BigDecimal,
    pub total_quantity: i64,
    pub order_count: i64,
    pub data: Vec<PeriodValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientReport {
    pub client_id: Uuid,
    pub client_name: String,
    pub total_revenue: BigDecimal,
    pub order_count: i64,
    pub data: Vec<PeriodValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportSummary {
    pub total_revenue: BigDecimal,
    pub order_count: i64,
    pub average_order_value: BigDecimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RevenueReport {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub period: Period,
    pub summary: ReportSummary,
    pub products: Vec<ProductReport>,
    pub clients: Vec<ClientReport>,
}

#[derive(Default)]
struct Accum {
    revenue: BigDecimal,
    quantity: i64,
    orders: i64,
    buckets: BTreeMap<String, (BigDecimal, i64)>,
}

impl Accum {
    fn add(&mut self, key: &str, value: &BigDecimal, count: i64) {
        self.revenue += value;
        let bucket = self
            .buckets
            .entry(key.to_string())
            .or_insert_with(|| (BigDecimal::zero(), 0));
        bucket.0 += value;
        bucket.1 += count;
    }

    fn data(self) -> Vec<PeriodValue> {
        self.buckets
            .into_iter()
            .map(|(period, (value, count))| PeriodValue {
                period,
                value: round_money(&value),
                count,
            })
            .collect()
    }
}

/// Ids of orders that a live merged order replaced but which are still stored.
pub fn superseded_ids(orders: &[Order]) -> HashSet<Uuid> {
    let live: HashSet<Uuid> = orders.iter().map(|o| o.id).collect();
    orders
        .iter()
        .flat_map(|o| o.merged_from.iter().copied())
        .filter(|id| live.contains(id))
        .collect()
}

pub fn build_report(
    orders: &[Order],
    items: &[Item],
    clients: &[Client],
    start: NaiveDate,
    end: NaiveDate,
    period: Period,
) -> Result<RevenueReport, DomainError> {
    if start > end {
        return Err(DomainError::InvalidInput(format!(
            "report start {} is after end {}",
            start, end
        )));
    }

    let superseded = superseded_ids(orders);
    let in_range: Vec<&Order> = orders
        .iter()
        .filter(|o| !superseded.contains(&o.id))
        .filter(|o| o.delivery_date >= start && o.delivery_date <= end)
        .collect();

    let items_by_id: HashMap<Uuid, &Item> = items.iter().map(|i| (i.id, i)).collect();
    let clients_by_id: HashMap<Uuid, &Client> = clients.iter().map(|c| (c.id, c)).collect();

    let mut products: HashMap<Uuid, Accum> = HashMap::new();
    let mut by_client: HashMap<Uuid, Accum> = HashMap::new();
    let mut total_revenue = BigDecimal::zero();

    for order in &in_range {
        let key = period_key(order.delivery_date, period);
        total_revenue += &order.total;

        let mut seen_items = HashSet::new();
        for line in &order.lines {
            // Items removed from the catalog have no row to report under.
            if !items_by_id.contains_key(&line.item_id) {
                continue;
            }
            let acc = products.entry(line.item_id).or_default();
            acc.add(&key, &line.subtotal(), line.quantity as i64);
            acc.quantity += line.quantity as i64;
            if seen_items.insert(line.item_id) {
                acc.orders += 1;
            }
        }

        if clients_by_id.contains_key(&order.client_id) {
            let acc = by_client.entry(order.client_id).or_default();
            acc.add(&key, &order.total, 1);
            acc.orders += 1;
        }
    }

    let mut product_reports: Vec<ProductReport> = products
        .into_iter()
        .map(|(item_id, acc)| {
            let item = items_by_id[&item_id];
            ProductReport {
                item_id,
                item_name: item.name.clone(),
                category: item.category.clone(),
                total_revenue: round_money(&acc.revenue),
                total_quantity: acc.quantity,
                order_count: acc.orders,
                data: acc.data(),
            }
        })
        .collect();
    product_reports.sort_by(|a, b| {
        b.total_revenue
            .cmp(&a.total_revenue)
            .then_with(|| a.item_name.cmp(&b.item_name))
    });

    let mut client_reports: Vec<ClientReport> = by_client
        .into_iter()
        .map(|(client_id, acc)| ClientReport {
            client_id,
            client_name: clients_by_id[&client_id].name.clone(),
            total_revenue: round_money(&acc.revenue),
            order_count: acc.orders,
            data: acc.data(),
        })
        .collect();
    client_reports.sort_by(|a, b| {
        b.total_revenue
            .cmp(&a.total_revenue)
            .then_with(|| a.client_name.cmp(&b.client_name))
    });

    let order_count = in_range.len() as i64;
    let average_order_value = if order_count == 0 {
        BigDecimal::zero()
    } else {
        &total_revenue / BigDecimal::from(order_count)
    };

    Ok(RevenueReport {
        start,
        end,
        period,
        summary: ReportSummary {
            total_revenue: round_money(&total_revenue),
            order_count,
            average_order_value: round_money(&average_order_value),
        },
        products: product_reports,
        clients: client_reports,
    })
}
