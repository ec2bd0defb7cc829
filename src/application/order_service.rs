use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::catalog::Item;
use crate::domain::client::{Client, OrderSnapshot};
use crate::domain::discount::Discount;
use crate::domain::errors::DomainError;
use crate::domain::merge::{distinct_ids, plan_merge};
use crate::domain::order::{
    compute_order_total, validate_selections, LineSelection, ListResult, NewOrder, Order,
    OrderChanges, OrderFilter, OrderLine, OrderStatus, OrderTotals, UNKNOWN_ITEM,
};
use crate::domain::ports::{ClientRepository, ItemRepository, OrderNotification, OrderRepository};

use super::notification::NotificationDispatcher;

#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub client_id: Uuid,
    pub delivery_date: NaiveDate,
    pub notes: Option<String>,
    pub lines: Vec<LineSelection>,
}

#[derive(Debug, Clone)]
pub struct EditOrder {
    pub delivery_date: NaiveDate,
    pub status: OrderStatus,
    pub notes: Option<String>,
    pub lines: Vec<LineSelection>,
}

#[derive(Debug, Clone)]
pub struct DocumentLine {
    pub item_id: Uuid,
    pub item_name: String,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub line_total: BigDecimal,
}

/// An order resolved against the catalog and client directory, ready to render.
#[derive(Debug, Clone)]
pub struct OrderDocument {
    pub order: Order,
    pub client: Client,
    pub lines: Vec<DocumentLine>,
    pub discount: Discount,
}

#[derive(Clone)]
pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    clients: Arc<dyn ClientRepository>,
    items: Arc<dyn ItemRepository>,
    notifications: NotificationDispatcher,
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        clients: Arc<dyn ClientRepository>,
        items: Arc<dyn ItemRepository>,
        notifications: NotificationDispatcher,
    ) -> Self {
        Self {
            orders,
            clients,
            items,
            notifications,
        }
    }

    /// Snapshot catalog prices for `selections`. Each line in `existing`
    /// lends its recorded price to at most one selection of the same item,
    /// in order; only selections left over take the catalog price.
    fn price_lines(
        &self,
        selections: &[LineSelection],
        existing: &[OrderLine],
    ) -> Result<Vec<OrderLine>, DomainError> {
        validate_selections(selections)?;

        let ids: Vec<Uuid> = selections.iter().map(|s| s.item_id).collect();
        let catalog: HashMap<Uuid, Item> = self
            .items
            .find_many(&ids)?
            .into_iter()
            .map(|i| (i.id, i))
            .collect();

        let mut recorded: HashMap<Uuid, VecDeque<BigDecimal>> = HashMap::new();
        for line in existing {
            recorded
                .entry(line.item_id)
                .or_default()
                .push_back(line.unit_price.clone());
        }

        selections
            .iter()
            .map(|sel| {
                let snapshot = recorded.get_mut(&sel.item_id).and_then(VecDeque::pop_front);
                let unit_price = match snapshot {
                    Some(price) => price,
                    None => catalog
                        .get(&sel.item_id)
                        .map(|i| i.unit_price.clone())
                        .ok_or_else(|| {
                            DomainError::InvalidInput(format!("unknown item {}", sel.item_id))
                        })?,
                };
                Ok(OrderLine {
                    item_id: sel.item_id,
                    quantity: sel.quantity,
                    unit_price,
                })
            })
            .collect()
    }

    /// Price a prospective order without storing anything.
    pub fn quote(&self, selections: &[LineSelection]) -> Result<OrderTotals, DomainError> {
        if selections.is_empty() {
            return compute_order_total(&[]);
        }
        let lines = self.price_lines(selections, &[])?;
        compute_order_total(&lines)
    }

    pub fn create_order(&self, req: PlaceOrder) -> Result<Order, DomainError> {
        let client = self
            .clients
            .find_by_id(req.client_id)?
            .ok_or(DomainError::NotFound("Client"))?;

        let lines = self.price_lines(&req.lines, &[])?;
        let totals = compute_order_total(&lines)?;

        let order = self.orders.create(NewOrder {
            id: Uuid::new_v4(),
            client_id: client.id,
            lines,
            delivery_date: req.delivery_date,
            status: OrderStatus::Pending,
            notes: req.notes.clone(),
            total: totals.persisted_total(),
            merged_from: vec![],
        })?;
        log::info!(
            "Order {} created for client {} ({} lines, total {})",
            order.id,
            client.id,
            order.lines.len(),
            order.total
        );

        let snapshot = OrderSnapshot {
            notes: req.notes,
            lines: req.lines,
        };
        if let Err(e) = self.clients.set_last_order(client.id, snapshot) {
            log::warn!("Could not store last order for client {}: {}", client.id, e);
        }

        self.notifications.dispatch(OrderNotification {
            order_id: short_id(order.id),
            client_name: client.name,
            total: order.total.clone(),
            item_count: order.lines.len(),
            delivery_date: order.delivery_date,
        });

        Ok(order)
    }

    pub fn get_order(&self, id: Uuid) -> Result<Order, DomainError> {
        self.orders
            .find_by_id(id)?
            .ok_or(DomainError::NotFound("Order"))
    }

    pub fn list_orders(
        &self,
        filter: &OrderFilter,
        page: i64,
        limit: i64,
    ) -> Result<ListResult, DomainError> {
        self.orders.list(filter, page, limit)
    }

    pub fn update_order(&self, id: Uuid, edit: EditOrder) -> Result<Order, DomainError> {
        let existing = self.get_order(id)?;
        let lines = self.price_lines(&edit.lines, &existing.lines)?;
        let totals = compute_order_total(&lines)?;

        self.orders
            .update(
                id,
                OrderChanges {
                    lines,
                    delivery_date: edit.delivery_date,
                    status: edit.status,
                    notes: edit.notes,
                    total: totals.persisted_total(),
                },
            )?
            .ok_or(DomainError::NotFound("Order"))
    }

    pub fn set_status(&self, id: Uuid, status: OrderStatus) -> Result<Order, DomainError> {
        self.orders
            .set_status(id, status)?
            .ok_or(DomainError::NotFound("Order"))
    }

    pub fn delete_order(&self, id: Uuid) -> Result<(), DomainError> {
        if !self.orders.delete(id)? {
            return Err(DomainError::NotFound("Order"));
        }
        log::info!("Order {} deleted", id);
        Ok(())
    }

    /// Replace two or more pending orders of one client by a single order.
    ///
    /// The merged order is written first and remembers its sources in
    /// `merged_from`; the sources are deleted afterwards. If that delete
    /// fails, or removes fewer sources than planned because another request
    /// got to one of them first, the merged order is removed again. If even
    /// that fails the caller gets `MergeIncomplete` so an operator can run
    /// [`OrderService::reconcile_merges`].
    pub fn merge_orders(
        &self,
        order_ids: &[Uuid],
        new_delivery_date: NaiveDate,
        today: NaiveDate,
    ) -> Result<Order, DomainError> {
        let ids = distinct_ids(order_ids);
        let sources = self.orders.find_many(&ids)?;
        let plan = plan_merge(&ids, &sources, new_delivery_date, today)?;

        let merged = self.orders.create(plan.merged)?;

        let deleted = match self.orders.delete_many(&plan.source_ids) {
            Ok(n) if n == plan.source_ids.len() => Ok(()),
            Ok(n) => Err(DomainError::Remote(format!(
                "deleted {} of {} merge sources",
                n,
                plan.source_ids.len()
            ))),
            Err(e) => Err(e),
        };
        if let Err(delete_err) = deleted {
            log::warn!(
                "Deleting merge sources {:?} failed ({}); removing merged order {}",
                plan.source_ids,
                delete_err,
                merged.id
            );
            return match self.orders.delete(merged.id) {
                Ok(_) => Err(delete_err),
                Err(undo_err) => {
                    log::error!(
                        "Merge left duplicates: order {} and its sources {:?} are all live ({})",
                        merged.id,
                        plan.source_ids,
                        undo_err
                    );
                    Err(DomainError::MergeIncomplete {
                        merged_id: merged.id,
                        source_ids: plan.source_ids,
                    })
                }
            };
        }

        log::info!(
            "Merged orders {:?} into {} (subtotal {}, {}% discount, total {})",
            plan.source_ids,
            merged.id,
            plan.totals.subtotal(),
            plan.totals.discount.discount_percentage,
            merged.total
        );
        Ok(merged)
    }

    /// Delete sources that a merged order already replaced. Returns how many
    /// orders were removed.
    pub fn reconcile_merges(&self) -> Result<usize, DomainError> {
        let merged = self.orders.list_merged()?;
        let candidates: Vec<Uuid> = merged
            .iter()
            .flat_map(|o| o.merged_from.iter().copied())
            .collect();
        if candidates.is_empty() {
            return Ok(0);
        }

        let live: Vec<Uuid> = self
            .orders
            .find_many(&candidates)?
            .into_iter()
            .map(|o| o.id)
            .collect();
        if live.is_empty() {
            return Ok(0);
        }

        let removed = self.orders.delete_many(&live)?;
        log::info!("Reconciled merges: removed superseded orders {:?}", live);
        Ok(removed)
    }

    /// Resolve an order for export. Exporting a pending order moves it to
    /// processing.
    pub fn export_order(&self, id: Uuid) -> Result<OrderDocument, DomainError> {
        let mut order = self.get_order(id)?;
        let client = self
            .clients
            .find_by_id(order.client_id)?
            .ok_or(DomainError::NotFound("Client"))?;

        let ids: Vec<Uuid> = order.lines.iter().map(|l| l.item_id).collect();
        let names: HashMap<Uuid, String> = self
            .items
            .find_many(&ids)?
            .into_iter()
            .map(|i| (i.id, i.name))
            .collect();

        let lines = order
            .lines
            .iter()
            .map(|l| DocumentLine {
                item_id: l.item_id,
                item_name: names
                    .get(&l.item_id)
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_ITEM.to_string()),
                quantity: l.quantity,
                unit_price: l.unit_price.clone(),
                line_total: crate::domain::order::display_line_total(l),
            })
            .collect();
        let discount = compute_order_total(&order.lines)?.discount;

        if order.status == OrderStatus::Pending {
            order = self.set_status(order.id, OrderStatus::Processing)?;
            log::info!("Order {} exported; now processing", order.id);
        }

        Ok(OrderDocument {
            order,
            client,
            lines,
            discount,
        })
    }
}

/// The last eight characters of the id, as shown to staff.
pub fn short_id(id: Uuid) -> String {
    let s = id.to_string();
    s[s.len() - 8..].to_string()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::domain::catalog::ItemInput;
    use crate::domain::client::ClientInput;
    use crate::infrastructure::memory::{
        InMemoryClientRepository, InMemoryItemRepository, InMemoryOrderRepository,
        RecordingNotifier,
    };

    struct Fixture {
        service: OrderService,
        orders: Arc<InMemoryOrderRepository>,
        clients: Arc<InMemoryClientRepository>,
        items: Arc<InMemoryItemRepository>,
        notifier: Arc<RecordingNotifier>,
    }

    fn fixture_with(notifier: RecordingNotifier) -> Fixture {
        let orders = Arc::new(InMemoryOrderRepository::default());
        let clients = Arc::new(InMemoryClientRepository::default());
        let items = Arc::new(InMemoryItemRepository::default());
        let notifier = Arc::new(notifier);
        let service = OrderService::new(
            orders.clone(),
            clients.clone(),
            items.clone(),
            NotificationDispatcher::new(notifier.clone()),
        );
        Fixture {
            service,
            orders,
            clients,
            items,
            notifier,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(RecordingNotifier::default())
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::from_str(s).expect("valid date")
    }

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).expect("valid decimal")
    }

    impl Fixture {
        fn client(&self, email: &str) -> Client {
            self.clients
                .create(ClientInput {
                    name: "Bistro Brno".to_string(),
                    address: "Brno".to_string(),
                    vat_id: "CZ1".to_string(),
                    phone: "1".to_string(),
                    email: email.to_string(),
                    notes: None,
                })
                .expect("create client")
        }

        fn item(&self, name: &str, price: &str) -> Item {
            self.items
                .create(ItemInput {
                    name: name.to_string(),
                    category: "Coffee".to_string(),
                    unit_price: dec(price),
                    weight_grams: 250,
                    picture_url: None,
                    description: None,
                })
                .expect("create item")
        }

        fn place(&self, client: &Client, lines: &[(&Item, i32)]) -> Order {
            self.service
                .create_order(PlaceOrder {
                    client_id: client.id,
                    delivery_date: date("2026-10-20"),
                    notes: None,
                    lines: lines
                        .iter()
                        .map(|(i, q)| LineSelection {
                            item_id: i.id,
                            quantity: *q,
                        })
                        .collect(),
                })
                .expect("create order")
        }
    }

    #[tokio::test]
    async fn create_order_snapshots_prices_and_applies_discount() {
        let f = fixture();
        let client = f.client("bistro@example.cz");
        let beans = f.item("Beans", "300");

        let order = f.place(&client, &[(&beans, 2)]);

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.lines[0].unit_price, dec("300"));
        assert_eq!(order.total, dec("540"));

        let stored = f.clients.find_by_id(client.id).unwrap().unwrap();
        let snapshot = stored.last_order.expect("snapshot stored");
        assert_eq!(snapshot.lines[0].quantity, 2);
    }

    #[tokio::test]
    async fn catalog_price_change_does_not_touch_existing_totals() {
        let f = fixture();
        let client = f.client("bistro@example.cz");
        let beans = f.item("Beans", "100");
        let order = f.place(&client, &[(&beans, 3)]);

        f.items
            .update(
                beans.id,
                ItemInput {
                    name: "Beans".to_string(),
                    category: "Coffee".to_string(),
                    unit_price: dec("999"),
                    weight_grams: 250,
                    picture_url: None,
                    description: None,
                },
            )
            .unwrap();

        let reloaded = f.service.get_order(order.id).expect("order");
        assert_eq!(reloaded.total, dec("300"));
        assert_eq!(reloaded.lines[0].unit_price, dec("100"));
    }

    #[tokio::test]
    async fn editing_keeps_snapshot_prices_for_existing_items() {
        let f = fixture();
        let client = f.client("bistro@example.cz");
        let beans = f.item("Beans", "100");
        let cups = f.item("Cups", "50");
        let order = f.place(&client, &[(&beans, 1)]);

        f.items
            .update(
                beans.id,
                ItemInput {
                    name: "Beans".to_string(),
                    category: "Coffee".to_string(),
                    unit_price: dec("200"),
                    weight_grams: 250,
                    picture_url: None,
                    description: None,
                },
            )
            .unwrap();

        let edited = f
            .service
            .update_order(
                order.id,
                EditOrder {
                    delivery_date: date("2026-10-25"),
                    status: OrderStatus::Pending,
                    notes: Some("add cups".to_string()),
                    lines: vec![
                        LineSelection {
                            item_id: beans.id,
                            quantity: 5,
                        },
                        LineSelection {
                            item_id: cups.id,
                            quantity: 2,
                        },
                    ],
                },
            )
            .expect("edit");

        // 5 × 100 (snapshot) + 2 × 50 = 600 → 10 %.
        assert_eq!(edited.total, dec("540"));
        assert_eq!(edited.delivery_date, date("2026-10-25"));
    }

    #[tokio::test]
    async fn editing_merged_order_keeps_each_line_price() {
        let f = fixture();
        let client = f.client("bistro@example.cz");
        let beans = f.item("Beans", "10");
        let a = f.place(&client, &[(&beans, 1)]);
        f.items
            .update(
                beans.id,
                ItemInput {
                    name: "Beans".to_string(),
                    category: "Coffee".to_string(),
                    unit_price: dec("12.50"),
                    weight_grams: 250,
                    picture_url: None,
                    description: None,
                },
            )
            .unwrap();
        let b = f.place(&client, &[(&beans, 2)]);
        let merged = f
            .service
            .merge_orders(&[a.id, b.id], date("2026-11-01"), date("2026-10-16"))
            .expect("merge");
        assert_eq!(merged.total, dec("35"));

        let same_lines: Vec<LineSelection> = merged
            .lines
            .iter()
            .map(|l| LineSelection {
                item_id: l.item_id,
                quantity: l.quantity,
            })
            .collect();
        let edited = f
            .service
            .update_order(
                merged.id,
                EditOrder {
                    delivery_date: date("2026-11-02"),
                    status: OrderStatus::Pending,
                    notes: None,
                    lines: same_lines,
                },
            )
            .expect("edit");

        assert_eq!(edited.total, dec("35"));
        let prices: Vec<BigDecimal> = edited.lines.iter().map(|l| l.unit_price.clone()).collect();
        assert_eq!(prices, vec![dec("10"), dec("12.50")]);
    }

    #[tokio::test]
    async fn unknown_item_and_bad_quantity_are_rejected_before_writing() {
        let f = fixture();
        let client = f.client("bistro@example.cz");
        let beans = f.item("Beans", "100");

        let err = f
            .service
            .create_order(PlaceOrder {
                client_id: client.id,
                delivery_date: date("2026-10-20"),
                notes: None,
                lines: vec![LineSelection {
                    item_id: Uuid::new_v4(),
                    quantity: 1,
                }],
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));

        let err = f
            .service
            .create_order(PlaceOrder {
                client_id: client.id,
                delivery_date: date("2026-10-20"),
                notes: None,
                lines: vec![LineSelection {
                    item_id: beans.id,
                    quantity: 0,
                }],
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
        assert!(f.orders.list_all().unwrap().is_empty());
    }

    #[tokio::test]
    async fn notification_failure_does_not_fail_creation() {
        let f = fixture_with(RecordingNotifier::failing());
        let client = f.client("bistro@example.cz");
        let beans = f.item("Beans", "100");

        let order = f.place(&client, &[(&beans, 1), (&beans, 2)]);
        // Let the spawned notification run.
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        assert!(f.service.get_order(order.id).is_ok());
        let sent = f.notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].item_count, 2);
        assert_eq!(sent[0].order_id, short_id(order.id));
        assert_eq!(sent[0].client_name, "Bistro Brno");
    }

    #[tokio::test]
    async fn merge_recomputes_discount_over_combined_lines() {
        let f = fixture();
        let client = f.client("bistro@example.cz");
        let beans = f.item("Beans", "100");
        let a = f.place(&client, &[(&beans, 4)]);
        let b = f.place(&client, &[(&beans, 3)]);
        assert_eq!(a.total, dec("400"));
        assert_eq!(b.total, dec("300"));

        let merged = f
            .service
            .merge_orders(&[a.id, b.id], date("2026-11-01"), date("2026-10-16"))
            .expect("merge");

        assert_eq!(merged.total, dec("630"));
        assert_eq!(merged.subtotal(), dec("700"));
        assert_eq!(merged.lines.len(), 2);
        assert_eq!(merged.status, OrderStatus::Pending);
        assert_eq!(merged.merged_from, vec![a.id, b.id]);

        let remaining = f.orders.list_all().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, merged.id);
    }

    #[tokio::test]
    async fn rejected_merge_changes_nothing() {
        let f = fixture();
        let alice = f.client("alice@example.cz");
        let bob = f.client("bob@example.cz");
        let beans = f.item("Beans", "100");
        let a = f.place(&alice, &[(&beans, 1)]);
        let b = f.place(&bob, &[(&beans, 1)]);

        let err = f
            .service
            .merge_orders(&[a.id, b.id], date("2026-11-01"), date("2026-10-16"))
            .unwrap_err();
        assert!(matches!(err, DomainError::Precondition(_)));

        let err = f
            .service
            .merge_orders(&[a.id], date("2026-11-01"), date("2026-10-16"))
            .unwrap_err();
        assert!(matches!(err, DomainError::Precondition(_)));

        assert_eq!(f.orders.list_all().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn failed_source_delete_rolls_back_or_reports_incomplete() {
        let f = fixture();
        let client = f.client("bistro@example.cz");
        let beans = f.item("Beans", "100");
        let a = f.place(&client, &[(&beans, 1)]);
        let b = f.place(&client, &[(&beans, 1)]);

        // Both deletes fail: the merged order cannot be undone either.
        f.orders.fail_delete(true);
        let err = f
            .service
            .merge_orders(&[a.id, b.id], date("2026-11-01"), date("2026-10-16"))
            .unwrap_err();
        let merged_id = match err {
            DomainError::MergeIncomplete {
                merged_id,
                source_ids,
            } => {
                assert_eq!(source_ids, vec![a.id, b.id]);
                merged_id
            }
            other => panic!("expected MergeIncomplete, got {:?}", other),
        };
        assert_eq!(f.orders.list_all().unwrap().len(), 3);

        // Once the store recovers, reconciliation retires the sources.
        f.orders.fail_delete(false);
        assert_eq!(f.service.reconcile_merges().expect("reconcile"), 2);
        let remaining = f.orders.list_all().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, merged_id);
        assert_eq!(f.service.reconcile_merges().expect("reconcile again"), 0);
    }

    #[tokio::test]
    async fn source_deleted_elsewhere_undoes_the_merge() {
        let f = fixture();
        let client = f.client("bistro@example.cz");
        let beans = f.item("Beans", "100");
        let a = f.place(&client, &[(&beans, 1)]);
        let b = f.place(&client, &[(&beans, 1)]);

        f.orders.delete_elsewhere_before_next_batch(a.id);
        let err = f
            .service
            .merge_orders(&[a.id, b.id], date("2026-11-01"), date("2026-10-16"))
            .unwrap_err();
        assert!(matches!(err, DomainError::Remote(_)));
        assert!(f.orders.list_merged().unwrap().is_empty());
    }

    #[tokio::test]
    async fn short_source_delete_without_undo_reports_incomplete() {
        let f = fixture();
        let client = f.client("bistro@example.cz");
        let beans = f.item("Beans", "100");
        let a = f.place(&client, &[(&beans, 1)]);
        let b = f.place(&client, &[(&beans, 1)]);

        f.orders.delete_elsewhere_before_next_batch(a.id);
        f.orders.fail_single_delete(true);
        let err = f
            .service
            .merge_orders(&[a.id, b.id], date("2026-11-01"), date("2026-10-16"))
            .unwrap_err();
        match err {
            DomainError::MergeIncomplete {
                merged_id,
                source_ids,
            } => {
                assert_eq!(source_ids, vec![a.id, b.id]);
                assert!(f.orders.find_by_id(merged_id).unwrap().is_some());
            }
            other => panic!("expected MergeIncomplete, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn failed_insert_leaves_sources_alone() {
        let f = fixture();
        let client = f.client("bistro@example.cz");
        let beans = f.item("Beans", "100");
        let a = f.place(&client, &[(&beans, 1)]);
        let b = f.place(&client, &[(&beans, 1)]);

        f.orders.fail_create(true);
        let err = f
            .service
            .merge_orders(&[a.id, b.id], date("2026-11-01"), date("2026-10-16"))
            .unwrap_err();
        assert!(matches!(err, DomainError::Remote(_)));
        assert_eq!(f.orders.list_all().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn export_resolves_names_and_moves_to_processing_once() {
        let f = fixture();
        let client = f.client("bistro@example.cz");
        let beans = f.item("Beans", "100");
        let cups = f.item("Cups", "10");
        let order = f.place(&client, &[(&beans, 1), (&cups, 3)]);
        f.items.delete(cups.id).unwrap();

        let doc = f.service.export_order(order.id).expect("export");
        assert_eq!(doc.order.status, OrderStatus::Processing);
        assert_eq!(doc.lines[0].item_name, "Beans");
        assert_eq!(doc.lines[1].item_name, UNKNOWN_ITEM);
        assert_eq!(doc.lines[1].line_total, dec("30.00"));
        assert_eq!(doc.discount.subtotal, dec("130"));

        f.service
            .set_status(order.id, OrderStatus::Shipped)
            .expect("ship");
        let doc = f.service.export_order(order.id).expect("export again");
        assert_eq!(doc.order.status, OrderStatus::Shipped);
    }

    #[tokio::test]
    async fn quote_prices_without_writing() {
        let f = fixture();
        let beans = f.item("Beans", "1199.99");
        let totals = f
            .service
            .quote(&[LineSelection {
                item_id: beans.id,
                quantity: 1,
            }])
            .expect("quote");
        assert_eq!(totals.persisted_total(), dec("1079.99"));
        assert!(f.orders.list_all().unwrap().is_empty());

        let empty = f.service.quote(&[]).expect("empty quote");
        assert_eq!(empty.discount.discount_percentage, 0);
    }

    #[test]
    fn short_id_is_last_eight_chars() {
        let id = Uuid::from_str("123e4567-e89b-12d3-a456-426614174000").unwrap();
        assert_eq!(short_id(id), "14174000");
    }
}
