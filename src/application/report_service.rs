use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::errors::DomainError;
use crate::domain::ports::{ClientRepository, ItemRepository, OrderRepository};
use crate::domain::report::{build_report, Period, RevenueReport};

#[derive(Clone)]
pub struct ReportService {
    orders: Arc<dyn OrderRepository>,
    clients: Arc<dyn ClientRepository>,
    items: Arc<dyn ItemRepository>,
}

impl ReportService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        clients: Arc<dyn ClientRepository>,
        items: Arc<dyn ItemRepository>,
    ) -> Self {
        Self {
            orders,
            clients,
            items,
        }
    }

    pub fn revenue(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        period: Period,
    ) -> Result<RevenueReport, DomainError> {
        let orders = self.orders.list_all()?;
        let items = self.items.list()?;
        let clients = self.clients.list()?;
        build_report(&orders, &items, &clients, start, end, period)
    }
}
