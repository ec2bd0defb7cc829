pub mod access;
pub mod catalog_service;
pub mod client_service;
pub mod notification;
pub mod order_service;
pub mod report_service;

pub use access::{RoleRouter, SessionContext};
pub use catalog_service::CatalogService;
pub use client_service::ClientService;
pub use notification::NotificationDispatcher;
pub use order_service::{EditOrder, OrderDocument, OrderService, PlaceOrder};
pub use report_service::ReportService;
