pub mod client_repo;
pub mod item_repo;
pub mod models;
pub mod notifier;
pub mod order_repo;

#[cfg(test)]
pub(crate) mod memory;
#[cfg(test)]
pub(crate) mod test_support;

pub use client_repo::DieselClientRepository;
pub use item_repo::DieselItemRepository;
pub use notifier::{HttpOrderNotifier, LogOnlyNotifier};
pub use order_repo::DieselOrderRepository;
