pub mod gateway_client;
pub mod order_mapper;
pub mod order_notifier;
pub mod pix_service;
pub mod tracking_store;

#[cfg(test)]
pub mod testing;

pub use gateway_client::GatewayClient;
pub use order_notifier::UtmifyClient;
pub use pix_service::{PixService, ServiceError};
pub use tracking_store::InMemoryTrackingStore;
