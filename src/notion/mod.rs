// Notion workspace access
pub mod api;
pub mod client;
pub mod params;

pub use api::NotionApi;
pub use client::NotionClient;

#[cfg(test)]
pub mod mock;
