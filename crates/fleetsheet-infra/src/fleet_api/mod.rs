//! Fleet management API adapters

mod client;
mod session;

pub use client::{http_client, FleetApiClient};
pub use session::{Credentials, Session};
