mod schema;

pub use schema::{Config, StoreBackend, StoreConfig};
