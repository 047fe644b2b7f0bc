pub mod config;
pub mod item;
pub mod provider;

pub use item::BookRecord;
pub use provider::ClientError;
