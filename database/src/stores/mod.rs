pub mod memory_store;
pub mod pending;
pub mod sqlite_store;
pub mod traits;

pub use memory_store::MemoryStore;
pub use pending::{PendingChanges, PendingOp};
pub use sqlite_store::SqliteStore;
pub use traits::PersistenceGateway;
