pub mod clock;
pub mod forward;
pub mod lock;
pub mod outcome;
pub mod schema;

pub use forward::DocumentForwarder;
pub use outcome::{SyncState, Synced};
pub use schema::SchemaMirror;
