pub mod model;
pub mod store;

pub use model::{DeletedItem, Login, UriEntry, VaultExport, VaultItem};
pub use store::{Checkpoint, JsonCheckpoint};
