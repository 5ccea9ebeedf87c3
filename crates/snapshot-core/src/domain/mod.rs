//! Domain model (namespaces, snapshot objects, links, errors).

pub mod errors;
pub mod namespace;
pub mod snapshot;

pub use self::errors::{ResolverError, StoreError, StoreErrorKind};
pub use self::namespace::{METADATA_FILE, Namespace};
pub use self::snapshot::{SnapshotLink, SnapshotMetadata, SnapshotObject};
