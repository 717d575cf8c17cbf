//! Scoped store connections.

use std::ops::Deref;

use docsource_api::{StoreConnection, StoreConnector, StoreError};
use tracing::debug;

/// Owns an open connection and closes it when dropped, on every exit path.
pub struct ConnectionGuard {
    connection: Box<dyn StoreConnection>,
    store_id: String,
    database_id: String,
}

impl ConnectionGuard {
    pub fn open(connector: &dyn StoreConnector, store_id: &str, database_id: &str) -> Result<Self, StoreError> {
        let connection = connector.connect(store_id, database_id)?;
        debug!(store_id, database_id, "store connection opened");
        Ok(Self {
            connection,
            store_id: store_id.to_string(),
            database_id: database_id.to_string(),
        })
    }
}

impl Deref for ConnectionGuard {
    type Target = dyn StoreConnection;

    fn deref(&self) -> &Self::Target {
        self.connection.as_ref()
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.connection.close();
        debug!(store_id = %self.store_id, database_id = %self.database_id, "store connection released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsource_api::MemoryStore;
    use docsource_types::DocumentPath;

    #[test]
    fn closes_once_when_dropped() {
        let store = MemoryStore::new();
        {
            let guard = ConnectionGuard::open(&store, "p", "db").expect("open");
            let path = DocumentPath::parse("c/r").expect("path");
            let snapshot = guard.resolve(&path).expect("resolve").fetch().expect("fetch");
            assert!(!snapshot.exists);
            assert_eq!(store.stats().closed, 0);
        }
        let stats = store.stats();
        assert_eq!((stats.opened, stats.closed), (1, 1));
    }

    #[test]
    fn failed_open_leaves_nothing_to_close() {
        let store = MemoryStore::new();
        store.fail_connections("boom");
        assert!(ConnectionGuard::open(&store, "p", "db").is_err());
        let stats = store.stats();
        assert_eq!((stats.opened, stats.closed), (0, 0));
    }
}
