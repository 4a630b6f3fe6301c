use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Customer,
    Courier,
}

impl Role {
    pub fn as_label(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Courier => "courier",
        }
    }
}

#[derive(Debug, Clone)]
struct TokenEntry {
    token: String,
    registered_at: DateTime<Utc>,
}

/// Push-delivery addresses keyed by recipient. An unexpired courier token
/// doubles as the courier's live connectivity marker.
#[derive(Clone)]
pub struct TokenStore {
    entries: Arc<DashMap<(Role, Uuid), TokenEntry>>,
    ttl: Duration,
}

impl TokenStore {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl: Duration::seconds(ttl_secs as i64),
        }
    }

    pub fn register(&self, role: Role, id: Uuid, token: String) {
        self.entries.insert(
            (role, id),
            TokenEntry {
                token,
                registered_at: Utc::now(),
            },
        );
    }

    pub fn deregister(&self, role: Role, id: Uuid) {
        self.entries.remove(&(role, id));
    }

    /// Current token for a recipient; expired entries are pruned and treated
    /// as absent.
    pub fn lookup(&self, role: Role, id: Uuid) -> Option<String> {
        let expired = match self.entries.get(&(role, id)) {
            Some(entry) => {
                if Utc::now() - entry.registered_at <= self.ttl {
                    return Some(entry.token.clone());
                }
                true
            }
            None => false,
        };

        if expired {
            self.entries.remove(&(role, id));
        }
        None
    }

    pub fn is_live(&self, courier_id: Uuid) -> bool {
        self.lookup(Role::Courier, courier_id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use super::{Role, TokenStore};

    #[test]
    fn lookup_returns_registered_token() {
        let store = TokenStore::new(300);
        let id = Uuid::from_u128(1);

        store.register(Role::Courier, id, "tok-1".to_string());
        assert_eq!(store.lookup(Role::Courier, id), Some("tok-1".to_string()));
        assert!(store.is_live(id));

        // Roles are independent keys.
        assert_eq!(store.lookup(Role::Customer, id), None);
    }

    #[test]
    fn deregister_makes_courier_not_live() {
        let store = TokenStore::new(300);
        let id = Uuid::from_u128(2);

        store.register(Role::Courier, id, "tok-2".to_string());
        store.deregister(Role::Courier, id);

        assert!(!store.is_live(id));
        assert_eq!(store.lookup(Role::Courier, id), None);
    }

    #[test]
    fn expired_token_is_pruned() {
        let store = TokenStore::new(60);
        let id = Uuid::from_u128(3);

        store.register(Role::Courier, id, "tok-3".to_string());
        store
            .entries
            .get_mut(&(Role::Courier, id))
            .unwrap()
            .registered_at = Utc::now() - Duration::seconds(61);

        assert_eq!(store.lookup(Role::Courier, id), None);
        assert!(!store.is_live(id));
        assert!(store.entries.is_empty());
    }
}
