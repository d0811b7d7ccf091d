use serde_json::Value;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Logical query identity, e.g. `["auth", "user"]` or `["admin", "users"]`.
pub type QueryKey = Vec<String>;

pub fn query_key(parts: &[&str]) -> QueryKey {
    parts.iter().map(|p| p.to_string()).collect()
}

struct Entry {
    value: Value,
    fetched_at: Instant,
    stale_after: Duration,
}

/// Explicit, explicitly-invalidated query cache. Entries are readable until
/// their stale time elapses; mutations declare the set of keys they
/// invalidate and evict them on success. No ambient invalidation happens.
pub struct QueryCache {
    entries: HashMap<QueryKey, Entry>,
    default_stale: Duration,
}

impl QueryCache {
    pub fn new(default_stale: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            default_stale,
        }
    }

    pub fn insert(&mut self, key: QueryKey, value: Value) {
        let stale_after = self.default_stale;
        self.insert_with_stale(key, value, stale_after);
    }

    pub fn insert_with_stale(&mut self, key: QueryKey, value: Value, stale_after: Duration) {
        self.entries.insert(
            key,
            Entry {
                value,
                fetched_at: Instant::now(),
                stale_after,
            },
        );
    }

    /// Fresh entries only; a stale entry reads as a miss.
    pub fn get(&self, key: &QueryKey) -> Option<&Value> {
        let entry = self.entries.get(key)?;
        if entry.fetched_at.elapsed() >= entry.stale_after {
            return None;
        }
        Some(&entry.value)
    }

    pub fn invalidate(&mut self, key: &QueryKey) {
        self.entries.remove(key);
    }

    /// Apply a successful mutation's declared invalidation set.
    pub fn invalidate_all<'a>(&mut self, keys: impl IntoIterator<Item = &'a QueryKey>) {
        for key in keys {
            self.entries.remove(key);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fresh_entries_are_readable() {
        let mut cache = QueryCache::new(Duration::from_secs(60));
        let key = query_key(&["auth", "user"]);

        cache.insert(key.clone(), json!({ "role": "agent" }));
        assert_eq!(cache.get(&key).unwrap()["role"], "agent");
    }

    #[test]
    fn stale_entries_read_as_misses() {
        let mut cache = QueryCache::new(Duration::from_secs(60));
        let key = query_key(&["admin", "users"]);

        cache.insert_with_stale(key.clone(), json!([]), Duration::ZERO);
        assert!(cache.get(&key).is_none());
    }

    #[test]
    fn mutations_evict_their_declared_keys_only() {
        let mut cache = QueryCache::new(Duration::from_secs(60));
        let users = query_key(&["admin", "users"]);
        let me = query_key(&["auth", "user"]);

        cache.insert(users.clone(), json!([]));
        cache.insert(me.clone(), json!({}));

        // e.g. a create-user mutation declares it invalidates the user list
        cache.invalidate_all([&users]);

        assert!(cache.get(&users).is_none());
        assert!(cache.get(&me).is_some());
    }
}
