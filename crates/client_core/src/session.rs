use std::collections::HashMap;

pub const HANDLE_KEY: &str = "allowlist_handle";
pub const ADDRESS_KEY: &str = "allowlist_wallet";

/// Tab-scoped key/value store surviving phase changes of one flow.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    values: HashMap<String, String>,
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// The two fields carried from a successful submission to the confirmation view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionEcho {
    pub handle: String,
    pub address: String,
}

impl SessionEcho {
    pub fn write_to(&self, store: &mut dyn SessionStore) {
        store.set(HANDLE_KEY, &self.handle);
        store.set(ADDRESS_KEY, &self.address);
    }

    /// Missing keys read as empty strings.
    pub fn read_from(store: &dyn SessionStore) -> Self {
        Self {
            handle: store.get(HANDLE_KEY).unwrap_or_default(),
            address: store.get(ADDRESS_KEY).unwrap_or_default(),
        }
    }
}
