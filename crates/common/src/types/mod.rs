use serde::ser::{Serialize, SerializeMap, Serializer};

#[derive(serde::Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
    pub store_connected: bool,
    pub ai_provider: String,
}

/// List payload keyed by the collection name, e.g. `{"menus": [...], "count": 2}`.
#[derive(Debug)]
pub struct ListEnvelope<T> {
    key: &'static str,
    items: Vec<T>,
}

impl<T> ListEnvelope<T> {
    pub fn new(key: &'static str, items: Vec<T>) -> Self {
        Self { key, items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Serialize> Serialize for ListEnvelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(self.key, &self.items)?;
        map.serialize_entry("count", &self.items.len())?;
        map.end()
    }
}
