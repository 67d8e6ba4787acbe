use std::collections::BTreeMap;

/// One package's metadata, as an ordered list of fields.
///
/// Every record carries a non-empty `Package` field; the parser rejects
/// blocks that don't.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    name: String,
    fields: Vec<(String, String)>,
}

impl Record {
    pub(crate) fn new(name: String, fields: Vec<(String, String)>) -> Self {
        Self { name, fields }
    }

    /// The `Package` field.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The `Version` field, if present.
    pub fn version(&self) -> Option<&str> {
        self.get("Version")
    }

    /// Look up a field by exact key. Absent fields are `None`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Fields in document order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Package name to record. Read-only once parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Index {
    records: BTreeMap<String, Record>,
}

impl Index {
    /// Insert a record, returning the one it displaced.
    pub(crate) fn insert(&mut self, record: Record) -> Option<Record> {
        self.records.insert(record.name.clone(), record)
    }

    pub fn get(&self, name: &str) -> Option<&Record> {
        self.records.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in package-name order.
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    /// Package names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }
}

impl<'a> IntoIterator for &'a Index {
    type Item = &'a Record;
    type IntoIter = std::collections::btree_map::Values<'a, String, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.values()
    }
}
