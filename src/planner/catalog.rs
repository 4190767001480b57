//! Index catalog
//!
//! Descriptors for the secondary indexes a backend happens to have. The
//! catalog is supplied per call and belongs to the caller; the core never
//! owns or caches it.

/// Metadata for one available secondary index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDescriptor {
    name: String,
    fields: Vec<String>,
}

impl IndexDescriptor {
    /// A simple index: one field, named after it.
    pub fn simple(name: impl Into<String>) -> Self {
        let name = name.into();
        let fields = vec![name.clone()];
        Self { name, fields }
    }

    /// A compound index over the given fields in order.
    pub fn compound(name: impl Into<String>, fields: impl IntoIterator<Item = String>) -> Self {
        Self {
            name: name.into(),
            fields: fields.into_iter().collect(),
        }
    }

    /// The index name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The covered fields, in index order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Whether this index covers more than one field.
    pub fn is_compound(&self) -> bool {
        self.fields.len() > 1
    }
}

/// An insertion-ordered set of index descriptors.
///
/// Order matters: the planner takes the first usable index in caller order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexSet {
    entries: Vec<IndexDescriptor>,
}

impl IndexSet {
    /// An empty catalog. Planning against it degrades to a full scan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a descriptor, replacing a same-named one in place.
    pub fn insert(&mut self, descriptor: IndexDescriptor) {
        match self.entries.iter_mut().find(|d| d.name == descriptor.name) {
            Some(existing) => *existing = descriptor,
            None => self.entries.push(descriptor),
        }
    }

    /// Builder-style [`IndexSet::insert`].
    pub fn with(mut self, descriptor: IndexDescriptor) -> Self {
        self.insert(descriptor);
        self
    }

    /// Looks up a descriptor by name.
    pub fn get(&self, name: &str) -> Option<&IndexDescriptor> {
        self.entries.iter().find(|d| d.name == name)
    }

    /// Iterates descriptors in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &IndexDescriptor> {
        self.entries.iter()
    }

    /// Number of descriptors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<IndexDescriptor> for IndexSet {
    fn from_iter<I: IntoIterator<Item = IndexDescriptor>>(iter: I) -> Self {
        let mut set = Self::new();
        for descriptor in iter {
            set.insert(descriptor);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_preserved() {
        let set = IndexSet::new()
            .with(IndexDescriptor::simple("zebra"))
            .with(IndexDescriptor::simple("alpha"));

        let names: Vec<&str> = set.iter().map(IndexDescriptor::name).collect();
        assert_eq!(names, vec!["zebra", "alpha"]);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut set = IndexSet::new()
            .with(IndexDescriptor::simple("a"))
            .with(IndexDescriptor::simple("b"));
        set.insert(IndexDescriptor::compound(
            "a",
            vec!["a".to_string(), "id".to_string()],
        ));

        assert_eq!(set.len(), 2);
        let names: Vec<&str> = set.iter().map(IndexDescriptor::name).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(set.get("a").unwrap().is_compound());
    }

    #[test]
    fn test_simple_descriptor_covers_own_name() {
        let d = IndexDescriptor::simple("kind");
        assert_eq!(d.fields(), &["kind".to_string()]);
        assert!(!d.is_compound());
    }
}
