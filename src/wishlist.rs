// Session-scoped wish list of saved locations: append-only, no duplicates
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WishList {
    locations: Vec<String>,
}

impl WishList {
    pub fn new() -> Self {
        Self::default()
    }

    // Returns the list with `name` appended, and whether it was new
    pub fn add_location(mut self, name: impl Into<String>) -> (Self, bool) {
        let name = name.into();
        if self.contains(&name) {
            return (self, false);
        }
        self.locations.push(name);
        (self, true)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.locations.iter().any(|l| l == name)
    }

    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}
