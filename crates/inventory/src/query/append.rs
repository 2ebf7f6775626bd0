use super::Query;
use crate::adapter::Adapter;
use crate::view::Inventory;

/// Applies several queries to the same source and presents their results in
/// order. No fabric is built; each result keeps its own backing.
#[derive(Default)]
pub struct AppendQuery {
    queries: Vec<Box<dyn Query>>,
}

impl AppendQuery {
    /// Append the results of `queries`.
    pub fn new(queries: Vec<Box<dyn Query>>) -> Self {
        Self { queries }
    }

    /// Add another sub-query.
    pub fn with(mut self, query: impl Query + 'static) -> Self {
        self.queries.push(Box::new(query));
        self
    }
}

impl Query for AppendQuery {
    fn execute(&self, inventory: &Inventory, adapter: &Adapter) -> Inventory {
        Inventory::appended(
            self.queries
                .iter()
                .map(|query| query.execute(inventory, adapter))
                .collect(),
        )
    }
}
