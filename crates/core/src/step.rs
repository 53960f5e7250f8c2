//! Migration step definitions.

use serde::{Deserialize, Serialize};

use crate::config::ContextNames;
use crate::constants::BASE_PROVISIONING_STEP_ID;
use crate::error::Result;
use crate::names::{CollectionName, DatabaseName, FieldName};
use crate::operation::{Operation, UniqueIndex};

/// An ordered list of operations applied as one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationStep {
    pub id: String,
    pub description: String,
    pub operations: Vec<Operation>,
}

impl MigrationStep {
    /// Base provisioning: `testing` and `products` (unique `sku`) in the common
    /// context, `orders` (unique `orderNumber`) in the order service context.
    pub fn base_provisioning(contexts: &ContextNames) -> Result<Self> {
        let common = contexts.common.clone();
        let orders_db = contexts.order_service.clone();

        let products = CollectionName::new("products")?;
        let orders = CollectionName::new("orders")?;

        let operations = vec![
            Operation::CreateCollection {
                context: common.clone(),
                collection: CollectionName::new("testing")?,
            },
            Operation::CreateCollection { context: common.clone(), collection: products.clone() },
            Operation::CreateUniqueIndex {
                context: common,
                index: UniqueIndex::new(products, FieldName::new("sku")?),
            },
            Operation::CreateCollection { context: orders_db.clone(), collection: orders.clone() },
            Operation::CreateUniqueIndex {
                context: orders_db,
                index: UniqueIndex::new(orders, FieldName::new("orderNumber")?),
            },
        ];

        Ok(Self {
            id: BASE_PROVISIONING_STEP_ID.to_owned(),
            description: "Create base collections and unique indexes".to_owned(),
            operations,
        })
    }

    /// Every `(context, collection)` the step creates, in first-seen order.
    /// Includes collections only implied by an index.
    pub fn collections(&self) -> Vec<(&DatabaseName, &CollectionName)> {
        let mut seen = Vec::new();
        for op in &self.operations {
            let pair = (op.context(), op.collection());
            if !seen.contains(&pair) {
                seen.push(pair);
            }
        }
        seen
    }

    pub fn unique_indexes(&self) -> impl Iterator<Item = (&DatabaseName, &UniqueIndex)> {
        self.operations.iter().filter_map(|op| match op {
            Operation::CreateUniqueIndex { context, index } => Some((context, index)),
            Operation::CreateCollection { .. } => None,
        })
    }

    /// Distinct contexts touched by the step, in order.
    pub fn contexts(&self) -> Vec<&DatabaseName> {
        let mut seen: Vec<&DatabaseName> = Vec::new();
        for op in &self.operations {
            if !seen.contains(&op.context()) {
                seen.push(op.context());
            }
        }
        seen
    }
}
