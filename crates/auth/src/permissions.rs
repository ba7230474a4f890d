use serde::{Deserialize, Serialize};

/// Operation guarded by the role policy.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    CreateItem,
    Restock,
    Sell,
    DeleteItem,
    ViewReports,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::CreateItem,
        Operation::Restock,
        Operation::Sell,
        Operation::DeleteItem,
        Operation::ViewReports,
    ];

    /// Dotted permission name, as shown to clients (e.g. `inventory.items.create`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::CreateItem => "inventory.items.create",
            Operation::Restock => "inventory.items.restock",
            Operation::Sell => "inventory.items.sell",
            Operation::DeleteItem => "inventory.items.delete",
            Operation::ViewReports => "inventory.reports.view",
        }
    }
}

impl core::fmt::Display for Operation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
