use serde::{Deserialize, Serialize};

use crate::ids::{Description, Name, OperationId};

/// What an operation does to the thing it touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Read,
    Write,
    Execute,
}

/// Which part of the server an operation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationScope {
    /// User, project and role administration.
    Metaproject,
    /// The server process itself.
    Server,
    /// Ontology content editing.
    Ontology,
    /// Client UI elements.
    Gui,
}

/// A permission-bearing operation. Roles grant sets of these by id.
///
/// `system` distinguishes the built-in operations seeded at startup from
/// user-defined ones; system operations cannot be renamed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Operation {
    pub id: OperationId,
    pub name: Name,
    pub description: Description,
    pub kind: OperationKind,
    pub scope: OperationScope,
    pub system: bool,
}

impl Operation {
    /// A user-defined operation.
    pub fn new(
        id: OperationId,
        name: Name,
        description: Description,
        kind: OperationKind,
        scope: OperationScope,
    ) -> Self {
        Self {
            id,
            name,
            description,
            kind,
            scope,
            system: false,
        }
    }

    pub fn with_name(&self, name: Name) -> Self {
        Self {
            name,
            ..self.clone()
        }
    }

    pub fn with_description(&self, description: Description) -> Self {
        Self {
            description,
            ..self.clone()
        }
    }
}

fn system_op(id: &str, name: &str, kind: OperationKind, scope: OperationScope) -> Operation {
    Operation {
        id: OperationId::new(id),
        name: Name::new(name),
        description: Description::new(format!("Built-in: {name}")),
        kind,
        scope,
        system: true,
    }
}

/// The statically declared table of built-in operations. Seeded into the
/// operation registry at startup; every entry is `system` and therefore
/// not renamable.
pub fn builtin() -> Vec<Operation> {
    use OperationKind::*;
    use OperationScope::*;

    vec![
        system_op("read", "Read", Read, Ontology),
        system_op("write", "Write", Write, Ontology),
        system_op("add-axiom", "Add axiom", Write, Ontology),
        system_op("remove-axiom", "Remove axiom", Write, Ontology),
        system_op("create-user", "Create user", Write, Metaproject),
        system_op("remove-user", "Remove user", Write, Metaproject),
        system_op("modify-user", "Modify user", Write, Metaproject),
        system_op("create-project", "Create project", Write, Metaproject),
        system_op("remove-project", "Remove project", Write, Metaproject),
        system_op("assign-role", "Assign role", Write, Metaproject),
        system_op("stop-server", "Stop server", Execute, Server),
        system_op("restart-server", "Restart server", Execute, Server),
        system_op("show-admin-panel", "Show admin panel", Read, Gui),
    ]
}
