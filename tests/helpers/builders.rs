use apsis::engine::AccessState;
use apsis::entities::{Project, Role, User};
use apsis::ids::{Description, Name, OperationId, ProjectId, RoleId, UserId};

/// Builder for test users
pub struct UserBuilder {
    id: String,
    name: String,
    email: String,
}

impl UserBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            email: format!("{id}@example.com"),
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_email(mut self, email: &str) -> Self {
        self.email = email.to_string();
        self
    }

    pub fn build(self) -> User {
        User::new(UserId::new(self.id), Name::new(self.name), self.email)
    }

    pub fn create(self, state: &mut AccessState) -> User {
        let user = self.build();
        state
            .insert(user.clone().into())
            .expect("Failed to create test user");
        user
    }
}

/// Builder for test roles
pub struct RoleBuilder {
    id: String,
    name: String,
    description: String,
    operations: Vec<OperationId>,
}

impl RoleBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            operations: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn granting(mut self, operation: &str) -> Self {
        self.operations.push(OperationId::new(operation));
        self
    }

    pub fn build(self) -> Role {
        Role::new(
            RoleId::new(self.id),
            Name::new(self.name),
            Description::new(self.description),
            self.operations,
        )
    }

    pub fn create(self, state: &mut AccessState) -> Role {
        let role = self.build();
        state
            .insert(role.clone().into())
            .expect("Failed to create test role");
        role
    }
}

/// Builder for test projects
pub struct ProjectBuilder {
    id: String,
    name: String,
    description: String,
    owner: String,
}

impl ProjectBuilder {
    pub fn new(id: &str, owner: &str) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            owner: owner.to_string(),
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn build(self) -> Project {
        Project::new(
            ProjectId::new(self.id),
            Name::new(self.name),
            Description::new(self.description),
            UserId::new(self.owner),
        )
    }

    pub fn create(self, state: &mut AccessState) -> Project {
        let project = self.build();
        state
            .insert(project.clone().into())
            .expect("Failed to create test project");
        project
    }
}
