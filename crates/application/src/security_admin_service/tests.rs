use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use aula_core::{AppError, AppResult, UserIdentity};
use aula_domain::{
    AccessGraph, Ability, Permission, PermissionId, Principal, Role, RoleId, User, UserId,
};
use tokio::sync::Mutex;

use crate::security_admin_ports::{
    CreateRoleInput, CreateUserInput, RoleDefinition, SecurityAdminRepository, UpdateRoleInput,
    UserAccount,
};
use crate::{AuthorizationRepository, AuthorizationService};

use super::{ADMINISTRATOR_ROLE_NAME, SecurityAdminService};

#[derive(Default)]
struct FakeAccessRepository {
    graph: Mutex<AccessGraph>,
}

fn role_definition(graph: &AccessGraph, role_id: RoleId) -> AppResult<RoleDefinition> {
    let role = graph
        .role(role_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))?;
    let permissions = graph
        .role_permissions(role_id)?
        .iter()
        .map(|permission| permission.name().as_str().to_owned())
        .collect();

    Ok(RoleDefinition {
        role_id,
        name: role.name().as_str().to_owned(),
        description: role.description().map(ToOwned::to_owned),
        permissions,
    })
}

fn user_account(graph: &AccessGraph, user_id: UserId) -> AppResult<UserAccount> {
    let user = graph
        .user(user_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))?;
    let roles = graph
        .user_roles(user_id)?
        .iter()
        .map(|role| role.name().as_str().to_owned())
        .collect();

    Ok(UserAccount {
        user_id,
        name: user.name().as_str().to_owned(),
        email: user.email().as_str().to_owned(),
        roles,
    })
}

#[async_trait]
impl AuthorizationRepository for FakeAccessRepository {
    async fn find_principal(&self, user_id: UserId) -> AppResult<Option<Principal>> {
        Ok(self.graph.lock().await.principal(user_id))
    }
}

#[async_trait]
impl SecurityAdminRepository for FakeAccessRepository {
    async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        Ok(self.graph.lock().await.permissions())
    }

    async fn find_permission(&self, permission_id: PermissionId) -> AppResult<Option<Permission>> {
        Ok(self.graph.lock().await.permission(permission_id).cloned())
    }

    async fn find_permission_by_name(&self, name: &str) -> AppResult<Option<Permission>> {
        Ok(self.graph.lock().await.permission_by_name(name).cloned())
    }

    async fn create_permission(&self, permission: Permission) -> AppResult<()> {
        self.graph.lock().await.insert_permission(permission)
    }

    async fn update_permission(&self, permission: Permission) -> AppResult<()> {
        self.graph
            .lock()
            .await
            .rename_permission(permission.permission_id(), permission.name().as_str())
            .map(|_| ())
    }

    async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()> {
        self.graph
            .lock()
            .await
            .remove_permission(permission_id)
            .map(|_| ())
    }

    async fn list_roles(&self) -> AppResult<Vec<RoleDefinition>> {
        let graph = self.graph.lock().await;
        graph
            .roles()
            .iter()
            .map(|role| role_definition(&graph, role.role_id()))
            .collect()
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<RoleDefinition>> {
        let graph = self.graph.lock().await;
        if graph.role(role_id).is_none() {
            return Ok(None);
        }
        role_definition(&graph, role_id).map(Some)
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<RoleDefinition>> {
        let graph = self.graph.lock().await;
        let Some(role_id) = graph.role_by_name(name).map(Role::role_id) else {
            return Ok(None);
        };
        role_definition(&graph, role_id).map(Some)
    }

    async fn create_role(&self, role: Role, permissions: &[String]) -> AppResult<RoleDefinition> {
        let mut graph = self.graph.lock().await;
        let role_id = role.role_id();
        graph.insert_role(role)?;
        graph.sync_role_permissions(role_id, permissions)?;
        role_definition(&graph, role_id)
    }

    async fn update_role(&self, role: Role) -> AppResult<RoleDefinition> {
        let mut graph = self.graph.lock().await;
        let role_id = role.role_id();
        graph.update_role(role)?;
        role_definition(&graph, role_id)
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        self.graph.lock().await.remove_role(role_id).map(|_| ())
    }

    async fn sync_role_permissions(
        &self,
        role_id: RoleId,
        permissions: &[String],
    ) -> AppResult<RoleDefinition> {
        let mut graph = self.graph.lock().await;
        graph.sync_role_permissions(role_id, permissions)?;
        role_definition(&graph, role_id)
    }

    async fn grant_role_permissions(
        &self,
        role_id: RoleId,
        permissions: &[String],
    ) -> AppResult<RoleDefinition> {
        let mut graph = self.graph.lock().await;
        graph.grant_permissions(role_id, permissions)?;
        role_definition(&graph, role_id)
    }

    async fn list_users(&self) -> AppResult<Vec<UserAccount>> {
        let graph = self.graph.lock().await;
        graph
            .users()
            .iter()
            .map(|user| user_account(&graph, user.user_id()))
            .collect()
    }

    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserAccount>> {
        let graph = self.graph.lock().await;
        if graph.user(user_id).is_none() {
            return Ok(None);
        }
        user_account(&graph, user_id).map(Some)
    }

    async fn create_user(&self, user: User) -> AppResult<UserAccount> {
        let mut graph = self.graph.lock().await;
        let user_id = user.user_id();
        graph.insert_user(user)?;
        user_account(&graph, user_id)
    }

    async fn update_user(&self, user: User) -> AppResult<UserAccount> {
        let mut graph = self.graph.lock().await;
        let user_id = user.user_id();
        graph.update_user(user)?;
        user_account(&graph, user_id)
    }

    async fn delete_user(&self, user_id: UserId) -> AppResult<()> {
        self.graph.lock().await.remove_user(user_id).map(|_| ())
    }

    async fn sync_user_roles(&self, user_id: UserId, role_ids: &[RoleId]) -> AppResult<UserAccount> {
        let mut graph = self.graph.lock().await;
        graph.sync_user_roles(user_id, role_ids)?;
        user_account(&graph, user_id)
    }
}

struct Fixture {
    service: SecurityAdminService,
    repository: Arc<FakeAccessRepository>,
    actor: UserIdentity,
}

/// Builds a service whose actor holds `abilities` through an "Operators" role.
async fn fixture(abilities: &[Ability]) -> AppResult<Fixture> {
    let repository = Arc::new(FakeAccessRepository::default());
    let actor_id = UserId::new();
    {
        let mut graph = repository.graph.lock().await;
        for ability in abilities {
            graph.insert_permission(Permission::new(PermissionId::new(), ability.as_str())?)?;
        }
        let role_id = RoleId::new();
        graph.insert_role(Role::new(role_id, "Operators", None)?)?;
        let names: Vec<String> = abilities
            .iter()
            .map(|ability| ability.as_str().to_owned())
            .collect();
        graph.sync_role_permissions(role_id, &names)?;
        graph.insert_user(User::new(actor_id, "Ada", "ada@example.edu")?)?;
        graph.sync_user_roles(actor_id, &[role_id])?;
    }

    let authorization_service = AuthorizationService::new(repository.clone());
    let service = SecurityAdminService::new(authorization_service, repository.clone());

    Ok(Fixture {
        service,
        repository,
        actor: UserIdentity::new(actor_id.to_string(), "Ada", None),
    })
}

#[tokio::test]
async fn create_role_requires_manage_roles() -> AppResult<()> {
    let fixture = fixture(&[Ability::ManageUsers]).await?;

    let result = fixture
        .service
        .create_role(
            &fixture.actor,
            CreateRoleInput {
                name: "Editors".to_owned(),
                description: None,
                permissions: Vec::new(),
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
    Ok(())
}

#[tokio::test]
async fn create_role_attaches_initial_permissions() -> AppResult<()> {
    let fixture = fixture(&[Ability::ManageRoles, Ability::ManageEvents]).await?;

    let role = fixture
        .service
        .create_role(
            &fixture.actor,
            CreateRoleInput {
                name: "Editors".to_owned(),
                description: Some("Content editors".to_owned()),
                permissions: vec!["manageEvents".to_owned()],
            },
        )
        .await?;

    assert_eq!(role.permissions, vec!["manageEvents".to_owned()]);
    assert_eq!(role.description.as_deref(), Some("Content editors"));
    Ok(())
}

#[tokio::test]
async fn create_role_rejects_duplicate_name() -> AppResult<()> {
    let fixture = fixture(&[Ability::ManageRoles]).await?;

    let result = fixture
        .service
        .create_role(
            &fixture.actor,
            CreateRoleInput {
                name: "Operators".to_owned(),
                description: None,
                permissions: Vec::new(),
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    Ok(())
}

#[tokio::test]
async fn update_role_keeps_unspecified_values() -> AppResult<()> {
    let fixture = fixture(&[Ability::ManageRoles]).await?;
    let created = fixture
        .service
        .create_role(
            &fixture.actor,
            CreateRoleInput {
                name: "Editors".to_owned(),
                description: Some("Content editors".to_owned()),
                permissions: vec!["manageRoles".to_owned()],
            },
        )
        .await?;

    let updated = fixture
        .service
        .update_role(
            &fixture.actor,
            created.role_id,
            UpdateRoleInput {
                name: Some("Publishers".to_owned()),
                description: None,
            },
        )
        .await?;

    assert_eq!(updated.name, "Publishers");
    assert_eq!(updated.description.as_deref(), Some("Content editors"));
    assert_eq!(updated.permissions, vec!["manageRoles".to_owned()]);
    Ok(())
}

#[tokio::test]
async fn sync_role_permissions_changes_effective_permissions() -> AppResult<()> {
    let fixture = fixture(&[Ability::ManageRoles, Ability::ManageUsers]).await?;
    let operators = fixture
        .repository
        .find_role_by_name("Operators")
        .await?
        .ok_or_else(|| AppError::NotFound("Operators".to_owned()))?;

    fixture
        .service
        .sync_role_permissions(
            &fixture.actor,
            operators.role_id,
            vec!["manageRoles".to_owned()],
        )
        .await?;

    let permissions = fixture.service.my_permissions(&fixture.actor).await?;
    let expected: BTreeSet<String> = BTreeSet::from(["manageRoles".to_owned()]);
    assert_eq!(permissions, expected);

    let result = fixture.service.list_users(&fixture.actor).await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));
    Ok(())
}

#[tokio::test]
async fn sync_user_roles_and_effective_permissions() -> AppResult<()> {
    let fixture = fixture(&[Ability::ManageUsers, Ability::ManageRoles]).await?;
    let user = fixture
        .service
        .create_user(
            &fixture.actor,
            CreateUserInput {
                name: "Grace".to_owned(),
                email: "Grace@Example.edu".to_owned(),
            },
        )
        .await?;
    assert_eq!(user.email, "grace@example.edu");

    let role = fixture
        .service
        .create_role(
            &fixture.actor,
            CreateRoleInput {
                name: "Editors".to_owned(),
                description: None,
                permissions: vec!["manageRoles".to_owned()],
            },
        )
        .await?;

    let synced = fixture
        .service
        .sync_user_roles(&fixture.actor, user.user_id, vec![role.role_id])
        .await?;
    assert_eq!(synced.roles, vec!["Editors".to_owned()]);

    let permissions = fixture
        .service
        .user_permissions(&fixture.actor, user.user_id)
        .await?;
    assert_eq!(permissions, BTreeSet::from(["manageRoles".to_owned()]));
    Ok(())
}

#[tokio::test]
async fn create_user_rejects_duplicate_email() -> AppResult<()> {
    let fixture = fixture(&[Ability::ManageUsers]).await?;

    let result = fixture
        .service
        .create_user(
            &fixture.actor,
            CreateUserInput {
                name: "Ada again".to_owned(),
                email: "ada@example.edu".to_owned(),
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    Ok(())
}

#[tokio::test]
async fn actors_cannot_delete_themselves() -> AppResult<()> {
    let fixture = fixture(&[Ability::ManageUsers]).await?;
    let actor_id: UserId = fixture.actor.subject().parse()?;

    let result = fixture.service.delete_user(&fixture.actor, actor_id).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    Ok(())
}

#[tokio::test]
async fn deleting_permission_revokes_it_from_roles() -> AppResult<()> {
    let fixture = fixture(&[Ability::ManagePermissions, Ability::ManageEvents]).await?;
    let permission = fixture
        .repository
        .find_permission_by_name("manageEvents")
        .await?
        .ok_or_else(|| AppError::NotFound("manageEvents".to_owned()))?;

    fixture
        .service
        .delete_permission(&fixture.actor, permission.permission_id())
        .await?;

    let permissions = fixture.service.my_permissions(&fixture.actor).await?;
    assert_eq!(permissions, BTreeSet::from(["managePermissions".to_owned()]));
    Ok(())
}

#[tokio::test]
async fn seeding_creates_defaults_and_grants_administrator() -> AppResult<()> {
    let fixture = fixture(&[]).await?;
    let administrator_id = RoleId::new();
    fixture
        .repository
        .graph
        .lock()
        .await
        .insert_role(Role::new(administrator_id, ADMINISTRATOR_ROLE_NAME, None)?)?;

    let created = fixture.service.seed_default_permissions().await?;
    assert_eq!(created, Ability::all().len());

    let administrator = fixture
        .repository
        .find_role(administrator_id)
        .await?
        .ok_or_else(|| AppError::NotFound(ADMINISTRATOR_ROLE_NAME.to_owned()))?;
    assert_eq!(administrator.permissions.len(), Ability::all().len() - 1);
    assert!(
        !administrator
            .permissions
            .contains(&Ability::ManageOwnProfile.as_str().to_owned())
    );

    let created_again = fixture.service.seed_default_permissions().await?;
    assert_eq!(created_again, 0);
    Ok(())
}

#[tokio::test]
async fn seeding_keeps_existing_administrator_grants() -> AppResult<()> {
    let fixture = fixture(&[]).await?;
    let administrator_id = RoleId::new();
    {
        let mut graph = fixture.repository.graph.lock().await;
        graph.insert_permission(Permission::new(PermissionId::new(), "publishNewsletter")?)?;
        graph.insert_role(Role::new(administrator_id, ADMINISTRATOR_ROLE_NAME, None)?)?;
        graph.sync_role_permissions(administrator_id, &["publishNewsletter".to_owned()])?;
    }

    fixture.service.seed_default_permissions().await?;

    let administrator = fixture
        .repository
        .find_role(administrator_id)
        .await?
        .ok_or_else(|| AppError::NotFound(ADMINISTRATOR_ROLE_NAME.to_owned()))?;
    assert!(
        administrator
            .permissions
            .contains(&"publishNewsletter".to_owned())
    );
    assert_eq!(administrator.permissions.len(), Ability::all().len());
    Ok(())
}

#[tokio::test]
async fn seeding_creates_missing_administrator_role() -> AppResult<()> {
    let fixture = fixture(&[Ability::ManageRoles]).await?;

    let created = fixture.service.seed_default_permissions().await?;

    assert_eq!(created, Ability::all().len() - 1);
    let administrator = fixture
        .repository
        .find_role_by_name(ADMINISTRATOR_ROLE_NAME)
        .await?
        .ok_or_else(|| AppError::NotFound(ADMINISTRATOR_ROLE_NAME.to_owned()))?;
    assert_eq!(administrator.permissions.len(), Ability::all().len() - 1);

    fixture.service.seed_default_permissions().await?;
    let roles = fixture.repository.list_roles().await?;
    assert_eq!(
        roles
            .iter()
            .filter(|role| role.name == ADMINISTRATOR_ROLE_NAME)
            .count(),
        1
    );
    Ok(())
}

#[tokio::test]
async fn administrator_seed_on_empty_store_can_manage_users() -> AppResult<()> {
    let repository = Arc::new(FakeAccessRepository::default());
    let authorization_service = AuthorizationService::new(repository.clone());
    let service = SecurityAdminService::new(authorization_service, repository.clone());

    let admin = service
        .seed_administrator(CreateUserInput {
            name: "Registrar".to_owned(),
            email: "Registrar@Example.edu".to_owned(),
        })
        .await?;
    assert_eq!(admin.email, "registrar@example.edu");
    assert_eq!(admin.roles, vec![ADMINISTRATOR_ROLE_NAME.to_owned()]);

    let actor = UserIdentity::new(admin.user_id.to_string(), "Registrar", None);
    let created = service
        .create_user(
            &actor,
            CreateUserInput {
                name: "Grace".to_owned(),
                email: "grace@example.edu".to_owned(),
            },
        )
        .await?;
    assert!(created.roles.is_empty());
    Ok(())
}

#[tokio::test]
async fn administrator_seed_is_idempotent_and_keeps_other_roles() -> AppResult<()> {
    let fixture = fixture(&[Ability::ManageForms]).await?;
    let input = CreateUserInput {
        name: "Ada".to_owned(),
        email: "ada@example.edu".to_owned(),
    };

    let first = fixture.service.seed_administrator(input.clone()).await?;
    let second = fixture.service.seed_administrator(input).await?;

    assert_eq!(first, second);
    assert_eq!(
        second.roles,
        vec![ADMINISTRATOR_ROLE_NAME.to_owned(), "Operators".to_owned()]
    );
    assert_eq!(fixture.repository.list_users().await?.len(), 1);
    Ok(())
}
