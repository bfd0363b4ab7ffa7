/// Authorization policy
///
/// One declarative policy table plus one pure decision function replace
/// per-endpoint permission expressions. Every protected operation maps to a
/// [`TaskAction`]; the table states which roles may perform it and whether
/// a `User` additionally needs to own the resource.
///
/// # Combination rule
///
/// - An unauthenticated caller is denied everything.
/// - `Admin` alone is always sufficient.
/// - `User` is sufficient only when the action is not ownership-gated, or
///   when the caller is the task's assignee.
///
/// A denial carries no detail: callers cannot tell "task does not exist"
/// from "task is assigned to someone else".
///
/// # Example
///
/// ```
/// use taskdeck_shared::auth::policy::{decide, Principal, TaskAction};
/// use taskdeck_shared::models::account::Role;
/// use uuid::Uuid;
///
/// let user = Principal {
///     account_id: Uuid::new_v4(),
///     email: "user1@x.com".to_string(),
///     role: Role::User,
/// };
///
/// // user1 may change the status of a task assigned to user1...
/// assert!(decide(Some(&user), TaskAction::UpdateStatus, Some("user1@x.com")).is_ok());
/// // ...but not one assigned to user2
/// assert!(decide(Some(&user), TaskAction::UpdateStatus, Some("user2@x.com")).is_err());
/// ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::account::Role;
use crate::store::tasks::TaskStore;
use crate::store::StoreError;

/// Identity and role resolved from a validated access token
///
/// Established by the request authenticator for the duration of one request
/// and discarded afterwards. The role comes from the credential store at
/// request time, never from the token itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    /// Account ID
    pub account_id: Uuid,

    /// Login handle (token subject)
    pub email: String,

    /// Role fetched fresh for this request
    pub role: Role,
}

/// Error type for authorization decisions
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    /// Role/ownership predicate failed, or the caller is unauthenticated
    ///
    /// Deliberately detail-free.
    #[error("Access denied")]
    Denied,

    /// Ownership resolution hit the store
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Protected operations on tasks and their comments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    /// Create a new task
    Create,

    /// Fetch a task by ID
    View,

    /// Change a task's workflow status
    UpdateStatus,

    /// Delete a task
    Delete,

    /// Attach a comment to a task
    Comment,

    /// List a task's comments
    ListComments,
}

/// One row of the policy table
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Roles allowed to perform the action at all
    pub roles: &'static [Role],

    /// Whether a `User` must additionally be the task's assignee
    pub ownership_gated: bool,
}

/// The policy table: action to (required roles, ownership requirement)
pub fn rule(action: TaskAction) -> Rule {
    match action {
        TaskAction::Create | TaskAction::Delete => Rule {
            roles: &[Role::Admin],
            ownership_gated: false,
        },
        TaskAction::View
        | TaskAction::UpdateStatus
        | TaskAction::Comment
        | TaskAction::ListComments => Rule {
            roles: &[Role::Admin, Role::User],
            ownership_gated: true,
        },
    }
}

/// Pure authorization decision
///
/// `assignee_email` is the resolved owner of the target resource; `None`
/// means the resource is missing or unassigned, which denies a `User` the
/// same way a foreign assignee does. Admins never consult it.
pub fn decide(
    principal: Option<&Principal>,
    action: TaskAction,
    assignee_email: Option<&str>,
) -> Result<(), PolicyError> {
    let principal = principal.ok_or(PolicyError::Denied)?;
    let rule = rule(action);

    if !rule.roles.contains(&principal.role) {
        return Err(PolicyError::Denied);
    }

    match principal.role {
        Role::Admin => Ok(()),
        Role::User => {
            if rule.ownership_gated && assignee_email != Some(principal.email.as_str()) {
                return Err(PolicyError::Denied);
            }
            Ok(())
        }
    }
}

/// Authorizes an action against a concrete task
///
/// Loads the assignee through the task store only when the decision needs
/// it: admins and non-gated actions skip the lookup entirely.
pub async fn authorize(
    store: &dyn TaskStore,
    principal: Option<&Principal>,
    action: TaskAction,
    task_id: Uuid,
) -> Result<(), PolicyError> {
    let needs_owner = matches!(principal, Some(p) if p.role == Role::User)
        && rule(action).ownership_gated;

    let assignee = if needs_owner {
        store.assignee_email(task_id).await?
    } else {
        None
    };

    decide(principal, action, assignee.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::comment::CreateComment;
    use crate::models::task::{CreateTask, TaskPriority, TaskStatus};
    use crate::store::memory::MemoryTaskStore;

    fn principal(email: &str, role: Role) -> Principal {
        Principal {
            account_id: Uuid::new_v4(),
            email: email.to_string(),
            role,
        }
    }

    const ALL_ACTIONS: [TaskAction; 6] = [
        TaskAction::Create,
        TaskAction::View,
        TaskAction::UpdateStatus,
        TaskAction::Delete,
        TaskAction::Comment,
        TaskAction::ListComments,
    ];

    #[test]
    fn test_admin_passes_every_predicate() {
        let admin = principal("admin@x.com", Role::Admin);

        for action in ALL_ACTIONS {
            // Admin needs no ownership, even when the resource is missing
            assert!(decide(Some(&admin), action, None).is_ok());
            assert!(decide(Some(&admin), action, Some("someone@x.com")).is_ok());
        }
    }

    #[test]
    fn test_unauthenticated_denied_everything() {
        for action in ALL_ACTIONS {
            assert!(decide(None, action, Some("user1@x.com")).is_err());
        }
    }

    #[test]
    fn test_user_denied_admin_only_actions() {
        let user = principal("user1@x.com", Role::User);

        assert!(decide(Some(&user), TaskAction::Create, None).is_err());
        assert!(decide(Some(&user), TaskAction::Delete, Some("user1@x.com")).is_err());
    }

    #[test]
    fn test_user_ownership_gate() {
        let user = principal("user1@x.com", Role::User);

        // Own task: allowed
        assert!(decide(Some(&user), TaskAction::View, Some("user1@x.com")).is_ok());
        assert!(decide(Some(&user), TaskAction::UpdateStatus, Some("user1@x.com")).is_ok());
        assert!(decide(Some(&user), TaskAction::Comment, Some("user1@x.com")).is_ok());
        assert!(decide(Some(&user), TaskAction::ListComments, Some("user1@x.com")).is_ok());

        // Someone else's task: denied
        assert!(decide(Some(&user), TaskAction::View, Some("user2@x.com")).is_err());
        assert!(decide(Some(&user), TaskAction::UpdateStatus, Some("user2@x.com")).is_err());

        // Missing or unassigned resource: denied the same way
        assert!(decide(Some(&user), TaskAction::View, None).is_err());
    }

    #[test]
    fn test_denial_is_detail_free() {
        let user = principal("user1@x.com", Role::User);

        let missing = decide(Some(&user), TaskAction::View, None).unwrap_err();
        let foreign = decide(Some(&user), TaskAction::View, Some("user2@x.com")).unwrap_err();
        assert_eq!(missing.to_string(), foreign.to_string());
    }

    #[tokio::test]
    async fn test_authorize_resolves_ownership_via_store() {
        let store = MemoryTaskStore::new();
        let assignee_id = Uuid::new_v4();
        let task = store
            .create(CreateTask {
                title: "t".to_string(),
                description: "d".to_string(),
                status: TaskStatus::Pending,
                priority: TaskPriority::Medium,
                author_id: Uuid::new_v4(),
                assignee_id: Some(assignee_id),
            })
            .await
            .unwrap();
        store.set_assignee_email(task.id, "user1@x.com");

        let owner = principal("user1@x.com", Role::User);
        let other = principal("user2@x.com", Role::User);
        let admin = principal("admin@x.com", Role::Admin);

        assert!(authorize(&store, Some(&owner), TaskAction::View, task.id)
            .await
            .is_ok());
        assert!(authorize(&store, Some(&other), TaskAction::View, task.id)
            .await
            .is_err());
        assert!(authorize(&store, Some(&admin), TaskAction::Delete, task.id)
            .await
            .is_ok());

        // Nonexistent task: plain denial, no NotFound leak
        let ghost = Uuid::new_v4();
        let err = authorize(&store, Some(&owner), TaskAction::View, ghost)
            .await
            .unwrap_err();
        assert!(matches!(err, PolicyError::Denied));
    }

    #[tokio::test]
    async fn test_authorize_comment_actions() {
        let store = MemoryTaskStore::new();
        let task = store
            .create(CreateTask {
                title: "t".to_string(),
                description: "d".to_string(),
                status: TaskStatus::Pending,
                priority: TaskPriority::High,
                author_id: Uuid::new_v4(),
                assignee_id: Some(Uuid::new_v4()),
            })
            .await
            .unwrap();
        store.set_assignee_email(task.id, "user1@x.com");

        let owner = principal("user1@x.com", Role::User);
        assert!(
            authorize(&store, Some(&owner), TaskAction::Comment, task.id)
                .await
                .is_ok()
        );

        store
            .create_comment(CreateComment {
                task_id: task.id,
                author_id: owner.account_id,
                content: "on it".to_string(),
            })
            .await
            .unwrap();

        assert!(
            authorize(&store, Some(&owner), TaskAction::ListComments, task.id)
                .await
                .is_ok()
        );
    }
}
