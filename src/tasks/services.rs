use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    error::AppError,
    tasks::{
        pagination::{PageRequest, PaginationMeta},
        repo::TaskStore,
        repo_types::{NewTask, Task, TaskPatch},
    },
};

const TASK_NOT_FOUND: &str = "Task not found";

/// Turns a raw path segment into a task ID. Blank → `400`; anything that can't
/// name a task → `404`, same as a task owned by someone else.
pub fn parse_task_id(raw: &str) -> Result<Uuid, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::bad_request("Task ID is required"));
    }
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(TASK_NOT_FOUND.into()))
}

pub async fn create(tasks: &dyn TaskStore, user_id: Uuid, new: NewTask) -> Result<Task, AppError> {
    let task = tasks.insert(user_id, new).await?;
    info!(%user_id, task_id = %task.id, "task created");
    Ok(task)
}

pub async fn list(
    tasks: &dyn TaskStore,
    user_id: Uuid,
    page: PageRequest,
) -> Result<(Vec<Task>, PaginationMeta), AppError> {
    let total = tasks.count_active(user_id).await?;
    let items = tasks
        .list_active(user_id, page.limit(), page.offset())
        .await?;
    debug!(%user_id, page = page.page(), total, returned = items.len(), "tasks listed");
    Ok((items, PaginationMeta::new(page, total)))
}

pub async fn update(
    tasks: &dyn TaskStore,
    user_id: Uuid,
    task_id: Uuid,
    patch: TaskPatch,
) -> Result<Task, AppError> {
    if patch.is_empty() {
        debug!(%user_id, %task_id, "empty patch");
    }
    let Some(task) = tasks.update_active(user_id, task_id, patch).await? else {
        warn!(%user_id, %task_id, "update on missing or foreign task");
        return Err(AppError::NotFound(TASK_NOT_FOUND.into()));
    };
    debug_assert!(task.lifecycle.is_active());
    info!(%user_id, %task_id, "task updated");
    Ok(task)
}

pub async fn delete(tasks: &dyn TaskStore, user_id: Uuid, task_id: Uuid) -> Result<(), AppError> {
    if !tasks.soft_delete(user_id, task_id).await? {
        warn!(%user_id, %task_id, "delete on missing or foreign task");
        return Err(AppError::NotFound(TASK_NOT_FOUND.into()));
    }
    info!(%user_id, %task_id, "task deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryTaskStore;
    use crate::tasks::repo_types::TaskStatus;

    fn new_task(title: &str) -> NewTask {
        NewTask {
            title: title.into(),
            description: None,
            status: TaskStatus::default(),
        }
    }

    fn page(page: i64, limit: i64) -> PageRequest {
        PageRequest::new(page, limit).unwrap()
    }

    #[test]
    fn task_id_parsing() {
        assert!(matches!(parse_task_id(""), Err(AppError::BadRequest(_))));
        assert!(matches!(parse_task_id("  "), Err(AppError::BadRequest(_))));
        assert!(matches!(parse_task_id("42"), Err(AppError::NotFound(_))));
        let id = Uuid::new_v4();
        assert_eq!(parse_task_id(&id.to_string()).unwrap(), id);
    }

    #[tokio::test]
    async fn create_defaults_to_pending() {
        let store = MemoryTaskStore::default();
        let user = Uuid::new_v4();
        let task = create(&store, user, new_task("Buy milk")).await.unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.user_id, user);
        assert!(task.lifecycle.is_active());
    }

    #[tokio::test]
    async fn list_empty() {
        let store = MemoryTaskStore::default();
        let (items, meta) = list(&store, Uuid::new_v4(), page(1, 10)).await.unwrap();
        assert!(items.is_empty());
        assert_eq!(meta.total_tasks, 0);
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next_page);
        assert!(!meta.has_previous_page);
    }

    #[tokio::test]
    async fn list_is_newest_first_and_paged() {
        let store = MemoryTaskStore::default();
        let user = Uuid::new_v4();
        for i in 0..5 {
            create(&store, user, new_task(&format!("task {i}"))).await.unwrap();
        }
        create(&store, Uuid::new_v4(), new_task("someone else's")).await.unwrap();

        let (first, meta) = list(&store, user, page(1, 2)).await.unwrap();
        let titles: Vec<_> = first.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["task 4", "task 3"]);
        assert_eq!(meta.total_tasks, 5);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_next_page);

        let (last, meta) = list(&store, user, page(3, 2)).await.unwrap();
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].title, "task 0");
        assert!(!meta.has_next_page);
        assert!(meta.has_previous_page);

        let (beyond, _) = list(&store, user, page(4, 2)).await.unwrap();
        assert!(beyond.is_empty());
    }

    #[tokio::test]
    async fn other_users_cannot_touch_task() {
        let store = MemoryTaskStore::default();
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let task = create(&store, owner, new_task("private")).await.unwrap();

        let patch = TaskPatch {
            title: Some("hijacked".into()),
            ..Default::default()
        };
        let err = update(&store, intruder, task.id, patch).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let err = delete(&store, intruder, task.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = update(&store, intruder, Uuid::new_v4(), TaskPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let (items, _) = list(&store, owner, page(1, 10)).await.unwrap();
        assert_eq!(items[0].title, "private");
        let (items, _) = list(&store, intruder, page(1, 10)).await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn empty_patch_is_a_no_op() {
        let store = MemoryTaskStore::default();
        let user = Uuid::new_v4();
        let task = create(
            &store,
            user,
            NewTask {
                title: "Write report".into(),
                description: Some("quarterly".into()),
                status: TaskStatus::InProgress,
            },
        )
        .await
        .unwrap();

        let same = update(&store, user, task.id, TaskPatch::default()).await.unwrap();
        assert_eq!(same, task);
    }

    #[tokio::test]
    async fn patch_updates_only_given_fields() {
        let store = MemoryTaskStore::default();
        let user = Uuid::new_v4();
        let task = create(&store, user, new_task("Write report")).await.unwrap();

        let done = update(
            &store,
            user,
            task.id,
            TaskPatch {
                status: Some(TaskStatus::Done),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(done.status, TaskStatus::Done);
        assert_eq!(done.title, "Write report");

        // any status may move back
        let back = update(
            &store,
            user,
            task.id,
            TaskPatch {
                status: Some(TaskStatus::Pending),
                description: Some("draft".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(back.status, TaskStatus::Pending);
        assert_eq!(back.description.as_deref(), Some("draft"));
    }

    #[tokio::test]
    async fn deleted_task_disappears() {
        let store = MemoryTaskStore::default();
        let user = Uuid::new_v4();
        let keep = create(&store, user, new_task("keep")).await.unwrap();
        let gone = create(&store, user, new_task("gone")).await.unwrap();

        delete(&store, user, gone.id).await.unwrap();

        let (items, meta) = list(&store, user, page(1, 10)).await.unwrap();
        assert_eq!(items.iter().map(|t| t.id).collect::<Vec<_>>(), [keep.id]);
        assert_eq!(meta.total_tasks, 1);

        let err = update(&store, user, gone.id, TaskPatch::default()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let err = delete(&store, user, gone.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        assert!(store.is_deleted(gone.id));
    }
}
