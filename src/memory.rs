//! In-memory stores backing unit and router tests.

use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::{
    repo::UserStore,
    repo_types::{NewUser, User},
};
use crate::tasks::{
    repo::TaskStore,
    repo_types::{Lifecycle, NewTask, Task, TaskPatch},
};

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl MemoryUserStore {
    pub fn count_with_email(&self, email: &str) -> usize {
        self.users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.email == email)
            .count()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn create(&self, new: NewUser<'_>) -> anyhow::Result<Option<User>> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == new.email) {
            return Ok(None);
        }
        let user = User {
            id: Uuid::new_v4(),
            name: new.name.to_string(),
            email: new.email.to_string(),
            password_hash: new.password_hash.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        users.push(user.clone());
        Ok(Some(user))
    }
}

/// Tasks kept in insertion order, so the index doubles as the tie-breaker.
#[derive(Default)]
pub struct MemoryTaskStore {
    tasks: Mutex<Vec<Task>>,
}

impl MemoryTaskStore {
    pub fn is_deleted(&self, task_id: Uuid) -> bool {
        self.tasks
            .lock()
            .unwrap()
            .iter()
            .any(|t| t.id == task_id && !t.lifecycle.is_active())
    }
}

fn owned_active<'a>(tasks: &'a mut [Task], user_id: Uuid, task_id: Uuid) -> Option<&'a mut Task> {
    tasks
        .iter_mut()
        .find(|t| t.id == task_id && t.user_id == user_id && t.lifecycle.is_active())
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn insert(&self, user_id: Uuid, new: NewTask) -> anyhow::Result<Task> {
        let task = Task {
            id: Uuid::new_v4(),
            user_id,
            title: new.title,
            description: new.description,
            status: new.status,
            created_at: OffsetDateTime::now_utc(),
            lifecycle: Lifecycle::Active,
        };
        self.tasks.lock().unwrap().push(task.clone());
        Ok(task)
    }

    async fn count_active(&self, user_id: Uuid) -> anyhow::Result<i64> {
        let tasks = self.tasks.lock().unwrap();
        let n = tasks
            .iter()
            .filter(|t| t.user_id == user_id && t.lifecycle.is_active())
            .count();
        Ok(n as i64)
    }

    async fn list_active(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Task>> {
        let tasks = self.tasks.lock().unwrap();
        let mut mine: Vec<(usize, &Task)> = tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.user_id == user_id && t.lifecycle.is_active())
            .collect();
        mine.sort_by(|(ia, a), (ib, b)| b.created_at.cmp(&a.created_at).then(ib.cmp(ia)));
        Ok(mine
            .into_iter()
            .skip(usize::try_from(offset)?)
            .take(usize::try_from(limit)?)
            .map(|(_, t)| t.clone())
            .collect())
    }

    async fn update_active(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        patch: TaskPatch,
    ) -> anyhow::Result<Option<Task>> {
        let mut tasks = self.tasks.lock().unwrap();
        let Some(task) = owned_active(&mut tasks, user_id, task_id) else {
            return Ok(None);
        };
        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = Some(description);
        }
        if let Some(status) = patch.status {
            task.status = status;
        }
        Ok(Some(task.clone()))
    }

    async fn soft_delete(&self, user_id: Uuid, task_id: Uuid) -> anyhow::Result<bool> {
        let mut tasks = self.tasks.lock().unwrap();
        match owned_active(&mut tasks, user_id, task_id) {
            Some(task) => {
                task.lifecycle = Lifecycle::Deleted {
                    at: OffsetDateTime::now_utc(),
                };
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
