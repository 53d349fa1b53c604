//! Ordered task store
//!
//! Holds the task collection in insertion order and writes it through the
//! persistence adapter after every mutation. A mutation is applied to a copy
//! of the collection and only becomes visible once the save succeeds.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use super::model::{NewTask, ReminderState, Task};
use super::persistence::TaskPersistence;
use crate::Result;

/// Thread-safe task store with write-through persistence
#[derive(Clone)]
pub struct TaskStore {
    tasks: Arc<RwLock<Vec<Task>>>,
    persistence: Arc<dyn TaskPersistence>,
}

impl TaskStore {
    /// Load the stored collection and wrap it in a store
    ///
    /// Records saved without an id are given one here and written back, so
    /// their ids stay stable across restarts.
    pub async fn open(persistence: Arc<dyn TaskPersistence>) -> Self {
        let mut tasks = persistence.load().await;
        let mut assigned = 0;
        for task in tasks.iter_mut().filter(|t| t.id.is_nil()) {
            task.id = Uuid::new_v4();
            assigned += 1;
        }
        if assigned > 0 {
            match persistence.save(&tasks).await {
                Ok(()) => info!("Assigned ids to {} stored tasks", assigned),
                Err(e) => warn!("Failed to save assigned task ids: {}", e),
            }
        }
        info!("Loaded {} tasks", tasks.len());
        Self {
            tasks: Arc::new(RwLock::new(tasks)),
            persistence,
        }
    }

    /// Snapshot of all tasks in order
    pub async fn list(&self) -> Vec<Task> {
        self.tasks.read().await.clone()
    }

    pub async fn get(&self, id: Uuid) -> Option<Task> {
        self.tasks.read().await.iter().find(|t| t.id == id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.tasks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tasks.read().await.is_empty()
    }

    /// Append a new open task
    pub async fn add(&self, new_task: NewTask) -> Result<Task> {
        let task = new_task.into_task();
        let mut tasks = self.tasks.write().await;
        let mut next = tasks.clone();
        next.push(task.clone());
        self.commit(&mut tasks, next).await?;
        info!(task_id = %task.id, "Task added");
        Ok(task)
    }

    /// Flip the completed flag
    pub async fn toggle_complete(&self, id: Uuid) -> Result<Option<Task>> {
        self.modify(id, |task| {
            task.completed = !task.completed;
            true
        })
        .await
    }

    /// Replace the task text
    ///
    /// A cancelled (`None`) or blank edit leaves the task untouched.
    pub async fn edit(&self, id: Uuid, new_text: Option<&str>) -> Result<Option<Task>> {
        let Some(text) = new_text.map(str::trim).filter(|t| !t.is_empty()) else {
            return Ok(self.get(id).await);
        };
        self.modify(id, |task| {
            if task.text == text {
                return false;
            }
            task.text = text.to_string();
            true
        })
        .await
    }

    /// Record that the reminder for `id` is firing at `now`
    ///
    /// The task's reminder state is checked again under the write lock, so a
    /// task completed or already reminded since the caller looked is left
    /// alone. Returns the task as stored only for the call that set the flag.
    pub async fn mark_notified(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
        window: Duration,
    ) -> Result<Option<Task>> {
        let mut tasks = self.tasks.write().await;
        let Some(index) = tasks.iter().position(|t| t.id == id) else {
            return Ok(None);
        };
        if tasks[index].reminder_state(now, window) != ReminderState::DueSoon {
            return Ok(None);
        }
        let mut next = tasks.clone();
        next[index].notified = true;
        let task = next[index].clone();
        self.commit(&mut tasks, next).await?;
        Ok(Some(task))
    }

    /// Remove a task; later tasks move up one position
    pub async fn delete(&self, id: Uuid) -> Result<Option<Task>> {
        let mut tasks = self.tasks.write().await;
        let Some(index) = tasks.iter().position(|t| t.id == id) else {
            return Ok(None);
        };
        let mut next = tasks.clone();
        let removed = next.remove(index);
        self.commit(&mut tasks, next).await?;
        info!(task_id = %id, "Task deleted");
        Ok(Some(removed))
    }

    /// Remove every completed task, returning how many were removed
    pub async fn clear_completed(&self) -> Result<usize> {
        let mut tasks = self.tasks.write().await;
        let next: Vec<Task> = tasks.iter().filter(|t| !t.completed).cloned().collect();
        let removed = tasks.len() - next.len();
        self.commit(&mut tasks, next).await?;
        info!("Cleared {} completed tasks", removed);
        Ok(removed)
    }

    /// Remove every task, returning how many were removed
    pub async fn clear_all(&self) -> Result<usize> {
        let mut tasks = self.tasks.write().await;
        let removed = tasks.len();
        self.commit(&mut tasks, Vec::new()).await?;
        info!("Cleared all {} tasks", removed);
        Ok(removed)
    }

    /// Apply `change` to the task with `id`; persists when it reports a change
    async fn modify<F>(&self, id: Uuid, change: F) -> Result<Option<Task>>
    where
        F: FnOnce(&mut Task) -> bool,
    {
        let mut tasks = self.tasks.write().await;
        let Some(index) = tasks.iter().position(|t| t.id == id) else {
            return Ok(None);
        };
        let mut next = tasks.clone();
        if !change(&mut next[index]) {
            return Ok(Some(tasks[index].clone()));
        }
        let task = next[index].clone();
        self.commit(&mut tasks, next).await?;
        Ok(Some(task))
    }

    /// Save `next` and make it current; on failure the current collection is kept
    async fn commit(&self, current: &mut Vec<Task>, next: Vec<Task>) -> Result<()> {
        self.persistence.save(&next).await?;
        *current = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{FailingPersistence, FilePersistence, MemoryPersistence, TaskPriority};
    use tempfile::TempDir;

    async fn create_test_store() -> (TaskStore, Arc<MemoryPersistence>) {
        let persistence = Arc::new(MemoryPersistence::new());
        let store = TaskStore::open(persistence.clone()).await;
        (store, persistence)
    }

    fn new_task(text: &str) -> NewTask {
        NewTask::new(text, Utc::now() + Duration::days(1))
    }

    #[tokio::test]
    async fn test_add_appends_and_persists() {
        let (store, persistence) = create_test_store().await;

        let first = store.add(new_task("First")).await.unwrap();
        let second = store
            .add(new_task("Second").with_priority(TaskPriority::High))
            .await
            .unwrap();

        assert!(!first.completed);
        assert_eq!(second.priority, TaskPriority::High);

        let ids: Vec<Uuid> = store.list().await.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
        assert_eq!(persistence.load().await.len(), 2);
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_state() {
        let (store, _) = create_test_store().await;
        let task = store.add(new_task("Toggle me")).await.unwrap();

        let toggled = store.toggle_complete(task.id).await.unwrap().unwrap();
        assert!(toggled.completed);

        let restored = store.toggle_complete(task.id).await.unwrap().unwrap();
        assert_eq!(restored, task);
    }

    #[tokio::test]
    async fn test_unknown_id_is_noop() {
        let (store, persistence) = create_test_store().await;
        store.add(new_task("Only")).await.unwrap();
        let raw_before = persistence.raw().await;

        let missing = Uuid::new_v4();
        assert!(store.toggle_complete(missing).await.unwrap().is_none());
        assert!(store.edit(missing, Some("x")).await.unwrap().is_none());
        assert!(store.delete(missing).await.unwrap().is_none());
        assert!(store
            .mark_notified(missing, Utc::now(), Duration::minutes(5))
            .await
            .unwrap()
            .is_none());

        assert_eq!(persistence.raw().await, raw_before);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_edit_replaces_text() {
        let (store, _) = create_test_store().await;
        let task = store.add(new_task("Old")).await.unwrap();

        let edited = store.edit(task.id, Some("  New  ")).await.unwrap().unwrap();
        assert_eq!(edited.text, "New");
        assert_eq!(edited.due_at, task.due_at);
    }

    #[tokio::test]
    async fn test_cancelled_or_blank_edit_is_noop() {
        let (store, _) = create_test_store().await;
        let task = store.add(new_task("Keep")).await.unwrap();

        let cancelled = store.edit(task.id, None).await.unwrap().unwrap();
        assert_eq!(cancelled.text, "Keep");

        let blank = store.edit(task.id, Some("   ")).await.unwrap().unwrap();
        assert_eq!(blank.text, "Keep");
    }

    #[tokio::test]
    async fn test_delete_shifts_later_tasks() {
        let (store, _) = create_test_store().await;
        let a = store.add(new_task("A")).await.unwrap();
        let b = store.add(new_task("B")).await.unwrap();
        let c = store.add(new_task("C")).await.unwrap();
        let d = store.add(new_task("D")).await.unwrap();

        let removed = store.delete(b.id).await.unwrap().unwrap();
        assert_eq!(removed.id, b.id);

        let ids: Vec<Uuid> = store.list().await.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![a.id, c.id, d.id]);
    }

    #[tokio::test]
    async fn test_clear_completed_keeps_open_tasks_in_order() {
        let (store, _) = create_test_store().await;
        let first = store.add(new_task("Done 1")).await.unwrap();
        let open = store.add(new_task("Open")).await.unwrap();
        let third = store.add(new_task("Done 2")).await.unwrap();
        store.toggle_complete(first.id).await.unwrap();
        store.toggle_complete(third.id).await.unwrap();

        let removed = store.clear_completed().await.unwrap();
        assert_eq!(removed, 2);

        let remaining = store.list().await;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, open.id);
        assert!(!remaining[0].completed);
    }

    #[tokio::test]
    async fn test_clear_all() {
        let (store, persistence) = create_test_store().await;
        store.add(new_task("A")).await.unwrap();
        store.add(new_task("B")).await.unwrap();

        assert_eq!(store.clear_all().await.unwrap(), 2);
        assert!(store.is_empty().await);
        assert!(persistence.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_mark_notified_once() {
        let (store, _) = create_test_store().await;
        let now = Utc::now();
        let window = Duration::minutes(5);
        let task = store
            .add(NewTask::new("Remind", now + Duration::minutes(2)))
            .await
            .unwrap();

        let marked = store.mark_notified(task.id, now, window).await.unwrap();
        assert!(marked.unwrap().notified);
        assert!(store.get(task.id).await.unwrap().notified);
        assert!(store
            .mark_notified(task.id, now, window)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_mark_notified_checks_current_state() {
        let (store, _) = create_test_store().await;
        let now = Utc::now();
        let window = Duration::minutes(5);
        let task = store
            .add(NewTask::new("Draft", now + Duration::minutes(2)))
            .await
            .unwrap();
        let far = store.add(new_task("Far off")).await.unwrap();

        // completed after the caller saw it as due soon
        store.toggle_complete(task.id).await.unwrap();
        assert!(store
            .mark_notified(task.id, now, window)
            .await
            .unwrap()
            .is_none());
        assert!(store
            .mark_notified(far.id, now, window)
            .await
            .unwrap()
            .is_none());

        // reopened and renamed: the marked task carries the new text
        store.toggle_complete(task.id).await.unwrap();
        store.edit(task.id, Some("Final")).await.unwrap();
        let marked = store
            .mark_notified(task.id, now, window)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(marked.text, "Final");
    }

    #[tokio::test]
    async fn test_failed_save_leaves_store_unchanged() {
        let persistence = Arc::new(FailingPersistence::default());
        let store = TaskStore::open(persistence.clone()).await;
        let kept = store.add(new_task("Kept")).await.unwrap();
        let done = store.add(new_task("Done")).await.unwrap();
        store.toggle_complete(done.id).await.unwrap();
        let before = store.list().await;
        let raw_before = persistence.raw().await;

        persistence.fail_next(6);
        assert!(store.add(new_task("Lost")).await.is_err());
        assert!(store.toggle_complete(kept.id).await.is_err());
        assert!(store.edit(kept.id, Some("Renamed")).await.is_err());
        assert!(store.delete(kept.id).await.is_err());
        assert!(store.clear_completed().await.is_err());
        assert!(store.clear_all().await.is_err());

        assert_eq!(store.list().await, before);
        assert_eq!(persistence.raw().await, raw_before);

        // storage recovered
        assert_eq!(store.clear_completed().await.unwrap(), 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_failed_mark_notified_can_be_retried() {
        let persistence = Arc::new(FailingPersistence::default());
        let store = TaskStore::open(persistence.clone()).await;
        let now = Utc::now();
        let window = Duration::minutes(5);
        let task = store
            .add(NewTask::new("Remind", now + Duration::minutes(2)))
            .await
            .unwrap();

        persistence.fail_next(1);
        assert!(store.mark_notified(task.id, now, window).await.is_err());
        assert!(!store.get(task.id).await.unwrap().notified);

        assert!(store
            .mark_notified(task.id, now, window)
            .await
            .unwrap()
            .is_some());
        assert!(store.get(task.id).await.unwrap().notified);
    }

    #[tokio::test]
    async fn test_ids_assigned_on_open_are_stable() {
        let raw = r#"[{"text":"Buy milk","priority":"high","dueDateTime":"2024-05-01T03:00:00.000Z","completed":false},{"text":"Walk dog","dueDateTime":"2024-05-02T03:00:00.000Z"}]"#;
        let persistence = Arc::new(MemoryPersistence::with_raw(raw));

        let first: Vec<Uuid> = TaskStore::open(persistence.clone())
            .await
            .list()
            .await
            .iter()
            .map(|t| t.id)
            .collect();
        let second: Vec<Uuid> = TaskStore::open(persistence.clone())
            .await
            .list()
            .await
            .iter()
            .map(|t| t.id)
            .collect();

        assert_eq!(first.len(), 2);
        assert!(first.iter().all(|id| !id.is_nil()));
        assert_ne!(first[0], first[1]);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_reopen_from_file() {
        let temp = TempDir::new().unwrap();
        let id;
        {
            let store = TaskStore::open(Arc::new(FilePersistence::new(temp.path()))).await;
            id = store.add(new_task("Persistent task")).await.unwrap().id;
            store.toggle_complete(id).await.unwrap();
        }

        let store = TaskStore::open(Arc::new(FilePersistence::new(temp.path()))).await;
        let task = store.get(id).await.unwrap();
        assert_eq!(task.text, "Persistent task");
        assert!(task.completed);
    }
}
