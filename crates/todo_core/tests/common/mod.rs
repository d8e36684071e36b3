#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use todo_core::db::open_db_in_memory;
use todo_core::{
    SqliteTaskStore, StoreError, StoreResult, TaskId, TaskRecord, TaskRepository, TaskStore,
    TaskUseCases,
};

/// Callback run inside a store call.
pub type StoreHook = Box<dyn Fn() + Send + Sync>;

/// Call counters and hooks shared between a test and its `CountingStore`.
#[derive(Default)]
pub struct StoreCalls {
    pub list_all: AtomicUsize,
    pub get_by_id: AtomicUsize,
    pub insert: AtomicUsize,
    pub update: AtomicUsize,
    pub delete: AtomicUsize,
    pub delete_all: AtomicUsize,
    pub fail_writes: AtomicBool,
    /// Delay applied once to the next `list_all`, after it has read rows.
    pub stall_next_list_ms: AtomicU64,
    /// Runs at the start of every `insert`.
    pub on_insert: Mutex<Option<StoreHook>>,
}

impl StoreCalls {
    pub fn writes(&self) -> usize {
        self.insert.load(Ordering::SeqCst)
            + self.update.load(Ordering::SeqCst)
            + self.delete.load(Ordering::SeqCst)
            + self.delete_all.load(Ordering::SeqCst)
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    pub fn set_on_insert(&self, hook: impl Fn() + Send + Sync + 'static) {
        *self.on_insert.lock().unwrap() = Some(Box::new(hook));
    }
}

/// In-memory SQLite store that records every call and can be told to fail
/// writes.
pub struct CountingStore {
    inner: SqliteTaskStore,
    calls: Arc<StoreCalls>,
}

impl CountingStore {
    fn check_writable(&self) -> StoreResult<()> {
        if self.calls.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::InvalidData("disk is read-only".to_string()));
        }
        Ok(())
    }
}

impl TaskStore for CountingStore {
    fn list_all(&self) -> StoreResult<Vec<TaskRecord>> {
        self.calls.list_all.fetch_add(1, Ordering::SeqCst);
        let records = self.inner.list_all();
        let stall = self.calls.stall_next_list_ms.swap(0, Ordering::SeqCst);
        if stall > 0 {
            std::thread::sleep(Duration::from_millis(stall));
        }
        records
    }

    fn get_by_id(&self, id: TaskId) -> StoreResult<Option<TaskRecord>> {
        self.calls.get_by_id.fetch_add(1, Ordering::SeqCst);
        self.inner.get_by_id(id)
    }

    fn insert(&self, record: &TaskRecord) -> StoreResult<TaskId> {
        self.calls.insert.fetch_add(1, Ordering::SeqCst);
        if let Some(hook) = self.calls.on_insert.lock().unwrap().as_ref() {
            hook();
        }
        self.check_writable()?;
        self.inner.insert(record)
    }

    fn update(&self, record: &TaskRecord) -> StoreResult<()> {
        self.calls.update.fetch_add(1, Ordering::SeqCst);
        self.check_writable()?;
        self.inner.update(record)
    }

    fn delete(&self, record: &TaskRecord) -> StoreResult<()> {
        self.calls.delete.fetch_add(1, Ordering::SeqCst);
        self.check_writable()?;
        self.inner.delete(record)
    }

    fn delete_all(&self) -> StoreResult<()> {
        self.calls.delete_all.fetch_add(1, Ordering::SeqCst);
        self.check_writable()?;
        self.inner.delete_all()
    }
}

/// Use-cases over a fresh counting store.
pub fn counting_use_cases() -> (Arc<TaskUseCases<CountingStore>>, Arc<StoreCalls>) {
    let calls = Arc::new(StoreCalls::default());
    let store = CountingStore {
        inner: SqliteTaskStore::try_new(open_db_in_memory().unwrap()).unwrap(),
        calls: Arc::clone(&calls),
    };
    let use_cases = TaskUseCases::new(TaskRepository::new(store));
    (Arc::new(use_cases), calls)
}

/// Use-cases over a plain in-memory SQLite store.
pub fn sqlite_use_cases() -> Arc<TaskUseCases<SqliteTaskStore>> {
    let store = SqliteTaskStore::try_new(open_db_in_memory().unwrap()).unwrap();
    Arc::new(TaskUseCases::new(TaskRepository::new(store)))
}
