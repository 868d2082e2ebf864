use std::collections::{BTreeMap, HashMap};
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info};

// =============================================================================
// 1. THE ABSTRACTION (Traits with Hooks, Params, and Actions)
// =============================================================================

/// Trait that any stored record must implement to be managed by ResourceActor.
pub trait Entity: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    type Id: Eq + Hash + Ord + Clone + Send + Sync + Display + Debug + Serialize + DeserializeOwned;
    type CreateParams: Send + Sync + Debug;
    type Patch: Send + Sync + Debug;
    type Action: Send + Sync + Debug;
    type ActionResult: Send + Sync + Debug;

    fn id(&self) -> &Self::Id;

    /// Construct the full record from the generated ID and the creation params.
    fn from_create_params(id: Self::Id, params: Self::CreateParams) -> Result<Self, String>;

    /// Secondary key that must be unique across the table, if the record has one.
    fn unique_key(&self) -> Option<String> {
        None
    }

    // --- Lifecycle Hooks ---

    fn on_create(&mut self) -> Result<(), String> {
        Ok(())
    }
    fn on_update(&mut self, patch: Self::Patch) -> Result<(), String>;
    fn on_delete(&self) -> Result<(), String> {
        Ok(())
    }

    /// Actions must not change the record's unique key.
    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, String>;
}

/// Failures reported by a resource actor or by the channel in front of it.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameworkError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Unique key already taken: {0}")]
    Conflict(String),
    #[error("Rejected by entity hook: {0}")]
    Rejected(String),
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped")]
    ActorDropped,
    #[error("Table storage failed: {0}")]
    Storage(String),
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

#[derive(Debug)]
pub enum ResourceRequest<T: Entity> {
    Create {
        params: T::CreateParams,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    FindByKey {
        key: String,
        respond_to: Response<Option<T>>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        patch: T::Patch,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<T>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

/// On-disk form of one table. `last_id` is kept so that ids of deleted
/// records are never handed out again.
#[derive(Deserialize)]
#[serde(bound = "")]
struct TableSnapshot<T: Entity> {
    last_id: Option<T::Id>,
    records: Vec<T>,
}

#[derive(Serialize)]
#[serde(bound = "")]
struct TableSnapshotRef<'a, T: Entity> {
    last_id: Option<&'a T::Id>,
    records: Vec<&'a T>,
}

type NextIdFn<T> = Box<dyn Fn(Option<&<T as Entity>::Id>) -> <T as Entity>::Id + Send + Sync>;

/// Owns one table. Requests are handled strictly one at a time, so every
/// operation against the table is atomic with respect to every other.
///
/// A table opened with [`ResourceActor::open`] is written through to its
/// file after every mutation; a mutation whose write fails is rolled back
/// in memory and reported as [`FrameworkError::Storage`].
pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: BTreeMap<T::Id, T>,
    keys: HashMap<String, T::Id>,
    last_id: Option<T::Id>,
    next_id_fn: NextIdFn<T>,
    storage: Option<PathBuf>,
}

impl<T: Entity> ResourceActor<T> {
    /// An in-memory table. `next_id_fn` receives the last id issued.
    pub fn new(
        buffer_size: usize,
        next_id_fn: impl Fn(Option<&T::Id>) -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: BTreeMap::new(),
            keys: HashMap::new(),
            last_id: None,
            next_id_fn: Box::new(next_id_fn),
            storage: None,
        };
        (actor, ResourceClient::new(sender))
    }

    /// A table backed by a JSON file, loaded now if it exists.
    pub async fn open(
        buffer_size: usize,
        path: impl Into<PathBuf>,
        next_id_fn: impl Fn(Option<&T::Id>) -> T::Id + Send + Sync + 'static,
    ) -> Result<(Self, ResourceClient<T>), FrameworkError> {
        let path = path.into();
        let storage_error = |e: &dyn Display| FrameworkError::Storage(format!("{}: {e}", path.display()));

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| storage_error(&e))?;
        }

        let (mut actor, client) = Self::new(buffer_size, next_id_fn);
        match fs::read(&path).await {
            Ok(bytes) => {
                let snapshot: TableSnapshot<T> =
                    serde_json::from_slice(&bytes).map_err(|e| storage_error(&e))?;
                actor.load(snapshot)?;
                info!(table = %path.display(), records = actor.store.len(), "Table loaded");
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(storage_error(&e)),
        }
        actor.storage = Some(path);
        Ok((actor, client))
    }

    fn load(&mut self, snapshot: TableSnapshot<T>) -> Result<(), FrameworkError> {
        for item in snapshot.records {
            let id = item.id().clone();
            if let Some(key) = item.unique_key() {
                if self.keys.insert(key.clone(), id.clone()).is_some() {
                    return Err(FrameworkError::Conflict(key));
                }
            }
            self.store.insert(id, item);
        }
        self.last_id = snapshot
            .last_id
            .into_iter()
            .chain(self.store.keys().next_back().cloned())
            .max();
        Ok(())
    }

    pub async fn run(mut self) {
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    let _ = respond_to.send(self.handle_create(params).await);
                }
                ResourceRequest::Get { id, respond_to } => {
                    let _ = respond_to.send(Ok(self.store.get(&id).cloned()));
                }
                ResourceRequest::FindByKey { key, respond_to } => {
                    let item = self
                        .keys
                        .get(&key)
                        .and_then(|id| self.store.get(id))
                        .cloned();
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::List { respond_to } => {
                    let _ = respond_to.send(Ok(self.store.values().cloned().collect()));
                }
                ResourceRequest::Update { id, patch, respond_to } => {
                    let _ = respond_to.send(self.handle_update(id, patch).await);
                }
                ResourceRequest::Delete { id, respond_to } => {
                    let _ = respond_to.send(self.handle_delete(id).await);
                }
                ResourceRequest::Action { id, action, respond_to } => {
                    let _ = respond_to.send(self.handle_action(id, action).await);
                }
            }
        }
    }

    async fn handle_create(&mut self, params: T::CreateParams) -> Result<T::Id, FrameworkError> {
        let id = (self.next_id_fn)(self.last_id.as_ref());
        let mut item = T::from_create_params(id.clone(), params).map_err(FrameworkError::Rejected)?;
        item.on_create().map_err(FrameworkError::Rejected)?;

        let key = item.unique_key();
        if let Some(key) = &key {
            if self.keys.contains_key(key) {
                return Err(FrameworkError::Conflict(key.clone()));
            }
            self.keys.insert(key.clone(), id.clone());
        }
        self.store.insert(id.clone(), item);
        let previous_last = self.last_id.replace(id.clone());

        let undo_id = id.clone();
        self.commit(id, move |actor| {
            actor.store.remove(&undo_id);
            if let Some(key) = key {
                actor.keys.remove(&key);
            }
            actor.last_id = previous_last;
        })
        .await
    }

    async fn handle_update(&mut self, id: T::Id, patch: T::Patch) -> Result<T, FrameworkError> {
        let current = self
            .store
            .get(&id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        let old_key = current.unique_key();
        let mut updated = current.clone();
        updated.on_update(patch).map_err(FrameworkError::Rejected)?;

        let new_key = updated.unique_key();
        if new_key != old_key {
            if let Some(key) = &new_key {
                if self.keys.contains_key(key) {
                    return Err(FrameworkError::Conflict(key.clone()));
                }
            }
        }

        let previous = self.store.insert(id.clone(), updated.clone());
        self.move_key(&id, old_key.as_ref(), new_key.as_ref());

        self.commit(updated, move |actor| {
            actor.move_key(&id, new_key.as_ref(), old_key.as_ref());
            if let Some(previous) = previous {
                actor.store.insert(id, previous);
            }
        })
        .await
    }

    async fn handle_delete(&mut self, id: T::Id) -> Result<T, FrameworkError> {
        let item = self
            .store
            .get(&id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        item.on_delete().map_err(FrameworkError::Rejected)?;
        let key = item.unique_key();

        let removed = self
            .store
            .remove(&id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        if let Some(key) = &key {
            self.keys.remove(key);
        }

        let restore = removed.clone();
        self.commit(removed, move |actor| {
            if let Some(key) = key {
                actor.keys.insert(key, id.clone());
            }
            actor.store.insert(id, restore);
        })
        .await
    }

    async fn handle_action(&mut self, id: T::Id, action: T::Action) -> Result<T::ActionResult, FrameworkError> {
        let item = self
            .store
            .get_mut(&id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        let before = item.clone();
        let result = match item.handle_action(action) {
            Ok(result) => result,
            Err(e) => {
                *item = before;
                return Err(FrameworkError::Rejected(e));
            }
        };

        self.commit(result, move |actor| {
            actor.store.insert(id, before);
        })
        .await
    }

    fn move_key(&mut self, id: &T::Id, from: Option<&String>, to: Option<&String>) {
        if from == to {
            return;
        }
        if let Some(key) = from {
            self.keys.remove(key);
        }
        if let Some(key) = to {
            self.keys.insert(key.clone(), id.clone());
        }
    }

    /// Persists the table; undoes the in-memory change if that fails.
    async fn commit<R>(&mut self, value: R, undo: impl FnOnce(&mut Self)) -> Result<R, FrameworkError> {
        let written = match self.snapshot() {
            Ok(Some((path, bytes))) => write_table(path, bytes).await,
            Ok(None) => Ok(()),
            Err(e) => Err(e),
        };
        match written {
            Ok(()) => Ok(value),
            Err(e) => {
                error!(error = %e, "Write-through failed, change rolled back");
                undo(self);
                Err(e)
            }
        }
    }

    fn snapshot(&self) -> Result<Option<(PathBuf, Vec<u8>)>, FrameworkError> {
        let Some(path) = &self.storage else {
            return Ok(None);
        };
        let snapshot = TableSnapshotRef::<T> {
            last_id: self.last_id.as_ref(),
            records: self.store.values().collect(),
        };
        let bytes = serde_json::to_vec_pretty(&snapshot)
            .map_err(|e| FrameworkError::Storage(format!("{}: {e}", path.display())))?;
        Ok(Some((path.clone(), bytes)))
    }
}

/// Whole-table snapshot written to a temp file, then renamed over the
/// previous one.
async fn write_table(path: PathBuf, bytes: Vec<u8>) -> Result<(), FrameworkError> {
    let storage_error = |e: std::io::Error| FrameworkError::Storage(format!("{}: {e}", path.display()));
    let temp = path.with_extension("json.tmp");
    fs::write(&temp, bytes).await.map_err(storage_error)?;
    fs::rename(&temp, &path).await.map_err(storage_error)
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: Entity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(&self, params: T::CreateParams) -> Result<T::Id, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Create { params, respond_to })
            .await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to })
            .await
    }

    pub async fn find_by_key(&self, key: String) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::FindByKey { key, respond_to })
            .await
    }

    pub async fn list(&self) -> Result<Vec<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::List { respond_to })
            .await
    }

    pub async fn update(&self, id: T::Id, patch: T::Patch) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Update { id, patch, respond_to })
            .await
    }

    pub async fn delete(&self, id: T::Id) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to })
            .await
    }

    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Action { id, action, respond_to })
            .await
    }
}

/// Sequential `u64` ids starting at 1.
pub fn next_sequential(last: Option<&u64>) -> u64 {
    last.map_or(1, |id| id + 1)
}
