use crate::dispatch::{Surface, ViewUpdate};
use crate::render::{map_figure, Figure};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// The origin currently driving the destination map.
///
/// Only the click handler changes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "origin", rename_all = "snake_case")]
pub enum Selection {
    #[default]
    NoSelection,
    Selected(String),
}

impl Selection {
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            Some(name) => Selection::Selected(name.to_string()),
            None => Selection::NoSelection,
        }
    }

    /// Name used for filtering and for the map title; empty when nothing is selected.
    pub fn origin_name(&self) -> &str {
        match self {
            Selection::NoSelection => "",
            Selection::Selected(name) => name,
        }
    }
}

// Per-user interaction state plus the last render of each dynamic view
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: String,
    selection: Selection,
    input_field: Option<String>,
    map: Figure,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            selection: Selection::NoSelection,
            input_field: None,
            map: map_figure("", &[]),
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn input_field(&self) -> Option<&str> {
        self.input_field.as_deref()
    }

    pub fn map(&self) -> &Figure {
        &self.map
    }

    pub(crate) fn select(&mut self, selection: Selection) {
        self.selection = selection;
    }
}

impl Surface for Session {
    fn apply(&mut self, update: &ViewUpdate) {
        match update {
            ViewUpdate::InputField { value } => self.input_field = Some(value.clone()),
            ViewUpdate::Map { figure } => self.map = figure.clone(),
        }
    }
}

pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

struct Entry {
    session: Session,
    last_seen: Instant,
}

/// Live sessions keyed by id. The lock is held for a whole dispatch.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Entry>>,
    idle_timeout: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_idle_timeout(DEFAULT_IDLE_TIMEOUT)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_timeout,
        }
    }

    pub fn create(&self) -> Session {
        self.create_at(Instant::now())
    }

    fn create_at(&self, now: Instant) -> Session {
        let session = Session::new(Uuid::new_v4().to_string());
        let mut sessions = self.sessions.lock();
        evict_idle(&mut sessions, now, self.idle_timeout);
        sessions.insert(
            session.id.clone(),
            Entry { session: session.clone(), last_seen: now },
        );
        session
    }

    pub fn get(&self, id: &str) -> Option<Session> {
        let mut sessions = self.sessions.lock();
        let entry = sessions.get_mut(id)?;
        entry.last_seen = Instant::now();
        Some(entry.session.clone())
    }

    pub fn remove(&self, id: &str) -> bool {
        self.sessions.lock().remove(id).is_some()
    }

    // Holds the store lock for the duration of `f`
    pub fn with_session<T>(&self, id: &str, f: impl FnOnce(&mut Session) -> T) -> Option<T> {
        let mut sessions = self.sessions.lock();
        let entry = sessions.get_mut(id)?;
        entry.last_seen = Instant::now();
        Some(f(&mut entry.session))
    }

    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    fn sweep_at(&self, now: Instant) -> usize {
        evict_idle(&mut self.sessions.lock(), now, self.idle_timeout)
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }
}

fn evict_idle(sessions: &mut HashMap<String, Entry>, now: Instant, idle_timeout: Duration) -> usize {
    let before = sessions.len();
    sessions.retain(|_, entry| now.saturating_duration_since(entry.last_seen) <= idle_timeout);
    before - sessions.len()
}
