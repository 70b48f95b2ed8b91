use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, trace};

use crate::common::collections::{HashMap, HashSet};
use crate::model::window::{AppId, AppWindow, WindowUpdate};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BoardError {
    #[error("no app with id {0} on this board")]
    UnknownApp(AppId),
    #[error("more than one app has id {0}")]
    DuplicateApp(AppId),
}

/// Applies a batch of position updates. Implementations apply either every
/// update or none of them.
pub trait BatchUpdate {
    fn apply_batch(&mut self, updates: &[WindowUpdate]) -> Result<(), BoardError>;
}

/// In-memory copy of a board's apps, as exported from the app collection.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    #[serde(default)]
    pub apps: Vec<AppWindow>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl BoardSnapshot {
    pub fn new(apps: Vec<AppWindow>) -> Self {
        Self {
            apps,
            other: Map::new(),
        }
    }

    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let buf = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&buf)?)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json.as_bytes())?;
        Ok(())
    }

    pub fn get(&self, id: &AppId) -> Option<&AppWindow> { self.apps.iter().find(|a| &a.id == id) }

    /// Apps matching `ids`, in board order. Ids that are not on the board are
    /// ignored.
    pub fn select(&self, ids: &[AppId]) -> Vec<AppWindow> {
        let wanted: HashSet<&AppId> = ids.iter().collect();
        let selected: Vec<AppWindow> =
            self.apps.iter().filter(|a| wanted.contains(&a.id)).cloned().collect();
        if selected.len() < wanted.len() {
            debug!(
                requested = wanted.len(),
                found = selected.len(),
                "some selected apps are not on the board"
            );
        }
        selected
    }

    /// Position of every app by id. Ids shared by several apps map to `None`.
    fn index(&self) -> HashMap<&AppId, Option<usize>> {
        let mut index = HashMap::default();
        for (i, app) in self.apps.iter().enumerate() {
            index.entry(&app.id).and_modify(|slot| *slot = None).or_insert(Some(i));
        }
        index
    }
}

impl BatchUpdate for BoardSnapshot {
    fn apply_batch(&mut self, updates: &[WindowUpdate]) -> Result<(), BoardError> {
        let targets = {
            let index = self.index();
            updates
                .iter()
                .map(|u| match index.get(&u.id) {
                    Some(Some(target)) => Ok(*target),
                    Some(None) => Err(BoardError::DuplicateApp(u.id.clone())),
                    None => Err(BoardError::UnknownApp(u.id.clone())),
                })
                .collect::<Result<Vec<_>, _>>()?
        };
        for (update, target) in updates.iter().zip(targets) {
            trace!(id = %update.id, x = update.position.x, y = update.position.y, "moving app");
            self.apps[target].data.position = Some(update.position);
        }
        debug!(count = updates.len(), "applied position batch");
        Ok(())
    }
}
