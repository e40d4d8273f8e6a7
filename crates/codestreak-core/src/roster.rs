//! File-backed roster.
//!
//! The connector keeps a JSON document of the groups the bot is in, their
//! members, and each group's reminder webhook. The file is re-read on
//! every sweep so membership changes are picked up without a restart.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::DeliveryError;
use crate::scanner::{Group, Member, Roster};

#[derive(Debug, Deserialize)]
struct RosterDoc {
    #[serde(default)]
    groups: Vec<GroupDoc>,
}

#[derive(Debug, Deserialize)]
struct GroupDoc {
    id: String,
    name: String,
    #[serde(default)]
    webhook_url: Option<String>,
    #[serde(default)]
    members: Vec<MemberDoc>,
}

#[derive(Debug, Deserialize)]
struct MemberDoc {
    id: String,
    display_name: String,
    #[serde(default)]
    is_bot: bool,
}

pub struct FileRoster {
    path: PathBuf,
}

impl FileRoster {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<RosterDoc, DeliveryError> {
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| DeliveryError::Roster(format!("{}: {e}", self.path.display())))?;
        serde_json::from_str(&content)
            .map_err(|e| DeliveryError::Roster(format!("{}: {e}", self.path.display())))
    }

    /// Group id -> webhook URL, for wiring the notifier at startup.
    pub fn webhooks(&self) -> Result<HashMap<String, String>, DeliveryError> {
        let doc = self.read()?;
        Ok(doc
            .groups
            .into_iter()
            .filter_map(|g| g.webhook_url.map(|url| (g.id, url)))
            .collect())
    }
}

impl Roster for FileRoster {
    fn groups(&self) -> Result<Vec<Group>, DeliveryError> {
        let doc = self.read()?;
        Ok(doc
            .groups
            .into_iter()
            .map(|g| Group {
                id: g.id,
                name: g.name,
                members: g
                    .members
                    .into_iter()
                    .map(|m| Member {
                        id: m.id,
                        display_name: m.display_name,
                        is_bot: m.is_bot,
                    })
                    .collect(),
            })
            .collect())
    }
}
