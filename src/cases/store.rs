//! JSON document store for saved cases
//!
//! The whole document is loaded, mutated in memory and written back while
//! holding the store's lock. A missing or unreadable document reads as an
//! empty store.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{OutrightError, Result};
use crate::export::NamedResults;
use crate::simulation::MonthlySummary;

/// A saved computation with the request that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub id: usize,
    pub name: String,
    /// Request payload as originally received
    pub inputs: serde_json::Value,
    pub results: Vec<MonthlySummary>,
    pub created: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
}

/// Listing entry without inputs or results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseSummary {
    pub id: usize,
    pub name: String,
    pub created: DateTime<Utc>,
}

#[derive(Debug)]
pub struct CaseStore {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl CaseStore {
    /// Open a store with its own lock
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::with_lock(path, Arc::new(Mutex::new(())))
    }

    /// Open a store sharing `lock` with other handles on the same document
    pub fn with_lock(path: impl Into<PathBuf>, lock: Arc<Mutex<()>>) -> Self {
        Self { path: path.into(), lock }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn list(&self) -> Vec<CaseSummary> {
        let _guard = self.guard();
        self.load()
            .into_iter()
            .map(|c| CaseSummary { id: c.id, name: c.name, created: c.created })
            .collect()
    }

    pub fn get(&self, id: usize) -> Result<Case> {
        let _guard = self.guard();
        self.load()
            .into_iter()
            .find(|c| c.id == id)
            .ok_or(OutrightError::CaseNotFound(id))
    }

    /// Append a case under the next sequential id
    pub fn append(
        &self,
        name: Option<String>,
        inputs: serde_json::Value,
        results: Vec<MonthlySummary>,
    ) -> Result<Case> {
        let _guard = self.guard();
        let mut cases = self.load();

        let now = Utc::now();
        let name = name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| format!("Case {}", now.timestamp()));

        let case = Case {
            id: cases.len(),
            name,
            inputs,
            results,
            created: now,
            updated: None,
        };
        cases.push(case.clone());
        self.save(&cases)?;

        info!("Saved case {} ({})", case.id, case.name);
        Ok(case)
    }

    /// Replace inputs and results of an existing case
    pub fn update(
        &self,
        id: usize,
        inputs: serde_json::Value,
        results: Vec<MonthlySummary>,
    ) -> Result<Case> {
        let _guard = self.guard();
        let mut cases = self.load();

        let case = cases
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(OutrightError::CaseNotFound(id))?;
        case.inputs = inputs;
        case.results = results;
        case.updated = Some(Utc::now());
        let updated = case.clone();

        self.save(&cases)?;
        info!("Updated case {}", id);
        Ok(updated)
    }

    /// Delete a case; remaining ids are renumbered from 0
    pub fn delete(&self, id: usize) -> Result<()> {
        let _guard = self.guard();
        let cases = self.load();
        let before = cases.len();

        let mut remaining: Vec<Case> = cases.into_iter().filter(|c| c.id != id).collect();
        if remaining.len() == before {
            return Err(OutrightError::CaseNotFound(id));
        }
        for (idx, case) in remaining.iter_mut().enumerate() {
            case.id = idx;
        }

        self.save(&remaining)?;
        info!("Deleted case {}, {} remaining", id, remaining.len());
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        let _guard = self.guard();
        self.save(&[])?;
        info!("Cleared all cases");
        Ok(())
    }

    /// Every saved case as an export sheet, in id order
    pub fn named_results(&self) -> Vec<NamedResults> {
        let _guard = self.guard();
        self.load()
            .into_iter()
            .map(|c| NamedResults::new(c.name, c.results))
            .collect()
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        // A panic while holding the lock leaves no in-memory state behind
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn load(&self) -> Vec<Case> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!("Cannot read case store {}: {}", self.path.display(), e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&text) {
            Ok(cases) => cases,
            Err(e) => {
                warn!("Case store {} is corrupt, treating as empty: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }

    fn save(&self, cases: &[Case]) -> Result<()> {
        let json = serde_json::to_string_pretty(cases)?;
        fs::write(&self.path, json)?;
        debug!("Wrote {} cases to {}", cases.len(), self.path.display());
        Ok(())
    }
}
