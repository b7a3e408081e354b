//! Maid Profiles
//!
//! Public profile fields are browsable by anyone; the contact fields are only
//! handed out to employers holding an active unlock for that maid.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Publicly visible profile fields
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaidProfile {
    pub id: String,
    pub full_name: String,
    #[serde(default)]
    pub age_group: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub years_experience: Option<String>,
    #[serde(default)]
    pub expected_salary: Option<String>,
    #[serde(default)]
    pub available_from: Option<String>,
    #[serde(default)]
    pub preferred_working_time: Option<String>,
    #[serde(default)]
    pub preferred_location: Option<String>,
    #[serde(default)]
    pub specific_area: Option<String>,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub education_level: Option<String>,
    #[serde(default)]
    pub marital_status: Option<String>,
    #[serde(default)]
    pub religion: Option<String>,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
    #[serde(default)]
    pub languages_spoken: Option<Vec<String>>,
    #[serde(default)]
    pub about_me: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl MaidProfile {
    pub fn skills(&self) -> &[String] {
        self.skills.as_deref().unwrap_or_default()
    }

    pub fn languages(&self) -> &[String] {
        self.languages_spoken.as_deref().unwrap_or_default()
    }
}

/// Contact fields, gated behind an unlock
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaidContact {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// A full `maids` row
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaidRecord {
    #[serde(flatten)]
    pub profile: MaidProfile,
    #[serde(flatten)]
    pub contact: MaidContact,
}

/// Browse filters; empty fields match everything
///
/// `skills` and `languages` are comma-separated and match when the maid has
/// any one of them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MaidFilter {
    pub search: Option<String>,
    pub location: Option<String>,
    pub experience: Option<String>,
    pub salary: Option<String>,
    pub gender: Option<String>,
    pub age_group: Option<String>,
    pub skills: Option<String>,
    pub languages: Option<String>,
    pub education: Option<String>,
    pub nationality: Option<String>,
    pub available_from: Option<String>,
    pub working_time: Option<String>,
}

fn set(field: Option<&String>) -> Option<&str> {
    field.map(|s| s.trim()).filter(|s| !s.is_empty())
}

fn list(field: Option<&String>) -> Vec<&str> {
    set(field)
        .map(|s| s.split(',').map(str::trim).filter(|v| !v.is_empty()).collect())
        .unwrap_or_default()
}

/// Exact match on an optional column; an unset filter always passes
fn exact(filter: Option<&String>, value: Option<&String>) -> bool {
    set(filter).is_none_or(|f| value.is_some_and(|v| v == f))
}

impl MaidFilter {
    pub fn matches(&self, maid: &MaidProfile) -> bool {
        if let Some(search) = set(self.search.as_ref()) {
            let needle = search.to_lowercase();
            let hit = maid.full_name.to_lowercase().contains(&needle)
                || maid
                    .about_me
                    .as_ref()
                    .is_some_and(|a| a.to_lowercase().contains(&needle))
                || maid
                    .skills()
                    .iter()
                    .any(|s| s.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        if let Some(location) = set(self.location.as_ref()) {
            let hit = maid.preferred_location.as_deref() == Some(location)
                || maid
                    .specific_area
                    .as_ref()
                    .is_some_and(|a| a.contains(location));
            if !hit {
                return false;
            }
        }

        let skills = list(self.skills.as_ref());
        if !skills.is_empty() && !skills.iter().any(|s| maid.skills().iter().any(|m| m == s)) {
            return false;
        }

        let languages = list(self.languages.as_ref());
        if !languages.is_empty()
            && !languages
                .iter()
                .any(|l| maid.languages().iter().any(|m| m == l))
        {
            return false;
        }

        exact(self.experience.as_ref(), maid.years_experience.as_ref())
            && exact(self.salary.as_ref(), maid.expected_salary.as_ref())
            && exact(self.gender.as_ref(), maid.gender.as_ref())
            && exact(self.age_group.as_ref(), maid.age_group.as_ref())
            && exact(self.education.as_ref(), maid.education_level.as_ref())
            && exact(self.nationality.as_ref(), maid.nationality.as_ref())
            && exact(self.available_from.as_ref(), maid.available_from.as_ref())
            && exact(self.working_time.as_ref(), maid.preferred_working_time.as_ref())
    }

    /// Keep matching profiles, order preserved
    pub fn apply(&self, maids: Vec<MaidProfile>) -> Vec<MaidProfile> {
        maids.into_iter().filter(|m| self.matches(m)).collect()
    }
}

/// Maid profile source
#[async_trait]
pub trait MaidDirectory: Send + Sync {
    /// All profiles, newest first
    async fn list(&self) -> Result<Vec<MaidRecord>>;

    /// One profile with its contact fields
    async fn get(&self, id: &str) -> Result<Option<MaidRecord>>;

    /// Directory name
    fn name(&self) -> &str;
}

/// In-memory maid directory (for development)
#[derive(Default)]
pub struct MemoryMaidDirectory {
    maids: RwLock<HashMap<String, MaidRecord>>,
}

impl MemoryMaidDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_maid(self, record: MaidRecord) -> Self {
        self.insert(record);
        self
    }

    pub fn insert(&self, record: MaidRecord) {
        if let Ok(mut maids) = self.maids.write() {
            maids.insert(record.profile.id.clone(), record);
        }
    }
}

#[async_trait]
impl MaidDirectory for MemoryMaidDirectory {
    async fn list(&self) -> Result<Vec<MaidRecord>> {
        let maids = self
            .maids
            .read()
            .map_err(|e| CoreError::Storage(e.to_string()))?;
        let mut all: Vec<MaidRecord> = maids.values().cloned().collect();
        all.sort_by(|a, b| b.profile.created_at.cmp(&a.profile.created_at));
        Ok(all)
    }

    async fn get(&self, id: &str) -> Result<Option<MaidRecord>> {
        let maids = self
            .maids
            .read()
            .map_err(|e| CoreError::Storage(e.to_string()))?;
        Ok(maids.get(id).cloned())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
