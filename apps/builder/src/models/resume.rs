use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Key under which the serialized resume is mirrored into the key-value store.
pub const RESUME_STORAGE_KEY: &str = "resume-builder-data";

/// Generates an opaque id for a new list entry.
pub fn new_entry_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub title: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub id: String,
    pub job_title: String,
    pub company: String,
    /// Free text ("Jan 2020 - Present"), never parsed.
    pub duration: String,
    pub responsibilities: Vec<String>,
}

impl Experience {
    pub fn blank() -> Self {
        Self {
            id: new_entry_id(),
            job_title: String::new(),
            company: String::new(),
            duration: String::new(),
            responsibilities: vec![String::new()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillGroup {
    pub id: String,
    pub category: String,
    /// Comma-separated by convention only. Kept as one string.
    pub skills: String,
}

impl SkillGroup {
    pub fn blank() -> Self {
        Self {
            id: new_entry_id(),
            category: String::new(),
            skills: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
}

impl Project {
    pub fn blank() -> Self {
        Self {
            id: new_entry_id(),
            title: String::new(),
            description: String::new(),
        }
    }
}

/// A list entry addressable by its stable id rather than its position.
pub trait Identified {
    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
}

macro_rules! impl_identified {
    ($($ty:ty),*) => {
        $(impl Identified for $ty {
            fn id(&self) -> &str {
                &self.id
            }

            fn set_id(&mut self, id: String) {
                self.id = id;
            }
        })*
    };
}

impl_identified!(Experience, SkillGroup, Project);

/// The full resume document. Field names are persisted verbatim (camelCase).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeData {
    pub header: Header,
    pub profile_overview: String,
    pub key_highlights: Vec<String>,
    pub professional_experience: Vec<Experience>,
    pub technical_skills: Vec<SkillGroup>,
    pub project_experience: Vec<Project>,
}

impl ResumeData {
    /// Canonical empty instance: one blank entry in every repeatable list.
    pub fn empty() -> Self {
        Self {
            header: Header::default(),
            profile_overview: String::new(),
            key_highlights: vec![String::new()],
            professional_experience: vec![Experience::blank()],
            technical_skills: vec![SkillGroup::blank()],
            project_experience: vec![Project::blank()],
        }
    }

    /// Restores the editing invariants on a snapshot that came from outside
    /// the editor: no empty repeatable list, no missing or duplicate ids.
    ///
    /// A snapshot that already satisfies the invariants is returned unchanged.
    pub fn normalized(mut self) -> Self {
        if self.key_highlights.is_empty() {
            self.key_highlights.push(String::new());
        }
        if self.professional_experience.is_empty() {
            self.professional_experience.push(Experience::blank());
        }
        if self.technical_skills.is_empty() {
            self.technical_skills.push(SkillGroup::blank());
        }
        if self.project_experience.is_empty() {
            self.project_experience.push(Project::blank());
        }
        for exp in &mut self.professional_experience {
            if exp.responsibilities.is_empty() {
                exp.responsibilities.push(String::new());
            }
        }

        reassign_bad_ids(&mut self.professional_experience);
        reassign_bad_ids(&mut self.technical_skills);
        reassign_bad_ids(&mut self.project_experience);
        self
    }
}

impl Default for ResumeData {
    fn default() -> Self {
        Self::empty()
    }
}

/// Free-function form of [`ResumeData::empty`].
pub fn create_empty_resume_data() -> ResumeData {
    ResumeData::empty()
}

fn reassign_bad_ids<T: Identified>(items: &mut [T]) {
    let mut seen = HashSet::new();
    for item in items.iter_mut() {
        if item.id().trim().is_empty() || !seen.insert(item.id().to_string()) {
            let id = new_entry_id();
            seen.insert(id.clone());
            item.set_id(id);
        }
    }
}
