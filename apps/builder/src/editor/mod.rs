//! Form editor: translates one user interaction into a whole new resume.
//!
//! `apply_edit` never mutates its input. Targets that do not exist (unknown
//! id, index out of range) and removal of the last entry of a list leave the
//! model unchanged. No field is validated; any text is accepted.

pub mod lists;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::resume::{Experience, Project, ResumeData, SkillGroup};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderField {
    Name,
    Title,
    Email,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceField {
    JobTitle,
    Company,
    Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillGroupField {
    Category,
    Skills,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectField {
    Title,
    Description,
}

/// One committed form interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum FormEdit {
    SetHeader { field: HeaderField, value: String },
    SetProfileOverview { value: String },

    AddHighlight,
    RemoveHighlight { index: usize },
    SetHighlight { index: usize, value: String },

    AddExperience,
    RemoveExperience { id: String },
    SetExperience { id: String, field: ExperienceField, value: String },

    AddResponsibility { experience_id: String },
    RemoveResponsibility { experience_id: String, index: usize },
    SetResponsibility { experience_id: String, index: usize, value: String },

    AddSkillGroup,
    RemoveSkillGroup { id: String },
    SetSkillGroup { id: String, field: SkillGroupField, value: String },

    AddProject,
    RemoveProject { id: String },
    SetProject { id: String, field: ProjectField, value: String },
}

/// Returns the resume that results from applying `edit` to `current`.
pub fn apply_edit(current: &ResumeData, edit: &FormEdit) -> ResumeData {
    let mut next = current.clone();
    match edit {
        FormEdit::SetHeader { field, value } => {
            let slot = match field {
                HeaderField::Name => &mut next.header.name,
                HeaderField::Title => &mut next.header.title,
                HeaderField::Email => &mut next.header.email,
            };
            *slot = value.clone();
        }
        FormEdit::SetProfileOverview { value } => next.profile_overview = value.clone(),

        FormEdit::AddHighlight => {
            next.key_highlights = lists::append(&current.key_highlights, String::new());
        }
        FormEdit::RemoveHighlight { index } => {
            next.key_highlights = lists::remove_at(&current.key_highlights, *index);
        }
        FormEdit::SetHighlight { index, value } => {
            next.key_highlights =
                lists::update_at(&current.key_highlights, *index, |h| *h = value.clone());
        }

        FormEdit::AddExperience => {
            next.professional_experience =
                lists::append(&current.professional_experience, Experience::blank());
        }
        FormEdit::RemoveExperience { id } => {
            next.professional_experience = lists::remove_by_id(&current.professional_experience, id);
        }
        FormEdit::SetExperience { id, field, value } => {
            next.professional_experience =
                lists::update_by_id(&current.professional_experience, id, |exp| {
                    let slot = match field {
                        ExperienceField::JobTitle => &mut exp.job_title,
                        ExperienceField::Company => &mut exp.company,
                        ExperienceField::Duration => &mut exp.duration,
                    };
                    *slot = value.clone();
                });
        }

        FormEdit::AddResponsibility { experience_id } => {
            next.professional_experience =
                lists::update_by_id(&current.professional_experience, experience_id, |exp| {
                    exp.responsibilities = lists::append(&exp.responsibilities, String::new());
                });
        }
        FormEdit::RemoveResponsibility {
            experience_id,
            index,
        } => {
            next.professional_experience =
                lists::update_by_id(&current.professional_experience, experience_id, |exp| {
                    exp.responsibilities = lists::remove_at(&exp.responsibilities, *index);
                });
        }
        FormEdit::SetResponsibility {
            experience_id,
            index,
            value,
        } => {
            next.professional_experience =
                lists::update_by_id(&current.professional_experience, experience_id, |exp| {
                    exp.responsibilities =
                        lists::update_at(&exp.responsibilities, *index, |r| *r = value.clone());
                });
        }

        FormEdit::AddSkillGroup => {
            next.technical_skills = lists::append(&current.technical_skills, SkillGroup::blank());
        }
        FormEdit::RemoveSkillGroup { id } => {
            next.technical_skills = lists::remove_by_id(&current.technical_skills, id);
        }
        FormEdit::SetSkillGroup { id, field, value } => {
            next.technical_skills = lists::update_by_id(&current.technical_skills, id, |group| {
                let slot = match field {
                    SkillGroupField::Category => &mut group.category,
                    SkillGroupField::Skills => &mut group.skills,
                };
                *slot = value.clone();
            });
        }

        FormEdit::AddProject => {
            next.project_experience = lists::append(&current.project_experience, Project::blank());
        }
        FormEdit::RemoveProject { id } => {
            next.project_experience = lists::remove_by_id(&current.project_experience, id);
        }
        FormEdit::SetProject { id, field, value } => {
            next.project_experience = lists::update_by_id(&current.project_experience, id, |proj| {
                let slot = match field {
                    ProjectField::Title => &mut proj.title,
                    ProjectField::Description => &mut proj.description,
                };
                *slot = value.clone();
            });
        }
    }
    next
}

/// Which remove buttons the page may enable. A list with one entry left
/// cannot shrink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovalFlags {
    pub key_highlights: bool,
    pub professional_experience: bool,
    pub technical_skills: bool,
    pub project_experience: bool,
    /// Keyed by experience id.
    pub responsibilities: BTreeMap<String, bool>,
}

pub fn removal_flags(data: &ResumeData) -> RemovalFlags {
    RemovalFlags {
        key_highlights: data.key_highlights.len() > 1,
        professional_experience: data.professional_experience.len() > 1,
        technical_skills: data.technical_skills.len() > 1,
        project_experience: data.project_experience.len() > 1,
        responsibilities: data
            .professional_experience
            .iter()
            .map(|exp| (exp.id.clone(), exp.responsibilities.len() > 1))
            .collect(),
    }
}
