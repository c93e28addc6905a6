//! Live preview: a pure projection from the resume to the document the user
//! sees and exports.
//!
//! Presence means "non-empty after trimming". A section is emitted only when
//! its presence check passes, so the document never carries empty headings.
//! Blank entries stay in the model; they are only hidden here.

pub mod render;

use serde::Serialize;

use crate::models::resume::{Experience, Project, ResumeData, SkillGroup};

/// Identifier of the rendered preview, used to locate it for export.
pub const PREVIEW_TARGET_ID: &str = "resume-preview";

pub const NAME_PLACEHOLDER: &str = "Your Name";
pub const JOB_TITLE_PLACEHOLDER: &str = "Job Title";
pub const CATEGORY_PLACEHOLDER: &str = "Category";
pub const PROJECT_TITLE_PLACEHOLDER: &str = "Project Title";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewHeader {
    pub name: String,
    pub title: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewExperience {
    pub id: String,
    pub job_title: String,
    pub company: Option<String>,
    pub duration: Option<String>,
    pub responsibilities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewSkillGroup {
    pub id: String,
    pub category: String,
    pub skills: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewProject {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    ProfileOverview,
    KeyHighlights,
    ProfessionalExperience,
    TechnicalSkills,
    ProjectExperience,
}

impl SectionKind {
    pub const ALL: [SectionKind; 5] = [
        SectionKind::ProfileOverview,
        SectionKind::KeyHighlights,
        SectionKind::ProfessionalExperience,
        SectionKind::TechnicalSkills,
        SectionKind::ProjectExperience,
    ];

    pub fn heading(&self) -> &'static str {
        match self {
            SectionKind::ProfileOverview => "Profile Overview",
            SectionKind::KeyHighlights => "Key Highlights",
            SectionKind::ProfessionalExperience => "Professional Experience",
            SectionKind::TechnicalSkills => "Technical Skills",
            SectionKind::ProjectExperience => "Project Experience",
        }
    }
}

/// A rendered section. Serialized externally tagged so templates can branch
/// on the key that is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewSection {
    ProfileOverview(String),
    KeyHighlights(Vec<String>),
    ProfessionalExperience(Vec<PreviewExperience>),
    TechnicalSkills(Vec<PreviewSkillGroup>),
    ProjectExperience(Vec<PreviewProject>),
}

impl PreviewSection {
    pub fn kind(&self) -> SectionKind {
        match self {
            PreviewSection::ProfileOverview(_) => SectionKind::ProfileOverview,
            PreviewSection::KeyHighlights(_) => SectionKind::KeyHighlights,
            PreviewSection::ProfessionalExperience(_) => SectionKind::ProfessionalExperience,
            PreviewSection::TechnicalSkills(_) => SectionKind::TechnicalSkills,
            PreviewSection::ProjectExperience(_) => SectionKind::ProjectExperience,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewDocument {
    pub header: PreviewHeader,
    /// Present sections in page order.
    pub sections: Vec<PreviewSection>,
}

pub fn has_content(s: &str) -> bool {
    !s.trim().is_empty()
}

pub fn has_any_content(items: &[String]) -> bool {
    items.iter().any(|s| has_content(s))
}

fn experience_shown(exp: &Experience) -> bool {
    has_content(&exp.job_title) || has_content(&exp.company)
}

fn skill_group_shown(group: &SkillGroup) -> bool {
    has_content(&group.category) || has_content(&group.skills)
}

fn project_shown(proj: &Project) -> bool {
    has_content(&proj.title) || has_content(&proj.description)
}

/// Presence predicate governing whether `kind` appears in the preview.
pub fn section_present(kind: SectionKind, data: &ResumeData) -> bool {
    match kind {
        SectionKind::ProfileOverview => has_content(&data.profile_overview),
        SectionKind::KeyHighlights => has_any_content(&data.key_highlights),
        SectionKind::ProfessionalExperience => {
            data.professional_experience.iter().any(experience_shown)
        }
        SectionKind::TechnicalSkills => data.technical_skills.iter().any(skill_group_shown),
        SectionKind::ProjectExperience => data.project_experience.iter().any(project_shown),
    }
}

fn present(s: &str) -> Option<String> {
    has_content(s).then(|| s.to_string())
}

fn or_placeholder(s: &str, placeholder: &str) -> String {
    if has_content(s) {
        s.to_string()
    } else {
        placeholder.to_string()
    }
}

fn non_blank(items: &[String]) -> Vec<String> {
    items.iter().filter(|s| has_content(s)).cloned().collect()
}

fn project_section(kind: SectionKind, data: &ResumeData) -> PreviewSection {
    match kind {
        SectionKind::ProfileOverview => PreviewSection::ProfileOverview(data.profile_overview.clone()),
        SectionKind::KeyHighlights => PreviewSection::KeyHighlights(non_blank(&data.key_highlights)),
        SectionKind::ProfessionalExperience => PreviewSection::ProfessionalExperience(
            data.professional_experience
                .iter()
                .filter(|exp| experience_shown(exp))
                .map(|exp| PreviewExperience {
                    id: exp.id.clone(),
                    job_title: or_placeholder(&exp.job_title, JOB_TITLE_PLACEHOLDER),
                    company: present(&exp.company),
                    duration: present(&exp.duration),
                    responsibilities: non_blank(&exp.responsibilities),
                })
                .collect(),
        ),
        SectionKind::TechnicalSkills => PreviewSection::TechnicalSkills(
            data.technical_skills
                .iter()
                .filter(|group| skill_group_shown(group))
                .map(|group| PreviewSkillGroup {
                    id: group.id.clone(),
                    category: or_placeholder(&group.category, CATEGORY_PLACEHOLDER),
                    skills: group.skills.clone(),
                })
                .collect(),
        ),
        SectionKind::ProjectExperience => PreviewSection::ProjectExperience(
            data.project_experience
                .iter()
                .filter(|proj| project_shown(proj))
                .map(|proj| PreviewProject {
                    id: proj.id.clone(),
                    title: or_placeholder(&proj.title, PROJECT_TITLE_PLACEHOLDER),
                    description: present(&proj.description),
                })
                .collect(),
        ),
    }
}

/// Projects the resume into the previewed document. Pure and total.
pub fn project_preview(data: &ResumeData) -> PreviewDocument {
    let header = PreviewHeader {
        name: or_placeholder(&data.header.name, NAME_PLACEHOLDER),
        title: present(&data.header.title),
        email: present(&data.header.email),
    };

    let sections = SectionKind::ALL
        .into_iter()
        .filter(|kind| section_present(*kind, data))
        .map(|kind| project_section(kind, data))
        .collect();

    PreviewDocument { header, sections }
}
