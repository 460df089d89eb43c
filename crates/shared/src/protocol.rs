//! Wire shapes of the portfolio API and their validated conversions.

use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        CertificateEntry, ChatMessage, ChatRole, EntryId, Period, Proficiency, Profile,
        ProjectEntry, SkillEntry, TimelineEntry,
    },
    error::SchemaError,
};

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetRef {
    #[serde(default)]
    pub url: Option<String>,
}

fn asset_url(asset: Option<AssetRef>) -> Option<String> {
    non_empty(asset.and_then(|a| a.url))
}

fn entry_id(raw: Option<String>) -> Option<EntryId> {
    non_empty(raw).map(EntryId)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePayload {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "aboutme")]
    pub about_me: Option<String>,
    #[serde(default)]
    pub avatar: Option<AssetRef>,
    #[serde(default)]
    pub resume: Option<AssetRef>,
    #[serde(default, rename = "githubURL")]
    pub github_url: Option<String>,
    #[serde(default, rename = "linkedInURL")]
    pub linkedin_url: Option<String>,
    #[serde(default, rename = "instagramURL")]
    pub instagram_url: Option<String>,
    #[serde(default, rename = "facebookURL")]
    pub facebook_url: Option<String>,
}

impl TryFrom<ProfilePayload> for Profile {
    type Error = SchemaError;

    fn try_from(value: ProfilePayload) -> Result<Self, Self::Error> {
        let full_name = non_empty(value.full_name).ok_or(SchemaError::missing("user.fullName"))?;
        Ok(Self {
            full_name,
            email: non_empty(value.email),
            about_me: non_empty(value.about_me),
            avatar_url: asset_url(value.avatar),
            resume_url: asset_url(value.resume),
            github_url: non_empty(value.github_url),
            linkedin_url: non_empty(value.linkedin_url),
            instagram_url: non_empty(value.instagram_url),
            facebook_url: non_empty(value.facebook_url),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPayload {
    #[serde(default, rename = "_id")]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technologies: String,
    #[serde(default)]
    pub stack: String,
    #[serde(default)]
    pub project_banner: Option<AssetRef>,
    #[serde(default)]
    pub git_repo_link: Option<String>,
    #[serde(default)]
    pub project_link: Option<String>,
}

impl TryFrom<ProjectPayload> for ProjectEntry {
    type Error = SchemaError;

    fn try_from(value: ProjectPayload) -> Result<Self, Self::Error> {
        let repository_url =
            non_empty(value.git_repo_link).ok_or(SchemaError::missing("projects[].gitRepoLink"))?;
        Ok(Self {
            id: entry_id(value.id),
            title: value.title,
            description: value.description,
            technologies: value.technologies,
            stack: value.stack,
            banner_url: asset_url(value.project_banner),
            repository_url,
            live_url: non_empty(value.project_link),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillPayload {
    #[serde(default, rename = "_id")]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub svg: Option<AssetRef>,
    pub proficiency: i64,
}

impl TryFrom<SkillPayload> for SkillEntry {
    type Error = SchemaError;

    fn try_from(value: SkillPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            id: entry_id(value.id),
            title: value.title,
            icon_url: asset_url(value.svg),
            proficiency: Proficiency::try_from(value.proficiency)?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodPayload {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelinePayload {
    #[serde(default, rename = "_id")]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub timeline: PeriodPayload,
}

impl TryFrom<TimelinePayload> for TimelineEntry {
    type Error = SchemaError;

    fn try_from(value: TimelinePayload) -> Result<Self, Self::Error> {
        let from =
            non_empty(value.timeline.from).ok_or(SchemaError::missing("timelines[].timeline.from"))?;
        Ok(Self {
            id: entry_id(value.id),
            title: value.title,
            description: value.description,
            period: Period {
                from,
                to: non_empty(value.timeline.to),
            },
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificatePayload {
    #[serde(default, rename = "_id")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub svg: Option<AssetRef>,
}

impl TryFrom<CertificatePayload> for CertificateEntry {
    type Error = SchemaError;

    fn try_from(value: CertificatePayload) -> Result<Self, Self::Error> {
        Ok(Self {
            id: entry_id(value.id),
            name: value.name,
            image_url: asset_url(value.svg),
        })
    }
}

pub fn convert_all<W, D>(items: Vec<W>) -> Result<Vec<D>, SchemaError>
where
    D: TryFrom<W, Error = SchemaError>,
{
    items.into_iter().map(D::try_from).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileEnvelope {
    pub user: ProfilePayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificatesEnvelope {
    pub software_applications: Vec<CertificatePayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectsEnvelope {
    pub projects: Vec<ProjectPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillsEnvelope {
    pub skills: Vec<SkillPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEnvelope {
    pub timelines: Vec<TimelinePayload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl From<&ChatMessage> for ChatTurn {
    fn from(value: &ChatMessage) -> Self {
        Self {
            role: value.role,
            content: value.content.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub history: Vec<ChatTurn>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}
