//! One-shot remote resources: the fetch-on-mount contract shared by every
//! data-bound section.

use std::future::Future;

use serde::de::DeserializeOwned;
use shared::{
    domain::{CertificateEntry, Profile, ProjectEntry, SkillEntry, TimelineEntry},
    error::SchemaError,
    protocol::{
        convert_all, CertificatesEnvelope, ProfileEnvelope, ProjectsEnvelope, SkillsEnvelope,
        TimelineEnvelope,
    },
};
use tokio::{
    runtime::Handle,
    sync::oneshot::{self, error::TryRecvError},
    task::JoinHandle,
};
use url::Url;

use crate::{config::Endpoints, error::FetchError};

/// Display state of a section's data. Starts `Unloaded` and moves to one of
/// the terminal states exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RemoteResource<T> {
    #[default]
    Unloaded,
    Loaded(T),
    Errored(FetchError),
}

impl<T> RemoteResource<T> {
    pub fn is_unloaded(&self) -> bool {
        matches!(self, Self::Unloaded)
    }

    pub fn has_error(&self) -> bool {
        matches!(self, Self::Errored(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            Self::Errored(err) => Some(err),
            _ => None,
        }
    }
}

impl<T> From<Result<T, FetchError>> for RemoteResource<T> {
    fn from(value: Result<T, FetchError>) -> Self {
        match value {
            Ok(value) => Self::Loaded(value),
            Err(err) => Self::Errored(err),
        }
    }
}

/// A remote collection or record with a fixed endpoint and a named envelope field.
pub trait Resource: Send + 'static {
    type Envelope: DeserializeOwned + Send;
    type Output: Send + 'static;

    const NAME: &'static str;

    fn endpoint(endpoints: &Endpoints) -> &Url;
    fn extract(envelope: Self::Envelope) -> Result<Self::Output, SchemaError>;
    fn item_count(output: &Self::Output) -> usize;
}

pub struct ProfileResource;
pub struct CertificatesResource;
pub struct ProjectsResource;
pub struct SkillsResource;
pub struct TimelineResource;

impl Resource for ProfileResource {
    type Envelope = ProfileEnvelope;
    type Output = Profile;

    const NAME: &'static str = "profile";

    fn endpoint(endpoints: &Endpoints) -> &Url {
        &endpoints.profile
    }

    fn extract(envelope: Self::Envelope) -> Result<Self::Output, SchemaError> {
        Profile::try_from(envelope.user)
    }

    fn item_count(_output: &Self::Output) -> usize {
        1
    }
}

macro_rules! list_resource {
    ($resource:ident, $envelope:ident, $entry:ident, $field:ident, $endpoint:ident, $name:literal) => {
        impl Resource for $resource {
            type Envelope = $envelope;
            type Output = Vec<$entry>;

            const NAME: &'static str = $name;

            fn endpoint(endpoints: &Endpoints) -> &Url {
                &endpoints.$endpoint
            }

            fn extract(envelope: Self::Envelope) -> Result<Self::Output, SchemaError> {
                convert_all(envelope.$field)
            }

            fn item_count(output: &Self::Output) -> usize {
                output.len()
            }
        }
    };
}

list_resource!(
    CertificatesResource,
    CertificatesEnvelope,
    CertificateEntry,
    software_applications,
    certificates,
    "certificates"
);
list_resource!(ProjectsResource, ProjectsEnvelope, ProjectEntry, projects, projects, "projects");
list_resource!(SkillsResource, SkillsEnvelope, SkillEntry, skills, skills, "skills");
list_resource!(TimelineResource, TimelineEnvelope, TimelineEntry, timelines, timeline, "timeline");

/// A load running on the runtime on behalf of one mounted view.
///
/// Dropping the task aborts the fetch, so a torn-down view never receives a
/// late result.
pub struct LoadTask<T> {
    handle: JoinHandle<()>,
    rx: oneshot::Receiver<RemoteResource<T>>,
    settled: bool,
}

impl<T: Send + 'static> LoadTask<T> {
    pub fn spawn<F>(runtime: &Handle, load: F) -> Self
    where
        F: Future<Output = RemoteResource<T>> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let handle = runtime.spawn(async move {
            let _ = tx.send(load.await);
        });
        Self {
            handle,
            rx,
            settled: false,
        }
    }

    /// Non-blocking poll. Yields exactly one outcome; `None` before completion
    /// and after the outcome was taken. A task that ended without sending
    /// (it panicked) settles as a transport error.
    pub fn try_take(&mut self) -> Option<RemoteResource<T>> {
        if self.settled {
            return None;
        }
        let outcome = match self.rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Closed) => abandoned(),
        };
        self.settled = true;
        Some(outcome)
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub async fn wait(mut self) -> Option<RemoteResource<T>> {
        if self.settled {
            return None;
        }
        self.settled = true;
        Some((&mut self.rx).await.unwrap_or_else(|_| abandoned()))
    }

    pub fn cancel(self) {
        drop(self);
    }
}

fn abandoned<T>() -> RemoteResource<T> {
    tracing::warn!("load task ended without an outcome");
    RemoteResource::Errored(FetchError::Transport(
        "load task ended before producing a result".into(),
    ))
}

impl<T> Drop for LoadTask<T> {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
