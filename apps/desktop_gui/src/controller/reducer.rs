//! Display state for every section and the transitions that update it.
//!
//! Each section owns its own `RemoteResource` and the `LoadTask` feeding it;
//! nothing here is shared between sections.

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use client_core::{
    CarouselController, CertificatesResource, ChatSession, LoadTask, PortfolioClient,
    ProfileResource, ProjectsResource, RemoteResource, Settings, SkillsResource, TimelineResource,
};
use shared::domain::{CertificateEntry, Profile, ProjectEntry, SkillEntry, TimelineEntry};
use tokio::runtime::Handle;

use crate::controller::events::{PreviewImage, UiError, UiEvent};

pub struct Section<T> {
    state: RemoteResource<T>,
    task: Option<LoadTask<T>>,
    mounted: bool,
}

impl<T> Default for Section<T> {
    fn default() -> Self {
        Self {
            state: RemoteResource::Unloaded,
            task: None,
            mounted: false,
        }
    }
}

impl<T: Send + 'static> Section<T> {
    /// Attaches the section's one load. Later calls are ignored.
    pub fn mount(&mut self, spawn: impl FnOnce() -> LoadTask<T>) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        self.task = Some(spawn());
    }

    /// Moves a finished load into the display state. Returns `true` on the
    /// frame the section settles.
    pub fn poll(&mut self) -> bool {
        let Some(task) = self.task.as_mut() else {
            return false;
        };
        match task.try_take() {
            Some(outcome) => {
                self.state = outcome;
                self.task = None;
                true
            }
            None => false,
        }
    }

    /// Tears the section down; a load still in flight is aborted.
    pub fn unmount(&mut self) {
        self.task = None;
    }

    pub fn state(&self) -> &RemoteResource<T> {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        self.task.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageState {
    Requested,
    Ready(PreviewImage),
    Failed(String),
}

pub struct PortfolioState {
    pub profile: Section<Profile>,
    pub certificates: Section<Vec<CertificateEntry>>,
    pub projects: Section<Vec<ProjectEntry>>,
    pub skills: Section<Vec<SkillEntry>>,
    pub timeline: Section<Vec<TimelineEntry>>,
    pub carousel: CarouselController,
    pub chat: ChatSession,
    pub status: String,
    pub profile_error: Option<UiError>,
    pub images: HashMap<String, ImageState>,
    carousel_interval: Duration,
}

impl PortfolioState {
    pub fn new(settings: &Settings, now: Instant) -> Self {
        let carousel_interval = settings.carousel_interval();
        Self {
            profile: Section::default(),
            certificates: Section::default(),
            projects: Section::default(),
            skills: Section::default(),
            timeline: Section::default(),
            carousel: CarouselController::new(0, carousel_interval, now),
            chat: ChatSession::for_owner(&settings.owner_name),
            status: "Loading portfolio".to_string(),
            profile_error: None,
            images: HashMap::new(),
            carousel_interval,
        }
    }

    pub fn mount_all(&mut self, client: &PortfolioClient, runtime: &Handle) {
        self.profile
            .mount(|| client.spawn_load::<ProfileResource>(runtime));
        self.certificates
            .mount(|| client.spawn_load::<CertificatesResource>(runtime));
        self.projects
            .mount(|| client.spawn_load::<ProjectsResource>(runtime));
        self.skills
            .mount(|| client.spawn_load::<SkillsResource>(runtime));
        self.timeline
            .mount(|| client.spawn_load::<TimelineResource>(runtime));
    }

    pub fn unmount_all(&mut self) {
        self.profile.unmount();
        self.certificates.unmount();
        self.projects.unmount();
        self.skills.unmount();
        self.timeline.unmount();
    }

    pub fn any_pending(&self) -> bool {
        self.profile.is_pending()
            || self.certificates.is_pending()
            || self.projects.is_pending()
            || self.skills.is_pending()
            || self.timeline.is_pending()
    }

    /// Drains finished loads. Returns whether anything settled this frame.
    pub fn poll_sections(&mut self, now: Instant) -> bool {
        let mut changed = false;

        if self.profile.poll() {
            changed = true;
            if let Some(err) = self.profile.state().error() {
                let err = UiError::from_fetch(err);
                self.status = err.status_line();
                self.profile_error = Some(err);
            }
        }

        if self.certificates.poll() {
            changed = true;
            let len = self.certificates.state().value().map_or(0, Vec::len);
            self.carousel = CarouselController::new(len, self.carousel_interval, now);
        }

        changed |= self.projects.poll();
        changed |= self.skills.poll();
        changed |= self.timeline.poll();

        if changed && !self.any_pending() && self.profile_error.is_none() {
            self.status = "Portfolio loaded".to_string();
        }
        changed
    }

    pub fn apply(&mut self, event: UiEvent) {
        match event {
            UiEvent::Info(message) => {
                self.status = message;
            }
            UiEvent::ChatReplied(outcome) => {
                self.chat.finish(outcome);
            }
            UiEvent::ImageLoaded { url, image } => {
                self.images.insert(url, ImageState::Ready(image));
            }
            UiEvent::ImageFailed { url, reason } => {
                self.images.insert(url, ImageState::Failed(reason));
            }
        }
    }

    /// Shown by the hero and the timeline; `None` until the profile loads
    /// with an avatar.
    pub fn avatar_url(&self) -> Option<&str> {
        self.profile
            .state()
            .value()
            .and_then(|p| p.avatar_url.as_deref())
    }

    /// Image references that appeared in loaded sections and were never
    /// requested. Marks them requested.
    pub fn take_unrequested_images(&mut self) -> Vec<String> {
        let mut urls: Vec<String> = Vec::new();
        if let Some(avatar) = self.avatar_url() {
            urls.push(avatar.to_string());
        }
        if let Some(certificates) = self.certificates.state().value() {
            urls.extend(certificates.iter().filter_map(|c| c.image_url.clone()));
        }
        if let Some(projects) = self.projects.state().value() {
            urls.extend(projects.iter().filter_map(|p| p.banner_url.clone()));
        }
        if let Some(skills) = self.skills.state().value() {
            urls.extend(skills.iter().filter_map(|s| s.icon_url.clone()));
        }

        urls.retain(|url| !self.images.contains_key(url));
        urls.sort();
        urls.dedup();
        for url in &urls {
            self.images.insert(url.clone(), ImageState::Requested);
        }
        urls
    }
}

#[cfg(test)]
mod tests {
    use std::{thread, time::Duration};

    use client_core::{ChatError, FetchError};
    use shared::domain::EntryId;

    use super::*;

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .expect("runtime")
    }

    fn settle(state: &mut PortfolioState, now: Instant) {
        for _ in 0..200 {
            state.poll_sections(now);
            if !state.any_pending() {
                return;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("sections never settled");
    }

    fn certificate(name: &str) -> CertificateEntry {
        CertificateEntry {
            id: Some(EntryId(name.to_lowercase())),
            name: name.to_string(),
            image_url: Some(format!("https://cdn.test/{name}.png")),
        }
    }

    #[test]
    fn section_mounts_only_once() {
        let rt = runtime();
        let mut section: Section<u8> = Section::default();
        let mut spawned = 0;
        for _ in 0..3 {
            section.mount(|| {
                spawned += 1;
                LoadTask::spawn(rt.handle(), async { RemoteResource::Loaded(1) })
            });
        }
        assert_eq!(spawned, 1);
    }

    #[test]
    fn loaded_certificates_rebuild_the_carousel() {
        let rt = runtime();
        let now = Instant::now();
        let mut state = PortfolioState::new(&Settings::default(), now);
        assert!(state.carousel.is_empty());

        state.certificates.mount(|| {
            LoadTask::spawn(rt.handle(), async {
                RemoteResource::Loaded(vec![certificate("AWS"), certificate("GCP")])
            })
        });
        settle(&mut state, now);

        assert_eq!(state.carousel.len(), 2);
        assert!(state.carousel.shows_controls());
        assert_eq!(state.carousel.deadline(), Some(now + Duration::from_secs(10)));
    }

    #[test]
    fn profile_failure_reaches_status_but_list_failure_stays_silent() {
        let rt = runtime();
        let now = Instant::now();
        let mut state = PortfolioState::new(&Settings::default(), now);

        state.skills.mount(|| {
            LoadTask::spawn(rt.handle(), async {
                RemoteResource::Errored(FetchError::Status { status: 500 })
            })
        });
        settle(&mut state, now);
        assert!(state.skills.state().has_error());
        assert!(state.profile_error.is_none());
        assert_eq!(state.status, "Portfolio loaded");

        state.profile.mount(|| {
            LoadTask::spawn(rt.handle(), async {
                RemoteResource::Errored(FetchError::Transport("connection refused".into()))
            })
        });
        settle(&mut state, now);
        assert!(state.profile_error.is_some());
        assert!(state.status.starts_with("Network error"));
    }

    #[test]
    fn unmount_aborts_pending_load() {
        let rt = runtime();
        let mut section: Section<u8> = Section::default();
        section.mount(|| {
            LoadTask::spawn(rt.handle(), async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                RemoteResource::Loaded(1)
            })
        });
        assert!(section.is_pending());
        section.unmount();
        assert!(!section.is_pending());
        assert!(!section.poll());
        assert!(section.state().is_unloaded());
    }

    #[test]
    fn panicked_load_stops_the_pending_spinner() {
        let rt = runtime();
        let now = Instant::now();
        let mut state = PortfolioState::new(&Settings::default(), now);
        let should_fail = std::hint::black_box(true);
        state.timeline.mount(|| {
            LoadTask::spawn(rt.handle(), async move {
                if should_fail {
                    panic!("timeline loader blew up");
                }
                RemoteResource::Loaded(Vec::new())
            })
        });
        settle(&mut state, now);

        assert!(!state.any_pending());
        assert!(state.timeline.state().has_error());
    }

    #[test]
    fn avatar_follows_profile_state() {
        let rt = runtime();
        let now = Instant::now();
        let mut state = PortfolioState::new(&Settings::default(), now);
        assert_eq!(state.avatar_url(), None);

        state.profile.mount(|| {
            LoadTask::spawn(rt.handle(), async {
                RemoteResource::Loaded(Profile {
                    full_name: "Amit".into(),
                    avatar_url: Some("https://cdn.test/avatar.png".into()),
                    ..Profile::default()
                })
            })
        });
        settle(&mut state, now);

        assert_eq!(state.avatar_url(), Some("https://cdn.test/avatar.png"));
        assert_eq!(
            state.take_unrequested_images(),
            vec!["https://cdn.test/avatar.png".to_string()]
        );
    }

    #[test]
    fn errored_profile_has_no_avatar() {
        let rt = runtime();
        let now = Instant::now();
        let mut state = PortfolioState::new(&Settings::default(), now);
        state.profile.mount(|| {
            LoadTask::spawn(rt.handle(), async {
                RemoteResource::Errored(FetchError::Status { status: 500 })
            })
        });
        settle(&mut state, now);
        assert_eq!(state.avatar_url(), None);
    }

    #[test]
    fn chat_reply_event_finishes_the_turn() {
        let mut state = PortfolioState::new(&Settings::default(), Instant::now());
        state.chat.begin_submit("hi").expect("submit");

        state.apply(UiEvent::ChatReplied(Err(ChatError::Status { status: 500 })));
        assert!(!state.chat.is_submitting());
        assert_eq!(
            state.chat.transcript().last().map(|m| m.content.as_str()),
            Some(client_core::chat::CHAT_FALLBACK_REPLY)
        );
    }

    #[test]
    fn images_are_requested_once() {
        let rt = runtime();
        let now = Instant::now();
        let mut state = PortfolioState::new(&Settings::default(), now);
        state.certificates.mount(|| {
            LoadTask::spawn(rt.handle(), async {
                RemoteResource::Loaded(vec![certificate("AWS")])
            })
        });
        settle(&mut state, now);

        assert_eq!(
            state.take_unrequested_images(),
            vec!["https://cdn.test/AWS.png".to_string()]
        );
        assert!(state.take_unrequested_images().is_empty());

        state.apply(UiEvent::ImageFailed {
            url: "https://cdn.test/AWS.png".into(),
            reason: "unsupported".into(),
        });
        assert!(matches!(
            state.images.get("https://cdn.test/AWS.png"),
            Some(ImageState::Failed(_))
        ));
    }
}
