use super::*;
use std::{
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
    time::Duration,
};

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};
use shared::domain::{Period, Proficiency};
use tokio::net::TcpListener;

use crate::view::{period_text, ProficiencyBar};

async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{addr}")
}

fn client_for(base: &str) -> PortfolioClient {
    let settings = Settings {
        api_base_url: format!("{base}/api/v1"),
        chat_url: format!("{base}/api/chat"),
        ..Settings::default()
    };
    PortfolioClient::from_settings(&settings).expect("client")
}

fn json_route(path: &str, body: Value) -> Router {
    Router::new().route(path, get(move || async move { Json(body) }))
}

#[tokio::test]
async fn loads_profile_from_user_field() {
    let base = serve(json_route(
        "/api/v1/user/me/portfolio",
        json!({
            "user": {
                "fullName": "Amit Kumar",
                "email": "amit@example.test",
                "aboutme": "Builds things.",
                "avatar": { "url": "https://cdn.test/avatar.png" },
                "githubURL": "https://github.test/amit"
            }
        }),
    ))
    .await;

    let profile = client_for(&base).load::<ProfileResource>().await;
    let profile = profile.value().expect("loaded");
    assert_eq!(profile.full_name, "Amit Kumar");
    assert_eq!(profile.about_me.as_deref(), Some("Builds things."));
    assert_eq!(profile.linkedin_url, None);
}

#[tokio::test]
async fn skills_scenario_renders_exact_bar() {
    let base = serve(json_route(
        "/api/v1/skill/getall",
        json!({ "skills": [{ "_id": "s1", "title": "Go", "proficiency": 87 }] }),
    ))
    .await;

    let skills = client_for(&base).load::<SkillsResource>().await;
    let skills = skills.value().expect("loaded");
    assert_eq!(skills.len(), 1);
    assert_eq!(skills[0].title, "Go");
    let bar = ProficiencyBar::new(skills[0].proficiency);
    assert_eq!(bar.width_percent, 87);
    assert_eq!(bar.label, "87%");
}

#[tokio::test]
async fn timeline_scenario_renders_present() {
    let base = serve(json_route(
        "/api/v1/timeline/getall",
        json!({ "timelines": [
            { "title": "Engineer", "description": "Backend work", "timeline": { "from": "2020", "to": null } }
        ] }),
    ))
    .await;

    let timeline = client_for(&base).load::<TimelineResource>().await;
    let entries = timeline.value().expect("loaded");
    assert_eq!(
        entries[0].period,
        Period {
            from: "2020".into(),
            to: None
        }
    );
    assert_eq!(period_text(&entries[0].period), "2020 - Present");
}

#[tokio::test]
async fn projects_and_certificates_use_their_envelope_fields() {
    let router = Router::new()
        .route(
            "/api/v1/projrct/getall",
            get(|| async {
                Json(json!({ "projects": [{
                    "_id": "p1",
                    "title": "Folio",
                    "description": "A portfolio. Written twice.",
                    "technologies": "Rust, egui",
                    "stack": "Native",
                    "gitRepoLink": "https://github.test/folio"
                }] }))
            }),
        )
        .route(
            "/api/v1/softwareapplication/getall",
            get(|| async {
                Json(json!({ "softwareApplications": [
                    { "_id": "c1", "name": "AWS" },
                    { "_id": "c2", "name": "GCP", "svg": { "url": "https://cdn.test/gcp.svg" } }
                ] }))
            }),
        );
    let base = serve(router).await;
    let client = client_for(&base);

    let projects = client.load::<ProjectsResource>().await;
    let project = &projects.value().expect("projects")[0];
    assert_eq!(project.repository_url, "https://github.test/folio");
    assert_eq!(project.live_url, None);

    let certificates = client.load::<CertificatesResource>().await;
    let names: Vec<_> = certificates
        .value()
        .expect("certificates")
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["AWS", "GCP"]);
}

#[tokio::test]
async fn non_success_status_is_errored_without_retry() {
    let hits = Arc::new(AtomicUsize::new(0));
    let router = Router::new()
        .route(
            "/api/v1/skill/getall",
            get(|State(hits): State<Arc<AtomicUsize>>| async move {
                hits.fetch_add(1, Ordering::SeqCst);
                StatusCode::INTERNAL_SERVER_ERROR
            }),
        )
        .with_state(hits.clone());
    let base = serve(router).await;

    let skills = client_for(&base).load::<SkillsResource>().await;
    assert!(skills.has_error());
    assert_eq!(skills.error(), Some(&FetchError::Status { status: 500 }));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn missing_envelope_field_is_malformed() {
    let base = serve(json_route(
        "/api/v1/projrct/getall",
        json!({ "items": [] }),
    ))
    .await;

    let projects = client_for(&base).load::<ProjectsResource>().await;
    assert!(projects.error().is_some_and(FetchError::is_malformed));
}

#[tokio::test]
async fn out_of_range_proficiency_is_malformed() {
    let base = serve(json_route(
        "/api/v1/skill/getall",
        json!({ "skills": [{ "title": "Rust", "proficiency": 120 }] }),
    ))
    .await;

    let skills = client_for(&base).load::<SkillsResource>().await;
    assert!(skills.error().is_some_and(FetchError::is_malformed));
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let profile = client_for(&format!("http://{addr}"))
        .load::<ProfileResource>()
        .await;
    assert!(matches!(profile.error(), Some(FetchError::Transport(_))));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn spawned_load_delivers_its_outcome_once() {
    let base = serve(json_route(
        "/api/v1/skill/getall",
        json!({ "skills": [{ "title": "Go", "proficiency": 87 }] }),
    ))
    .await;

    let mut task = client_for(&base).spawn_load::<SkillsResource>(&Handle::current());
    let outcome = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if let Some(outcome) = task.try_take() {
                return outcome;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("load finished");

    assert_eq!(
        outcome.value().map(|skills| skills[0].proficiency),
        Some(Proficiency::try_from(87).expect("valid"))
    );
    assert!(task.try_take().is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn dropping_a_load_task_aborts_it() {
    let completed = Arc::new(AtomicBool::new(false));
    let flag = completed.clone();

    let task: LoadTask<()> = LoadTask::spawn(&Handle::current(), async move {
        tokio::time::sleep(Duration::from_millis(150)).await;
        flag.store(true, Ordering::SeqCst);
        RemoteResource::Loaded(())
    });
    drop(task);

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(!completed.load(Ordering::SeqCst));
}

#[tokio::test]
async fn waited_task_returns_loaded_value() {
    let task = LoadTask::spawn(&Handle::current(), async { RemoteResource::Loaded(7_u8) });
    assert_eq!(task.wait().await, Some(RemoteResource::Loaded(7)));
}

#[tokio::test]
async fn fetch_image_rejects_unparseable_reference() {
    let client = client_for("http://127.0.0.1:9");
    let err = client
        .fetch_image("/default-avatar.png")
        .await
        .expect_err("relative reference");
    assert!(err.is_malformed());
}

#[tokio::test]
async fn cookies_from_one_load_are_sent_with_the_next() {
    use axum::http::{header, HeaderMap};
    use std::sync::Mutex;

    let seen_cookie: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
    let recorder = seen_cookie.clone();
    let router = Router::new()
        .route(
            "/api/v1/user/me/portfolio",
            get(|| async {
                (
                    [(header::SET_COOKIE, "token=abc; Path=/")],
                    Json(json!({ "user": { "fullName": "Amit" } })),
                )
            }),
        )
        .route(
            "/api/v1/skill/getall",
            get(move |headers: HeaderMap| {
                let recorder = recorder.clone();
                async move {
                    let cookie = headers
                        .get(header::COOKIE)
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    *recorder.lock().expect("lock") = cookie;
                    Json(json!({ "skills": [] }))
                }
            }),
        );
    let base = serve(router).await;
    let client = client_for(&base);

    assert!(client.load::<ProfileResource>().await.value().is_some());
    assert!(client.load::<SkillsResource>().await.value().is_some());
    assert_eq!(
        seen_cookie.lock().expect("lock").as_deref(),
        Some("token=abc")
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn panicked_load_settles_as_transport_error() {
    let should_fail = std::hint::black_box(true);
    let mut task: LoadTask<u8> = LoadTask::spawn(&Handle::current(), async move {
        if should_fail {
            panic!("loader blew up");
        }
        RemoteResource::Loaded(1)
    });

    let mut outcome = None;
    for _ in 0..100 {
        outcome = task.try_take();
        if outcome.is_some() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert!(matches!(
        outcome,
        Some(RemoteResource::Errored(FetchError::Transport(_)))
    ));
    assert!(task.try_take().is_none());
}

#[tokio::test]
async fn waiting_on_a_panicked_load_yields_transport_error() {
    let should_fail = std::hint::black_box(true);
    let task: LoadTask<u8> = LoadTask::spawn(&Handle::current(), async move {
        if should_fail {
            panic!("loader blew up");
        }
        RemoteResource::Loaded(1)
    });

    assert!(matches!(
        task.wait().await,
        Some(RemoteResource::Errored(FetchError::Transport(_)))
    ));
}
