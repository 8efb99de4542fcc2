use anischedule::anilist::{
    AiringEpisode, AniListApi, AniListClient, CoverImage, FetchError, MediaTitle, RawMedia,
};
use anischedule::app::{Phase, ScheduleBoard};
use anischedule::config::Config;
use anischedule::pacing::Pacer;
use anischedule::render::{SchedulePage, NO_RESULTS_MARKUP};
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

struct FakeAniList {
    responses: HashMap<String, Result<RawMedia, FetchError>>,
    calls: Mutex<Vec<String>>,
}

impl FakeAniList {
    fn new(responses: Vec<(&str, Result<RawMedia, FetchError>)>) -> Self {
        Self {
            responses: responses
                .into_iter()
                .map(|(t, r)| (t.to_string(), r))
                .collect(),
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl AniListApi for FakeAniList {
    async fn fetch_media(&self, title: &str) -> Result<RawMedia, FetchError> {
        self.calls.lock().unwrap().push(title.to_string());
        self.responses
            .get(title)
            .cloned()
            .unwrap_or_else(|| {
                Err(FetchError::NotFound {
                    title: title.to_string(),
                })
            })
    }
}

#[derive(Default)]
struct RecordingPacer {
    pauses: Mutex<Vec<Duration>>,
}

#[async_trait::async_trait]
impl Pacer for RecordingPacer {
    async fn pause(&self, delay: Duration) {
        self.pauses.lock().unwrap().push(delay);
    }
}

fn media(english: &str) -> RawMedia {
    RawMedia {
        title: Some(MediaTitle {
            english: Some(english.to_string()),
            romaji: None,
            native: None,
        }),
        cover_image: Some(CoverImage {
            large: Some(format!("https://img.example/{}.jpg", english)),
        }),
        status: Some("FINISHED".to_string()),
        site_url: Some(format!("https://anilist.co/anime/{}", english)),
        ..Default::default()
    }
}

fn config(titles: &[&str], delay_ms: u64) -> Config {
    Config {
        titles: titles.iter().map(|t| t.to_string()).collect(),
        delay: Duration::from_millis(delay_ms),
        ..Config::default()
    }
}

fn board(
    titles: &[&str],
    api: Arc<FakeAniList>,
    pacer: Arc<RecordingPacer>,
) -> ScheduleBoard {
    ScheduleBoard::new(&config(titles, 1000), api, pacer)
}

#[tokio::test]
async fn failed_title_is_dropped_and_order_kept() {
    let api = Arc::new(FakeAniList::new(vec![
        ("A", Ok(media("Alpha"))),
        (
            "B",
            Err(FetchError::Network {
                title: "B".to_string(),
                message: "connection reset".to_string(),
            }),
        ),
        ("C", Ok(media("Gamma"))),
    ]));
    let pacer = Arc::new(RecordingPacer::default());
    let mut board = board(&["A", "B", "C"], api.clone(), pacer.clone());
    assert_eq!(board.phase(), Phase::Idle);

    let mut page = SchedulePage::new();
    let outcome = board.run(&mut page).await;

    let names: Vec<_> = outcome
        .records
        .iter()
        .map(|r| r.display_name.as_str())
        .collect();
    assert_eq!(names, vec!["Alpha", "Gamma"]);
    assert!(outcome.had_error());
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].title(), "B");
    assert_eq!(*api.calls.lock().unwrap(), vec!["A", "B", "C"]);
    assert_eq!(board.phase(), Phase::Done);

    assert!(page.is_error_visible());
    assert!(page.is_results_visible());
    assert!(!page.is_loading_visible());
    let markup = page.results_markup();
    let alpha = markup.find("Alpha").expect("alpha card");
    let gamma = markup.find("Gamma").expect("gamma card");
    assert!(alpha < gamma);
}

#[tokio::test]
async fn pauses_only_between_titles() {
    let api = Arc::new(FakeAniList::new(vec![
        ("A", Ok(media("Alpha"))),
        ("B", Ok(media("Beta"))),
        ("C", Ok(media("Gamma"))),
        ("D", Ok(media("Delta"))),
    ]));
    let pacer = Arc::new(RecordingPacer::default());
    let mut board = ScheduleBoard::new(&config(&["A", "B", "C", "D"], 250), api, pacer.clone());
    let outcome = board.collect().await;

    assert_eq!(outcome.records.len(), 4);
    assert!(!outcome.had_error());
    assert_eq!(
        *pacer.pauses.lock().unwrap(),
        vec![Duration::from_millis(250); 3]
    );
}

#[tokio::test]
async fn single_title_never_pauses() {
    let api = Arc::new(FakeAniList::new(vec![("A", Ok(media("Alpha")))]));
    let pacer = Arc::new(RecordingPacer::default());
    let mut board = board(&["A"], api, pacer.clone());
    board.collect().await;
    assert!(pacer.pauses.lock().unwrap().is_empty());
}

#[tokio::test]
async fn rate_limited_title_does_not_stop_the_loop() {
    let api = Arc::new(FakeAniList::new(vec![
        (
            "A",
            Err(FetchError::RateLimited {
                title: "A".to_string(),
            }),
        ),
        ("B", Ok(media("Beta"))),
    ]));
    let pacer = Arc::new(RecordingPacer::default());
    let mut board = board(&["A", "B"], api.clone(), pacer.clone());
    let outcome = board.collect().await;

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].display_name, "Beta");
    assert!(matches!(
        outcome.failures.as_slice(),
        [FetchError::RateLimited { .. }]
    ));
    assert_eq!(pacer.pauses.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn every_title_failing_shows_no_results_message() {
    let api = Arc::new(FakeAniList::new(Vec::new()));
    let pacer = Arc::new(RecordingPacer::default());
    let mut board = board(&["X", "Y"], api, pacer);
    let mut page = SchedulePage::new();
    let outcome = board.run(&mut page).await;

    assert!(outcome.records.is_empty());
    assert_eq!(outcome.failures.len(), 2);
    assert!(page.is_error_visible());
    assert!(page.is_results_visible());
    assert_eq!(page.results_markup(), NO_RESULTS_MARKUP);
}

#[tokio::test]
async fn airing_media_renders_episode_sentence() {
    let mut airing = media("Airing Show");
    airing.status = Some("RELEASING".to_string());
    airing.next_airing_episode = Some(AiringEpisode {
        airing_at: 1_700_000_000,
        episode: 12,
        time_until_airing: 3725,
    });
    let api = Arc::new(FakeAniList::new(vec![("Airing", Ok(airing))]));
    let pacer = Arc::new(RecordingPacer::default());
    let mut board = board(&["Airing"], api, pacer);
    let mut page = SchedulePage::new();
    let outcome = board.run(&mut page).await;

    assert_eq!(
        outcome.records[0].next_episode_info,
        "Ep 12 on Wed, 15 Nov, 03:43 am IST (1h 2m)"
    );
    assert!(!page.is_error_visible());
    let doc = page.render_document();
    assert!(doc.contains("next-episode-info"));
    assert!(doc.contains("Ep 12 on Wed, 15 Nov, 03:43 am IST (1h 2m)"));
}

type Captured = Arc<Mutex<Vec<(HeaderMap, Value)>>>;

#[derive(Clone)]
struct EndpointState {
    status: StatusCode,
    body: String,
    captured: Captured,
}

async fn graphql(
    State(state): State<EndpointState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    state.captured.lock().unwrap().push((headers, body));
    (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.body.clone(),
    )
}

async fn spawn_endpoint(status: StatusCode, body: String) -> (String, Captured) {
    let captured: Captured = Arc::new(Mutex::new(Vec::new()));
    let state = EndpointState {
        status,
        body,
        captured: captured.clone(),
    };
    let router = Router::new().route("/", post(graphql)).with_state(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake endpoint");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve fake endpoint");
    });
    (format!("http://{}/", addr), captured)
}

fn client(endpoint: &str) -> AniListClient {
    AniListClient::new(endpoint, Some(Duration::from_secs(5))).expect("client")
}

#[tokio::test]
async fn client_posts_search_query_and_parses_media() {
    let body = json!({
        "data": {
            "Media": {
                "title": { "english": "Dandadan", "romaji": "Dandadan", "native": "ダンダダン" },
                "coverImage": { "large": "https://img.example/dan.jpg" },
                "season": "SUMMER",
                "seasonYear": 2025,
                "startDate": { "year": 2025, "month": 7, "day": 4 },
                "episodes": 12,
                "status": "RELEASING",
                "siteUrl": "https://anilist.co/anime/185660",
                "nextAiringEpisode": { "airingAt": 1700000000, "episode": 5, "timeUntilAiring": 90061 }
            }
        }
    });
    let (endpoint, captured) = spawn_endpoint(StatusCode::OK, body.to_string()).await;

    let media = client(&endpoint)
        .fetch_media("Dandadan Season 2")
        .await
        .expect("media");
    assert_eq!(media.season.as_deref(), Some("SUMMER"));
    assert_eq!(media.next_airing_episode.map(|n| n.episode), Some(5));

    let captured = captured.lock().unwrap();
    assert_eq!(captured.len(), 1);
    let (headers, request) = &captured[0];
    assert_eq!(request["variables"]["search"], "Dandadan Season 2");
    assert!(request["query"]
        .as_str()
        .is_some_and(|q| q.contains("nextAiringEpisode")));
    assert_eq!(
        headers.get(header::ACCEPT).and_then(|v| v.to_str().ok()),
        Some("application/json")
    );
    assert!(headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json")));
}

#[tokio::test]
async fn client_maps_404_to_not_found() {
    let body = json!({
        "errors": [{ "message": "Not Found.", "status": 404 }],
        "data": { "Media": null }
    });
    let (endpoint, _) = spawn_endpoint(StatusCode::NOT_FOUND, body.to_string()).await;
    let err = client(&endpoint).fetch_media("Nope").await.unwrap_err();
    assert_eq!(
        err,
        FetchError::NotFound {
            title: "Nope".to_string()
        }
    );
}

#[tokio::test]
async fn client_maps_429_to_rate_limited() {
    let body = json!({ "errors": [{ "message": "Too Many Requests.", "status": 429 }] });
    let (endpoint, _) = spawn_endpoint(StatusCode::TOO_MANY_REQUESTS, body.to_string()).await;
    let err = client(&endpoint).fetch_media("Busy").await.unwrap_err();
    assert!(matches!(err, FetchError::RateLimited { ref title } if title == "Busy"));
}

#[tokio::test]
async fn client_treats_null_media_as_not_found() {
    let body = json!({
        "errors": [{ "message": "Not Found.", "status": 404 }],
        "data": { "Media": null }
    });
    let (endpoint, _) = spawn_endpoint(StatusCode::OK, body.to_string()).await;
    let err = client(&endpoint).fetch_media("Ghost").await.unwrap_err();
    assert!(matches!(err, FetchError::NotFound { .. }));
}

#[tokio::test]
async fn client_reports_undecodable_body_as_network_failure() {
    let (endpoint, _) = spawn_endpoint(StatusCode::OK, "<html>oops</html>".to_string()).await;
    let err = client(&endpoint).fetch_media("Broken").await.unwrap_err();
    assert!(matches!(err, FetchError::Network { .. }));
}

#[tokio::test]
async fn client_reports_refused_connection_as_network_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let err = client(&format!("http://{}/", addr))
        .fetch_media("Offline")
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Network { ref title, .. } if title == "Offline"));
}
