//! End-to-end runs through `Studio` against scripted dispatchers.

use async_trait::async_trait;
use nanostudio::core::builder::FUSION_FALLBACK;
use nanostudio::core::normalize::NO_PROMPT_FALLBACK;
use nanostudio::core::validation::{FUSION_NEEDS_TWO, MISSING_IMAGE, MISSING_STICKER_CONCEPT};
use nanostudio::prelude::*;
use nanostudio::{Blob, EncodedPayload, MemoryTelemetry, Part, RawResponse, RemoteJob, Request, ResponsePart};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

/// Records every call and answers from a script.
#[derive(Default)]
struct SpyDispatcher {
    requests: Mutex<Vec<Request>>,
    response: Mutex<RawResponse>,
    jobs: Mutex<VecDeque<RemoteJob>>,
    generate_calls: AtomicU32,
    submit_calls: AtomicU32,
    poll_calls: AtomicU32,
    fetched: Mutex<Vec<String>>,
    gate: Option<Arc<Notify>>,
    fail_with: Option<String>,
}

impl SpyDispatcher {
    fn answering(parts: Vec<ResponsePart>) -> Self {
        Self {
            response: Mutex::new(RawResponse::from_parts(parts)),
            ..Default::default()
        }
    }

    fn with_jobs(jobs: Vec<RemoteJob>) -> Self {
        Self {
            jobs: Mutex::new(jobs.into()),
            ..Default::default()
        }
    }

    fn network_calls(&self) -> u32 {
        self.generate_calls.load(Ordering::SeqCst)
            + self.submit_calls.load(Ordering::SeqCst)
            + self.poll_calls.load(Ordering::SeqCst)
    }

    fn last_request(&self) -> Request {
        self.requests.lock().unwrap().last().cloned().expect("no request sent")
    }
}

#[async_trait]
impl Dispatcher for SpyDispatcher {
    async fn generate(&self, request: &Request) -> Result<RawResponse, StudioError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if let Some(message) = &self.fail_with {
            return Err(StudioError::Remote(message.clone()));
        }
        Ok(self.response.lock().unwrap().clone())
    }

    async fn submit(&self, request: &Request) -> Result<RemoteJob, StudioError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        Ok(RemoteJob::pending("models/veo/operations/op-1"))
    }

    async fn poll(&self, job: &RemoteJob) -> Result<RemoteJob, StudioError> {
        self.poll_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.jobs.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| RemoteJob::pending(job.handle.clone())))
    }

    async fn fetch(&self, locator: &str) -> Result<Blob, StudioError> {
        self.fetched.lock().unwrap().push(locator.to_string());
        Ok(Blob {
            bytes: b"MP4DATA".to_vec(),
            mime_type: "video/mp4".to_string(),
        })
    }
}

fn config() -> StudioConfig {
    StudioConfig::new("fake-key").with_poll_policy(PollPolicy::new(Duration::from_millis(1)))
}

fn image(name: &str) -> ImageAsset {
    ImageAsset::from_bytes(name, name.as_bytes().to_vec(), "image/png")
}

fn inline(data: &str) -> ResponsePart {
    ResponsePart::inline(EncodedPayload {
        data: data.to_string(),
        mime_type: "image/png".to_string(),
    })
}

fn text_part(request: &Request) -> String {
    request
        .parts
        .iter()
        .find_map(Part::as_text)
        .expect("request has no text part")
        .to_string()
}

#[tokio::test]
async fn test_missing_asset_fails_before_network() {
    let spy = Arc::new(SpyDispatcher::answering(vec![inline("X")]));
    let studio = Studio::new(spy.clone(), &config());

    for kind in [ToolKind::Enhance, ToolKind::Edit, ToolKind::StyleApply, ToolKind::PromptAnalyze] {
        let failure = studio.run(kind, &StagedInput::new()).await.unwrap_err();
        assert!(matches!(failure.error, StudioError::Validation(_)));
        assert_eq!(failure.message, MISSING_IMAGE);
    }
    assert_eq!(spy.network_calls(), 0);
    assert!(!studio.is_busy());
}

#[tokio::test]
async fn test_fusion_validation() {
    let spy = Arc::new(SpyDispatcher::answering(vec![inline("FUSED")]));
    let studio = Studio::new(spy.clone(), &config());

    let one = StagedInput::new().with_asset(image("a"));
    let failure = studio.run(ToolKind::Fusion, &one).await.unwrap_err();
    assert_eq!(failure.message, FUSION_NEEDS_TWO);
    assert_eq!(spy.network_calls(), 0);

    let two = one.with_asset(ImageAsset::from_bytes("empty", Vec::new(), "image/png"));
    assert!(studio.run(ToolKind::Fusion, &two).await.is_ok());
    assert_eq!(spy.network_calls(), 1);
}

#[tokio::test]
async fn test_sticker_validation() {
    let spy = Arc::new(SpyDispatcher::with_jobs(vec![RemoteJob::finished(
        "models/veo/operations/op-1",
        "https://files/sticker.mp4",
    )]));
    let studio = Studio::new(spy.clone(), &config());

    let failure = studio
        .run(ToolKind::StickerCreate, &StagedInput::new())
        .await
        .unwrap_err();
    assert_eq!(failure.message, MISSING_STICKER_CONCEPT);
    assert_eq!(spy.network_calls(), 0);

    let staged = StagedInput::new().with_instruction("a dancing astronaut");
    assert!(studio.run(ToolKind::StickerCreate, &staged).await.is_ok());
}

#[tokio::test]
async fn test_enhance_end_to_end() {
    let spy = Arc::new(SpyDispatcher::answering(vec![
        ResponsePart::text("Done."),
        inline("RU5IQU5DRUQ="),
    ]));
    let studio = Studio::new(spy.clone(), &config());

    let staged = StagedInput::new().with_asset(image("photo"));
    let result = studio.run(ToolKind::Enhance, &staged).await.unwrap();

    let request = spy.last_request();
    assert_eq!(request.parts.len(), 2);
    assert!(matches!(request.parts[0], Part::Binary(_)));
    assert!(text_part(&request).contains("resolution"));
    assert_eq!(spy.generate_calls.load(Ordering::SeqCst), 1);

    assert_eq!(
        result,
        ResultModel::Image {
            url: "data:image/png;base64,RU5IQU5DRUQ=".to_string()
        }
    );
}

#[tokio::test]
async fn test_empty_response_surfaces_hint() {
    let spy = Arc::new(SpyDispatcher::answering(vec![ResponsePart::text("I cannot help with that.")]));
    let studio = Studio::new(spy.clone(), &config());

    let staged = StagedInput::new().with_asset(image("a")).with_asset(image("b"));
    let failure = studio.run(ToolKind::Fusion, &staged).await.unwrap_err();
    assert!(matches!(failure.error, StudioError::EmptyResult(_)));
    assert!(failure.message.contains("contrasting"));
    assert!(!studio.is_busy());
}

#[tokio::test]
async fn test_fusion_without_direction_uses_fallback() {
    let spy = Arc::new(SpyDispatcher::answering(vec![inline("FUSED")]));
    let studio = Studio::new(spy.clone(), &config());

    let staged = StagedInput::new()
        .with_asset(image("anchor"))
        .with_asset(image("source"))
        .with_instruction("");
    studio.run(ToolKind::Fusion, &staged).await.unwrap();

    let request = spy.last_request();
    assert_eq!(request.binary_count(), 2);
    let text = text_part(&request);
    assert!(text.contains(FUSION_FALLBACK));
    assert!(!text.contains("Custom direction:"));
}

#[tokio::test]
async fn test_prompt_analyze_profile_changes_only_text() {
    let spy = Arc::new(SpyDispatcher::answering(vec![ResponsePart::text(
        "masterpiece, best quality, red fox",
    )]));
    let studio = Studio::new(spy.clone(), &config());
    let staged = StagedInput::new().with_asset(image("fox"));

    let result = studio
        .run(ToolKind::PromptAnalyze, &staged.clone().with_engine(EngineProfile::Tags))
        .await
        .unwrap();
    assert_eq!(
        result,
        ResultModel::Text {
            text: "masterpiece, best quality, red fox".to_string()
        }
    );
    let tags = spy.last_request();
    assert!(text_part(&tags).contains(EngineProfile::Tags.system_instruction()));

    studio
        .run(ToolKind::PromptAnalyze, &staged.with_engine(EngineProfile::Narrative))
        .await
        .unwrap();
    let narrative = spy.last_request();
    assert!(text_part(&narrative).contains(EngineProfile::Narrative.system_instruction()));

    assert_eq!(tags.model, narrative.model);
    assert_eq!(tags.output, narrative.output);
    assert_eq!(tags.parts[0], narrative.parts[0]);
    assert_ne!(tags.parts[1], narrative.parts[1]);
}

#[tokio::test]
async fn test_prompt_analyze_empty_text_falls_back() {
    let spy = Arc::new(SpyDispatcher::answering(vec![]));
    let studio = Studio::new(spy, &config());
    let staged = StagedInput::new().with_asset(image("fox"));

    let result = studio.run(ToolKind::PromptAnalyze, &staged).await.unwrap();
    assert_eq!(
        result,
        ResultModel::Text {
            text: NO_PROMPT_FALLBACK.to_string()
        }
    );
}

#[tokio::test]
async fn test_animated_sticker_polls_and_stores_blob() {
    let spy = Arc::new(SpyDispatcher::with_jobs(vec![
        RemoteJob::pending("models/veo/operations/op-1"),
        RemoteJob::pending("models/veo/operations/op-1"),
        RemoteJob::finished("models/veo/operations/op-1", "https://files/sticker.mp4"),
    ]));
    let telemetry = Arc::new(MemoryTelemetry::new());
    let studio = Studio::new(spy.clone(), &config()).with_telemetry(telemetry.clone());

    let staged = StagedInput::new().with_instruction("a waving penguin");
    let result = studio.run(ToolKind::StickerCreate, &staged).await.unwrap();

    assert_eq!(spy.submit_calls.load(Ordering::SeqCst), 1);
    assert_eq!(spy.poll_calls.load(Ordering::SeqCst), 3);
    assert_eq!(spy.generate_calls.load(Ordering::SeqCst), 0);
    assert_eq!(*spy.fetched.lock().unwrap(), vec!["https://files/sticker.mp4".to_string()]);

    let ResultModel::Video { url } = result else {
        panic!("expected a video result");
    };
    let blob = studio.blobs().get(&url).expect("blob registered");
    assert_eq!(blob.bytes, b"MP4DATA");

    let traces = telemetry.get_traces();
    assert_eq!(traces.len(), 1);
    assert_eq!(traces[0].polls, 3);
    assert_eq!(traces[0].outcome, "video");
    assert_eq!(traces[0].model.as_deref(), Some("veo-3.1-fast-generate-preview"));
}

#[tokio::test]
async fn test_static_sticker_is_synchronous() {
    let spy = Arc::new(SpyDispatcher::answering(vec![inline("U1RJQ0tFUg==")]));
    let studio = Studio::new(spy.clone(), &config().with_sticker_mode(StickerMode::Static));

    let staged = StagedInput::new().with_instruction("a tiny cactus");
    let result = studio.run(ToolKind::StickerCreate, &staged).await.unwrap();

    assert!(matches!(result, ResultModel::Image { .. }));
    assert_eq!(spy.submit_calls.load(Ordering::SeqCst), 0);
    assert_eq!(spy.poll_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_poll_timeout_is_reported() {
    let spy = Arc::new(SpyDispatcher::with_jobs(vec![]));
    let config = config().with_poll_policy(PollPolicy::new(Duration::from_millis(1)).max_attempts(3));
    let studio = Studio::new(spy.clone(), &config);

    let staged = StagedInput::new().with_instruction("a slow sticker");
    let failure = studio.run(ToolKind::StickerCreate, &staged).await.unwrap_err();
    assert!(matches!(failure.error, StudioError::Timeout { attempts: 3, .. }));
    assert_eq!(spy.poll_calls.load(Ordering::SeqCst), 3);
    assert!(!studio.is_busy());
}

#[tokio::test]
async fn test_cancelled_run_releases_flag() {
    let spy = Arc::new(SpyDispatcher::with_jobs(vec![]));
    let config = config().with_poll_policy(PollPolicy::new(Duration::from_secs(3600)).unbounded());
    let studio = Studio::new(spy.clone(), &config);

    let (handle, token) = cancel_pair();
    handle.cancel();
    let staged = StagedInput::new().with_instruction("never finishes");
    let failure = studio
        .run_with_cancel(ToolKind::StickerCreate, &staged, &token)
        .await
        .unwrap_err();
    assert!(matches!(failure.error, StudioError::Cancelled));
    assert_eq!(spy.poll_calls.load(Ordering::SeqCst), 0);
    assert!(!studio.is_busy());
}

#[tokio::test]
async fn test_second_run_rejected_while_busy() {
    let gate = Arc::new(Notify::new());
    let spy = Arc::new(SpyDispatcher {
        response: Mutex::new(RawResponse::from_parts(vec![inline("FIRST")])),
        gate: Some(gate.clone()),
        ..Default::default()
    });
    let studio = Studio::new(spy.clone(), &config());
    let staged = StagedInput::new().with_asset(image("photo"));

    let first = studio.run(ToolKind::Enhance, &staged);
    let second = async {
        let rejected = studio.run(ToolKind::StyleApply, &staged).await;
        assert!(studio.is_busy());
        gate.notify_one();
        rejected
    };
    let (first, second) = tokio::join!(first, second);

    let rejected = second.unwrap_err();
    assert!(rejected.is_busy());
    assert_eq!(
        first.unwrap(),
        ResultModel::Image {
            url: "data:image/png;base64,FIRST".to_string()
        }
    );
    assert_eq!(spy.generate_calls.load(Ordering::SeqCst), 1);
    assert!(!studio.is_busy());

    gate.notify_one();
    assert!(studio.run(ToolKind::Enhance, &staged).await.is_ok());
}

#[tokio::test]
async fn test_remote_failure_releases_flag_and_keeps_message() {
    let spy = Arc::new(SpyDispatcher {
        fail_with: Some("HTTP 503: overloaded".to_string()),
        ..Default::default()
    });
    let studio = Studio::new(spy, &config());
    let staged = StagedInput::new().with_asset(image("photo"));

    let failure = studio.run(ToolKind::Enhance, &staged).await.unwrap_err();
    assert_eq!(failure.message, "HTTP 503: overloaded");
    assert!(!studio.is_busy());
}

#[tokio::test]
async fn test_unreadable_file_is_io_error() {
    let spy = Arc::new(SpyDispatcher::answering(vec![inline("X")]));
    let studio = Studio::new(spy.clone(), &config());
    let dir = tempfile::tempdir().unwrap();

    let staged = StagedInput::new().with_asset(ImageAsset::from_path(dir.path().join("gone.png")));
    let failure = studio.run(ToolKind::Enhance, &staged).await.unwrap_err();
    assert!(matches!(failure.error, StudioError::Io { .. }));
    assert!(failure.message.contains("gone.png"));
    assert_eq!(spy.network_calls(), 0);
}

#[tokio::test]
async fn test_session_tracks_result_and_error() {
    let spy = Arc::new(SpyDispatcher::answering(vec![inline("T0s=")]));
    let studio = Studio::new(spy, &config());
    let mut session = Session::new();

    session.generate(&studio).await;
    assert_eq!(session.error(), Some(MISSING_IMAGE));
    assert!(session.result().is_none());

    session.staged = StagedInput::new().with_asset(image("photo"));
    let result = session.generate(&studio).await.cloned();
    assert!(matches!(result, Some(ResultModel::Image { .. })));
    assert!(session.error().is_none());

    session.select_tool(ToolKind::StickerCreate);
    assert!(session.result().is_none());
    assert!(session.staged.assets.is_empty());
}

#[tokio::test]
async fn test_session_revokes_replaced_video() {
    let spy = Arc::new(SpyDispatcher::with_jobs(vec![
        RemoteJob::finished("models/veo/operations/op-1", "https://files/one.mp4"),
        RemoteJob::finished("models/veo/operations/op-1", "https://files/two.mp4"),
    ]));
    let studio = Studio::new(spy, &config());
    let mut session = Session::new();
    session.select_tool(ToolKind::StickerCreate);
    session.staged = StagedInput::new().with_instruction("a waving penguin");

    let first = session.generate(&studio).await.cloned();
    assert!(matches!(first, Some(ResultModel::Video { .. })));
    assert_eq!(studio.blobs().len(), 1);

    let second = session.generate(&studio).await.cloned();
    assert_ne!(first, second);
    assert_eq!(studio.blobs().len(), 1);

    session.select_tool(ToolKind::Enhance);
    assert!(studio.blobs().is_empty());
}

#[tokio::test]
async fn test_busy_rejection_keeps_other_session_state() {
    let gate = Arc::new(Notify::new());
    let spy = Arc::new(SpyDispatcher {
        response: Mutex::new(RawResponse::from_parts(vec![inline("T0s=")])),
        gate: Some(gate.clone()),
        ..Default::default()
    });
    let studio = Studio::new(spy.clone(), &config());
    let mut first = Session::new();
    let mut second = Session::new();
    first.staged = StagedInput::new().with_asset(image("photo"));
    second.staged = StagedInput::new().with_asset(image("photo"));

    gate.notify_one();
    second.generate(&studio).await;
    let shown = second.result().cloned();
    assert!(shown.is_some());

    let (_, kept) = tokio::join!(first.generate(&studio), async {
        let kept = second.generate(&studio).await.cloned();
        gate.notify_one();
        kept
    });

    assert_eq!(kept, shown);
    assert!(second.error().is_none());
    assert!(first.result().is_some());
    assert_eq!(spy.generate_calls.load(Ordering::SeqCst), 2);
}

#[cfg(feature = "llm")]
#[tokio::test]
async fn test_transport_failure_hides_credential() {
    let config = StudioConfig::new("SECRET-KEY-123").with_base_url("http://127.0.0.1:1");
    let studio = Studio::gemini(&config);

    let staged = StagedInput::new().with_asset(image("photo"));
    let failure = studio.run(ToolKind::Enhance, &staged).await.unwrap_err();
    assert!(matches!(failure.error, StudioError::Remote(_)));
    assert!(!failure.message.contains("SECRET-KEY-123"));
    assert!(!failure.error.to_string().contains("SECRET-KEY-123"));
}
