use std::path::PathBuf;
use std::sync::Arc;

use image::{DynamicImage, Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::camera::StillCamera;
use crate::classifier::{Classifier, ClassifierError, ScoreKind};
use crate::config::AppConfig;
use crate::labels::LabelSet;
use crate::preprocess::{InputTensor, PreprocessError};
use crate::rank::advice;
use crate::session::{PredictionMode, Session, SessionError, SessionState};
use crate::source::{Frame, ImageOrigin, VisualSource};

/// Returns the same scores for every input.
struct FixedClassifier {
    scores: Vec<f64>,
    kind: ScoreKind,
}

impl Classifier for FixedClassifier {
    fn name(&self) -> &str {
        "fixed"
    }

    fn class_count(&self) -> usize {
        self.scores.len()
    }

    fn score_kind(&self) -> ScoreKind {
        self.kind
    }

    fn predict(&self, input: &InputTensor) -> Result<Vec<f64>, ClassifierError> {
        assert_eq!(input.shape(), [1, 16, 16, 3]);
        Ok(self.scores.clone())
    }
}

struct BrokenClassifier;

impl Classifier for BrokenClassifier {
    fn name(&self) -> &str {
        "broken"
    }

    fn class_count(&self) -> usize {
        2
    }

    fn predict(&self, _input: &InputTensor) -> Result<Vec<f64>, ClassifierError> {
        Err(ClassifierError::InvalidModel("weights corrupted".into()))
    }
}

fn config() -> AppConfig {
    AppConfig {
        input_size: 16,
        model_path: PathBuf::from("/nonexistent/model.json"),
        labels_path: PathBuf::from("/nonexistent/labels.json"),
        ..AppConfig::default()
    }
}

fn leaf_labels() -> LabelSet {
    LabelSet::new(vec![
        "Black Sigatoka".into(),
        "Cordana".into(),
        "Fusarium Wilt".into(),
        "Healthy".into(),
    ])
}

fn model_session(scores: Vec<f64>, kind: ScoreKind) -> Session {
    let classifier: Arc<dyn Classifier> = Arc::new(FixedClassifier { scores, kind });
    Session::new(config(), Some(classifier), leaf_labels())
}

fn still(width: u32, height: u32) -> VisualSource {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([40, 160, 40])));
    VisualSource::from_image(img, ImageOrigin::Upload { file_name: "leaf.jpg".into() }).unwrap()
}

fn camera() -> StillCamera {
    StillCamera::new(Frame::from_raw(4, 2, vec![90; 24]))
}

#[test]
fn select_predict_display_cycle() {
    let mut session = model_session(vec![0.1, 0.2, 0.0, 0.7], ScoreKind::Probabilities);
    assert_eq!(session.state(), SessionState::Idle);

    session.select_source(still(30, 20));
    assert_eq!(session.state(), SessionState::SourceReady);

    let prediction = session.predict().unwrap();
    assert_eq!(prediction.best().unwrap().label, "Healthy");
    assert_eq!(prediction.advice, advice::HEALTHY);
    assert_eq!(prediction.mode, PredictionMode::Model);
    assert_eq!(session.state(), SessionState::Displaying);
    assert_eq!(session.status_text(), "Ready");
}

#[test]
fn logits_are_softmaxed_before_ranking() {
    let mut session = model_session(vec![2.0, 0.0, 0.0, 1.0], ScoreKind::Logits);
    session.select_source(still(8, 8));

    let prediction = session.predict().unwrap();
    let total: f64 = prediction.ranked.iter().map(|r| r.probability).sum();
    assert!((total - 1.0).abs() < 1e-9);
    assert_eq!(prediction.best().unwrap().label, "Black Sigatoka");
    // Cordana and Fusarium Wilt tie and keep label order.
    assert_eq!(prediction.ranked[2].label, "Cordana");
    assert_eq!(prediction.ranked[3].label, "Fusarium Wilt");
}

#[test]
fn fewer_scores_than_labels_default_to_zero() {
    let mut session = model_session(vec![0.4, 0.6], ScoreKind::Probabilities);
    session.select_source(still(8, 8));

    let prediction = session.predict().unwrap();
    assert_eq!(prediction.best().unwrap().label, "Cordana");
    assert_eq!(prediction.ranked[2].probability, 0.0);
    assert_eq!(prediction.ranked[3].probability, 0.0);
}

#[test]
fn predict_without_source_is_refused() {
    let mut session = model_session(vec![1.0], ScoreKind::Probabilities);
    let err = session.predict().unwrap_err();
    assert!(matches!(err, SessionError::NoSource));
    assert_eq!(err.to_string(), "Please add an image or open the webcam.");
    assert_eq!(session.state(), SessionState::Idle);
}

#[test]
fn second_prediction_waits_for_the_first() {
    let mut session = model_session(vec![0.5, 0.5], ScoreKind::Probabilities);
    session.select_source(still(8, 8));

    let pending = session.begin_prediction().unwrap();
    assert_eq!(session.state(), SessionState::Predicting);
    assert!(session.status_text().starts_with("Running inference"));
    assert!(matches!(session.begin_prediction(), Err(SessionError::PredictionInFlight)));

    let outcome = pending.run();
    session.finish_prediction(pending, outcome).unwrap();
    assert!(session.begin_prediction().is_ok());
}

#[test]
fn changing_source_cancels_pending_prediction() {
    let mut session = model_session(vec![0.5, 0.5], ScoreKind::Probabilities);
    session.select_source(still(8, 8));

    let pending = session.begin_prediction().unwrap();
    session.select_source(still(12, 6));
    assert_eq!(session.state(), SessionState::SourceReady);

    let outcome = pending.run();
    assert!(matches!(session.finish_prediction(pending, outcome), Err(SessionError::Cancelled)));
    assert!(session.last_prediction().is_none());
    assert_eq!(session.state(), SessionState::SourceReady);
}

#[test]
fn clearing_cancels_and_returns_to_idle() {
    let mut session = model_session(vec![0.5, 0.5], ScoreKind::Probabilities);
    session.select_source(still(8, 8));
    session.predict().unwrap();

    let pending = session.begin_prediction().unwrap();
    session.clear();
    let outcome = pending.run();
    assert!(matches!(session.finish_prediction(pending, outcome), Err(SessionError::Cancelled)));
    assert_eq!(session.state(), SessionState::Idle);
    assert!(session.source().is_none());
    assert!(session.source_info().is_none());
}

#[test]
fn classifier_failure_returns_to_source_ready() {
    let classifier: Arc<dyn Classifier> = Arc::new(BrokenClassifier);
    let mut session = Session::new(config(), Some(classifier), leaf_labels());
    session.select_source(still(8, 8));

    assert!(matches!(session.predict(), Err(SessionError::Classifier(_))));
    assert_eq!(session.state(), SessionState::SourceReady);
}

#[test]
fn unreadable_source_surfaces_access_error() {
    let mut session = model_session(vec![1.0], ScoreKind::Probabilities);
    session.select_source(VisualSource::video_frame(Frame::from_raw(10, 10, vec![0; 3]), 1));

    let err = session.predict().unwrap_err();
    assert!(matches!(err, SessionError::Preprocess(PreprocessError::ImageAccess(_))));
    assert_eq!(session.state(), SessionState::SourceReady);
}

#[test]
fn demo_mode_is_flagged_and_normalized() {
    let mut session = Session::with_classifier(config(), None);
    assert_eq!(session.mode(), PredictionMode::Demo);
    assert_eq!(session.labels().as_slice(), ["Class 0", "Class 1", "Class 2", "Class 3"]);
    assert!(session.model_info().starts_with("Demo mode"));
    session.select_source(still(8, 8));

    let mut rng = StdRng::seed_from_u64(42);
    let prediction = session.predict_with_rng(&mut rng).unwrap();
    assert!(prediction.is_demo());
    let total: f64 = prediction.ranked.iter().map(|r| r.probability).sum();
    assert!((total - 1.0).abs() < 1e-9);
    assert_eq!(prediction.advice, advice::VERIFY_WITH_EXPERT);
    assert_eq!(session.status_text(), "Model not found - using demo mode.");
}

#[test]
fn missing_model_file_loads_in_demo_mode() {
    let session = Session::load(config());
    assert_eq!(session.mode(), PredictionMode::Demo);
    assert_eq!(session.labels().len(), 4);
}

#[test]
fn live_camera_is_the_source_until_released() {
    let mut cam = camera();
    let mut session = model_session(vec![0.3, 0.7], ScoreKind::Probabilities);

    session.open_camera(&mut cam).unwrap();
    assert!(session.camera_active());
    assert_eq!(session.source_info().as_deref(), Some("Source: webcam"));
    assert_eq!(cam.open_streams(), 1);

    session.predict().unwrap();
    assert!(session.camera_active());

    session.clear();
    assert_eq!(cam.open_streams(), 0);
    assert!(!session.camera_active());
}

#[test]
fn selecting_a_file_releases_the_camera() {
    let mut cam = camera();
    let mut session = model_session(vec![1.0], ScoreKind::Probabilities);
    session.open_camera(&mut cam).unwrap();

    session.select_source(still(8, 8));
    assert_eq!(cam.open_streams(), 0);
    assert_eq!(session.source_info().as_deref(), Some("Source: leaf.jpg (8\u{d7}8)"));
}

#[test]
fn new_camera_session_stops_the_old_stream() {
    let mut first = camera();
    let mut second = camera();
    let mut session = model_session(vec![1.0], ScoreKind::Probabilities);

    session.open_camera(&mut first).unwrap();
    session.open_camera(&mut second).unwrap();
    assert_eq!(first.open_streams(), 0);
    assert_eq!(second.open_streams(), 1);

    drop(session);
    assert_eq!(second.open_streams(), 0);
}

#[test]
fn capture_freezes_frame_and_stops_camera() {
    let mut cam = camera();
    let mut session = model_session(vec![1.0], ScoreKind::Probabilities);
    session.open_camera(&mut cam).unwrap();

    session.capture_frame().unwrap();
    assert_eq!(cam.open_streams(), 0);
    assert!(matches!(session.source(), Some(VisualSource::Image { .. })));
    assert_eq!(session.state(), SessionState::SourceReady);
}

#[test]
fn failed_camera_reopen_drops_result_of_released_feed() {
    let mut cam = camera();
    let mut session = model_session(vec![0.1, 0.2, 0.3, 0.4], ScoreKind::Probabilities);
    session.open_camera(&mut cam).unwrap();
    session.predict().unwrap();
    assert!(session.last_prediction().is_some());

    let mut denied = StillCamera::denied();
    assert!(matches!(session.open_camera(&mut denied), Err(SessionError::Camera(_))));
    assert_eq!(cam.open_streams(), 0);
    assert_eq!(session.state(), SessionState::Idle);
    assert!(session.source_info().is_none());
    assert!(session.last_prediction().is_none());
    assert!(session.snapshot().prediction.is_none());
}

#[test]
fn denied_camera_keeps_session_usable() {
    let mut denied = StillCamera::denied();
    let mut session = model_session(vec![1.0], ScoreKind::Probabilities);

    assert!(matches!(session.open_camera(&mut denied), Err(SessionError::Camera(_))));
    assert_eq!(session.state(), SessionState::Idle);

    session.select_source(still(8, 8));
    assert!(session.predict().is_ok());
}
