use std::sync::Arc;

use rand::Rng;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::camera::{Camera, CameraError, CameraGuard};
use crate::classifier::{softmax, Classifier, ClassifierError, DenseClassifier, ScoreKind};
use crate::config::AppConfig;
use crate::labels::LabelSet;
use crate::preprocess::{ImagePreprocessor, InputTensor, PreprocessError};
use crate::rank::advice::VERIFY_WITH_EXPERT;
use crate::rank::{advise, rank, synthetic_scores};
use crate::session::state::{Prediction, PredictionMode, ScoreVector, SessionState};
use crate::source::VisualSource;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Please add an image or open the webcam.")]
    NoSource,
    #[error("a prediction is already running")]
    PredictionInFlight,
    #[error("prediction cancelled because the source changed")]
    Cancelled,
    #[error("camera error: {0}")]
    Camera(#[from] CameraError),
    #[error("preprocessing failed: {0}")]
    Preprocess(#[from] PreprocessError),
    #[error("classifier failed: {0}")]
    Classifier(#[from] ClassifierError),
}

enum Scorer {
    Model(Arc<dyn Classifier>),
    Demo { class_count: usize },
}

/// A prediction that has been preprocessed but not scored yet.
///
/// Scoring does not need the session, so a shell can release its lock on the
/// session while `run` executes and hand the outcome back to
/// `Session::finish_prediction` afterwards.
pub struct PendingPrediction {
    generation: u64,
    input: InputTensor,
    scorer: Scorer,
}

impl PendingPrediction {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn input(&self) -> &InputTensor {
        &self.input
    }

    pub fn run(&self) -> Result<ScoreVector, ClassifierError> {
        self.run_with_rng(&mut rand::thread_rng())
    }

    /// Scores the input. Logits are softmax-normalized; demo mode draws
    /// synthetic scores from `rng`.
    pub fn run_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<ScoreVector, ClassifierError> {
        match &self.scorer {
            Scorer::Model(classifier) => {
                let raw = classifier.predict(&self.input)?;
                let scores = match classifier.score_kind() {
                    ScoreKind::Logits => softmax(&raw),
                    ScoreKind::Probabilities => raw,
                };
                Ok(ScoreVector { scores, mode: PredictionMode::Model })
            }
            Scorer::Demo { class_count } => Ok(ScoreVector {
                scores: synthetic_scores(*class_count, rng),
                mode: PredictionMode::Demo,
            }),
        }
    }
}

/// Serializable view of a session for status displays.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub state: SessionState,
    pub mode: PredictionMode,
    pub status: &'static str,
    pub model_info: String,
    pub source: Option<String>,
    pub prediction: Option<Prediction>,
}

/// Everything one user session needs: the loaded model and labels, the
/// current source, an optional live camera stream, and the last result.
///
/// Every change of source bumps `generation`; a pending prediction whose
/// generation no longer matches is discarded when it finishes.
pub struct Session {
    config: AppConfig,
    preprocessor: ImagePreprocessor,
    classifier: Option<Arc<dyn Classifier>>,
    labels: LabelSet,
    state: SessionState,
    source: Option<VisualSource>,
    camera: Option<CameraGuard>,
    generation: u64,
    pending: Option<u64>,
    last: Option<Prediction>,
}

impl Session {
    /// Loads the model and labels named in `config`.
    ///
    /// A missing or unusable model is not an error: the session starts in
    /// demo mode instead.
    pub fn load(config: AppConfig) -> Session {
        let expected_inputs = config.input_size as usize * config.input_size as usize * 3;
        let classifier: Option<Arc<dyn Classifier>> = match DenseClassifier::load_json(&config.model_path) {
            Ok(model) if model.input_size() == expected_inputs => Some(Arc::new(model) as Arc<dyn Classifier>),
            Ok(model) => {
                warn!(
                    model_inputs = model.input_size(),
                    expected_inputs,
                    "model input does not match configured input size, using demo mode"
                );
                None
            }
            Err(e) => {
                warn!(error = %e, "model not available, using demo mode");
                None
            }
        };
        Session::with_classifier(config, classifier)
    }

    /// Builds a session around an already loaded classifier (or none, for
    /// demo mode), resolving labels from `config.labels_path`.
    pub fn with_classifier(config: AppConfig, classifier: Option<Arc<dyn Classifier>>) -> Session {
        let class_count = classifier
            .as_ref()
            .map(|c| c.class_count())
            .unwrap_or(config.fallback_class_count);
        let labels = LabelSet::resolve(
            Some(config.labels_path.as_path()),
            classifier.as_ref().and_then(|c| c.labels()),
            class_count,
        );
        Session::new(config, classifier, labels)
    }

    pub fn new(config: AppConfig, classifier: Option<Arc<dyn Classifier>>, labels: LabelSet) -> Session {
        let mode = if classifier.is_some() { PredictionMode::Model } else { PredictionMode::Demo };
        info!(
            ?mode,
            classes = labels.len(),
            input_size = config.input_size,
            "session ready"
        );
        Session {
            config,
            preprocessor: ImagePreprocessor::new(),
            classifier,
            labels,
            state: SessionState::Idle,
            source: None,
            camera: None,
            generation: 0,
            pending: None,
            last: None,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn mode(&self) -> PredictionMode {
        match self.classifier {
            Some(_) => PredictionMode::Model,
            None => PredictionMode::Demo,
        }
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    pub fn source(&self) -> Option<&VisualSource> {
        self.source.as_ref()
    }

    pub fn camera_active(&self) -> bool {
        self.camera.as_ref().map_or(false, CameraGuard::is_active)
    }

    pub fn last_prediction(&self) -> Option<&Prediction> {
        self.last.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Status line. Demo mode stays visible for as long as the session runs.
    pub fn status_text(&self) -> &'static str {
        match (self.state, self.mode()) {
            (SessionState::Predicting, _) => "Running inference\u{2026}",
            (_, PredictionMode::Demo) => "Model not found - using demo mode.",
            (_, PredictionMode::Model) => "Ready",
        }
    }

    pub fn model_info(&self) -> String {
        match &self.classifier {
            Some(c) => format!(
                "Model: {} \u{b7} Input {}\u{d7}{} \u{b7} Classes: {}",
                c.name(),
                self.config.input_size,
                self.config.input_size,
                self.labels.len()
            ),
            None => format!(
                "Demo mode: random scores (add {} to enable real predictions).",
                self.config.model_path.display()
            ),
        }
    }

    pub fn source_info(&self) -> Option<String> {
        match (&self.source, &self.camera) {
            (Some(source), _) => Some(source.describe()),
            (None, Some(_)) => Some("Source: webcam".to_owned()),
            (None, None) => None,
        }
    }

    pub fn snapshot(&self) -> SessionStatus {
        SessionStatus {
            state: self.state,
            mode: self.mode(),
            status: self.status_text(),
            model_info: self.model_info(),
            source: self.source_info(),
            prediction: self.last.clone(),
        }
    }

    /// Makes `source` the current input, releasing any live camera.
    pub fn select_source(&mut self, source: VisualSource) {
        self.release_camera();
        debug!(width = source.width(), height = source.height(), "source selected");
        self.source = Some(source);
        self.last = None;
        self.invalidate();
        self.state = SessionState::SourceReady;
    }

    /// Starts a new camera session; the live feed becomes the source.
    ///
    /// Any previous stream is stopped first. If the camera cannot be opened
    /// the error is returned and a still image, if any, stays selected.
    pub fn open_camera(&mut self, camera: &mut dyn Camera) -> Result<(), SessionError> {
        if self.release_camera() {
            self.invalidate();
        }
        let stream = match camera.open() {
            Ok(stream) => stream,
            Err(e) => {
                warn!(error = %e, "camera unavailable");
                if self.source.is_none() {
                    self.last = None;
                    self.state = SessionState::Idle;
                }
                return Err(e.into());
            }
        };
        self.camera = Some(CameraGuard::new(stream));
        self.source = None;
        self.last = None;
        self.invalidate();
        self.state = SessionState::SourceReady;
        Ok(())
    }

    /// Freezes the current camera frame as a still image and stops the camera.
    pub fn capture_frame(&mut self) -> Result<(), SessionError> {
        let guard = self.camera.as_mut().ok_or(SessionError::NoSource)?;
        let frame = guard.capture()?;
        self.select_source(frame.into_still());
        Ok(())
    }

    /// Drops the source, the camera, and the last result.
    pub fn clear(&mut self) {
        self.release_camera();
        self.source = None;
        self.last = None;
        self.invalidate();
        self.state = SessionState::Idle;
    }

    /// Preprocesses the current source and marks the session as predicting.
    ///
    /// With a live camera the current frame is grabbed first.
    pub fn begin_prediction(&mut self) -> Result<PendingPrediction, SessionError> {
        if self.state == SessionState::Predicting {
            return Err(SessionError::PredictionInFlight);
        }
        let size = self.config.input_size;
        let input = match (&self.source, self.camera.as_mut()) {
            (Some(source), _) => self.preprocessor.preprocess(source, size)?,
            (None, Some(guard)) => {
                let frame = guard.capture()?;
                self.preprocessor.preprocess(&frame, size)?
            }
            (None, None) => return Err(SessionError::NoSource),
        };

        let scorer = match &self.classifier {
            Some(c) => Scorer::Model(Arc::clone(c)),
            None => Scorer::Demo { class_count: self.labels.len() },
        };
        self.pending = Some(self.generation);
        self.last = None;
        self.state = SessionState::Predicting;
        Ok(PendingPrediction { generation: self.generation, input, scorer })
    }

    /// Ranks the scores of a finished prediction and stores the result.
    ///
    /// Returns `Cancelled` when the source changed (or the session was
    /// cleared) after `begin_prediction`.
    pub fn finish_prediction(
        &mut self,
        pending: PendingPrediction,
        outcome: Result<ScoreVector, ClassifierError>,
    ) -> Result<&Prediction, SessionError> {
        if self.pending != Some(pending.generation) {
            debug!(generation = pending.generation, current = self.generation, "discarding stale prediction");
            return Err(SessionError::Cancelled);
        }
        self.pending = None;

        let scores = match outcome {
            Ok(scores) => scores,
            Err(e) => {
                warn!(error = %e, "classifier failed");
                self.state = SessionState::SourceReady;
                return Err(e.into());
            }
        };

        let ranked = rank(&scores.scores, self.labels.as_slice());
        let advice = ranked.first().map_or(VERIFY_WITH_EXPERT, |best| advise(&best.label));
        if let Some(best) = ranked.first() {
            info!(label = %best.label, probability = best.probability, mode = ?scores.mode, "prediction ready");
        }
        self.state = SessionState::Displaying;
        Ok(&*self.last.insert(Prediction { ranked, advice, mode: scores.mode }))
    }

    /// Runs a whole prediction synchronously.
    pub fn predict(&mut self) -> Result<&Prediction, SessionError> {
        let pending = self.begin_prediction()?;
        let outcome = pending.run();
        self.finish_prediction(pending, outcome)
    }

    /// Like `predict`, with the demo-mode randomness drawn from `rng`.
    pub fn predict_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&Prediction, SessionError> {
        let pending = self.begin_prediction()?;
        let outcome = pending.run_with_rng(rng);
        self.finish_prediction(pending, outcome)
    }

    /// Stops the live camera, if any. Returns whether one was running.
    fn release_camera(&mut self) -> bool {
        match self.camera.take() {
            Some(guard) => {
                debug!("releasing camera stream");
                drop(guard);
                true
            }
            None => false,
        }
    }

    /// Invalidates any pending prediction.
    fn invalidate(&mut self) {
        self.generation += 1;
        if self.pending.take().is_some() {
            debug!(generation = self.generation, "pending prediction cancelled");
        }
    }
}
