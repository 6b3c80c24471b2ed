use std::path::Path;

use image::{Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

use leafscan::classifier::{ActivationFunction, DenseLayer, ImageInput, ModelMetadata};
use leafscan::rank::advice::{BLACK_SIGATOKA, HEALTHY};
use leafscan::{
    AppConfig, DenseClassifier, ImageOrigin, ImagePreprocessor, PredictionMode, Session,
    SessionState, VisualSource,
};

const SIZE: u32 = 8;
const LABELS: [&str; 4] = ["Black Sigatoka", "Cordana", "Fusarium Wilt", "Healthy"];

/// One dense layer over the flattened 8x8x3 input: red pixels vote for
/// "Black Sigatoka", green pixels for "Healthy".
fn write_model(dir: &Path, activation: ActivationFunction) {
    let inputs = (SIZE * SIZE * 3) as usize;
    let weights = (0..inputs)
        .map(|i| match i % 3 {
            0 => vec![0.1, 0.0, 0.0, 0.0],
            1 => vec![0.0, 0.0, 0.0, 0.1],
            _ => vec![0.0; 4],
        })
        .collect();
    let layer = DenseLayer { weights, biases: vec![0.0; 4], activation };
    let metadata = ModelMetadata {
        description: Some("test model".into()),
        input: Some(ImageInput { width: SIZE, height: SIZE }),
        output_labels: None,
    };
    let model = DenseClassifier::new("TestNet", vec![layer], Some(metadata)).unwrap();
    model.save_json(dir.join("model.json")).unwrap();
}

fn write_labels(dir: &Path) {
    std::fs::write(dir.join("labels.json"), serde_json::to_string(&LABELS).unwrap()).unwrap();
}

fn write_config(dir: &Path) -> AppConfig {
    let config = serde_json::json!({
        "input_size": SIZE,
        "model_path": dir.join("model.json"),
        "labels_path": dir.join("labels.json"),
        "top_k": 3,
    });
    let path = dir.join("config.json");
    std::fs::write(&path, config.to_string()).unwrap();
    AppConfig::load_json(&path).unwrap()
}

fn png_source(dir: &Path, width: u32, height: u32, color: [u8; 3]) -> VisualSource {
    let path = dir.join("leaf.png");
    RgbImage::from_pixel(width, height, Rgb(color)).save(&path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    VisualSource::decode(&bytes, ImageOrigin::Upload { file_name: "leaf.png".into() }).unwrap()
}

#[test]
fn model_session_ranks_decoded_upload() {
    let dir = TempDir::new().unwrap();
    write_model(dir.path(), ActivationFunction::Identity);
    write_labels(dir.path());
    let mut session = Session::load(write_config(dir.path()));
    assert_eq!(session.mode(), PredictionMode::Model);
    assert_eq!(session.status_text(), "Ready");
    assert!(session.model_info().starts_with("Model: TestNet"));

    session.select_source(png_source(dir.path(), 16, 16, [0, 255, 0]));
    assert_eq!(session.source_info().as_deref(), Some("Source: leaf.png (16\u{d7}16)"));

    let top_k = session.config().top_k;
    let prediction = session.predict().unwrap();
    assert_eq!(prediction.best().unwrap().label, "Healthy");
    assert!(prediction.best().unwrap().probability > 0.9);
    assert_eq!(prediction.advice, HEALTHY);
    assert!(!prediction.is_demo());

    let total: f64 = prediction.ranked.iter().map(|p| p.probability).sum();
    assert!((total - 1.0).abs() < 1e-9);
    assert!(prediction.ranked.windows(2).all(|w| w[0].probability >= w[1].probability));
    assert_eq!(prediction.top(top_k).len(), 3);
    assert_eq!(session.state(), SessionState::Displaying);
}

#[test]
fn softmax_output_layer_is_not_normalized_twice() {
    let dir = TempDir::new().unwrap();
    write_model(dir.path(), ActivationFunction::Softmax);
    write_labels(dir.path());
    let mut session = Session::load(write_config(dir.path()));

    session.select_source(png_source(dir.path(), 30, 10, [255, 0, 0]));
    let prediction = session.predict().unwrap();
    let best = prediction.best().unwrap();
    assert_eq!(best.label, "Black Sigatoka");
    assert_eq!(prediction.advice, BLACK_SIGATOKA);

    // Letterboxed 30x10 at 8 gives an 8x3 band: 24 red pixels, logit 2.4.
    let e = 2.4f64.exp();
    assert!((best.probability - e / (e + 3.0)).abs() < 1e-6);
}

#[test]
fn missing_model_falls_back_to_demo_with_file_labels() {
    let dir = TempDir::new().unwrap();
    write_labels(dir.path());
    let mut session = Session::load(write_config(dir.path()));
    assert_eq!(session.mode(), PredictionMode::Demo);
    assert_eq!(session.status_text(), "Model not found - using demo mode.");
    assert_eq!(session.labels().as_slice(), &LABELS.map(String::from)[..]);

    session.select_source(png_source(dir.path(), 12, 20, [40, 90, 10]));
    let mut rng = StdRng::seed_from_u64(7);
    let prediction = session.predict_with_rng(&mut rng).unwrap();
    assert!(prediction.is_demo());
    assert_eq!(prediction.ranked.len(), 4);
    let total: f64 = prediction.ranked.iter().map(|p| p.probability).sum();
    assert!((total - 1.0).abs() < 1e-9);
}

#[test]
fn model_with_wrong_input_size_is_not_used() {
    let dir = TempDir::new().unwrap();
    write_model(dir.path(), ActivationFunction::Identity);
    let mut config = write_config(dir.path());
    config.input_size = 16;
    let session = Session::load(config);
    assert_eq!(session.mode(), PredictionMode::Demo);
    assert_eq!(session.labels().len(), 4);
    assert_eq!(session.labels().get(0), Some("Class 0"));
}

#[test]
fn wide_upload_is_letterboxed_at_default_size() {
    let dir = TempDir::new().unwrap();
    let source = png_source(dir.path(), 300, 150, [255, 255, 255]);
    let tensor = ImagePreprocessor::new().preprocess(&source, 224).unwrap();

    assert_eq!(tensor.shape(), [1, 224, 224, 3]);
    for c in 0..3 {
        assert_eq!(tensor.get(100, 0, c), 0.0);
        assert_eq!(tensor.get(100, 55, c), 0.0);
        assert!(tensor.get(100, 56, c) > 0.99);
        assert!(tensor.get(100, 167, c) > 0.99);
        assert_eq!(tensor.get(100, 168, c), 0.0);
    }
}
