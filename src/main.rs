// Classifies a single leaf image from the command line.
//
//   cargo run --bin leafscan -- [--config leafscan.json] [--camera] <image>
//
// `--camera` feeds the image through a still camera instead of loading it as
// an upload, which exercises the live-feed path on hosts without a webcam.

use std::error::Error;
use std::process::ExitCode;

use leafscan::rank::format_percent;
use leafscan::{AppConfig, ImageOrigin, Session, StillCamera, VisualSource};

struct Args {
    config: Option<String>,
    camera: bool,
    image: String,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut config = None;
    let mut camera = false;
    let mut image = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config = Some(args.next().ok_or("--config needs a path")?),
            "--camera" => camera = true,
            flag if flag.starts_with("--") => return Err(format!("unknown flag {}", flag)),
            _ => image = Some(arg),
        }
    }
    let image = image.ok_or("usage: leafscan [--config FILE] [--camera] <image>")?;
    Ok(Args { config, camera, image })
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load_or_default(args.config.as_deref())?;
    let top_k = config.top_k;
    let mut session = Session::load(config);

    let bytes = std::fs::read(&args.image)?;
    let file_name = std::path::Path::new(&args.image)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("image")
        .to_owned();
    let source = VisualSource::decode(&bytes, ImageOrigin::Upload { file_name })?;

    if args.camera {
        session.open_camera(&mut StillCamera::new(source.frame().clone()))?;
    } else {
        session.select_source(source);
    }

    println!("{}", session.model_info());
    if let Some(info) = session.source_info() {
        println!("{}", info);
    }

    let prediction = session.predict()?;
    for (i, entry) in prediction.top(top_k).iter().enumerate() {
        let marker = if i == 0 { "Top:" } else { "    " };
        println!("{} {:<24} {:>6}", marker, entry.label, format_percent(entry.probability));
    }
    println!();
    println!("{}", prediction.advice);
    if prediction.is_demo() {
        println!("(demo mode: scores are random, not a real prediction)");
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{}", msg);
            return ExitCode::from(2);
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
