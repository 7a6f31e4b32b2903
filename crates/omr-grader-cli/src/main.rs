//! Grade one scanned answer sheet.
//!
//! Reads the sheet image and the rectangles found by the external box
//! detector, runs the grading pipeline, and writes
//! `<test>-<student>.json` (the answer map) and `<test>-<student>.jpg`
//! (the annotated review image) into the output directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use log::{error, info, warn, LevelFilter};

use omr_grader::{GraderParams, LetterOrder, RawBox, SheetGrader};
use omr_grader_core::{init_with_level, BoxRect, GrayImageView, SheetTemplate};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LetterOrderArg {
    /// Left-most bubble is A.
    LeftToRight,
    /// Left-most bubble is D (legacy sheet revisions).
    RightToLeft,
}

impl From<LetterOrderArg> for LetterOrder {
    fn from(arg: LetterOrderArg) -> Self {
        match arg {
            LetterOrderArg::LeftToRight => LetterOrder::LeftToRight,
            LetterOrderArg::RightToLeft => LetterOrder::RightToLeft,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "omr-grader", about = "Grade a scanned multiple-choice answer sheet")]
struct Args {
    /// Input sheet image (already rectified).
    #[arg(short, long)]
    input: PathBuf,

    /// Output directory; created if missing.
    #[arg(short, long)]
    output: PathBuf,

    /// Test identifier used to name the output files.
    #[arg(short = 't', long = "test")]
    test_id: String,

    /// Student identifier used to name the output files.
    #[arg(short = 's', long = "student")]
    student_id: String,

    /// Grade only the first N questions.
    #[arg(short = 'n', long = "check", default_value_t = 0)]
    check_n: u32,

    /// JSON file with the detector's rectangles as [[x, y, w, h], ...].
    /// Omitted or empty means zero detections: the whole sheet is
    /// reconstructed from the nominal layout.
    #[arg(long)]
    boxes: Option<PathBuf>,

    /// JSON file overriding grader parameters.
    #[arg(long)]
    params: Option<PathBuf>,

    /// Bubble-to-letter direction; overrides the params file.
    #[arg(long, value_enum)]
    letter_order: Option<LetterOrderArg>,

    /// Verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Report(#[from] omr_grader::ReportError),
}

fn main() -> ExitCode {
    let args = Args::parse();
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let _ = init_with_level(level);

    // The only unrecoverable failure: no input, no pipeline.
    if !args.input.exists() {
        eprintln!("error: input image not found: {}", args.input.display());
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Processing errors are logged and swallowed; no outputs are
            // written for this sheet but the caller's batch keeps going.
            error!("grading failed, no outputs written: {err}");
            ExitCode::SUCCESS
        }
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let rgb = image::ImageReader::open(&args.input)?.decode()?.to_rgb8();
    let gray = image::imageops::grayscale(&rgb);
    let view = GrayImageView {
        width: gray.width() as usize,
        height: gray.height() as usize,
        data: gray.as_raw(),
    };

    let raw_boxes = match &args.boxes {
        Some(path) => load_boxes(path)?,
        None => Vec::new(),
    };

    let mut params: GraderParams = match &args.params {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => GraderParams::default(),
    };
    if let Some(order) = args.letter_order {
        params.decision.letter_order = order.into();
    }

    let grader = SheetGrader::new(SheetTemplate::default(), params);
    let report = grader.grade(&view, &raw_boxes, args.check_n);

    fs::create_dir_all(&args.output)?;
    let stem = format!("{}-{}", args.test_id, args.student_id);
    let json_path = args.output.join(format!("{stem}.json"));
    let image_path = args.output.join(format!("{stem}.jpg"));

    omr_grader::save_answer_map(&json_path, &report.answers)?;

    let mut canvas = rgb;
    grader.annotate(&mut canvas, &report);
    canvas.save(&image_path)?;

    info!(
        "wrote {} and {}",
        json_path.display(),
        image_path.display()
    );
    Ok(())
}

/// Load the detector's rectangles, skipping degenerate entries.
fn load_boxes(path: &Path) -> Result<Vec<RawBox>, CliError> {
    let raw: Vec<[f32; 4]> = serde_json::from_str(&fs::read_to_string(path)?)?;
    let mut boxes = Vec::with_capacity(raw.len());
    for (index, &[x, y, w, h]) in raw.iter().enumerate() {
        if !(x.is_finite() && y.is_finite() && w > 0.0 && h > 0.0) {
            warn!("skipping malformed detector box #{index}: [{x}, {y}, {w}, {h}]");
            continue;
        }
        boxes.push(RawBox {
            rect: BoxRect::new(x, y, w, h),
            index,
        });
    }
    Ok(boxes)
}
