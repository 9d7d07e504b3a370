use std::fmt;
use std::io;
use std::path::PathBuf;

use pose_core::model::{AnnotatorConfigDraft, DEFAULT_SHUFFLE_SEED, ImageOrder};
use services::{Annotator, Clock};

mod console;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidSeed { raw: String },
    InvalidTolerance { raw: String },
    DuplicateImageDir(String),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
            ArgsError::InvalidTolerance { raw } => write!(f, "invalid --tolerance value: {raw}"),
            ArgsError::DuplicateImageDir(raw) => {
                write!(f, "image folder given twice (second: {raw})")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--image-folder <dir> | <dir>] [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --data-dir <dir>       annotations.csv, backups/ and sessions.txt (default .)");
    eprintln!("  --training-dir <dir>   ground_truth.csv and images/ (default <data-dir>/training)");
    eprintln!("  --shuffle              shuffle images with a fixed seed");
    eprintln!("  --seed <n>             shuffle seed (implies --shuffle, default 42)");
    eprintln!("  --tolerance <t>        training placement tolerance (default 0.02)");
    eprintln!("  --skip-training        start live annotation right away");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  ANNOTATE_IMAGE_DIR, ANNOTATE_DATA_DIR, RUST_LOG");
}

#[derive(Debug)]
struct Args {
    draft: AnnotatorConfigDraft,
    skip_training: bool,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut draft = AnnotatorConfigDraft::new();
        let mut image_dir: Option<PathBuf> = None;
        let mut shuffle = false;
        let mut seed = DEFAULT_SHUFFLE_SEED;
        let mut skip_training = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--image-folder" => {
                    let value = require_value(args, "--image-folder")?;
                    set_image_dir(&mut image_dir, value)?;
                }
                "--data-dir" => {
                    draft.data_dir = Some(require_value(args, "--data-dir")?.into());
                }
                "--training-dir" => {
                    draft.training_dir = Some(require_value(args, "--training-dir")?.into());
                }
                "--shuffle" => shuffle = true,
                "--seed" => {
                    let value = require_value(args, "--seed")?;
                    seed = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidSeed { raw: value.clone() })?;
                    shuffle = true;
                }
                "--tolerance" => {
                    let value = require_value(args, "--tolerance")?;
                    let parsed: f64 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidTolerance { raw: value.clone() })?;
                    draft.tolerance = Some(parsed);
                }
                "--skip-training" => skip_training = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ if !arg.starts_with('-') => set_image_dir(&mut image_dir, arg)?,
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        draft.image_dir =
            image_dir.or_else(|| std::env::var_os("ANNOTATE_IMAGE_DIR").map(PathBuf::from));
        if draft.data_dir.is_none() {
            draft.data_dir = std::env::var_os("ANNOTATE_DATA_DIR").map(PathBuf::from);
        }
        if shuffle {
            draft.image_order = ImageOrder::Shuffled { seed };
        }

        Ok(Self {
            draft,
            skip_training,
        })
    }
}

fn set_image_dir(slot: &mut Option<PathBuf>, value: String) -> Result<(), ArgsError> {
    if slot.is_some() {
        return Err(ArgsError::DuplicateImageDir(value));
    }
    *slot = Some(PathBuf::from(value));
    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let config = parsed.draft.validate()?;
    log::info!(
        "annotating {} (data in {})",
        config.image_dir().display(),
        config.data_dir().display()
    );

    let mut annotator = Annotator::start(config, Clock::system(), !parsed.skip_training)?;
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    console::run(&mut annotator, stdin.lock(), &mut stdout)
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
