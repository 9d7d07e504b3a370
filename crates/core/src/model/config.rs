use std::path::{Path, PathBuf};

use thiserror::Error;

/// Default placement tolerance in normalized units, applied per axis.
pub const DEFAULT_TOLERANCE: f64 = 0.02;

/// Seed used when the image order is shuffled.
pub const DEFAULT_SHUFFLE_SEED: u64 = 42;

/// Order in which images of a directory are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageOrder {
    #[default]
    Sorted,
    /// Sorted, then shuffled with a fixed seed so runs are reproducible.
    Shuffled { seed: u64 },
}

/// Resolved paths and knobs shared by storage and services.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotatorConfig {
    image_dir: PathBuf,
    data_dir: PathBuf,
    training_dir: PathBuf,
    image_order: ImageOrder,
    tolerance: f64,
}

#[derive(Clone, Debug, Default)]
pub struct AnnotatorConfigDraft {
    pub image_dir: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub training_dir: Option<PathBuf>,
    pub image_order: ImageOrder,
    pub tolerance: Option<f64>,
}

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("an image directory is required")]
    MissingImageDir,
    #[error("tolerance must be within (0, 1), got {0}")]
    InvalidTolerance(f64),
}

impl AnnotatorConfigDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the draft. The data directory defaults to the working
    /// directory and the training directory to `<data_dir>/training`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the image directory is missing or blank, or
    /// the tolerance is not strictly between 0 and 1.
    pub fn validate(self) -> Result<AnnotatorConfig, ConfigError> {
        let image_dir = self
            .image_dir
            .filter(|dir| !dir.as_os_str().is_empty())
            .ok_or(ConfigError::MissingImageDir)?;

        let tolerance = self.tolerance.unwrap_or(DEFAULT_TOLERANCE);
        if !(tolerance > 0.0 && tolerance < 1.0) {
            return Err(ConfigError::InvalidTolerance(tolerance));
        }

        let data_dir = self.data_dir.unwrap_or_else(|| PathBuf::from("."));
        let training_dir = self
            .training_dir
            .unwrap_or_else(|| data_dir.join("training"));

        Ok(AnnotatorConfig {
            image_dir,
            data_dir,
            training_dir,
            image_order: self.image_order,
            tolerance,
        })
    }
}

impl AnnotatorConfig {
    #[must_use]
    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    #[must_use]
    pub fn image_order(&self) -> ImageOrder {
        self.image_order
    }

    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    #[must_use]
    pub fn annotations_path(&self) -> PathBuf {
        self.data_dir.join("annotations.csv")
    }

    #[must_use]
    pub fn backup_dir(&self) -> PathBuf {
        self.data_dir.join("backups")
    }

    #[must_use]
    pub fn sessions_path(&self) -> PathBuf {
        self.data_dir.join("sessions.txt")
    }

    #[must_use]
    pub fn training_dir(&self) -> &Path {
        &self.training_dir
    }

    #[must_use]
    pub fn ground_truth_path(&self) -> PathBuf {
        self.training_dir.join("ground_truth.csv")
    }

    #[must_use]
    pub fn training_annotations_path(&self) -> PathBuf {
        self.training_dir.join("training.csv")
    }

    #[must_use]
    pub fn training_image_dir(&self) -> PathBuf {
        self.training_dir.join("images")
    }

    /// Training needs both the reference annotations and the images.
    #[must_use]
    pub fn has_training_material(&self) -> bool {
        self.ground_truth_path().is_file() && self.training_image_dir().is_dir()
    }
}
