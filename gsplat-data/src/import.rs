//! Splat PLY file import

use crate::ply::{DecodeError, SplatPlyDecoder, ZeroRotationPolicy};
use crate::types::{Bounds, SplatAttributes};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};

/// Import behaviour shared by every PLY import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    /// Log failed imports with `tracing::error!`. Failures are returned to
    /// the caller either way.
    pub report_import_errors: bool,
    pub zero_rotation: ZeroRotationPolicy,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            report_import_errors: true,
            zero_rotation: ZeroRotationPolicy::default(),
        }
    }
}

impl ImportSettings {
    /// Parse settings from a JSON document. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ImportError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ImportError> {
        let text = std::fs::read_to_string(path).map_err(|source| ImportError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }
}

/// Errors that can occur while importing a splat file.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("{} import error: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid import settings: {0}")]
    Settings(#[from] serde_json::Error),
}

/// A decoded splat asset ready to hand to a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct SplatAsset {
    /// Asset name, the file stem for imported files.
    pub name: String,
    pub attributes: SplatAttributes,
}

impl SplatAsset {
    pub fn new(name: impl Into<String>, attributes: SplatAttributes) -> Self {
        Self {
            name: name.into(),
            attributes,
        }
    }

    pub fn splat_count(&self) -> u32 {
        self.attributes.splat_count() as u32
    }

    pub fn sh_bands(&self) -> u8 {
        self.attributes.sh_bands
    }

    pub fn bounds(&self) -> Bounds {
        self.attributes.bounds
    }
}

/// Import a splat PLY file from disk.
pub fn import_ply(path: &Path, settings: &ImportSettings) -> Result<SplatAsset, ImportError> {
    import_ply_with_progress(path, settings, |_| {})
}

/// Import a splat PLY file, reporting the decoded fraction after each record.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn import_ply_with_progress(
    path: &Path,
    settings: &ImportSettings,
    progress: impl FnMut(f32),
) -> Result<SplatAsset, ImportError> {
    let result = decode_file(path, settings, progress);

    if let Err(err) = &result {
        if settings.report_import_errors {
            error!("{}", err);
        }
    }
    result
}

fn decode_file(
    path: &Path,
    settings: &ImportSettings,
    progress: impl FnMut(f32),
) -> Result<SplatAsset, ImportError> {
    let file = File::open(path).map_err(|source| ImportError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let attributes = SplatPlyDecoder::new()
        .with_zero_rotation(settings.zero_rotation)
        .with_progress(progress)
        .decode(file)
        .map_err(|source| ImportError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    info!("Imported '{}': {} splats", name, attributes.splat_count());
    Ok(SplatAsset::new(name, attributes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ply::test_util::{BASIC_PROPERTIES, ply_bytes};
    use std::io::Write;

    fn temp_file(name: &str, bytes: &[u8]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("gsplat-data-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(bytes).unwrap();
        path
    }

    #[test]
    fn test_settings_defaults() {
        let settings = ImportSettings::from_json("{}").unwrap();
        assert_eq!(settings, ImportSettings::default());
        assert!(settings.report_import_errors);
    }

    #[test]
    fn test_settings_from_json() {
        let json = r#"{"report_import_errors": false, "zero_rotation": "reject"}"#;
        let settings = ImportSettings::from_json(json).unwrap();
        assert!(!settings.report_import_errors);
        assert_eq!(settings.zero_rotation, ZeroRotationPolicy::Reject);

        assert!(matches!(
            ImportSettings::from_json(r#"{"zero_rotation": "spin"}"#),
            Err(ImportError::Settings(_))
        ));
    }

    #[test]
    fn test_import_names_asset_after_file() {
        let record: Vec<f32> = vec![
            1.0, 2.0, 3.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0,
        ];
        let path = temp_file("garden.ply", &ply_bytes(1, &BASIC_PROPERTIES, &[record]));

        let asset = import_ply(&path, &ImportSettings::default()).unwrap();
        assert_eq!(asset.name, "garden");
        assert_eq!(asset.splat_count(), 1);
        assert_eq!(asset.sh_bands(), 0);
        assert_eq!(asset.bounds().center(), glam::Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_import_failure_is_returned_without_reporting() {
        let path = temp_file("broken.ply", b"ply\nelement vertex 1\nend_header\n");
        let settings = ImportSettings {
            report_import_errors: false,
            ..Default::default()
        };

        match import_ply(&path, &settings).unwrap_err() {
            ImportError::Decode { path: failed, source } => {
                assert_eq!(failed, path);
                assert!(matches!(source, DecodeError::MissingRequiredProperty { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_import_missing_file() {
        let path = std::env::temp_dir().join("gsplat-data-does-not-exist.ply");
        assert!(matches!(
            import_ply(&path, &ImportSettings::default()),
            Err(ImportError::Open { .. })
        ));
    }
}
