//! Artifact store for fitted models.
//!
//! The fitted extractor and classifier live as two files in one directory:
//! [`EXTRACTOR_FILE`] and [`CLASSIFIER_FILE`]. This module is the only part
//! of the crate that touches durable storage.
//!
//! Saving writes both files to temporary names first and renames them into
//! place only after both writes succeeded. An existing pair is moved to
//! backup names while the new one is installed and restored if that fails,
//! so a failed save leaves the previous pair loadable.

pub mod codec;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Serialize;

use crate::error::{Result, SpamlensError};
use crate::ml::{FittedClassifier, FittedExtractor};
use crate::storage::codec::ArtifactKind;

/// File name of the fitted extractor.
pub const EXTRACTOR_FILE: &str = "vectorizer.bin";

/// File name of the fitted classifier.
pub const CLASSIFIER_FILE: &str = "spam_model.bin";

/// Default artifact directory.
pub const DEFAULT_MODEL_DIR: &str = "model";

/// Paths of a saved artifact pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactPaths {
    pub extractor: PathBuf,
    pub classifier: PathBuf,
}

/// A directory holding one extractor/classifier pair.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    directory: PathBuf,
}

impl ArtifactStore {
    pub fn new<P: Into<PathBuf>>(directory: P) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            extractor: self.directory.join(EXTRACTOR_FILE),
            classifier: self.directory.join(CLASSIFIER_FILE),
        }
    }

    /// Whether both artifact files are present.
    pub fn exists(&self) -> bool {
        let paths = self.paths();
        paths.extractor.is_file() && paths.classifier.is_file()
    }

    /// Persist both fitted objects, or neither.
    pub fn save(
        &self,
        extractor: &FittedExtractor,
        classifier: &FittedClassifier,
    ) -> Result<ArtifactPaths> {
        check_pairing(extractor, classifier)?;

        // Encode everything before touching the disk.
        let extractor_bytes = codec::encode(ArtifactKind::Extractor, extractor)?;
        let classifier_bytes = codec::encode(ArtifactKind::Classifier, classifier)?;

        fs::create_dir_all(&self.directory)?;
        let paths = self.paths();
        let extractor_tmp = self.directory.join(format!(".{EXTRACTOR_FILE}.tmp"));
        let classifier_tmp = self.directory.join(format!(".{CLASSIFIER_FILE}.tmp"));

        let written = write_file(&extractor_tmp, &extractor_bytes)
            .and_then(|_| write_file(&classifier_tmp, &classifier_bytes));
        if let Err(e) = written {
            remove_quietly(&extractor_tmp);
            remove_quietly(&classifier_tmp);
            return Err(e.into());
        }

        // Move the previous pair aside so it can be put back if the new pair
        // cannot be installed.
        let mut backups: Vec<(&Path, PathBuf)> = Vec::new();
        for current in [&paths.extractor, &paths.classifier] {
            if !current.is_file() {
                continue;
            }
            let backup = backup_path(current);
            if let Err(e) = fs::rename(current, &backup) {
                restore_backups(&backups);
                remove_quietly(&extractor_tmp);
                remove_quietly(&classifier_tmp);
                return Err(e.into());
            }
            backups.push((current.as_path(), backup));
        }

        let installed = fs::rename(&extractor_tmp, &paths.extractor)
            .and_then(|_| fs::rename(&classifier_tmp, &paths.classifier));
        if let Err(e) = installed {
            // Only new files can sit at the final paths here.
            remove_quietly(&paths.extractor);
            remove_quietly(&paths.classifier);
            restore_backups(&backups);
            remove_quietly(&extractor_tmp);
            remove_quietly(&classifier_tmp);
            return Err(e.into());
        }
        for (_, backup) in &backups {
            remove_quietly(backup);
        }

        info!(
            "Saved artifacts to {} ({} + {} bytes)",
            self.directory.display(),
            extractor_bytes.len(),
            classifier_bytes.len()
        );
        Ok(paths)
    }

    /// Load and validate the artifact pair.
    pub fn load(&self) -> Result<(FittedExtractor, FittedClassifier)> {
        let paths = self.paths();
        for path in [&paths.extractor, &paths.classifier] {
            if !path.is_file() {
                return Err(SpamlensError::artifact_not_found(path.clone()));
            }
        }

        let extractor: FittedExtractor = read_artifact(&paths.extractor, ArtifactKind::Extractor)?;
        let classifier: FittedClassifier =
            read_artifact(&paths.classifier, ArtifactKind::Classifier)?;

        classifier
            .validate()
            .map_err(|e| SpamlensError::artifact_corrupt(&paths.classifier, e.to_string()))?;
        check_pairing(&extractor, &classifier).map_err(|_| {
            SpamlensError::artifact_corrupt(
                &paths.classifier,
                format!(
                    "classifier has {} features but extractor vocabulary has {} terms",
                    classifier.n_features(),
                    extractor.vocabulary_size()
                ),
            )
        })?;

        info!(
            "Loaded artifacts from {} (vocabulary size {})",
            self.directory.display(),
            extractor.vocabulary_size()
        );
        Ok((extractor, classifier))
    }
}

/// Save a fitted pair into `destination`.
pub fn save<P: AsRef<Path>>(
    extractor: &FittedExtractor,
    classifier: &FittedClassifier,
    destination: P,
) -> Result<ArtifactPaths> {
    ArtifactStore::new(destination.as_ref()).save(extractor, classifier)
}

/// Load a fitted pair from `source`.
pub fn load<P: AsRef<Path>>(source: P) -> Result<(FittedExtractor, FittedClassifier)> {
    ArtifactStore::new(source.as_ref()).load()
}

fn check_pairing(extractor: &FittedExtractor, classifier: &FittedClassifier) -> Result<()> {
    if extractor.vocabulary_size() != classifier.n_features() {
        return Err(SpamlensError::DimensionMismatch {
            expected: extractor.vocabulary_size(),
            actual: classifier.n_features(),
        });
    }
    Ok(())
}

fn write_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

fn backup_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.bak"))
}

fn restore_backups(backups: &[(&Path, PathBuf)]) {
    for (original, backup) in backups {
        if let Err(e) = fs::rename(backup, original) {
            warn!(
                "Failed to restore {} from {}: {e}",
                original.display(),
                backup.display()
            );
        }
    }
}

fn remove_quietly(path: &Path) {
    if let Err(e) = fs::remove_file(path)
        && e.kind() != io::ErrorKind::NotFound
    {
        warn!("Failed to remove {}: {e}", path.display());
    }
}

fn read_artifact<T: serde::de::DeserializeOwned>(path: &Path, kind: ArtifactKind) -> Result<T> {
    let bytes = fs::read(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            SpamlensError::artifact_not_found(path)
        } else {
            SpamlensError::artifact_corrupt(path, format!("unreadable: {e}"))
        }
    })?;
    codec::decode(kind, &bytes).map_err(|reason| SpamlensError::artifact_corrupt(path, reason))
}
