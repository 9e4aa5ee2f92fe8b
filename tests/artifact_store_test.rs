use std::fs;

use spamlens::error::{Result, SpamlensError};
use spamlens::ml::{FeatureVector, FittedClassifier, FittedExtractor, Label};
use spamlens::storage::{ArtifactStore, CLASSIFIER_FILE, EXTRACTOR_FILE};
use spamlens::training::{TrainingConfig, TrainingPipeline, builtin_corpus};
use tempfile::tempdir;

fn fitted_pair() -> Result<(FittedExtractor, FittedClassifier)> {
    let config = TrainingConfig {
        test_fraction: 0.0,
        ..Default::default()
    };
    let model = TrainingPipeline::new(config)?.fit(&builtin_corpus())?;
    Ok((model.extractor, model.classifier))
}

#[test]
fn test_round_trip_preserves_predictions() -> Result<()> {
    let dir = tempdir()?;
    let store = ArtifactStore::new(dir.path());
    let (extractor, classifier) = fitted_pair()?;
    store.save(&extractor, &classifier)?;

    let (loaded_extractor, loaded_classifier) = store.load()?;
    assert_eq!(loaded_extractor.vocabulary_size(), extractor.vocabulary_size());
    assert!(loaded_extractor.terms().eq(extractor.terms()));

    for message in builtin_corpus() {
        let before = extractor.transform(&message.text)?;
        let after = loaded_extractor.transform(&message.text)?;
        assert_eq!(before, after);
        assert_eq!(
            classifier.predict_probability(&before)?,
            loaded_classifier.predict_probability(&after)?
        );
    }
    Ok(())
}

#[test]
fn test_vocabulary_is_fixed_after_fitting() -> Result<()> {
    let (extractor, _) = fitted_pair()?;
    let size = extractor.vocabulary_size();

    let vector = extractor.transform("zeppelin quokka marmalade")?;
    assert_eq!(vector.dimension(), size);
    assert_eq!(vector, FeatureVector::zeros(size));
    assert_eq!(extractor.term_index("zeppelin"), None);
    Ok(())
}

#[test]
fn test_overwrite_replaces_pair() -> Result<()> {
    let dir = tempdir()?;
    let store = ArtifactStore::new(dir.path());
    let (extractor, classifier) = fitted_pair()?;
    store.save(&extractor, &classifier)?;

    let config = TrainingConfig {
        test_fraction: 0.0,
        ..Default::default()
    };
    let small = TrainingPipeline::new(config)?.fit(&builtin_corpus()[..6])?;
    store.save(&small.extractor, &small.classifier)?;

    let (loaded_extractor, loaded_classifier) = store.load()?;
    assert_eq!(
        loaded_extractor.vocabulary_size(),
        small.extractor.vocabulary_size()
    );
    assert_eq!(loaded_classifier, small.classifier);
    Ok(())
}

#[test]
fn test_missing_extractor() -> Result<()> {
    let dir = tempdir()?;
    let store = ArtifactStore::new(dir.path());
    let (extractor, classifier) = fitted_pair()?;
    store.save(&extractor, &classifier)?;
    fs::remove_file(dir.path().join(EXTRACTOR_FILE))?;

    match store.load() {
        Err(SpamlensError::ArtifactNotFound { path }) => {
            assert!(path.ends_with(EXTRACTOR_FILE));
        }
        other => panic!("expected ArtifactNotFound, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_flipped_byte_is_corrupt() -> Result<()> {
    let dir = tempdir()?;
    let store = ArtifactStore::new(dir.path());
    let (extractor, classifier) = fitted_pair()?;
    store.save(&extractor, &classifier)?;

    let path = dir.path().join(CLASSIFIER_FILE);
    let mut bytes = fs::read(&path)?;
    let middle = bytes.len() / 2;
    bytes[middle] ^= 0x5a;
    fs::write(&path, bytes)?;

    let err = store.load().unwrap_err();
    assert!(err.is_artifact_error());
    assert!(matches!(err, SpamlensError::ArtifactCorrupt { .. }));
    Ok(())
}

#[test]
fn test_swapped_files_are_corrupt() -> Result<()> {
    let dir = tempdir()?;
    let store = ArtifactStore::new(dir.path());
    let (extractor, classifier) = fitted_pair()?;
    store.save(&extractor, &classifier)?;

    let extractor_path = dir.path().join(EXTRACTOR_FILE);
    let classifier_path = dir.path().join(CLASSIFIER_FILE);
    let extractor_bytes = fs::read(&extractor_path)?;
    fs::write(&extractor_path, fs::read(&classifier_path)?)?;
    fs::write(&classifier_path, extractor_bytes)?;

    assert!(matches!(
        store.load(),
        Err(SpamlensError::ArtifactCorrupt { .. })
    ));
    Ok(())
}

#[test]
fn test_truncated_file_is_corrupt() -> Result<()> {
    let dir = tempdir()?;
    let store = ArtifactStore::new(dir.path());
    let (extractor, classifier) = fitted_pair()?;
    store.save(&extractor, &classifier)?;

    let path = dir.path().join(EXTRACTOR_FILE);
    let bytes = fs::read(&path)?;
    fs::write(&path, &bytes[..bytes.len() - 10])?;

    assert!(matches!(
        store.load(),
        Err(SpamlensError::ArtifactCorrupt { .. })
    ));
    Ok(())
}

#[test]
fn test_classes_survive_round_trip() -> Result<()> {
    let dir = tempdir()?;
    let store = ArtifactStore::new(dir.path());
    let (extractor, classifier) = fitted_pair()?;
    store.save(&extractor, &classifier)?;

    let (_, loaded) = store.load()?;
    assert_eq!(loaded.class_counts(), (11, 9));
    let spam_vector = extractor.transform("claim your free reward")?;
    assert_eq!(loaded.predict(&spam_vector)?, Label::Spam);
    Ok(())
}
