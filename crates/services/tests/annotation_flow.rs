use std::fs;
use std::path::Path;

use chrono::Duration;
use pose_core::model::{
    AnnotatorConfig, AnnotatorConfigDraft, BodyPart, CompletionStatus, Coordinate, Keypoints,
};
use pose_core::time::fixed_clock;
use services::{Annotator, AnnotationError, ConfirmOutcome, PlaceOutcome, SessionPhase};
use storage::repository::AnnotationRepository;
use storage::{BackupPolicy, CsvDatastore};

fn target(part: BodyPart) -> Coordinate {
    #[allow(clippy::cast_precision_loss)]
    let step = part.index() as f64;
    Coordinate::new(0.1 + step * 0.04, 0.2 + step * 0.03)
}

fn write_images(dir: &Path, names: &[&str]) {
    fs::create_dir_all(dir).unwrap();
    for name in names {
        fs::write(dir.join(name), b"").unwrap();
    }
}

fn config(root: &Path) -> AnnotatorConfig {
    AnnotatorConfigDraft {
        image_dir: Some(root.join("images")),
        data_dir: Some(root.to_path_buf()),
        ..AnnotatorConfigDraft::new()
    }
    .validate()
    .unwrap()
}

fn place_all(annotator: &mut Annotator) {
    for part in BodyPart::ALL {
        let outcome = annotator.session_mut().place_marker(part, target(part));
        assert!(matches!(outcome, PlaceOutcome::Placed { .. }), "{part}: {outcome:?}");
    }
}

#[test]
fn three_images_confirmed_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path());
    write_images(cfg.image_dir(), &["c.png", "a.png", "b.jpg", "readme.md"]);

    let mut annotator = Annotator::start(cfg.clone(), fixed_clock(), false).unwrap();
    assert!(!annotator.session().is_training());
    assert_eq!(annotator.session().images().len(), 3);

    assert_eq!(annotator.confirm().unwrap(), ConfirmOutcome::NotReady);

    for expected in 0..3 {
        place_all(&mut annotator);
        match annotator.confirm().unwrap() {
            ConfirmOutcome::Confirmed { index, .. } => assert_eq!(index, expected),
            ConfirmOutcome::NotReady => panic!("image {expected} not confirmed"),
        }
    }
    annotator.session_mut().advance();
    assert_eq!(annotator.session().phase(), SessionPhase::AllDone);

    let store = CsvDatastore::open_existing(cfg.annotations_path()).unwrap();
    let records = store.records().unwrap();
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.status == CompletionStatus::Done));
    assert_eq!(
        records.iter().map(|r| r.file.as_str()).collect::<Vec<_>>(),
        vec!["a.png", "b.jpg", "c.png"]
    );
    assert_eq!(records[2].keypoints.get(BodyPart::LeftAnkle), target(BodyPart::LeftAnkle));
    assert_eq!(store.last_completed_index().unwrap(), Some(2));

    let text = fs::read_to_string(cfg.annotations_path()).unwrap();
    assert_eq!(text.lines().count(), 4);
}

#[test]
fn restart_resumes_and_backs_up() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path());
    write_images(cfg.image_dir(), &["0.png", "1.png", "2.png"]);

    let mut first = Annotator::live(cfg.clone(), fixed_clock()).unwrap();
    place_all(&mut first);
    first.confirm().unwrap();
    assert!(!cfg.backup_dir().exists());

    let mut clock = fixed_clock();
    clock.advance(Duration::seconds(75));
    let second = Annotator::live(cfg.clone(), clock).unwrap();
    assert_eq!(second.session().image_index(), 1);
    assert_eq!(second.session().start_index(), 1);

    let backups: Vec<_> = fs::read_dir(cfg.backup_dir()).unwrap().collect();
    assert_eq!(backups.len(), 1);

    let entry = second.finish().unwrap().unwrap();
    assert_eq!(entry.images_annotated(), 0);
    let log = fs::read_to_string(cfg.sessions_path()).unwrap();
    assert!(log.starts_with("Number of images annotated,Seconds spent,Date\n"));
}

#[test]
fn training_then_live() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path());
    write_images(cfg.image_dir(), &["live.png"]);
    write_images(&cfg.training_image_dir(), &["t0.png"]);

    let mut truth = Keypoints::unset();
    for part in BodyPart::ALL {
        truth.set(part, target(part));
    }
    let reference = CsvDatastore::initialize(
        cfg.ground_truth_path(),
        &BackupPolicy::Skip,
        &fixed_clock(),
    )
    .unwrap();
    reference
        .save_all(&["t0.png".to_owned()], &[truth], &[CompletionStatus::Done])
        .unwrap();
    // Leftovers from an earlier run must not leak into training.
    fs::write(cfg.training_annotations_path(), "garbage").unwrap();

    let mut annotator = Annotator::start(cfg.clone(), fixed_clock(), true).unwrap();
    assert!(annotator.session().is_training());

    let miss = annotator
        .session_mut()
        .place_marker(BodyPart::HeadTop, Coordinate::new(0.9, 0.9));
    assert_eq!(miss, PlaceOutcome::OffTarget { part: BodyPart::HeadTop });
    place_all(&mut annotator);
    annotator.confirm().unwrap();
    assert_eq!(annotator.session().phase(), SessionPhase::TrainingComplete);
    assert!(annotator.finish().unwrap().is_none());

    let scratch = CsvDatastore::open_existing(cfg.training_annotations_path()).unwrap();
    assert_eq!(scratch.records().unwrap().len(), 1);
    assert!(!cfg.annotations_path().exists());

    annotator.skip_training().unwrap();
    assert!(!annotator.session().is_training());
    assert_eq!(annotator.session().images().len(), 1);
    assert!(cfg.annotations_path().exists());

    let err = annotator.skip_training().unwrap_err();
    assert!(matches!(err, AnnotationError::NotTraining));
}

#[test]
fn training_without_material_starts_live() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path());
    write_images(cfg.image_dir(), &["only.png"]);

    let annotator = Annotator::start(cfg, fixed_clock(), true).unwrap();
    assert!(!annotator.session().is_training());
}

#[test]
fn zero_byte_table_starts_from_the_first_image() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path());
    write_images(cfg.image_dir(), &["0.png", "1.png"]);
    fs::write(cfg.annotations_path(), b"").unwrap();

    let annotator = Annotator::live(cfg.clone(), fixed_clock()).unwrap();
    assert_eq!(annotator.session().image_index(), 0);
    assert_eq!(annotator.session().start_index(), 0);
    assert!(annotator.session().records().is_empty());
    assert_eq!(fs::read_dir(cfg.backup_dir()).unwrap().count(), 1);
}

#[test]
fn corrupt_table_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path());
    write_images(cfg.image_dir(), &["x.png"]);

    let mut header = vec!["index".to_owned(), "file".to_owned()];
    header.extend(BodyPart::ALL.iter().map(|p| p.column_name().to_owned()));
    header.push("done".to_owned());
    let mut row = vec!["0".to_owned(), "x.png".to_owned()];
    row.extend(std::iter::repeat_n("not-a-tuple".to_owned(), BodyPart::ALL.len()));
    row.push("True".to_owned());
    fs::write(
        cfg.annotations_path(),
        format!("{}\n{}\n", header.join(","), row.join(",")),
    )
    .unwrap();

    let err = Annotator::live(cfg, fixed_clock()).err().unwrap();
    assert!(matches!(err, AnnotationError::Storage(_)));
}
