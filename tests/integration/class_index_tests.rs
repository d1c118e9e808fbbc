//! Integration tests for the class index
//!
//! Classes are written to real directories and jars, then looked up again.

mod support;

use depusage::discovery::{Artifact, ArtifactReader};
use depusage::graph::{ArtifactId, ClassIndex, ClassName, DuplicateClassPolicy, IndexError};
use std::collections::BTreeSet;
use support::{write_class_dir, write_jar, ClassWriter};
use tempfile::TempDir;

fn names(classes: &[&str]) -> BTreeSet<ClassName> {
    classes.iter().map(|c| ClassName::from_internal(c)).collect()
}

#[test]
fn test_index_round_trip() {
    let temp = TempDir::new().unwrap();

    let dir_classes = ["com/app/Main", "com/app/ui/Screen", "com/app/ui/Screen$Adapter"];
    let jar_classes = ["okhttp3/OkHttpClient", "okhttp3/Request", "okhttp3/Request$Builder"];

    let dir = write_class_dir(
        &temp.path().join("classes"),
        &dir_classes.map(ClassWriter::new),
    );
    let jar = write_jar(
        &temp.path().join("libs/okhttp.jar"),
        &jar_classes.map(ClassWriter::new),
        &[("META-INF/MANIFEST.MF", b"Manifest-Version: 1.0\n")],
    );

    let artifacts = vec![Artifact::new("project", &dir), Artifact::new("okhttp", &jar)];
    let index = ClassIndex::build(&artifacts).unwrap();

    assert_eq!(index.len(), 6);
    for class in dir_classes {
        assert_eq!(
            index.find_owner(&ClassName::from_internal(class)),
            Some(&ArtifactId::from("project"))
        );
    }
    for class in jar_classes {
        assert_eq!(
            index.find_owner(&ClassName::from_internal(class)),
            Some(&ArtifactId::from("okhttp"))
        );
    }

    assert_eq!(
        index.classes_in_artifact(&ArtifactId::from("project")).unwrap(),
        &names(&dir_classes)
    );
    assert_eq!(
        index.classes_in_artifact(&ArtifactId::from("okhttp")).unwrap(),
        &names(&jar_classes)
    );
    assert_eq!(
        index.public_classes_in_artifact(&ArtifactId::from("okhttp")).unwrap(),
        names(&["okhttp3/OkHttpClient", "okhttp3/Request"])
    );
}

#[test]
fn test_platform_classes_have_no_owner() {
    let temp = TempDir::new().unwrap();
    let dir = write_class_dir(temp.path(), &[ClassWriter::new("com/app/Main")]);

    let index = ClassIndex::build(&[Artifact::new("project", &dir)]).unwrap();

    assert_eq!(index.find_owner(&ClassName::from_internal("java/lang/Object")), None);
    assert!(matches!(
        index.classes_in_artifact(&ArtifactId::from("unknown")),
        Err(IndexError::UnknownArtifact(_))
    ));
}

#[test]
fn test_empty_artifact_is_known() {
    let temp = TempDir::new().unwrap();
    let jar = write_jar(&temp.path().join("empty.jar"), &[], &[("README.txt", b"empty")]);

    let index = ClassIndex::build(&[Artifact::new("empty", &jar)]).unwrap();

    assert!(index.is_empty());
    assert!(index
        .classes_in_artifact(&ArtifactId::from("empty"))
        .unwrap()
        .is_empty());
}

#[test]
fn test_duplicate_classes() {
    let temp = TempDir::new().unwrap();
    let first = write_jar(
        &temp.path().join("guava.jar"),
        &[ClassWriter::new("com/google/common/base/Optional")],
        &[],
    );
    let second = write_jar(
        &temp.path().join("guava-android.jar"),
        &[ClassWriter::new("com/google/common/base/Optional")],
        &[],
    );
    let artifacts = vec![Artifact::new("guava", &first), Artifact::new("guava-android", &second)];
    let optional = ClassName::from_internal("com/google/common/base/Optional");
    let reader = ArtifactReader::new();

    let err = ClassIndex::build(&artifacts).unwrap_err();
    match err {
        IndexError::DuplicateClass { class, first, second } => {
            assert_eq!(class, optional);
            assert_eq!(first, ArtifactId::from("guava"));
            assert_eq!(second, ArtifactId::from("guava-android"));
        }
        other => panic!("unexpected error: {}", other),
    }

    let first_wins = ClassIndex::build_with(&artifacts, &reader, DuplicateClassPolicy::FirstWins).unwrap();
    assert_eq!(first_wins.find_owner(&optional), Some(&ArtifactId::from("guava")));

    let last_wins = ClassIndex::build_with(&artifacts, &reader, DuplicateClassPolicy::LastWins).unwrap();
    assert_eq!(last_wins.find_owner(&optional), Some(&ArtifactId::from("guava-android")));
    assert!(last_wins
        .classes_in_artifact(&ArtifactId::from("guava"))
        .unwrap()
        .is_empty());
}

#[test]
fn test_excluded_entries_are_not_indexed() {
    let temp = TempDir::new().unwrap();
    let dir = write_class_dir(
        temp.path(),
        &[
            ClassWriter::new("com/app/Main"),
            ClassWriter::new("com/app/BuildConfig"),
            ClassWriter::new("module-info"),
        ],
    );
    let reader = ArtifactReader::new().with_excludes(vec!["**/BuildConfig.class".to_string()]);

    let index = ClassIndex::build_with(
        &[Artifact::new("project", &dir)],
        &reader,
        DuplicateClassPolicy::Fail,
    )
    .unwrap();

    assert_eq!(
        index.classes().cloned().collect::<BTreeSet<_>>(),
        names(&["com/app/Main"])
    );
}

#[test]
fn test_missing_artifact_fails() {
    let temp = TempDir::new().unwrap();
    let missing = Artifact::new("missing", temp.path().join("nope.jar"));

    assert!(matches!(
        ClassIndex::build(&[missing]),
        Err(IndexError::Discovery(_))
    ));
}
