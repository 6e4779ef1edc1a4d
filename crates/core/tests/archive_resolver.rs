mod common;

use classpool_api::{ClassKind, ClassName, ResolutionResult, Resolver, ResolverError};
use classpool_core::ArchiveResolver;
use common::{ClassBytes, CountingDecoder, TrackingOpener, write_jar};
use std::sync::Arc;

#[test]
fn test_decodes_class_structure_from_jar() {
    let temp = tempfile::tempdir().unwrap();
    let jar = temp.path().join("lib.jar");
    write_jar(
        &jar,
        &[
            (
                "com/x/Service.class",
                ClassBytes::new("com/x/Service")
                    .interface()
                    .method("call", "(Ljava/lang/String;I)Ljava/util/List;")
                    .build(),
            ),
            (
                "com/x/Impl.class",
                ClassBytes::new("com/x/Impl")
                    .extends("com/x/Base")
                    .implements("com/x/Service")
                    .field("count", "J")
                    .method("call", "(Ljava/lang/String;I)Ljava/util/List;")
                    .build(),
            ),
            ("META-INF/MANIFEST.MF", b"Manifest-Version: 1.0\n".to_vec()),
        ],
    );

    let resolver = ArchiveResolver::open(&jar).unwrap();
    assert_eq!(resolver.class_count(), 2);

    let service = resolver
        .resolve(&ClassName::new("com.x.Service"))
        .into_definition()
        .unwrap();
    assert_eq!(service.kind, ClassKind::Interface);
    assert!(service.is_interface());

    let imp = resolver
        .resolve(&ClassName::new("com/x/Impl"))
        .into_definition()
        .unwrap();
    assert_eq!(imp.super_name, Some(ClassName::new("com.x.Base")));
    assert_eq!(imp.interfaces, vec![ClassName::new("com.x.Service")]);

    let method = imp
        .method("call", "(Ljava/lang/String;I)Ljava/util/List;")
        .unwrap();
    assert_eq!(
        method.parameter_types,
        vec!["java.lang.String".to_string(), "int".to_string()]
    );
    assert_eq!(method.return_type, "java.util.List");
    assert!(method.modifiers.contains(&"abstract".to_string()));

    let field = imp.field("count").unwrap();
    assert_eq!(field.type_name, "long");
    assert_eq!(field.descriptor, "J");
}

#[test]
fn test_corrupt_entry_is_invalid_and_siblings_still_resolve() {
    let temp = tempfile::tempdir().unwrap();
    let jar = temp.path().join("mixed.jar");
    write_jar(
        &jar,
        &[
            ("com/x/Broken.class", vec![0xCA, 0xFE, 0xBA, 0xBE, 0x00]),
            ("com/x/Good.class", ClassBytes::new("com/x/Good").build()),
        ],
    );

    let resolver = ArchiveResolver::open(&jar).unwrap();

    let broken = resolver.resolve(&ClassName::new("com.x.Broken"));
    assert!(broken.is_invalid());
    assert!(!broken.is_not_found());
    assert!(resolver.resolve(&ClassName::new("com.x.Good")).is_found());
}

#[test]
fn test_open_errors_are_typed() {
    let temp = tempfile::tempdir().unwrap();

    let missing = ArchiveResolver::open(&temp.path().join("absent.jar"))
        .err()
        .unwrap();
    assert!(matches!(missing, ResolverError::Io { .. }));

    let text = temp.path().join("notes.jar");
    std::fs::write(&text, "plain text").unwrap();
    let not_zip = ArchiveResolver::open(&text).err().unwrap();
    assert!(matches!(not_zip, ResolverError::Archive { .. }));
}

#[test]
fn test_repeat_lookups_hit_the_cache() {
    let temp = tempfile::tempdir().unwrap();
    let jar = temp.path().join("lib.jar");
    write_jar(&jar, &[("com/x/A.class", ClassBytes::new("com/x/A").build())]);

    let decoder = Arc::new(CountingDecoder::default());
    let resolver = ArchiveResolver::open_with(&jar, &TrackingOpener::default(), decoder.clone())
        .unwrap();
    let name = ClassName::new("com.x.A");

    let first = resolver.resolve(&name);
    let second = resolver.resolve(&name);
    let missing = resolver.resolve(&ClassName::new("com.x.Missing"));

    assert_eq!(first, second);
    assert!(Arc::ptr_eq(
        first.definition().unwrap(),
        second.definition().unwrap()
    ));
    assert!(missing.is_not_found());
    assert_eq!(decoder.calls(), 1);
}

#[test]
fn test_release_twice_closes_once() {
    let temp = tempfile::tempdir().unwrap();
    let jar = temp.path().join("lib.jar");
    write_jar(&jar, &[("com/x/A.class", ClassBytes::new("com/x/A").build())]);

    let opener = TrackingOpener::default();
    let resolver =
        ArchiveResolver::open_with(&jar, &opener, Arc::new(CountingDecoder::default())).unwrap();

    resolver.release().unwrap();
    resolver.release().unwrap();
    drop(resolver);

    assert_eq!(opener.close_count(&jar), 1);
}

#[test]
fn test_drop_closes_the_archive() {
    let temp = tempfile::tempdir().unwrap();
    let jar = temp.path().join("lib.jar");
    write_jar(&jar, &[("com/x/A.class", ClassBytes::new("com/x/A").build())]);

    let opener = TrackingOpener::default();
    {
        let resolver =
            ArchiveResolver::open_with(&jar, &opener, Arc::new(CountingDecoder::default()))
                .unwrap();
        assert!(resolver.contains(&ClassName::new("com.x.A")));
    }

    assert_eq!(opener.close_count(&jar), 1);
}

#[test]
fn test_entries_must_declare_their_own_class() {
    let temp = tempfile::tempdir().unwrap();
    let jar = temp.path().join("multi.jar");
    write_jar(
        &jar,
        &[
            ("com/x/A.class", ClassBytes::new("com/x/A").build()),
            (
                "META-INF/versions/11/com/x/A.class",
                ClassBytes::new("com/x/A").method("java11", "()V").build(),
            ),
            ("com/x/Wrong.class", ClassBytes::new("com/x/Other").build()),
        ],
    );

    let resolver = ArchiveResolver::open(&jar).unwrap();

    let names: Vec<String> = resolver.all_names().map(|n| n.to_string()).collect();
    assert_eq!(names, vec!["com.x.A", "com.x.Wrong"]);
    assert_eq!(
        resolver.package_names().into_iter().collect::<Vec<_>>(),
        vec!["com.x".to_string()]
    );

    let a = resolver
        .resolve(&ClassName::new("com.x.A"))
        .into_definition()
        .unwrap();
    assert!(a.method("java11", "()V").is_none());

    match resolver.resolve(&ClassName::new("com.x.Wrong")) {
        ResolutionResult::Invalid(invalid) => {
            assert_eq!(invalid.class_name, ClassName::new("com.x.Wrong"));
            assert!(invalid.message.contains("com.x.Other"));
        }
        other => panic!("expected an invalid class, got {other:?}"),
    }
}
