//! Integration tests for the VM configuration registry.

use bf_suite_core::{parse_tag_list, ComponentTag, SuiteError, VmConfigRegistry};

/// Test: profiles registered side by side do not share tags
#[test]
fn test_no_cross_contamination() {
    let mut registry = VmConfigRegistry::new();
    let jvm = parse_tag_list("java,nfi,sdk,tfl").unwrap();
    let native = parse_tag_list("java,nfi,sdk,tfl,cmp,svm,tflm").unwrap();

    registry.register("custom-jvm", jvm.clone(), "jvm").unwrap();
    registry
        .register("custom-native", native.clone(), "native-ce")
        .unwrap();

    assert_eq!(registry.resolve("custom-jvm").unwrap().tags, jvm);
    assert_eq!(registry.resolve("custom-native").unwrap().tags, native);
}

/// Test: extending the built-in profiles keeps registration order
#[test]
fn test_extend_builtin_profiles() {
    let mut registry = VmConfigRegistry::with_brainfck_profiles().unwrap();
    let err = registry
        .register("bf-jvm", vec![ComponentTag::Java], "jvm")
        .unwrap_err();
    assert!(matches!(err, SuiteError::DuplicateProfile(_)));

    registry
        .register(
            "bf-jvm-nfi-only",
            vec![ComponentTag::Java, ComponentTag::Nfi],
            "jvm-nfi",
        )
        .unwrap();

    let names: Vec<&str> = registry.list_profiles().collect();
    assert_eq!(names.len(), 6);
    assert_eq!(names.last(), Some(&"bf-jvm-nfi-only"));
    assert_eq!(registry.resolve("bf-jvm").unwrap().tags.len(), 4);
}

/// Test: names never registered are unknown
#[test]
fn test_unregistered_names_unknown() {
    let registry = VmConfigRegistry::with_brainfck_profiles().unwrap();
    for name in ["", "bf", "BF-JVM", "bf-jvm ", "jvm"] {
        assert!(matches!(
            registry.resolve(name),
            Err(SuiteError::UnknownProfile(_))
        ));
    }
}
