use apiscan_core::errors::{ApiScanError, ExError, ExErrorKind};

#[test]
fn test_malformed_signature_keeps_declaration_context() {
    let err = ApiScanError::MalformedSignature {
        qualified_name: "com.acme.Widget#bad".to_string(),
        signature: "(Ljava/util/List<;)V".to_string(),
        reason: "expected type argument at offset 17".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::MalformedSignature);
    assert_eq!(ex_err.code(), "ERR_MALFORMED_SIGNATURE");
    assert_eq!(ex_err.entity_id(), Some("com.acme.Widget#bad"));
    assert!(ex_err.message().contains("offset 17"));
    assert!(ex_err.message().contains("(Ljava/util/List<;)V"));
}

#[test]
fn test_duplicate_entity_conversion() {
    let err = ApiScanError::DuplicateEntity {
        key: "com.acme.Widget#size()".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::DuplicateEntity);
    assert_eq!(ex_err.code(), "ERR_DUPLICATE_ENTITY");
    assert_eq!(ex_err.entity_id(), Some("com.acme.Widget#size()"));
}

#[test]
fn test_invalid_policy_conversion() {
    let err = ApiScanError::InvalidPolicy {
        message: "unknown variant `fatal`".to_string(),
    };
    assert!(err.to_string().contains("Invalid compatibility policy"));

    let ex_err: ExError = err.into();
    assert_eq!(ex_err.kind(), ExErrorKind::InvalidPolicy);
    assert_eq!(ex_err.message(), "unknown variant `fatal`");
}

#[test]
fn test_error_kind_code_mapping() {
    // Each kind has a stable, unique code
    let kinds = vec![
        (ExErrorKind::MalformedSignature, "ERR_MALFORMED_SIGNATURE"),
        (ExErrorKind::DuplicateEntity, "ERR_DUPLICATE_ENTITY"),
        (ExErrorKind::InvalidPolicy, "ERR_INVALID_POLICY"),
        (ExErrorKind::Serialization, "ERR_SERIALIZATION"),
        (ExErrorKind::DeterminismViolation, "ERR_DETERMINISM_VIOLATION"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}

#[test]
fn test_display_includes_context() {
    let err = ExError::new(ExErrorKind::DuplicateEntity)
        .with_op("scan_artifacts")
        .with_artifact("lib-1.0")
        .with_entity_id("com.acme.Widget")
        .with_message("collision");

    let rendered = err.to_string();
    assert_eq!(
        rendered,
        concat!(
            "[ERR_DUPLICATE_ENTITY] op=scan_artifacts artifact=lib-1.0 ",
            "entity=com.acme.Widget: collision"
        )
    );
    assert_eq!(err.op(), Some("scan_artifacts"));
    assert_eq!(err.artifact(), Some("lib-1.0"));
}

#[test]
fn test_source_chain() {
    let inner = ExError::new(ExErrorKind::MalformedSignature).with_entity_id("com.acme.Widget#bad");
    let outer = ExError::new(ExErrorKind::DeterminismViolation)
        .with_op("scan_artifacts")
        .with_source(inner);

    let source = outer.source_error().map(ExError::kind);
    assert_eq!(source, Some(ExErrorKind::MalformedSignature));
    assert!(std::error::Error::source(&outer).is_some());
}
