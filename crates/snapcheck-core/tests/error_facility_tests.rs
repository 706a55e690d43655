use snapcheck_core::errors::{ExError, ExErrorKind, SnapCheckError};

#[test]
fn test_reference_write_maps_to_io() {
    let err = SnapCheckError::ReferenceWrite {
        path: "/refs/renders.1.txt".to_string(),
        message: "No space left on device".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::Io);
    assert_eq!(ex_err.code(), "ERR_IO");
    assert_eq!(ex_err.op(), Some("write_reference"));
    assert_eq!(ex_err.path(), Some("/refs/renders.1.txt"));
    assert!(ex_err.message().contains("No space left on device"));
}

#[test]
fn test_timeout_is_distinct_from_io() {
    let err = SnapCheckError::ArtifactTimeout {
        identity: "async_tests/loads.1.txt".to_string(),
        timeout_ms: 100,
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::Timeout);
    assert_ne!(ex_err.kind(), ExErrorKind::Io);
    assert_eq!(ex_err.identity(), Some("async_tests/loads.1.txt"));
    assert!(ex_err.message().contains("100ms"));
}

#[test]
fn test_invalid_record_mode_lists_tokens() {
    let ex_err: ExError = SnapCheckError::InvalidRecordMode {
        value: "ALL".to_string(),
    }
    .into();

    assert_eq!(ex_err.kind(), ExErrorKind::InvalidRecordMode);
    assert!(ex_err.message().contains("never, missing, all, failed"));
}

#[test]
fn test_serialization_and_image_errors() {
    let ser: ExError = SnapCheckError::Serialization {
        message: "key must be a string".to_string(),
    }
    .into();
    let img: ExError = SnapCheckError::ImageEncoding {
        message: "zero width".to_string(),
    }
    .into();

    assert_eq!(ser.code(), "ERR_SERIALIZATION");
    assert_eq!(img.code(), "ERR_IMAGE_CODING");
}

#[test]
fn test_error_kind_code_mapping() {
    let kinds = vec![
        (ExErrorKind::InvalidInput, "ERR_INVALID_INPUT"),
        (ExErrorKind::InvalidRecordMode, "ERR_INVALID_RECORD_MODE"),
        (ExErrorKind::Serialization, "ERR_SERIALIZATION"),
        (ExErrorKind::ImageCoding, "ERR_IMAGE_CODING"),
        (ExErrorKind::Timeout, "ERR_TIMEOUT"),
        (ExErrorKind::Io, "ERR_IO"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}
