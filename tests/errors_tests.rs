use std::error::Error;

use multicloud::errors::{AdapterError, ChannelError};

#[test]
fn test_adapter_error_implements_error_trait() {
    // Verify AdapterError implements the Error trait
    fn assert_error<T: Error>(_: &T) {}

    let error = AdapterError::Connection("test error".to_string());
    assert_error(&error);
}

#[test]
fn test_adapter_error_display_matches_diagnostic_headers() {
    // These display strings are the exact x-error header values.
    let error = AdapterError::Connection("channel closed".to_string());
    assert_eq!(format!("{error}"), "Connection error: channel closed");

    let error = AdapterError::Encoding("invalid utf-8".to_string());
    assert_eq!(format!("{error}"), "Encoding error: invalid utf-8");

    let error = AdapterError::MissingKey("'kind'".to_string());
    assert_eq!(format!("{error}"), "Missing key: 'kind'");
}

#[test]
fn test_channel_faults_convert_to_connection_class() {
    let err: AdapterError = ChannelError::Connection("reset by peer".to_string()).into();
    assert!(matches!(err, AdapterError::Connection(_)));
    assert!(err.to_string().contains("reset by peer"));

    // Timeouts land in the same failure class as connectivity faults
    let err: AdapterError = ChannelError::Timeout("no data for 30s".to_string()).into();
    assert!(matches!(err, AdapterError::Connection(_)));
}

#[test]
fn test_utf8_faults_convert_to_encoding_class() {
    let utf8_err = String::from_utf8(vec![0xff, 0xfe]).unwrap_err();
    let err: AdapterError = utf8_err.into();
    assert!(matches!(err, AdapterError::Encoding(_)));
}
