//! Custom assertion macros
//!
//! Enhanced assertions with more descriptive failure messages.

/// Assert that a string contains a substring
#[macro_export]
macro_rules! assert_contains {
    ($haystack:expr, $needle:expr) => {
        assert!(
            $haystack.contains($needle),
            "Expected '{}' to contain '{}'",
            $haystack,
            $needle
        );
    };
}

/// Assert the JSON error body produced by `BackendError`
#[macro_export]
macro_rules! assert_error_body {
    ($response:expr, $status:expr) => {{
        let body: serde_json::Value = $response.json();
        assert_eq!(body["status"], $status.as_u16(), "unexpected body: {}", body);
        assert!(body["error"].is_string(), "missing error message: {}", body);
    }};
}
