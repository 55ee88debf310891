use proptest::prelude::*;

/// Strategy for SQL-ish query text with mixed case and surrounding whitespace
pub fn query_text_strategy() -> impl Strategy<Value = String> {
    ("[ \t\n]{0,3}", "[a-zA-Z0-9_*,=() ]{1,40}", "[ \t\n]{0,3}")
        .prop_map(|(lead, body, trail)| format!("{lead}{body}{trail}"))
}

/// Strategy for one recorded attempt: (cached, time_ms, success)
pub fn attempt_strategy() -> impl Strategy<Value = (bool, f64, bool)> {
    (any::<bool>(), 0.0f64..10_000.0, any::<bool>())
}
