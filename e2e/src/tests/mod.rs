//! Test registry - all test cases are registered here

pub mod basic;
pub mod helpers;

use crate::runner::TestCase;

/// Build and return all test cases
///
/// Tests are grouped by category. Each test:
/// 1. Queues a mock upstream response (what the generative-language API would return)
/// 2. Sends a request to the REAL proxy
/// 3. Validates the response
pub fn all_tests() -> Vec<TestCase> {
    macro_rules! test {
        ($name:expr, $desc:expr, $func:path) => {
            TestCase {
                name: $name,
                description: $desc,
                run: Box::new(|ctx| Box::pin($func(ctx))),
            }
        };
    }

    vec![
        // ── Basic behavior ────────────────────────────────────────────────────
        test!(
            "basic/success_relays_body_verbatim",
            "Successful responses relay byte-for-byte",
            basic::test_success_relays_body_verbatim
        ),
        test!(
            "basic/payload_carries_persona_prefix",
            "Upstream payload starts with the two persona turns",
            basic::test_payload_carries_persona_prefix
        ),
        test!(
            "basic/api_key_in_query_string",
            "Configured API key travels as the key query parameter",
            basic::test_api_key_sent_in_query_string
        ),
        test!(
            "basic/empty_history_prefix_only",
            "Empty history is valid and sends only the persona prefix",
            basic::test_empty_history_sends_prefix_only
        ),
        // ── Error mapping ─────────────────────────────────────────────────────
        test!(
            "errors/wrong_method_405",
            "Non-POST methods get 405 and never reach the upstream",
            errors::test_wrong_method_is_405_no_upstream_call
        ),
        test!(
            "errors/malformed_body_400",
            "Malformed JSON bodies get 400 with a message field",
            errors::test_malformed_body_is_400
        ),
        test!(
            "errors/missing_history_400",
            "Bodies without a history field get 400",
            errors::test_missing_history_is_400
        ),
        test!(
            "errors/upstream_429_passthrough",
            "Upstream 429s relay status and body unchanged",
            errors::test_upstream_error_passes_through
        ),
        test!(
            "errors/upstream_500_passthrough",
            "Upstream 500s relay status and body unchanged",
            errors::test_upstream_500_passes_through
        ),
    ]
}
