//! Fuzz target: token-exchange response parser
//!
//! Feeds arbitrary bytes to `parse_button_response` and verifies:
//! - No panics under arbitrary input
//! - Any accepted token is non-empty and within `MAX_TOKEN_LEN`
//!
//! cargo fuzz run fuzz_button_response

#![no_main]

use garage::app::button_token::MAX_TOKEN_LEN;
use garage::protocol::parse_button_response;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(token) = parse_button_response(data) {
        assert!(!token.as_str().is_empty());
        assert!(token.as_str().len() <= MAX_TOKEN_LEN);
    }
});
