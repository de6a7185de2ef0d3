//! Shared constants for end-to-end tests
//!
//! When test data changes (user credentials, canned replies, etc.),
//! update only this file.

// ============================================================================
// Test User Credentials
// ============================================================================

/// Display name of the pre-registered test user
pub const TEST_USERNAME: &str = "testuser";

/// Email of the pre-registered test user
pub const TEST_EMAIL: &str = "testuser@example.com";

/// Password of the pre-registered test user
pub const TEST_PASS: &str = "testpass123";

// ============================================================================
// Canned Model Replies
// ============================================================================

/// Classification reply used unless a test asks for another one
pub const HAPPY_ENGLISH_REPLY: &str =
    r#"Sure! {"mood": "happy", "preference": "stay", "language": "english"}"#;

/// Classification reply naming a sad mood in Hindi
pub const SAD_HINDI_REPLY: &str = r#"{"mood": "sad", "preference": "uplift", "language": "hindi"}"#;

/// Reply the fake model gives to chatbot questions
pub const CHAT_ANSWER: &str = "1. Breathe slowly.\n2. Drink water.";

/// Reply the fake model gives to solution requests
pub const SOLUTION_ANSWER: &str = "Try a short walk and some calm music.";

// ============================================================================
// Fake Catalog
// ============================================================================

/// Number of tracks the fake catalog holds for every query
pub const FAKE_CATALOG_SIZE: usize = 45;

// ============================================================================
// Test Timeouts and Configuration
// ============================================================================

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server ready (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;
