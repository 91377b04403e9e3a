// src/constants.rs
//! Domain constants that define the operational boundaries of the exporter.
//!
//! Reading these top to bottom tells you how the exporter behaves towards
//! the API (how much it asks for, how long it waits) and how far it goes
//! when rendering.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Notion API boundaries
// ---------------------------------------------------------------------------

/// API version sent with every request. Database rows are read through
/// data sources, which only exist from this version on.
pub const NOTION_API_VERSION: &str = "2025-09-03";

pub const NOTION_API_BASE_URL: &str = "https://api.notion.com/v1";

/// Base used to resolve relative links such as `/0f3a…` found in rich text.
pub const NOTION_WEB_BASE_URL: &str = "https://www.notion.so/";

/// How many objects the Notion API returns per page of results, at most.
///
/// Also the size used when the caller asks for "the default" (zero).
pub const NOTION_API_PAGE_SIZE: u32 = 100;

/// Per-request timeout for the HTTP client.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

// ---------------------------------------------------------------------------
// Retry boundaries
// ---------------------------------------------------------------------------

/// Retries after the first attempt; a call is made at most this + 1 times.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Delay before the first retry. Doubles with every further attempt.
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(1_000);

/// No single backoff sleep exceeds this, whatever the attempt count.
pub const MAX_BACKOFF_DELAY: Duration = Duration::from_secs(30);

/// Jitter is drawn uniformly from `[0, JITTER_FRACTION * delay)`.
pub const JITTER_FRACTION: f64 = 0.3;

/// Exponent clamp for `2^attempt`. Far past the point where the ceiling wins.
pub const MAX_BACKOFF_EXPONENT: u32 = 32;

// ---------------------------------------------------------------------------
// Rendering boundaries
// ---------------------------------------------------------------------------

/// Maximum nesting depth when recursively rendering blocks.
///
/// Prevents runaway recursion through deeply nested toggles, lists or
/// synced content.
pub const BLOCK_MAX_RENDER_DEPTH: usize = 100;

/// Indentation for nested list and toggle content. Four spaces is what
/// pandoc needs to attach a nested block to its list item.
pub const NESTED_INDENT: &str = "    ";

/// Estimated characters per block, used to pre-allocate output strings.
pub const CHARS_PER_BLOCK_ESTIMATE: usize = 256;

/// Fallback page title when no title property carries text.
pub const UNTITLED_PAGE: &str = "Untitled";

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;
