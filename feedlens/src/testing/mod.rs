//! Testing utilities for extraction and scheduling.
//!
//! This module provides:
//! - Stub extractors and analyzers
//! - A scripted page host with controllable change subscriptions
//! - Synthetic page fixtures
//! - Assertions over extracted items

mod assertions;
mod fixtures;
mod mocks;

pub use assertions::{assert_items_well_formed, assert_min_confidence, assert_titles};
pub use fixtures::{amazon_search_page, padded_title, page_html, ResultListFixture};
pub use mocks::{ChangeHandle, FixedAnalyzer, ScriptedHost, StubExtractor};
