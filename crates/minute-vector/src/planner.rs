//! Retrieval strategy planner: maps a raw query to `{k, filter}`.
//!
//! Pure and deterministic. A meeting identifier in the query pins retrieval
//! to that meeting; "comprehensive" vocabulary widens the result count.

use std::sync::LazyLock;

use regex::Regex;

use minute_core::config::RetrievalConfig;
use minute_core::types::{MetadataFilter, RetrievalPlan};

/// Meeting identifiers are `meeting_` followed by exactly 8 lowercase hex
/// characters; ids are lowercase by construction so the match is literal.
static MEETING_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"meeting_[0-9a-f]{8}").expect("Invalid meeting id regex"));

/// Queries containing any of these (case-insensitive) ask for broad context.
const COMPREHENSIVE_KEYWORDS: &[&str] = &[
    "summarize",
    "summary",
    "all",
    "entire",
    "complete",
    "overview",
    "everything",
    "full",
];

/// Choose retrieval parameters for a query.
///
/// Decision table, first match wins:
/// 1. meeting id present AND comprehensive -> every chunk of that meeting;
/// 2. comprehensive -> wide unfiltered retrieval;
/// 3. otherwise -> focused semantic search.
pub fn plan(query: &str, config: &RetrievalConfig) -> RetrievalPlan {
    let meeting_id = MEETING_ID_RE.find(query).map(|m| m.as_str().to_string());

    let lowered = query.to_lowercase();
    let comprehensive = COMPREHENSIVE_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword));

    match (meeting_id, comprehensive) {
        (Some(id), true) => RetrievalPlan {
            k: config.full_meeting_k,
            filter: Some(MetadataFilter::meeting(&id)),
        },
        (_, true) => RetrievalPlan {
            k: config.comprehensive_k,
            filter: None,
        },
        _ => RetrievalPlan {
            k: config.focused_k,
            filter: None,
        },
    }
}
