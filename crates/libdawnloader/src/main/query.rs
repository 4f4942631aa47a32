//! Module for the user query and its classification

/// Prefixes that mark a query as a direct locator instead of a search term
pub const LOCATOR_PREFIXES: &[&str] = &["http", "www"];
/// youtube-dl search directive that only returns the first search result
pub const FIRST_RESULT_SEARCH_DIRECTIVE: &str = "ytsearch1:";

/// A raw, non-empty user query
#[derive(Debug, Clone, PartialEq)]
pub struct Query(String);

impl Query {
	/// Create a new [`Query`], rejecting empty and whitespace-only input
	/// Non-empty input is stored unchanged
	pub fn new<I: Into<String>>(raw: I) -> Result<Self, crate::Error> {
		let raw = raw.into();

		if raw.trim().is_empty() {
			return Err(crate::Error::empty_query());
		}

		return Ok(Self(raw));
	}

	/// Get the query as a str
	pub fn as_str(&self) -> &str {
		return &self.0;
	}
}

/// A [`Query`] after deciding whether it is a direct locator or a search term
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedQuery {
	/// The query is a resource locator (like a URL), stored unchanged
	DirectLocator(String),
	/// The query is a free-text search term, stored unchanged (without the search directive)
	SearchTerm(String),
}

impl ClassifiedQuery {
	/// Get the string to hand to youtube-dl
	/// Search terms are prefixed with [`FIRST_RESULT_SEARCH_DIRECTIVE`]
	pub fn as_service_query(&self) -> String {
		return match self {
			Self::DirectLocator(v) => v.clone(),
			Self::SearchTerm(v) => format!("{FIRST_RESULT_SEARCH_DIRECTIVE}{v}"),
		};
	}
}

/// Classify a [`Query`] as either [`ClassifiedQuery::DirectLocator`] or [`ClassifiedQuery::SearchTerm`]
pub fn classify(query: &Query) -> ClassifiedQuery {
	let raw = query.as_str();

	if LOCATOR_PREFIXES.iter().any(|prefix| return raw.starts_with(prefix)) {
		return ClassifiedQuery::DirectLocator(raw.to_owned());
	}

	return ClassifiedQuery::SearchTerm(raw.to_owned());
}
