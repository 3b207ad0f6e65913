use std::sync::LazyLock;

use regex::Regex;

/// Filing and statement vocabulary. Checked before [`MARKET_KEYWORDS`].
pub const FINANCIAL_KEYWORDS: &[&str] = &[
	"10-k",
	"10-q",
	"annual report",
	"quarterly report",
	"earnings",
	"revenue",
	"net income",
	"profit",
	"margin",
	"eps",
	"balance sheet",
	"cash flow",
	"dividend",
	"guidance",
	"filing",
	"debt",
	"liabilities",
	"assets",
];
pub const MARKET_KEYWORDS: &[&str] = &[
	"sentiment",
	"market",
	"inflation",
	"interest rate",
	"fed",
	"nasdaq",
	"s&p",
	"dow jones",
	"crypto",
	"bitcoin",
	"rally",
	"sell-off",
	"bullish",
	"bearish",
	"recession",
];

static YEAR_PATTERN: LazyLock<Option<Regex>> =
	LazyLock::new(|| Regex::new(r"20[0-9][0-9]").ok());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
	Financial,
	Market,
	General,
}
impl Category {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Financial => "financial",
			Self::Market => "market",
			Self::General => "general",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Intent {
	pub category: Category,
	pub year: Option<i32>,
}

/// Keyword matching is a plain substring test on the lower-cased question, so short
/// keywords also hit inside longer words ("eps" in "steps").
pub fn classify(question: &str) -> Intent {
	let lowered = question.to_lowercase();
	let year = extract_year(&lowered);
	let category = if contains_any(&lowered, FINANCIAL_KEYWORDS) {
		Category::Financial
	} else if contains_any(&lowered, MARKET_KEYWORDS) {
		Category::Market
	} else {
		Category::General
	};

	Intent { category, year }
}

fn extract_year(text: &str) -> Option<i32> {
	let pattern = YEAR_PATTERN.as_ref()?;

	pattern.find(text).and_then(|found| found.as_str().parse().ok())
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
	keywords.iter().any(|keyword| text.contains(keyword))
}
