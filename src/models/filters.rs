use super::enums::CaseStatus;

/// Organ-type query value the dashboard sends for "no filter".
pub const ALL_ORGAN_TYPES: &str = "All Organ Types";

/// Normalize an organ-type query value. Missing, blank and `"All Organ Types"`
/// all mean "no filter".
pub fn organ_type_filter(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty() && *s != ALL_ORGAN_TYPES)
        .map(str::to_string)
}

#[derive(Debug, Default, Clone)]
pub struct TransplantCaseFilter {
    pub organ_type: Option<String>,
    pub status: Option<CaseStatus>,
}

#[derive(Debug, Default, Clone)]
pub struct MonitoringFilter {
    pub organ_type: Option<String>,
}

/// 1-based page request. Construct through `PageRequest::new`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    pub const DEFAULT_PAGE: u32 = 1;
    pub const DEFAULT_LIMIT: u32 = 10;
    pub const MAX_LIMIT: u32 = 100;

    /// Returns `None` unless `page >= 1` and `limit >= 1`. Oversized limits are capped.
    pub fn new(page: u32, limit: u32) -> Option<Self> {
        if page == 0 || limit == 0 {
            return None;
        }
        Some(Self {
            page,
            limit: limit.min(Self::MAX_LIMIT),
        })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    /// `ceil(total / limit)`
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.limit))
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: Self::DEFAULT_PAGE,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

/// Trailing window for monitoring trends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeRange {
    #[default]
    Last30Days,
    Last90Days,
    Last6Months,
    LastYear,
}

impl TimeRange {
    /// Unknown or missing labels fall back to 30 days.
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(str::trim) {
            Some("Last 90 Days") => Self::Last90Days,
            Some("Last 6 Months") => Self::Last6Months,
            Some("Last Year") => Self::LastYear,
            _ => Self::Last30Days,
        }
    }

    pub fn days(&self) -> i64 {
        match self {
            Self::Last30Days => 30,
            Self::Last90Days => 90,
            Self::Last6Months => 180,
            Self::LastYear => 365,
        }
    }
}
