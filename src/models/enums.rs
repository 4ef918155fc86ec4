use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(CaseStatus {
    PendingReview => "Pending Review",
    ReadyForSurgery => "Ready for Surgery",
    Scheduled => "Scheduled",
    InProgress => "In Progress",
    Completed => "Completed",
    Cancelled => "Cancelled",
    Rejected => "Rejected",
});

impl CaseStatus {
    /// Terminal statuses are the only ones that may carry `completed_at`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Rejected)
    }
}

str_enum!(OrganFunctionStatus {
    Excellent => "Excellent",
    Good => "Good",
    Concerning => "Concerning",
});

impl OrganFunctionStatus {
    /// `>= 90` excellent, `>= 75` good, anything lower is concerning.
    pub fn from_value(value: f64) -> Self {
        if value >= 90.0 {
            Self::Excellent
        } else if value >= 75.0 {
            Self::Good
        } else {
            Self::Concerning
        }
    }
}

str_enum!(MonitoringMetric {
    OrganFunction => "organ_function",
    ImmuneResponse => "immune_response",
    RecoveryIndex => "recovery_index",
});

impl MonitoringMetric {
    /// Column in `monitoring_data` holding this metric's daily samples.
    pub fn column(&self) -> &'static str {
        match self {
            Self::OrganFunction => "organ_function_value",
            Self::ImmuneResponse => "immune_response_value",
            Self::RecoveryIndex => "recovery_index_value",
        }
    }

    /// Fixed clinical reference shown next to each trend. Not derived from data.
    pub fn threshold(&self) -> &'static str {
        match self {
            Self::OrganFunction => "75%",
            Self::ImmuneResponse => "5.0",
            Self::RecoveryIndex => "70%",
        }
    }

    pub fn format_average(&self, average: f64) -> String {
        match self {
            Self::ImmuneResponse => format!("{average:.1}"),
            Self::OrganFunction | Self::RecoveryIndex => format!("{average:.1}%"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn case_status_round_trips_through_display_strings() {
        assert_eq!(
            CaseStatus::from_str("Pending Review").unwrap(),
            CaseStatus::PendingReview
        );
        assert_eq!(CaseStatus::ReadyForSurgery.as_str(), "Ready for Surgery");
    }

    #[test]
    fn unknown_case_status_is_invalid_enum() {
        let err = CaseStatus::from_str("pending").unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidEnum { .. }));
    }

    #[test]
    fn only_end_states_are_terminal() {
        assert!(CaseStatus::Completed.is_terminal());
        assert!(CaseStatus::Cancelled.is_terminal());
        assert!(CaseStatus::Rejected.is_terminal());
        assert!(!CaseStatus::PendingReview.is_terminal());
        assert!(!CaseStatus::ReadyForSurgery.is_terminal());
        assert!(!CaseStatus::InProgress.is_terminal());
    }

    #[test]
    fn organ_function_status_boundaries() {
        assert_eq!(OrganFunctionStatus::from_value(90.0), OrganFunctionStatus::Excellent);
        assert_eq!(OrganFunctionStatus::from_value(89.0), OrganFunctionStatus::Good);
        assert_eq!(OrganFunctionStatus::from_value(89.99), OrganFunctionStatus::Good);
        assert_eq!(OrganFunctionStatus::from_value(75.0), OrganFunctionStatus::Good);
        assert_eq!(OrganFunctionStatus::from_value(74.0), OrganFunctionStatus::Concerning);
        assert_eq!(OrganFunctionStatus::from_value(0.0), OrganFunctionStatus::Concerning);
    }

    #[test]
    fn metric_averages_are_formatted_per_kind() {
        assert_eq!(MonitoringMetric::OrganFunction.format_average(82.345), "82.3%");
        assert_eq!(MonitoringMetric::ImmuneResponse.format_average(4.0), "4.0");
        assert_eq!(MonitoringMetric::RecoveryIndex.format_average(0.0), "0.0%");
    }

    #[test]
    fn metric_thresholds_are_fixed() {
        assert_eq!(MonitoringMetric::OrganFunction.threshold(), "75%");
        assert_eq!(MonitoringMetric::ImmuneResponse.threshold(), "5.0");
        assert_eq!(MonitoringMetric::RecoveryIndex.threshold(), "70%");
    }
}
