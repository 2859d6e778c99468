//! Metric type catalog.
//!
//! The filter form carries a small integer selection while requests and
//! fetched rows carry the type as a string. This module holds the one
//! conversion between the two and the display mapping used by the UI.

use serde::{Deserialize, Serialize};

/// Metric type as selected in the filter form (`0..=4`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum MetricTypeSelection {
    /// No type filter.
    #[default]
    Unknown,
    Counter,
    Gauge,
    Histogram,
    Summary,
}

impl MetricTypeSelection {
    pub const ALL: [MetricTypeSelection; 5] = [
        MetricTypeSelection::Unknown,
        MetricTypeSelection::Counter,
        MetricTypeSelection::Gauge,
        MetricTypeSelection::Histogram,
        MetricTypeSelection::Summary,
    ];

    /// Total conversion from a form code. Out-of-range codes mean no filter.
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => Self::Counter,
            2 => Self::Gauge,
            3 => Self::Histogram,
            4 => Self::Summary,
            _ => Self::Unknown,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::Counter => 1,
            Self::Gauge => 2,
            Self::Histogram => 3,
            Self::Summary => 4,
        }
    }

    /// The `type` value sent to the backend; `None` for Unknown.
    pub fn as_type_str(self) -> Option<&'static str> {
        match self {
            Self::Unknown => None,
            Self::Counter => Some("counter"),
            Self::Gauge => Some("gauge"),
            Self::Histogram => Some("histogram"),
            Self::Summary => Some("summary"),
        }
    }

    /// Inverse of [`as_type_str`](Self::as_type_str), case-insensitive.
    pub fn from_type_str(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "counter" => Self::Counter,
            "gauge" => Self::Gauge,
            "histogram" => Self::Histogram,
            "summary" => Self::Summary,
            _ => Self::Unknown,
        }
    }

    pub fn color(self) -> TagColor {
        match self {
            Self::Unknown => TagColor::Default,
            Self::Counter => TagColor::Green,
            Self::Gauge => TagColor::Blue,
            Self::Histogram => TagColor::Purple,
            Self::Summary => TagColor::Orange,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Counter => "Counter",
            Self::Gauge => "Gauge",
            Self::Histogram => "Histogram",
            Self::Summary => "Summary",
        }
    }
}

impl From<u8> for MetricTypeSelection {
    fn from(code: u8) -> Self {
        Self::from_code(code)
    }
}

impl From<MetricTypeSelection> for u8 {
    fn from(selection: MetricTypeSelection) -> Self {
        selection.code()
    }
}

/// Color family of a type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagColor {
    Green,
    Blue,
    Purple,
    Orange,
    Default,
}

impl TagColor {
    pub fn name(self) -> &'static str {
        match self {
            TagColor::Green => "green",
            TagColor::Blue => "blue",
            TagColor::Purple => "purple",
            TagColor::Orange => "orange",
            TagColor::Default => "default",
        }
    }
}

/// Color and text for rendering a metric type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeBadge {
    pub color: TagColor,
    pub text: String,
}

/// Display badge for a row's type string. Unrecognized strings keep
/// their own text with the neutral color; absent types read "unknown".
pub fn type_badge(metric_type: Option<&str>) -> TypeBadge {
    match metric_type.filter(|t| !t.trim().is_empty()) {
        None => TypeBadge {
            color: TagColor::Default,
            text: "unknown".to_string(),
        },
        Some(raw) => TypeBadge {
            color: MetricTypeSelection::from_type_str(raw).color(),
            text: raw.to_string(),
        },
    }
}
