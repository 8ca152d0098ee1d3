use serde::{Deserialize, Serialize};

/// Visual encoding variant for a chart.
///
/// Serialized names match the persisted-config and query-string spelling
/// (`type=WorldMap`), so no rename attributes are needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChartType {
    #[default]
    LineChart,
    StackedArea,
    StackedBar,
    DiscreteBar,
    SlopeChart,
    WorldMap,
}

pub const ALL_CHART_TYPES: [ChartType; 6] = [
    ChartType::LineChart,
    ChartType::StackedArea,
    ChartType::StackedBar,
    ChartType::DiscreteBar,
    ChartType::SlopeChart,
    ChartType::WorldMap,
];

impl ChartType {
    /// Parses the external spelling. Unknown names yield `None`; callers
    /// treat that as a no-op rather than an error.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "LineChart" => Some(Self::LineChart),
            "StackedArea" => Some(Self::StackedArea),
            "StackedBar" => Some(Self::StackedBar),
            "DiscreteBar" => Some(Self::DiscreteBar),
            "SlopeChart" => Some(Self::SlopeChart),
            "WorldMap" => Some(Self::WorldMap),
            _ => None,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::LineChart => "LineChart",
            Self::StackedArea => "StackedArea",
            Self::StackedBar => "StackedBar",
            Self::DiscreteBar => "DiscreteBar",
            Self::SlopeChart => "SlopeChart",
            Self::WorldMap => "WorldMap",
        }
    }

    /// Human-facing label used by chart-type pickers and export captions.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::LineChart => "Line",
            Self::StackedArea => "Stacked area",
            Self::StackedBar => "Stacked bar",
            Self::DiscreteBar => "Bar",
            Self::SlopeChart => "Slope",
            Self::WorldMap => "Map",
        }
    }
}
