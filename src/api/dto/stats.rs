//! DTOs for the regional report.

use serde::Serialize;

use crate::domain::repositories::RegionStats;

/// Per-region report, ordered by region name.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub regions: Vec<RegionStatsItem>,
}

/// One region of the report.
///
/// `total_population` serializes as `null` for a region without countries.
#[derive(Debug, Serialize)]
pub struct RegionStatsItem {
    pub name: String,
    pub number_countries: i64,
    pub total_population: Option<i64>,
}

impl From<RegionStats> for RegionStatsItem {
    fn from(stats: RegionStats) -> Self {
        Self {
            name: stats.name,
            number_countries: stats.number_countries,
            total_population: stats.total_population,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_region_serializes_null_population() {
        let response = StatsResponse {
            regions: vec![RegionStats {
                name: "Polar".to_string(),
                number_countries: 0,
                total_population: None,
            }
            .into()],
        };

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "regions": [
                    { "name": "Polar", "number_countries": 0, "total_population": null }
                ]
            })
        );
    }
}
