//! Handler for the regional report.

use axum::{Json, extract::State};

use crate::api::dto::stats::{RegionStatsItem, StatsResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Returns the country count and population total of every region.
///
/// # Endpoint
///
/// `GET /stats`
///
/// # Response
///
/// ```json
/// {
///   "regions": [
///     { "name": "Americas", "number_countries": 0, "total_population": null },
///     { "name": "Europe", "number_countries": 2, "total_population": 151126537 }
///   ]
/// }
/// ```
///
/// # Errors
///
/// Returns 500 Internal Server Error on database errors.
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let regions = state.report_service.region_report().await?;

    Ok(Json(StatsResponse {
        regions: regions.into_iter().map(RegionStatsItem::from).collect(),
    }))
}
