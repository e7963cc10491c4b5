use axum::{extract::State, Json};

use lilac_onboard::BackfillReport;

use crate::{error::AppError, state::AppState};

/// POST /v1/admin/backfill-slugs
///
/// One-shot remediation for salon owners created before slug assignment
/// existed. Admin-only; run it once after deploying the onboarding worker.
pub async fn backfill_slugs(
    State(state): State<AppState>,
) -> Result<Json<BackfillReport>, AppError> {
    tracing::info!("Starting slug backfill for existing salon owners");
    let report = state.backfill.run().await?;
    Ok(Json(report))
}
