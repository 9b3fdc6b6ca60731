use axum::extract::State;

use crate::application::error::AppError;
use crate::infra::error::InfraError;

use super::AppState;

pub async fn healthz(State(state): State<AppState>) -> Result<&'static str, AppError> {
    state
        .db
        .health_check()
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;
    Ok("ok")
}
