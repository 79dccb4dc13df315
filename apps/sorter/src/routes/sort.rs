use std::cmp::Ordering;
use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::{AppError, SortError};
use crate::sorter::{CollectingNarrator, ProcrastinationResult, Procrastinator, SortOverrides};
use crate::state::AppState;

/// Upper bound on request size. The sorter is quadratic and naps a lot.
const MAX_VALUES: usize = 1_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    fn compare(self, a: &f64, b: &f64) -> Result<Ordering, SortError> {
        let (left, right) = match self {
            SortOrder::Ascending => (a, b),
            SortOrder::Descending => (b, a),
        };
        left.partial_cmp(right)
            .ok_or_else(|| SortError::Incomparable(format!("{a} and {b} have no ordering")))
    }
}

/// Request body for POST /api/v1/sort.
#[derive(Debug, Clone, Deserialize)]
pub struct SortRequest {
    pub values: Vec<f64>,
    #[serde(default)]
    pub order: Option<SortOrder>,
    #[serde(flatten)]
    pub options: SortOverrides,
}

#[derive(Debug, Clone, Serialize)]
pub struct SortResponse {
    pub run_id: Uuid,
    #[serde(flatten)]
    pub result: ProcrastinationResult<f64>,
    /// Narration lines, present only for verbose runs.
    pub narration: Option<Vec<String>>,
}

/// POST /api/v1/sort
/// Runs one procrastinating sort over the submitted numbers. Responds when the
/// sorter finally gets around to finishing.
pub async fn handle_sort(
    State(state): State<AppState>,
    Json(request): Json<SortRequest>,
) -> Result<Json<SortResponse>, AppError> {
    if request.values.len() > MAX_VALUES {
        return Err(AppError::Validation(format!(
            "At most {MAX_VALUES} values can be sorted per request, got {}",
            request.values.len()
        )));
    }

    let options = state.resolve_options(&request.options);
    let order = request.order.unwrap_or_default();
    let run_id = Uuid::new_v4();
    info!(
        "Sort run {run_id}: {} values, {:?}, p={}",
        request.values.len(),
        order,
        options.procrastination_probability
    );

    let narrator = Arc::new(CollectingNarrator::new());
    let mut sorter = Procrastinator::system().with_narrator(narrator.clone());
    let result = sorter
        .try_sort_by(request.values, &options, move |a, b| order.compare(a, b))
        .await?;

    let narration = options.verbose.then(|| narrator.lines());

    Ok(Json(SortResponse {
        run_id,
        result,
        narration,
    }))
}
