use std::collections::BTreeMap;

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{CreateWorkoutRequest, UpdateWorkoutRequest, WorkoutTypeSummary};
use super::model::Workout;
use crate::{
    auth::CurrentAccount,
    dates::DateRangeQuery,
    error::ApiError,
    extractors::{ApiJson, ApiPath, ApiQuery, MessageResponse},
    state::AppState,
    store::Stored,
};

fn newest_first(items: &mut [Stored<Workout>]) {
    items.sort_by(|a, b| b.doc.date.cmp(&a.doc.date));
}

pub fn summarize(items: &[Stored<Workout>]) -> Vec<WorkoutTypeSummary> {
    let mut by_type = BTreeMap::new();
    for w in items {
        let entry = by_type.entry(w.doc.kind).or_insert(WorkoutTypeSummary {
            kind: w.doc.kind,
            count: 0,
            total_duration: 0.0,
            total_calories: 0.0,
        });
        entry.count += 1;
        entry.total_duration += w.doc.duration;
        entry.total_calories += w.doc.calories_burned.unwrap_or(0.0);
    }
    by_type.into_values().collect()
}

#[instrument(skip(state, account))]
pub async fn list_workouts(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
) -> Result<Json<Vec<Stored<Workout>>>, ApiError> {
    let mut items = state.documents::<Workout>(account.id).list().await?;
    newest_first(&mut items);
    Ok(Json(items))
}

#[instrument(skip(state, account))]
pub async fn workouts_in_range(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    ApiQuery(range): ApiQuery<DateRangeQuery>,
) -> Result<Json<Vec<Stored<Workout>>>, ApiError> {
    let (start, end) = range.bounds()?;
    let mut items: Vec<_> = state
        .documents::<Workout>(account.id)
        .list()
        .await?
        .into_iter()
        .filter(|w| w.doc.date >= start && w.doc.date <= end)
        .collect();
    newest_first(&mut items);
    Ok(Json(items))
}

#[instrument(skip(state, account))]
pub async fn workout_summary(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
) -> Result<Json<Vec<WorkoutTypeSummary>>, ApiError> {
    let items = state.documents::<Workout>(account.id).list().await?;
    Ok(Json(summarize(&items)))
}

#[instrument(skip(state, account))]
pub async fn get_workout(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Stored<Workout>>, ApiError> {
    state
        .documents::<Workout>(account.id)
        .get(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Workout"))
}

#[instrument(skip(state, account, payload))]
pub async fn create_workout(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    ApiJson(payload): ApiJson<CreateWorkoutRequest>,
) -> Result<(StatusCode, Json<Stored<Workout>>), ApiError> {
    let workout = payload.into_workout(OffsetDateTime::now_utc())?;
    let saved = state.documents::<Workout>(account.id).insert(workout).await?;
    info!(account_id = %account.id, workout_id = %saved.id, "workout logged");
    Ok((StatusCode::CREATED, Json(saved)))
}

#[instrument(skip(state, account, payload))]
pub async fn update_workout(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateWorkoutRequest>,
) -> Result<Json<Stored<Workout>>, ApiError> {
    let workouts = state.documents::<Workout>(account.id);
    let mut current = workouts.get(id).await?.ok_or(ApiError::NotFound("Workout"))?;
    payload.apply(&mut current.doc)?;
    workouts
        .replace(id, &current.doc)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Workout"))
}

#[instrument(skip(state, account))]
pub async fn delete_workout(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !state.documents::<Workout>(account.id).delete(id).await? {
        return Err(ApiError::NotFound("Workout"));
    }
    Ok(MessageResponse::new("Workout deleted"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workouts::model::WorkoutType;
    use time::macros::datetime;

    fn stored(kind: WorkoutType, duration: f64, calories: Option<f64>) -> Stored<Workout> {
        let now = datetime!(2024-05-01 12:00 UTC);
        Stored {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            doc: Workout {
                title: "session".into(),
                exercises: vec![],
                date: now,
                duration,
                kind,
                calories_burned: calories,
                notes: None,
            },
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn summary_groups_by_type() {
        let items = vec![
            stored(WorkoutType::Cardio, 30.0, Some(300.0)),
            stored(WorkoutType::Strength, 45.0, None),
            stored(WorkoutType::Cardio, 20.0, Some(150.0)),
        ];
        let summary = summarize(&items);
        assert_eq!(summary.len(), 2);
        let cardio = summary.iter().find(|s| s.kind == WorkoutType::Cardio).unwrap();
        assert_eq!(cardio.count, 2);
        assert_eq!(cardio.total_duration, 50.0);
        assert_eq!(cardio.total_calories, 450.0);
        let strength = summary.iter().find(|s| s.kind == WorkoutType::Strength).unwrap();
        assert_eq!(strength.total_calories, 0.0);
    }

    #[test]
    fn summary_of_nothing_is_empty() {
        assert!(summarize(&[]).is_empty());
    }
}
