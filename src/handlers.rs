use crate::catalog::Catalog;
use crate::errors::AppError;
use crate::export::{export_archive, export_file_name};
use crate::log_store::LogStore;
use crate::models::{
    CompletionRequest, HistoryResponse, ProofRequest, ProofTicketResponse, TaskView, TodayResponse,
};
use crate::proof::ProofTicket;
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    extract::{Path, State},
    http::header,
    response::{Html, IntoResponse, Redirect},
    Json,
};
use chrono::{Local, NaiveDate};
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;
use tracing::{info, warn};

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let date = today();
    let view = with_store(&state, move |store| Ok(to_response(store, date))).await?;
    Ok(Html(render_index(&view)))
}

pub async fn get_today(State(state): State<AppState>) -> Result<Json<TodayResponse>, AppError> {
    let date = today();
    let view = with_store(&state, move |store| Ok(to_response(store, date))).await?;
    Ok(Json(view))
}

pub async fn get_history(State(state): State<AppState>) -> Result<Json<HistoryResponse>, AppError> {
    let date = today();
    let history = with_store(&state, move |store| {
        store.ensure_day(date);
        Ok(HistoryResponse {
            max_score: store.max_score(),
            days: store.history_range_at(date),
        })
    })
    .await?;
    Ok(Json(history))
}

pub async fn get_catalog(State(state): State<AppState>) -> Json<Catalog> {
    let store = state.store.lock().await;
    Json(store.catalog().clone())
}

pub async fn set_completion(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    Json(payload): Json<CompletionRequest>,
) -> Result<Json<TodayResponse>, AppError> {
    let date = today();
    let view = with_store(&state, move |store| {
        store.ensure_day(date);
        store.set_task_completion(date, &task_id, payload.completed)?;
        Ok(to_response(store, date))
    })
    .await?;
    Ok(Json(view))
}

/// Issues the ticket a proof upload must carry. The page asks for it as
/// soon as a file is picked, before reading the file.
pub async fn begin_proof(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<ProofTicketResponse>, AppError> {
    let date = today();
    {
        let store = state.store.lock().await;
        ensure_known_task(&store, &task_id)?;
    }
    let ticket = state.proofs.begin(date, &task_id).await;
    Ok(Json(ProofTicketResponse {
        ticket: ticket.generation(),
    }))
}

pub async fn set_proof(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    Json(payload): Json<ProofRequest>,
) -> Result<Json<TodayResponse>, AppError> {
    let date = today();
    let store = Arc::clone(&state.store).lock_owned().await;
    ensure_known_task(&store, &task_id)?;

    let ticket = ProofTicket::new(date, task_id.as_str(), payload.ticket);
    if !state.proofs.finish(&ticket).await {
        warn!(%date, task_id = %task_id, ticket = payload.ticket, "dropping superseded proof upload");
        return Err(AppError::conflict("a newer proof upload replaced this one"));
    }

    let view = run_blocking(store, move |store| {
        store.ensure_day(date);
        store.set_task_proof(date, &task_id, payload.proof)?;
        Ok(to_response(store, date))
    })
    .await?;
    Ok(Json(view))
}

pub async fn clear_today(State(state): State<AppState>) -> Result<Json<TodayResponse>, AppError> {
    let date = today();
    let view = with_store(&state, move |store| {
        apply_clear(store, date)?;
        Ok(to_response(store, date))
    })
    .await?;
    Ok(Json(view))
}

pub async fn toggle_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Redirect, AppError> {
    let date = today();
    with_store(&state, move |store| {
        let log = store.ensure_day(date);
        let completed = log.tasks.get(&task_id).is_some_and(|task| task.completed);
        store.set_task_completion(date, &task_id, !completed)?;
        Ok(())
    })
    .await?;
    Ok(Redirect::to("/"))
}

pub async fn clear_form(State(state): State<AppState>) -> Result<Redirect, AppError> {
    let date = today();
    with_store(&state, move |store| apply_clear(store, date)).await?;
    Ok(Redirect::to("/"))
}

pub async fn export(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let date = today();
    let store = state.store.lock().await;
    let body = export_archive(store.archive())?;
    let disposition = format!("attachment; filename=\"{}\"", export_file_name(date));
    info!(days = store.archive().logs.len(), "exporting log archive");

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

/// Locks the store and runs `f` on the blocking pool, since store mutations
/// write through to disk.
async fn with_store<T, F>(state: &AppState, f: F) -> Result<T, AppError>
where
    F: FnOnce(&mut LogStore) -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(&state.store).lock_owned().await;
    run_blocking(store, f).await
}

async fn run_blocking<T, F>(mut store: OwnedMutexGuard<LogStore>, f: F) -> Result<T, AppError>
where
    F: FnOnce(&mut LogStore) -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&mut *store))
        .await
        .map_err(AppError::internal)?
}

fn ensure_known_task(store: &LogStore, task_id: &str) -> Result<(), AppError> {
    if store.catalog().contains(task_id) {
        Ok(())
    } else {
        Err(AppError::not_found(format!("unknown task `{task_id}`")))
    }
}

fn apply_clear(store: &mut LogStore, date: NaiveDate) -> Result<(), AppError> {
    store.ensure_day(date);
    store.clear_day(date)?;
    Ok(())
}

fn to_response(store: &mut LogStore, date: NaiveDate) -> TodayResponse {
    let log = store.ensure_day(date);
    let tasks = store
        .catalog()
        .tasks()
        .iter()
        .map(|task| {
            let task_state = log.tasks.get(&task.id).cloned().unwrap_or_default();
            TaskView {
                id: task.id.clone(),
                title: task.title.clone(),
                points: task.points,
                completed: task_state.completed,
                proof: task_state.proof,
            }
        })
        .collect();

    TodayResponse {
        date,
        tasks,
        score: store.score(date),
        max_score: store.max_score(),
        streak: store.streak(date),
        persistence_warning: store.persistence_warning().map(str::to_string),
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TaskDefinition;
    use crate::storage::MemoryBackend;
    use axum::http::StatusCode;

    fn app_state() -> AppState {
        let catalog = Catalog::new(vec![
            TaskDefinition::new("a", "A", 4),
            TaskDefinition::new("b", "B", 3),
            TaskDefinition::new("c", "C", 3),
        ])
        .unwrap();
        AppState::new(LogStore::open(catalog, Box::new(MemoryBackend::new())))
    }

    async fn ticket_for(state: &AppState, task_id: &str) -> u64 {
        let Json(response) = begin_proof(State(state.clone()), Path(task_id.to_string()))
            .await
            .unwrap();
        response.ticket
    }

    async fn upload(state: &AppState, task_id: &str, proof: &str, ticket: u64) -> Result<Json<TodayResponse>, AppError> {
        set_proof(
            State(state.clone()),
            Path(task_id.to_string()),
            Json(ProofRequest {
                proof: proof.to_string(),
                ticket,
            }),
        )
        .await
    }

    fn proof_of(view: &TodayResponse, task_id: &str) -> String {
        view.tasks
            .iter()
            .find(|task| task.id == task_id)
            .map(|task| task.proof.clone())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn stale_proof_ticket_is_rejected_when_it_lands_last() {
        let state = app_state();
        let first_pick = ticket_for(&state, "a").await;
        let second_pick = ticket_for(&state, "a").await;

        let Json(view) = upload(&state, "a", "second image", second_pick).await.unwrap();
        assert_eq!(proof_of(&view, "a"), "second image");

        let err = upload(&state, "a", "first image", first_pick).await.unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);

        let Json(today) = get_today(State(state.clone())).await.unwrap();
        assert_eq!(proof_of(&today, "a"), "second image");
    }

    #[tokio::test]
    async fn stale_proof_ticket_is_rejected_when_it_lands_first() {
        let state = app_state();
        let first_pick = ticket_for(&state, "b").await;
        let second_pick = ticket_for(&state, "b").await;

        let err = upload(&state, "b", "first image", first_pick).await.unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);

        let Json(view) = upload(&state, "b", "second image", second_pick).await.unwrap();
        assert_eq!(proof_of(&view, "b"), "second image");
    }

    #[tokio::test]
    async fn unknown_task_gets_no_proof_ticket() {
        let state = app_state();
        let err = begin_proof(State(state.clone()), Path("nope".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(state.proofs.in_flight().await, 0);

        let err = upload(&state, "nope", "image", 1).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn completion_runs_off_the_async_workers() {
        let state = app_state();
        let Json(view) = set_completion(
            State(state.clone()),
            Path("a".to_string()),
            Json(CompletionRequest { completed: true }),
        )
        .await
        .unwrap();
        assert_eq!(view.score, 4);

        let Json(view) = clear_today(State(state.clone())).await.unwrap();
        assert_eq!(view.score, 0);
    }
}
