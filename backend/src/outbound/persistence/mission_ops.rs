//! In-transaction mission progress shared by the activity and feed paths.
//!
//! Advancing a mission happens inside whatever transaction produced the
//! triggering event (expense, saving, feed), so the progress update and the
//! completion reward commit atomically with the event itself.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde_json::json;
use uuid::Uuid;

use crate::domain::mission::{
    self, Mission, MissionEvent, MissionKind, MissionProgress, UserMission,
};
use crate::domain::ports::MissionOutcome;
use crate::domain::wallet::TransactionKind;

use super::error_mapping::TxError;
use super::models::{MissionRow, NewUserMissionRow, UserMissionRow};
use super::schema::{missions, user_missions};
use super::wallet_ops;

/// Load the mission active on `day`, if any.
pub(crate) async fn active_mission_in_tx(
    conn: &mut AsyncPgConnection,
    day: NaiveDate,
) -> Result<Option<Mission>, TxError> {
    let row: Option<MissionRow> = missions::table
        .filter(missions::active_date.eq(day))
        .select(MissionRow::as_select())
        .first(conn)
        .await
        .optional()?;
    row.map(mission_from_row).transpose()
}

/// Lock the user's record for a mission, creating it lazily.
pub(crate) async fn lock_or_create_user_mission(
    conn: &mut AsyncPgConnection,
    user_id: Uuid,
    mission_id: Uuid,
) -> Result<UserMission, TxError> {
    diesel::insert_into(user_missions::table)
        .values(NewUserMissionRow {
            id: Uuid::new_v4(),
            user_id,
            mission_id,
            progress: json!({}),
            completed: false,
        })
        .on_conflict((user_missions::user_id, user_missions::mission_id))
        .do_nothing()
        .execute(conn)
        .await?;

    let row: UserMissionRow = user_missions::table
        .filter(
            user_missions::user_id
                .eq(user_id)
                .and(user_missions::mission_id.eq(mission_id)),
        )
        .select(UserMissionRow::as_select())
        .for_update()
        .first(conn)
        .await?;
    user_mission_from_row(row)
}

/// Advance the day's mission (if any) by one event.
///
/// On the completion transition the update is guarded with
/// `completed = false`, and the reward is credited only when that guarded
/// write reports one row. A racing completer therefore credits at most
/// once between the two of them.
pub(crate) async fn apply_mission_event_in_tx(
    conn: &mut AsyncPgConnection,
    user_id: Uuid,
    event: MissionEvent,
    day: NaiveDate,
    now: DateTime<Utc>,
) -> Result<Option<MissionOutcome>, TxError> {
    let Some(active) = active_mission_in_tx(conn, day).await? else {
        return Ok(None);
    };

    let mut record = lock_or_create_user_mission(conn, user_id, active.id).await?;
    if record.completed {
        return Ok(Some(MissionOutcome {
            mission_id: active.id,
            progress_pct: 100,
            completed: true,
            just_completed: false,
            reward_credited: None,
        }));
    }

    let update = mission::apply_event(&active.kind, &mut record, event, now);
    let progress_json = serde_json::to_value(record.progress)
        .map_err(|err| TxError::corrupt(format!("mission progress: {err}")))?;

    let written = diesel::update(
        user_missions::table.filter(
            user_missions::id
                .eq(record.id)
                .and(user_missions::completed.eq(false)),
        ),
    )
    .set((
        user_missions::progress.eq(progress_json),
        user_missions::completed.eq(record.completed),
        user_missions::completed_at.eq(record.completed_at),
    ))
    .execute(conn)
    .await?;

    let reward_credited = if update.just_completed && written == 1 {
        wallet_ops::credit_in_tx(
            conn,
            user_id,
            active.reward_coins,
            TransactionKind::MissionReward,
            Some(format!("Completed mission: {}", active.title)),
            now,
        )
        .await?;
        Some(active.reward_coins)
    } else {
        None
    };

    Ok(Some(MissionOutcome {
        mission_id: active.id,
        progress_pct: update.progress_pct,
        completed: update.completed,
        just_completed: reward_credited.is_some(),
        reward_credited,
    }))
}

pub(crate) fn mission_from_row(row: MissionRow) -> Result<Mission, TxError> {
    let kind = MissionKind::parse(&row.mission_type, &row.requirements)
        .map_err(|err| TxError::corrupt(format!("mission {}: {err}", row.id)))?;
    Ok(Mission {
        id: row.id,
        title: row.title,
        description: row.description,
        kind,
        reward_coins: row.reward_coins,
        active_date: row.active_date,
    })
}

pub(crate) fn user_mission_from_row(row: UserMissionRow) -> Result<UserMission, TxError> {
    let progress: MissionProgress = serde_json::from_value(row.progress)
        .map_err(|err| TxError::corrupt(format!("mission progress: {err}")))?;
    Ok(UserMission {
        id: row.id,
        user_id: row.user_id,
        mission_id: row.mission_id,
        progress,
        completed: row.completed,
        completed_at: row.completed_at,
        created_at: row.created_at,
    })
}
