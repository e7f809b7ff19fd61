//! Floor Plan API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use shared::models::{FloorStatistics, Position, TableRecord};
use std::sync::Arc;

use crate::core::ServerState;
use crate::floor::{EditOutcome, FloorSession, FloorView, InspectorForm, NewTableForm, TableEdit};
use crate::utils::{AppError, AppResult};

/// Session for a mutating request, opened on first use
fn session(state: &ServerState, floor_id: &str) -> AppResult<Arc<FloorSession>> {
    Ok(state.sessions.open(floor_id)?)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectRequest {
    pub table_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditResponse {
    /// false when the edit was dropped (non-numeric input, field not applicable)
    pub applied: bool,
    pub inspector: Option<InspectorForm>,
    pub statistics: FloorStatistics,
}

/// GET /api/floors - 已保存布局的楼面
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<String>>> {
    Ok(Json(state.sessions.floor_ids()?))
}

/// GET /api/floors/:floor_id - 楼面快照 (不创建会话)
pub async fn get_floor(
    State(state): State<ServerState>,
    Path(floor_id): Path<String>,
) -> AppResult<Json<FloorView>> {
    Ok(Json(state.sessions.view(&floor_id)?))
}

/// DELETE /api/floors/:floor_id - 删除已保存布局并关闭会话
pub async fn delete_floor(
    State(state): State<ServerState>,
    Path(floor_id): Path<String>,
) -> AppResult<Json<bool>> {
    Ok(Json(state.sessions.delete(&floor_id)?))
}

/// GET /api/floors/:floor_id/statistics
pub async fn statistics(
    State(state): State<ServerState>,
    Path(floor_id): Path<String>,
) -> AppResult<Json<FloorStatistics>> {
    Ok(Json(state.sessions.statistics(&floor_id)?))
}

/// POST /api/floors/:floor_id/tables - 添加桌台
pub async fn add_table(
    State(state): State<ServerState>,
    Path(floor_id): Path<String>,
    Json(form): Json<NewTableForm>,
) -> AppResult<Json<TableRecord>> {
    let table = session(&state, &floor_id)?.add_table(form)?;
    Ok(Json(TableRecord::from(&table)))
}

/// DELETE /api/floors/:floor_id/tables/:id - 删除桌台 (未知 id 返回 false)
pub async fn remove_table(
    State(state): State<ServerState>,
    Path((floor_id, id)): Path<(String, String)>,
) -> AppResult<Json<bool>> {
    let removed = session(&state, &floor_id)?.remove_table(&id);
    Ok(Json(removed.is_some()))
}

/// PUT /api/floors/:floor_id/tables/:id/position - 拖拽，返回吸附后的位置
pub async fn move_table(
    State(state): State<ServerState>,
    Path((floor_id, id)): Path<(String, String)>,
    Json(position): Json<Position>,
) -> AppResult<Json<Position>> {
    let stored = session(&state, &floor_id)?
        .move_table(&id, position)
        .ok_or_else(|| AppError::table_not_found(&id))?;
    Ok(Json(stored))
}

/// PUT /api/floors/:floor_id/selection - 选中桌台，返回检查器表单
pub async fn select_table(
    State(state): State<ServerState>,
    Path(floor_id): Path<String>,
    Json(req): Json<SelectRequest>,
) -> AppResult<Json<InspectorForm>> {
    let session = session(&state, &floor_id)?;
    if !session.select_table(&req.table_id) {
        return Err(AppError::table_not_found(&req.table_id));
    }
    session.inspector().map(Json).ok_or_else(AppError::no_selection)
}

/// DELETE /api/floors/:floor_id/selection - 完成编辑 / 点击空白处
pub async fn clear_selection(
    State(state): State<ServerState>,
    Path(floor_id): Path<String>,
) -> AppResult<Json<FloorView>> {
    let session = session(&state, &floor_id)?;
    session.clear_selection();
    Ok(Json(session.view()))
}

/// GET /api/floors/:floor_id/inspector - 未打开的楼面没有选中项
pub async fn inspector(
    State(state): State<ServerState>,
    Path(floor_id): Path<String>,
) -> AppResult<Json<InspectorForm>> {
    state
        .sessions
        .get(&floor_id)
        .and_then(|session| session.inspector())
        .map(Json)
        .ok_or_else(AppError::no_selection)
}

/// PATCH /api/floors/:floor_id/inspector - 单字段编辑，立即写入
pub async fn apply_edit(
    State(state): State<ServerState>,
    Path(floor_id): Path<String>,
    Json(edit): Json<TableEdit>,
) -> AppResult<Json<EditResponse>> {
    let session = session(&state, &floor_id)?;
    let outcome = session.apply_edit(edit)?;
    Ok(Json(EditResponse {
        applied: matches!(outcome, EditOutcome::Applied(_)),
        inspector: session.inspector(),
        statistics: session.statistics(),
    }))
}

/// POST /api/floors/:floor_id/inspector/remove - 删除选中桌台
pub async fn remove_selected(
    State(state): State<ServerState>,
    Path(floor_id): Path<String>,
) -> AppResult<Json<TableRecord>> {
    let removed = session(&state, &floor_id)?
        .remove_selected()
        .ok_or_else(AppError::no_selection)?;
    Ok(Json(TableRecord::from(&removed)))
}

/// POST /api/floors/:floor_id/save - 保存布局
pub async fn save(
    State(state): State<ServerState>,
    Path(floor_id): Path<String>,
) -> AppResult<Json<FloorView>> {
    Ok(Json(session(&state, &floor_id)?.save()?))
}

/// POST /api/floors/:floor_id/reset - 丢弃未保存的修改
pub async fn reset(
    State(state): State<ServerState>,
    Path(floor_id): Path<String>,
) -> AppResult<Json<FloorView>> {
    Ok(Json(session(&state, &floor_id)?.reset()?))
}
