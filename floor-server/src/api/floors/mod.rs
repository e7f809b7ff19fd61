//! Floor Plan API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/floors | GET | 已保存布局的楼面 |
//! | /api/floors/{floor_id} | GET / DELETE | 桌台、选中项、统计 / 删除已保存布局 |
//! | /api/floors/{floor_id}/statistics | GET | 楼面统计 |
//! | /api/floors/{floor_id}/tables | POST | 添加桌台 |
//! | /api/floors/{floor_id}/tables/{id} | DELETE | 删除桌台 |
//! | /api/floors/{floor_id}/tables/{id}/position | PUT | 拖拽 (吸附网格) |
//! | /api/floors/{floor_id}/selection | PUT / DELETE | 选中 / 取消选中 |
//! | /api/floors/{floor_id}/inspector | GET / PATCH | 检查器表单 / 编辑 |
//! | /api/floors/{floor_id}/inspector/remove | POST | 删除选中桌台 |
//! | /api/floors/{floor_id}/save | POST | 保存布局 |
//! | /api/floors/{floor_id}/reset | POST | 丢弃修改并重新加载 |

mod handler;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/floors", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route(
            "/{floor_id}",
            get(handler::get_floor).delete(handler::delete_floor),
        )
        .route("/{floor_id}/statistics", get(handler::statistics))
        .route("/{floor_id}/tables", post(handler::add_table))
        .route(
            "/{floor_id}/tables/{id}",
            delete(handler::remove_table),
        )
        .route("/{floor_id}/tables/{id}/position", put(handler::move_table))
        .route(
            "/{floor_id}/selection",
            put(handler::select_table).delete(handler::clear_selection),
        )
        .route(
            "/{floor_id}/inspector",
            get(handler::inspector).patch(handler::apply_edit),
        )
        .route("/{floor_id}/inspector/remove", post(handler::remove_selected))
        .route("/{floor_id}/save", post(handler::save))
        .route("/{floor_id}/reset", post(handler::reset))
}
