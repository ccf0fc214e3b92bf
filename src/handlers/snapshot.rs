//! 快照接口
//!
//! 把服务层的三种终态映射为对外契约的 HTTP 响应

use actix_web::{web, HttpResponse, Result};
use anyhow::Error;

use crate::config::AppConfig;
use crate::models::{FailureBody, SnapshotBody};
use crate::services::snapshot_service::{self, SnapshotOutcome};

pub async fn get_snapshot(config: web::Data<AppConfig>) -> Result<HttpResponse> {
    let outcome = snapshot_service::get_market_snapshot(&config.provider).await;
    Ok(respond(outcome))
}

/// 终态到 HTTP 的映射
///
/// - 报价限流 → 429 + hint
/// - 报价无数据 → 500 + debug
/// - 就绪（含部分成功）→ 200
/// - 传输/解析异常 → 500
fn respond(outcome: std::result::Result<SnapshotOutcome, Error>) -> HttpResponse {
    match outcome {
        Ok(SnapshotOutcome::RateLimited { message }) => {
            HttpResponse::TooManyRequests().json(FailureBody::rate_limited(message))
        }
        Ok(SnapshotOutcome::NoData { raw }) => {
            HttpResponse::InternalServerError().json(FailureBody::no_data(raw))
        }
        Ok(SnapshotOutcome::Ready {
            current,
            historical,
            indicators,
            warning,
        }) => HttpResponse::Ok().json(SnapshotBody::new(current, historical, indicators, warning)),
        Err(e) => {
            log::error!("获取行情快照失败: {:#}", e);
            HttpResponse::InternalServerError().json(FailureBody::internal(e.to_string()))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    // 对外契约不校验请求方法，任意方法均可触发
    cfg.route("/snapshot", web::route().to(get_snapshot));
}
