//! 行情快照服务
//!
//! 串行编排两次上游调用：先报价后历史，
//! 报价限流直接终止请求，历史限流降级为部分成功

use anyhow::Result;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::config::ProviderConfig;
use crate::models::{DailyBar, IndicatorSet, Quote};
use crate::services::alphavantage::{self, ProviderSignal};
use crate::services::indicators;

/// 部分成功时返回给调用方的降级说明
pub const SERIES_DEGRADED_WARNING: &str =
    "Historical data unavailable due to upstream rate limit; returning current quote only.";

/// 单次快照请求的三种终态
///
/// 传输/解析等未预期异常不在此列，它们沿 anyhow 错误路径上抛，
/// 由 handler 统一转成 500 响应
#[derive(Debug)]
pub enum SnapshotOutcome {
    /// 报价接口被限流，整个请求失败（429）
    RateLimited { message: String },
    /// 报价报文缺少数据，携带上游原始报文用于诊断（500）
    NoData { raw: Value },
    /// 快照就绪；历史为空且 warning 有值时即部分成功（200）
    Ready {
        current: Quote,
        historical: Vec<DailyBar>,
        indicators: IndicatorSet,
        warning: Option<String>,
    },
}

/// 获取固定标的的行情快照
///
/// 两次出站调用严格串行，中间按配置间隔等待，
/// 迁就上游按分钟计的限流窗口
pub async fn get_market_snapshot(config: &ProviderConfig) -> Result<SnapshotOutcome> {
    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;

    let quote_payload = alphavantage::fetch_quote_payload(&client, config).await?;
    if let ProviderSignal::RateLimited(message) = alphavantage::classify_payload(&quote_payload) {
        log::warn!("报价接口命中限流: {}", message);
        return Ok(SnapshotOutcome::RateLimited { message });
    }

    let Some(quote) = alphavantage::parse_quote(&quote_payload, &config.symbol) else {
        log::error!("报价报文缺少 Global Quote 数据: {}", quote_payload);
        return Ok(SnapshotOutcome::NoData { raw: quote_payload });
    };

    if config.inter_call_delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(config.inter_call_delay_ms)).await;
    }

    let series_payload = alphavantage::fetch_series_payload(&client, config).await?;
    Ok(assemble_snapshot(quote, &series_payload))
}

/// 由报价和历史报文组装快照
///
/// 历史接口限流不让请求失败：历史置空、指标退化为报价推导值，
/// 并附上降级说明
pub fn assemble_snapshot(quote: Quote, series_payload: &Value) -> SnapshotOutcome {
    match alphavantage::classify_payload(series_payload) {
        ProviderSignal::RateLimited(message) => {
            log::warn!("历史接口命中限流，降级为仅报价: {}", message);
            let indicators = indicators::compute(&[], &quote);
            SnapshotOutcome::Ready {
                current: quote,
                historical: Vec::new(),
                indicators,
                warning: Some(SERIES_DEGRADED_WARNING.to_string()),
            }
        }
        ProviderSignal::Data => {
            let historical = alphavantage::parse_series(series_payload);
            let indicators = indicators::compute(&historical, &quote);
            SnapshotOutcome::Ready {
                current: quote,
                historical,
                indicators,
                warning: None,
            }
        }
    }
}
