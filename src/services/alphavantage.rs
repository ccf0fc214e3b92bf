//! Alpha Vantage 行情接口实现
//!
//! 提供实时报价（GLOBAL_QUOTE）和日K线（TIME_SERIES_DAILY）数据
//! 对接 https://www.alphavantage.co/query

use anyhow::{anyhow, Result};
use reqwest::Client;
use serde_json::Value;

use crate::config::ProviderConfig;
use crate::models::{DailyBar, Quote};

/// 历史序列最多取用的条目数（对应上游 compact 档位）
pub const MAX_SERIES_BARS: usize = 100;

/// 上游报文的分类结果
///
/// 两个接口共用同一套限流标记检测，避免各自内联判断产生漂移
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderSignal {
    /// 正常数据报文
    Data,
    /// 命中限流/提示标记，携带上游原始提示文案
    RateLimited(String),
}

/// 检测上游报文是否为限流/提示报文
///
/// 上游限流时不返回数据，而是在顶层塞一个 "Note" 或 "Information" 字段
pub fn classify_payload(payload: &Value) -> ProviderSignal {
    for marker in ["Note", "Information"] {
        if let Some(message) = payload.get(marker).and_then(Value::as_str) {
            return ProviderSignal::RateLimited(message.to_string());
        }
    }
    ProviderSignal::Data
}

/// 获取实时报价原始报文
pub async fn fetch_quote_payload(client: &Client, config: &ProviderConfig) -> Result<Value> {
    let url = format!("{}/query", config.base_url);

    let response = client
        .get(&url)
        .query(&[
            ("function", "GLOBAL_QUOTE"),
            ("symbol", config.symbol.as_str()),
            ("apikey", config.api_key.as_str()),
        ])
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(anyhow!("获取报价数据失败: {}", response.status()));
    }

    Ok(response.json().await?)
}

/// 获取日K线原始报文（compact 档位，最近约100个交易日）
pub async fn fetch_series_payload(client: &Client, config: &ProviderConfig) -> Result<Value> {
    let url = format!("{}/query", config.base_url);

    let response = client
        .get(&url)
        .query(&[
            ("function", "TIME_SERIES_DAILY"),
            ("symbol", config.symbol.as_str()),
            ("outputsize", "compact"),
            ("apikey", config.api_key.as_str()),
        ])
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(anyhow!("获取历史数据失败: {}", response.status()));
    }

    Ok(response.json().await?)
}

/// 解析实时报价报文
///
/// "Global Quote" 对象缺失或为空视为无数据，返回 None，
/// 由调用方带上游原始报文走 500 诊断路径
pub fn parse_quote(payload: &Value, symbol: &str) -> Option<Quote> {
    let quote = payload.get("Global Quote")?.as_object()?;
    if quote.is_empty() {
        return None;
    }

    // 字段标签是上游带序号的固定命名
    let get_f64 = |key: &str| -> f64 {
        quote
            .get(key)
            .and_then(Value::as_str)
            .map(|s| s.parse::<f64>().unwrap_or(f64::NAN))
            .unwrap_or(f64::NAN)
    };
    let get_str = |key: &str| -> String {
        quote
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string()
    };

    let reported_symbol = get_str("01. symbol");

    Some(Quote {
        symbol: if reported_symbol.is_empty() {
            symbol.to_string()
        } else {
            reported_symbol
        },
        open: get_f64("02. open"),
        high: get_f64("03. high"),
        low: get_f64("04. low"),
        price: get_f64("05. price"),
        volume: quote
            .get("06. volume")
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
            .unwrap_or(0),
        latest_day: get_str("07. latest trading day"),
        previous_close: get_f64("08. previous close"),
        change: get_f64("09. change"),
        change_percent: get_str("10. change percent"),
    })
}

/// 解析日K线报文
///
/// 按上游原始顺序（最新在前）最多取 MAX_SERIES_BARS 条，
/// 逐条映射后整体反转，得到从旧到新的序列。
/// "Time Series (Daily)" 缺失视为无历史数据，返回空序列而不是错误。
pub fn parse_series(payload: &Value) -> Vec<DailyBar> {
    let Some(series) = payload.get("Time Series (Daily)").and_then(Value::as_object) else {
        return Vec::new();
    };

    let get_f64 = |fields: &Value, key: &str| -> f64 {
        fields
            .get(key)
            .and_then(Value::as_str)
            .map(|s| s.parse::<f64>().unwrap_or(f64::NAN))
            .unwrap_or(f64::NAN)
    };

    let mut bars: Vec<DailyBar> = series
        .iter()
        .take(MAX_SERIES_BARS)
        .map(|(date, fields)| DailyBar {
            date: date.clone(),
            open: get_f64(fields, "1. open"),
            high: get_f64(fields, "2. high"),
            low: get_f64(fields, "3. low"),
            close: get_f64(fields, "4. close"),
            volume: fields
                .get("5. volume")
                .and_then(Value::as_str)
                .and_then(|s| s.parse().ok())
                .unwrap_or(0),
        })
        .collect();

    bars.reverse();
    bars
}
