//! API 响应模型
//!
//! 定义快照接口对外的成功/部分成功/失败三类响应体

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::market::{DailyBar, IndicatorSet, Quote};

/// 限流提示语（上游免费档位的固定说明，随 429 返回）
pub const RATE_LIMIT_HINT: &str =
    "Alpha Vantage free tier allows 25 requests/day and 5 requests/minute. \
     Please wait and try again, or upgrade your API plan.";

/// 快照成功响应
///
/// 完整成功与部分成功共用同一结构：
/// 部分成功时 historical 为空数组、指标退化、warning 有值
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotBody {
    /// 请求是否成功
    pub success: bool,
    /// 当前报价
    pub current: Quote,
    /// 历史日K线（从旧到新）
    pub historical: Vec<DailyBar>,
    /// 技术指标
    pub indicators: IndicatorSet,
    /// 响应生成时间（ISO 8601，UTC）
    pub last_updated: String,
    /// 部分成功时的降级说明
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl SnapshotBody {
    pub fn new(
        current: Quote,
        historical: Vec<DailyBar>,
        indicators: IndicatorSet,
        warning: Option<String>,
    ) -> Self {
        Self {
            success: true,
            current,
            historical,
            indicators,
            last_updated: Utc::now().to_rfc3339(),
            warning,
        }
    }
}

/// 快照失败响应
///
/// 三种失败形态：
/// - 429 限流：error + hint
/// - 500 无数据：error + debug（上游原始报文，便于排查）
/// - 500 其他异常：仅 error
#[derive(Debug, Serialize, Deserialize)]
pub struct FailureBody {
    /// 恒为 false
    pub success: bool,
    /// 错误信息
    pub error: String,
    /// 限流场景的固定提示
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// 上游原始报文
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<Value>,
}

impl FailureBody {
    /// 上游限流（报价接口命中限流标记）
    pub fn rate_limited(message: String) -> Self {
        Self {
            success: false,
            error: message,
            hint: Some(RATE_LIMIT_HINT.to_string()),
            debug: None,
        }
    }

    /// 上游未返回报价数据
    pub fn no_data(raw: Value) -> Self {
        Self {
            success: false,
            error: "No quote data returned by upstream provider".to_string(),
            hint: None,
            debug: Some(raw),
        }
    }

    /// 传输或解析等未预期异常
    pub fn internal(message: String) -> Self {
        Self {
            success: false,
            error: message,
            hint: None,
            debug: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_quote() -> Quote {
        Quote {
            symbol: "AAPL".to_string(),
            open: 100.0,
            high: 102.0,
            low: 99.0,
            price: 101.5,
            volume: 1_000_000,
            latest_day: "2024-06-03".to_string(),
            previous_close: 100.5,
            change: 1.0,
            change_percent: "0.9950%".to_string(),
        }
    }

    #[test]
    fn snapshot_body_omits_warning_when_none() {
        let indicators = IndicatorSet {
            sma10: None,
            sma20: None,
            sma50: None,
            volatility: None,
            high52w: 102.0,
            low52w: 99.0,
        };
        let body = SnapshotBody::new(sample_quote(), Vec::new(), indicators, None);
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["success"], json!(true));
        assert!(value.get("warning").is_none());
        // 缺失的指标必须序列化为 null，而不是省略
        assert_eq!(value["indicators"]["sma10"], Value::Null);
        assert_eq!(value["indicators"]["high52w"], json!(102.0));
        assert!(value.get("lastUpdated").is_some());
    }

    #[test]
    fn quote_serializes_with_camel_case_field_names() {
        let value = serde_json::to_value(sample_quote()).unwrap();
        assert_eq!(value["previousClose"], json!(100.5));
        assert_eq!(value["latestDay"], json!("2024-06-03"));
        assert_eq!(value["changePercent"], json!("0.9950%"));
    }

    #[test]
    fn nan_fields_serialize_as_null() {
        let mut quote = sample_quote();
        quote.open = f64::NAN;
        let value = serde_json::to_value(quote).unwrap();
        assert_eq!(value["open"], Value::Null);
    }

    #[test]
    fn failure_shapes_carry_the_right_optional_fields() {
        let limited = serde_json::to_value(FailureBody::rate_limited("Note".into())).unwrap();
        assert_eq!(limited["success"], json!(false));
        assert!(limited.get("hint").is_some());
        assert!(limited.get("debug").is_none());

        let no_data = serde_json::to_value(FailureBody::no_data(json!({"Global Quote": {}}))).unwrap();
        assert!(no_data.get("debug").is_some());
        assert!(no_data.get("hint").is_none());

        let internal = serde_json::to_value(FailureBody::internal("boom".into())).unwrap();
        assert!(internal.get("hint").is_none());
        assert!(internal.get("debug").is_none());
    }
}
