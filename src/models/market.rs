//! 行情数据模型
//!
//! 定义实时报价、日K线和技术指标的数据结构

use serde::{Deserialize, Serialize};

/// 实时报价
///
/// 对应 Alpha Vantage GLOBAL_QUOTE 返回的单只股票快照。
/// 解析失败的浮点字段保留为 NaN，序列化为 JSON null，
/// 指标计算前会被过滤掉。
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// 股票代码
    pub symbol: String,
    /// 开盘价
    pub open: f64,
    /// 最高价
    pub high: f64,
    /// 最低价
    pub low: f64,
    /// 当前价格
    pub price: f64,
    /// 成交量
    pub volume: u64,
    /// 最近交易日（YYYY-MM-DD）
    pub latest_day: String,
    /// 昨收价
    pub previous_close: f64,
    /// 涨跌额
    pub change: f64,
    /// 涨跌幅（上游原样的百分比字符串，如 "1.58%"）
    pub change_percent: String,
}

/// 日K线数据
///
/// 单日的 OHLCV 数据，序列按日期从旧到新排列
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DailyBar {
    /// 日期（YYYY-MM-DD，序列内唯一）
    pub date: String,
    /// 开盘价
    pub open: f64,
    /// 最高价
    pub high: f64,
    /// 最低价
    pub low: f64,
    /// 收盘价（解析失败为 NaN，不参与指标计算）
    pub close: f64,
    /// 成交量
    pub volume: u64,
}

/// 技术指标集合
///
/// 由历史收盘价序列加当前报价推导，每次请求重新计算。
/// 数据不足时均线与波动率为 None（序列化为 null）；
/// high52w/low52w 始终有值，无历史数据时回退到当前报价的最高/最低价。
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSet {
    /// 10日简单移动平均
    pub sma10: Option<f64>,
    /// 20日简单移动平均
    pub sma20: Option<f64>,
    /// 50日简单移动平均
    pub sma50: Option<f64>,
    /// 近20个交易日收益率的波动率（总体标准差，百分比）
    pub volatility: Option<f64>,
    /// 已取回历史区间内的最高价（命名沿用对外契约，窗口最多100根日K）
    pub high52w: f64,
    /// 已取回历史区间内的最低价
    pub low52w: f64,
}
