//! 技术指标计算
//!
//! 纯函数，无 I/O：输入从旧到新的日K线序列和当前报价，
//! 输出均线、波动率和区间极值

use crate::models::{DailyBar, IndicatorSet, Quote};

/// 波动率取样的收益率个数
const VOLATILITY_RETURNS: usize = 20;

/// 计算一组技术指标
///
/// 收盘价中解析失败的 NaN 条目不参与任何计算；
/// 序列为空（或全部无效）时极值回退到当前报价的最高/最低价
pub fn compute(series: &[DailyBar], quote: &Quote) -> IndicatorSet {
    let closes: Vec<f64> = series
        .iter()
        .map(|bar| bar.close)
        .filter(|close| close.is_finite())
        .collect();

    IndicatorSet {
        sma10: sma(&closes, 10),
        sma20: sma(&closes, 20),
        sma50: sma(&closes, 50),
        volatility: volatility(&closes),
        high52w: extreme(series.iter().map(|bar| bar.high), f64::max).unwrap_or(quote.high),
        low52w: extreme(series.iter().map(|bar| bar.low), f64::min).unwrap_or(quote.low),
    }
}

/// 最近 n 个收盘价的简单移动平均，样本不足时为 None
pub fn sma(closes: &[f64], n: usize) -> Option<f64> {
    if n == 0 || closes.len() < n {
        return None;
    }
    let window = &closes[closes.len() - n..];
    Some(window.iter().sum::<f64>() / n as f64)
}

/// 最近20个交易日收益率的总体标准差（百分比）
///
/// 至少需要21个收盘价。逐日收益率 = (今收 − 昨收) / 昨收 × 100；
/// 昨收恰好为 0 的步长直接跳过（样本缩小而不是报错）。
/// 样本为空时为 None。
pub fn volatility(closes: &[f64]) -> Option<f64> {
    if closes.len() < VOLATILITY_RETURNS + 1 {
        return None;
    }

    let mut returns = Vec::with_capacity(VOLATILITY_RETURNS);
    for i in closes.len() - VOLATILITY_RETURNS..closes.len() {
        let prev = closes[i - 1];
        if prev == 0.0 {
            continue;
        }
        returns.push((closes[i] - prev) / prev * 100.0);
    }

    if returns.is_empty() {
        return None;
    }

    let count = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / count;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / count;
    Some(variance.sqrt())
}

/// 序列中有限值的极值，全部无效时为 None
fn extreme<I>(values: I, pick: fn(f64, f64) -> f64) -> Option<f64>
where
    I: Iterator<Item = f64>,
{
    values
        .filter(|value| value.is_finite())
        .reduce(|acc, value| pick(acc, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(date: &str, high: f64, low: f64, close: f64) -> DailyBar {
        DailyBar {
            date: date.to_string(),
            open: close,
            high,
            low,
            close,
            volume: 1_000,
        }
    }

    fn quote() -> Quote {
        Quote {
            symbol: "AAPL".to_string(),
            open: 100.0,
            high: 103.0,
            low: 98.0,
            price: 101.0,
            volume: 500_000,
            latest_day: "2024-06-03".to_string(),
            previous_close: 100.0,
            change: 1.0,
            change_percent: "1.0%".to_string(),
        }
    }

    #[test]
    fn sma_is_absent_below_window_and_exact_at_window() {
        let closes: Vec<f64> = (1..=9).map(|i| i as f64).collect();
        assert_eq!(sma(&closes, 10), None);

        let closes: Vec<f64> = (1..=12).map(|i| i as f64).collect();
        // 最后10个：3..=12，均值 7.5
        assert_eq!(sma(&closes, 10), Some(7.5));
        assert_eq!(sma(&closes, 12), Some(6.5));
        assert_eq!(sma(&closes, 20), None);
    }

    #[test]
    fn volatility_requires_twenty_one_closes() {
        let closes: Vec<f64> = (1..=20).map(|i| i as f64).collect();
        assert_eq!(volatility(&closes), None);

        let closes: Vec<f64> = (1..=21).map(|i| 100.0 + i as f64).collect();
        let first = volatility(&closes).unwrap();
        let second = volatility(&closes).unwrap();
        assert_eq!(first, second);
        assert!(first > 0.0);
    }

    #[test]
    fn volatility_of_constant_returns_is_zero() {
        // 等比序列：逐日收益率恒为 1%，总体标准差为 0
        let mut closes = vec![100.0];
        for _ in 0..21 {
            let last = *closes.last().unwrap();
            closes.push(last * 1.01);
        }
        let vol = volatility(&closes).unwrap();
        assert!(vol.abs() < 1e-9);
    }

    #[test]
    fn volatility_skips_steps_with_zero_prior_close() {
        let mut closes: Vec<f64> = (1..=21).map(|i| 100.0 + i as f64).collect();
        // 倒数第3个收盘价为0：它作为昨收的那一步被跳过，样本缩小但仍有结果
        let len = closes.len();
        closes[len - 3] = 0.0;
        assert!(volatility(&closes).is_some());
    }

    #[test]
    fn extremes_cover_whole_series_and_fall_back_to_quote() {
        let series = vec![
            bar("2024-03-01", 110.0, 90.0, 100.0),
            bar("2024-03-02", 120.0, 95.0, 101.0),
            bar("2024-03-03", 115.0, 85.0, 99.0),
        ];
        let set = compute(&series, &quote());
        assert_eq!(set.high52w, 120.0);
        assert_eq!(set.low52w, 85.0);

        let set = compute(&[], &quote());
        assert_eq!(set.high52w, 103.0);
        assert_eq!(set.low52w, 98.0);
        assert_eq!(set.sma10, None);
        assert_eq!(set.volatility, None);
    }

    #[test]
    fn nan_closes_are_excluded_from_indicator_input() {
        // 11根K线，其中1根收盘价无效：有效收盘价只剩10个
        let mut series: Vec<DailyBar> = (1..=11)
            .map(|i| bar(&format!("2024-03-{:02}", i), 101.0, 99.0, 100.0 + i as f64))
            .collect();
        series[5].close = f64::NAN;

        let set = compute(&series, &quote());
        let expected: f64 = (1..=11)
            .map(|i| 100.0 + i as f64)
            .filter(|c| *c != 106.0)
            .sum::<f64>()
            / 10.0;
        assert_eq!(set.sma10, Some(expected));
        // 无效的是收盘价，最高/最低价仍然参与极值
        assert_eq!(set.high52w, 101.0);
    }
}
