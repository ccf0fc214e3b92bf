//! 业务逻辑服务模块
//!
//! 封装上游数据获取、指标计算和快照编排逻辑

pub mod alphavantage;       // Alpha Vantage 上游接口
pub mod indicators;         // 技术指标计算（纯函数）
pub mod snapshot_service;   // 快照编排
