//! 配置模块
//!
//! 支持从 JSON 文件加载系统配置

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
    /// 工作线程数（0 表示使用 CPU 核心数）
    #[serde(default)]
    pub workers: usize,
}

/// 上游行情数据源配置（Alpha Vantage）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// 上游 API 基础地址
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// 固定查询的股票代码（本部署只服务一只标的）
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// API Key（为空则读取 ALPHAVANTAGE_API_KEY 环境变量，再退到共享 demo key）
    #[serde(default)]
    pub api_key: String,
    /// 出站请求超时时间（秒）
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// 报价与历史两次调用之间的间隔（毫秒，0 表示不等待）
    ///
    /// 上游免费档位按分钟限流，两次调用串行并隔开可以少踩限流
    #[serde(default = "default_inter_call_delay")]
    pub inter_call_delay_ms: u64,
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,
    /// 数据源配置
    #[serde(default)]
    pub provider: ProviderConfig,
}

// 默认值函数
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_base_url() -> String { "https://www.alphavantage.co".to_string() }
fn default_symbol() -> String { "AAPL".to_string() }
fn default_timeout() -> u64 { 30 }
fn default_inter_call_delay() -> u64 { 1500 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: 0,
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            symbol: default_symbol(),
            api_key: String::new(),
            timeout_secs: default_timeout(),
            inter_call_delay_ms: default_inter_call_delay(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            provider: ProviderConfig::default(),
        }
    }
}

impl AppConfig {
    /// 从 JSON 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// 加载配置，优先从文件，失败则使用默认值；最后补齐 API Key
    pub fn load() -> Self {
        let config_paths = ["config.json", "config/config.json"];

        let mut config = Self::default();
        for path in config_paths {
            if Path::new(path).exists() {
                match Self::from_file(path) {
                    Ok(loaded) => {
                        log::info!("从 {} 加载配置成功", path);
                        config = loaded;
                        break;
                    }
                    Err(e) => {
                        log::warn!("加载配置文件 {} 失败: {}", path, e);
                    }
                }
            }
        }

        config.provider.resolve_api_key();
        config
    }

    /// 获取服务器绑定地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl ProviderConfig {
    /// 配置文件未提供 Key 时，从环境变量读取，缺省回退到共享 demo key
    pub fn resolve_api_key(&mut self) {
        if !self.api_key.is_empty() {
            return;
        }
        self.api_key = env::var("ALPHAVANTAGE_API_KEY").unwrap_or_else(|_| {
            log::warn!("未设置 ALPHAVANTAGE_API_KEY 环境变量，使用共享 demo key");
            "demo".to_string()
        });
    }
}
