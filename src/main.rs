//! 行情快照后端服务
//!
//! 提供单只股票的报价 + 历史K线 + 技术指标快照 API
//! 数据来源：Alpha Vantage

mod config;     // 配置加载
mod handlers;   // HTTP 请求处理器
mod models;     // 数据模型定义
mod services;   // 业务逻辑服务

use actix_web::{web, App, HttpServer, middleware::Logger};
use env_logger::Env;

/// 应用程序入口
///
/// 加载配置并启动 HTTP 服务器
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // 初始化日志系统，默认日志级别为 info
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let app_config = config::AppConfig::load();
    let bind_addr = app_config.bind_addr();
    let workers = app_config.server.workers;

    log::info!(
        "启动行情快照服务，标的 {}，监听 {}",
        app_config.provider.symbol,
        bind_addr
    );

    let data = web::Data::new(app_config);

    // 创建并启动 HTTP 服务器
    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())      // 添加请求日志中间件
            .app_data(data.clone())       // 注入应用配置
            .configure(handlers::config)  // 配置路由
    });

    if workers > 0 {
        server = server.workers(workers);
    }

    server.bind(bind_addr)?.run().await
}
