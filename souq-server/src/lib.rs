//! Souq Server - 电商后端服务
//!
//! # 架构概述
//!
//! 网关负责身份认证，本服务只信任注入的用户头，专注业务：
//!
//! - **购物车** (`carts`): 按支付渠道（在线/货到付款）拆分的购物车
//! - **优惠券** (`coupons`): 折扣、使用上限、营销分佣
//! - **积分** (`points`): 动态抵扣与静态兑现两种模式
//! - **订单** (`orders`): 创建、短信验证、支付回调结算、物流
//! - **仓储** (`warehouse`): 备货预留与出库分配
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! souq-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── carts/         # 购物车渠道拆分
//! ├── coupons/       # 优惠券引擎
//! ├── points/        # 积分引擎
//! ├── orders/        # 订单生命周期
//! ├── warehouse/     # 仓储预留
//! ├── pricing/       # 行项目定价
//! ├── clients/       # 外部收款/物流/邮件/短信
//! ├── notify/        # Socket.IO 实时通知
//! ├── db/            # 数据库层
//! └── utils/         # 错误、日志、校验
//! ```

pub mod api;
pub mod carts;
pub mod clients;
pub mod core;
pub mod coupons;
pub mod db;
pub mod notify;
pub mod orders;
pub mod points;
pub mod pricing;
pub mod utils;
pub mod warehouse;

// Re-export 公共类型
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}
