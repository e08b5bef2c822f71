//! Salon Server - 美容美发 / SPA 预约与通知服务
//!
//! # 架构概述
//!
//! - **预约生命周期** (`bookings`): 状态机、乐观锁、状态变更后的通知与到店记录
//! - **会员积分** (`loyalty`): 到店累计积分 / 次数，奖励兑换
//! - **通知** (`notify`): 站内通知 + WebSocket 实时推送 + 邮件 outbox
//! - **提醒** (`reminders`): 预约前 30 分钟 / 24 小时提醒
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! salon-server/src/
//! ├── api/           # HTTP 路由和处理器
//! ├── bookings/      # 预约状态机与副作用
//! ├── core/          # 后台任务管理
//! ├── db/            # SQLite 连接池与 repository
//! ├── loyalty/       # 到店记录与奖励兑换
//! ├── notify/        # 通知分发、hub、邮件
//! ├── tenants/       # 商户注册与默认服务目录
//! └── utils/         # 日志
//! ```

pub mod api;
pub mod bookings;
pub mod config;
pub mod core;
pub mod db;
pub mod directory;
pub mod loyalty;
pub mod notify;
pub mod reminders;
pub mod state;
pub mod tenants;
pub mod utils;

pub use config::Config;
pub use db::DbService;
pub use state::AppState;
pub use utils::init_logger;
