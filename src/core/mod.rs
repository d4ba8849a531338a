//! 核心模块 - 配置、状态与服务器
//!
//! - [`Config`] - 环境变量驱动的服务器配置
//! - [`ServerState`] - 共享应用状态 (连接池、JWT 服务)
//! - [`Server`] - HTTP 服务器

pub mod config;
pub mod server;
pub mod state;

pub use config::Config;
pub use server::{Server, build_app, build_router};
pub use state::ServerState;
