//! 衣橱应用前端
//!
//! 单页应用的页面生命周期管理：
//! - `lifecycle`: 页面切换状态机（核心引擎）
//! - `registry` / `pages`: 控制器注册表与内置页面控制器
//! - `scope`: 控制器可见的受限 DOM 接口
//! - `auth`: 身份状态到导航的映射
//! - `host` / `backend`: 浏览器与 REST 后端的抽象，测试中替换为 Mock
//!
//! 浏览器相关实现只在 wasm32 下编译。

mod log;

pub mod auth;
pub mod backend;
pub mod config;
pub mod error;
pub mod host;
pub mod lifecycle;
pub mod loader;
pub mod pages;
mod prefetch;
pub mod registry;
pub mod scope;

#[cfg(target_arch = "wasm32")]
mod api;
#[cfg(target_arch = "wasm32")]
mod shell;
#[cfg(target_arch = "wasm32")]
pub(crate) mod web;

#[cfg(target_arch = "wasm32")]
pub use shell::AppShell;
