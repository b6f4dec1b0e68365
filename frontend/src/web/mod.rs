//! 浏览器绑定（仅 wasm32）
//!
//! - `dom`: `DomHost` 的 web_sys 实现
//! - `fetch`: 基于 gloo-net 的片段获取
//! - `bridge`: 与 JS 侧的事件、全局函数和导出

mod bridge;
mod dom;
mod fetch;

pub use bridge::{install_load_page, install_navigate_listener, register_auth_gate};
pub use dom::BrowserDom;
pub use fetch::HttpFragmentFetcher;
