//! 运行时配置
//!
//! 默认值以常量给出；wasm32 下启动时可从 LocalStorage 读取 JSON 覆盖项，
//! 方便在不重新构建的情况下切换后端地址或调整跳转延迟。

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use wardrobe_shared::PageName;

// =========================================================
// 默认配置
// =========================================================

pub const DEFAULT_API_BASE_URL: &str = "https://ourfit-sync-mk-web.vercel.app";
const DEFAULT_ASSET_BASE: &str = "./";
const DEFAULT_LANDING_DELAY_MS: u64 = 2000;
const DEFAULT_AUTH_LAYOUT: &str = "auth-layout";
const DEFAULT_FALLBACK_AVATAR_URL: &str =
    "https://ui-avatars.com/api/?name=User&background=random&color=fff";

/// LocalStorage 中覆盖项的键
pub const CONFIG_STORAGE_KEY: &str = "wardrobe_config";

const SIDEBAR_FRAGMENT: &str = "components/sidebar.html";
const SIDEBAR_STYLESHEET: &str = "page-style/sidebar.css";
const SIDEBAR_SCRIPT: &str = "components/sidebar.js";

/// 可选覆盖项，缺省字段保持默认值
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverrides {
    pub api_base_url: Option<String>,
    pub asset_base: Option<String>,
    pub landing_delay_ms: Option<u64>,
    pub auth_layout: Option<String>,
    pub fallback_avatar_url: Option<String>,
    #[serde(default)]
    pub page_scripts: BTreeMap<PageName, String>,
}

/// 应用配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    /// 所有片段、样式、脚本路径的前缀
    pub asset_base: String,
    /// landing 页自动跳转到 login 的延迟
    pub landing_delay: Duration,
    /// 认证流程页面共享的布局样式名
    pub auth_layout: String,
    pub fallback_avatar_url: String,
    /// 仍由 JS 模块驱动的页面（页面 -> 模块路径）
    pub page_scripts: BTreeMap<PageName, String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            asset_base: DEFAULT_ASSET_BASE.to_string(),
            landing_delay: Duration::from_millis(DEFAULT_LANDING_DELAY_MS),
            auth_layout: DEFAULT_AUTH_LAYOUT.to_string(),
            fallback_avatar_url: DEFAULT_FALLBACK_AVATAR_URL.to_string(),
            page_scripts: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// 在默认值上应用覆盖项
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(url) = overrides.api_base_url {
            self.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(base) = overrides.asset_base {
            self.asset_base = base;
        }
        if let Some(ms) = overrides.landing_delay_ms {
            self.landing_delay = Duration::from_millis(ms);
        }
        if let Some(layout) = overrides.auth_layout {
            self.auth_layout = layout;
        }
        if let Some(avatar) = overrides.fallback_avatar_url {
            self.fallback_avatar_url = avatar;
        }
        self.page_scripts.extend(overrides.page_scripts);
        self
    }

    /// 从 LocalStorage 读取覆盖项，读取或解析失败时使用默认值
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        use gloo_storage::Storage;

        match gloo_storage::LocalStorage::get::<ConfigOverrides>(CONFIG_STORAGE_KEY) {
            Ok(overrides) => Self::default().with_overrides(overrides),
            Err(gloo_storage::errors::StorageError::KeyNotFound(_)) => Self::default(),
            Err(e) => {
                crate::log::log_warn!("[Config] Ignoring invalid overrides: {}", e);
                Self::default()
            }
        }
    }

    /// 拼接资源前缀
    pub fn asset_url(&self, path: &str) -> String {
        if self.asset_base.ends_with('/') {
            format!("{}{}", self.asset_base, path)
        } else {
            format!("{}/{}", self.asset_base, path)
        }
    }

    pub fn fragment_path(&self, page: PageName) -> String {
        self.asset_url(&format!("pages/{}.html", page))
    }

    pub fn page_stylesheet_path(&self, page: PageName) -> String {
        self.asset_url(&format!("page-style/{}.css", page))
    }

    pub fn layout_stylesheet_path(&self) -> String {
        self.asset_url(&format!("page-style/{}.css", self.auth_layout))
    }

    pub fn page_script_path(&self, page: PageName) -> Option<String> {
        self.page_scripts.get(&page).map(|p| self.asset_url(p))
    }

    pub fn sidebar_fragment_path(&self) -> String {
        self.asset_url(SIDEBAR_FRAGMENT)
    }

    pub fn sidebar_stylesheet_path(&self) -> String {
        self.asset_url(SIDEBAR_STYLESHEET)
    }

    pub fn sidebar_script_path(&self) -> String {
        self.asset_url(SIDEBAR_SCRIPT)
    }
}
