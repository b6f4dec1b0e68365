//! 页面定义 - 领域模型
//!
//! 纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的全部页面及其属性（布局分类、数据预取、控制器白名单）。

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// 应用页面枚举（封闭集合）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageName {
    Landing,
    Login,
    Signup,
    Verify,
    Verified,
    Home,
    Profile,
    EditProfile,
    Wardrobe,
    Shuffle,
    Calendar,
    CreateOutfit,
    OutfitSummary,
    SaveCalendar,
    EditOutfit,
    AddPage,
    Streaks,
}

impl PageName {
    pub const ALL: [PageName; 17] = [
        Self::Landing,
        Self::Login,
        Self::Signup,
        Self::Verify,
        Self::Verified,
        Self::Home,
        Self::Profile,
        Self::EditProfile,
        Self::Wardrobe,
        Self::Shuffle,
        Self::Calendar,
        Self::CreateOutfit,
        Self::OutfitSummary,
        Self::SaveCalendar,
        Self::EditOutfit,
        Self::AddPage,
        Self::Streaks,
    ];

    /// kebab-case 页面名，同时也是资源路径中的替换片段
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Landing => "landing",
            Self::Login => "login",
            Self::Signup => "signup",
            Self::Verify => "verify",
            Self::Verified => "verified",
            Self::Home => "home",
            Self::Profile => "profile",
            Self::EditProfile => "edit-profile",
            Self::Wardrobe => "wardrobe",
            Self::Shuffle => "shuffle",
            Self::Calendar => "calendar",
            Self::CreateOutfit => "create-outfit",
            Self::OutfitSummary => "outfit-summary",
            Self::SaveCalendar => "save-calendar",
            Self::EditOutfit => "edit-outfit",
            Self::AddPage => "add-page",
            Self::Streaks => "streaks",
        }
    }

    /// 将页面名解析为枚举，未知名称返回 `None`
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == name)
    }

    /// 片段根元素的 id
    ///
    /// 约定为 `<name>-page`，landing 片段例外，其根 id 就是 `landing`。
    pub fn fragment_id(&self) -> String {
        match self {
            Self::Landing => "landing".to_string(),
            other => format!("{}-page", other.as_str()),
        }
    }

    /// 由当前片段根元素 id 反推页面
    pub fn from_fragment_id(id: &str) -> Option<Self> {
        if id == "landing" {
            return Some(Self::Landing);
        }
        id.strip_suffix("-page").and_then(Self::from_name)
    }

    /// **布局分类：是否属于认证流程页面**
    ///
    /// 认证流程页面使用共享的 auth-layout 样式并隐藏侧边栏。
    pub fn is_auth_flow(&self) -> bool {
        matches!(
            self,
            Self::Login | Self::Signup | Self::Verify | Self::Verified | Self::Landing
        )
    }

    /// 控制器初始化前是否需要预取用户资料
    pub fn needs_user_data(&self) -> bool {
        matches!(self, Self::Home | Self::Profile)
    }

    /// 控制器白名单：不在其中的页面使用空控制器
    pub fn has_controller(&self) -> bool {
        matches!(
            self,
            Self::Landing | Self::Home | Self::Wardrobe | Self::Streaks
        )
    }
}

impl Display for PageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 页面参数值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

/// 导航请求携带的参数
///
/// 生命周期管理器不解释其中内容，校验由目标页面负责。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageParams(BTreeMap<String, ParamValue>);

impl PageParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: ParamValue) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    /// 整数参数；来自 JS 的数字可能以无小数部分的浮点数到达
    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.0.get(key)? {
            ParamValue::Int(v) => Some(*v),
            ParamValue::Float(v) if v.fract() == 0.0 => Some(*v as i64),
            _ => None,
        }
    }
}
