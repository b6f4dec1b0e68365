//! 认证模块
//!
//! 管理当前用户快照，并把身份状态变化映射为导航。
//! 身份提供方本身（登录、注册、邮件验证）在 JS 侧，
//! 通过 `notifyAuthState` 把状态推送进来。

use std::cell::RefCell;
use std::rc::Rc;

use wardrobe_shared::{AuthUser, PageName, PageParams};

use crate::lifecycle::PageLifecycleManager;
use crate::log::log_info;

/// 验证页上显示邮箱的元素
const VERIFY_EMAIL_LABEL: &str = "verify-email-text";

/// 当前用户会话（多个组件共享同一份快照）
#[derive(Clone, Default)]
pub struct Session(Rc<RefCell<Option<AuthUser>>>);

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<AuthUser> {
        self.0.borrow().clone()
    }

    pub fn set(&self, user: Option<AuthUser>) {
        *self.0.borrow_mut() = user;
    }
}

/// 身份状态变化后应执行的动作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthAction {
    /// 导航到指定页面
    Navigate(PageName),
    /// 重新加载当前页面（刷新数据）
    Reload(PageName),
    /// 已在验证页，仅刷新邮箱文本
    RefreshVerifyLabel(String),
}

/// **核心决策表**
///
/// `current` 为根容器中片段所对应的页面。
pub fn decide(user: Option<&AuthUser>, current: Option<PageName>) -> AuthAction {
    let Some(user) = user else {
        return AuthAction::Navigate(PageName::Landing);
    };

    if !user.email_verified {
        return if current == Some(PageName::Verify) {
            AuthAction::RefreshVerifyLabel(user.email.clone())
        } else {
            AuthAction::Navigate(PageName::Verify)
        };
    }

    match current {
        Some(page) if !page.is_auth_flow() => AuthAction::Reload(page),
        _ => AuthAction::Navigate(PageName::Home),
    }
}

/// 认证状态闸门
///
/// 与生命周期管理器共享同一个 `Session`。
#[derive(Clone)]
pub struct AuthGate {
    manager: PageLifecycleManager,
}

impl AuthGate {
    pub fn new(manager: PageLifecycleManager) -> Self {
        Self { manager }
    }

    /// 处理身份状态变化
    ///
    /// 先更新会话，再决策，保证预取阶段拿到的是新用户。
    pub async fn on_auth_state_changed(&self, user: Option<AuthUser>) {
        self.manager.session().set(user.clone());

        let current = self.manager.fragment_page();
        let action = decide(user.as_ref(), current);
        log_info!("[Auth] state changed, action: {:?}", action);

        match action {
            AuthAction::Navigate(page) | AuthAction::Reload(page) => {
                self.manager.navigate_to(page, PageParams::new()).await;
            }
            AuthAction::RefreshVerifyLabel(email) => {
                if let Some(scope) = self.manager.active_scope() {
                    scope.set_text(VERIFY_EMAIL_LABEL, &email);
                }
            }
        }
    }
}
