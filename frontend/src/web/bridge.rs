//! JS 桥接
//!
//! 仍由 JS 驱动的部分（侧边栏脚本、遗留页面模块、身份提供方）通过这里
//! 与生命周期管理器交互：
//! - `navigate` 自定义事件：`{ detail: { page, params? } }`
//! - `window.loadPage(page, params)`：返回切换完成时 resolve 的 Promise
//! - `notifyAuthState(user | null)`：身份状态变化

use std::cell::RefCell;

use js_sys::{Promise, Reflect};
use serde::Deserialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use wardrobe_shared::{AuthUser, NAVIGATE_EVENT, PageName, PageParams};

use crate::auth::AuthGate;
use crate::lifecycle::{Navigator, PageLifecycleManager};
use crate::log::{log_info, log_warn};

#[derive(Deserialize)]
struct NavigateDetail {
    page: String,
    #[serde(default)]
    params: PageParams,
}

thread_local! {
    static AUTH_GATE: RefCell<Option<AuthGate>> = const { RefCell::new(None) };
    /// 启动完成前收到的最后一次身份状态
    static PENDING_AUTH: RefCell<Option<Option<AuthUser>>> = const { RefCell::new(None) };
}

/// 未知页面名只记录，不导航
fn parse_page(name: &str) -> Option<PageName> {
    let page = PageName::from_name(name);
    if page.is_none() {
        log_warn!("[Bridge] Ignoring navigation to unknown page '{}'", name);
    }
    page
}

fn parse_params(value: JsValue) -> Result<PageParams, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(PageParams::new());
    }
    Ok(serde_wasm_bindgen::from_value(value)?)
}

fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("window is not available"))
}

/// 监听全局 `navigate` 事件
pub fn install_navigate_listener(navigator: Navigator) -> Result<(), JsValue> {
    let closure = Closure::<dyn Fn(web_sys::Event)>::new(move |event: web_sys::Event| {
        let Some(event) = event.dyn_ref::<web_sys::CustomEvent>() else {
            return;
        };
        match serde_wasm_bindgen::from_value::<NavigateDetail>(event.detail()) {
            Ok(detail) => {
                if let Some(page) = parse_page(&detail.page) {
                    navigator.request(page, detail.params);
                }
            }
            Err(e) => log_warn!("[Bridge] Malformed navigate event: {}", e),
        }
    });

    window()?.add_event_listener_with_callback(NAVIGATE_EVENT, closure.as_ref().unchecked_ref())?;

    // 泄漏闭包以保持监听器存活
    closure.forget();
    Ok(())
}

/// 安装 `window.loadPage`
pub fn install_load_page(manager: PageLifecycleManager) -> Result<(), JsValue> {
    let closure = Closure::<dyn Fn(String, JsValue) -> Promise>::new(
        move |name: String, params: JsValue| {
            let manager = manager.clone();
            future_to_promise(async move {
                let params = parse_params(params)?;
                if let Some(page) = parse_page(&name) {
                    manager.navigate_to(page, params).await;
                }
                Ok(JsValue::UNDEFINED)
            })
        },
    );

    Reflect::set(&window()?, &JsValue::from_str("loadPage"), closure.as_ref())?;
    closure.forget();
    Ok(())
}

/// 注册认证闸门；若启动前已有状态推送，立即补发
pub fn register_auth_gate(gate: AuthGate) {
    AUTH_GATE.with(|slot| *slot.borrow_mut() = Some(gate.clone()));

    let pending = PENDING_AUTH.with(|slot| slot.borrow_mut().take());
    if let Some(user) = pending {
        wasm_bindgen_futures::spawn_local(async move {
            gate.on_auth_state_changed(user).await;
        });
    }
}

/// 身份提供方的状态回调，由 JS 胶水代码调用
#[wasm_bindgen(js_name = notifyAuthState)]
pub fn notify_auth_state(user: JsValue) -> Promise {
    future_to_promise(async move {
        let user: Option<AuthUser> = if user.is_null() || user.is_undefined() {
            None
        } else {
            Some(serde_wasm_bindgen::from_value(user)?)
        };

        let gate = AUTH_GATE.with(|slot| slot.borrow().clone());
        match gate {
            Some(gate) => gate.on_auth_state_changed(user).await,
            None => {
                log_info!("[Auth] State received before startup, deferred");
                PENDING_AUTH.with(|slot| *slot.borrow_mut() = Some(user));
            }
        }
        Ok(JsValue::UNDEFINED)
    })
}
