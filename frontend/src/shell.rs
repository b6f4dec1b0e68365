//! 应用外壳
//!
//! 只渲染两个持久容器，之后的内容全部由生命周期管理器写入。

use std::rc::Rc;

use leptos::html;
use leptos::prelude::*;
use web_sys::HtmlElement;

use crate::api::WardrobeApi;
use crate::auth::{AuthGate, Session};
use crate::config::AppConfig;
use crate::lifecycle::{LifecycleDeps, PageLifecycleManager};
use crate::log::{log_error, log_info};
use crate::pages::default_registry;
use crate::web::{self, BrowserDom, HttpFragmentFetcher};

/// 启动流程：侧边栏 -> 桥接 -> 认证闸门
fn start(root: HtmlElement, sidebar: HtmlElement) {
    let Some(dom) = BrowserDom::new(root, sidebar) else {
        log_error!("[App] Document is not available");
        return;
    };

    let config = AppConfig::load();
    log_info!("[App] Using API at {}", config.api_base_url);
    let backend = Rc::new(WardrobeApi::new(config.api_base_url.clone()));
    let manager = PageLifecycleManager::new(
        LifecycleDeps {
            dom: Rc::new(dom),
            fetcher: Rc::new(HttpFragmentFetcher),
            backend,
            session: Session::new(),
        },
        default_registry(),
        config,
    );

    wasm_bindgen_futures::spawn_local(async move {
        manager.mount_sidebar().await;

        if let Err(e) = web::install_navigate_listener(manager.navigator()) {
            log_error!("[App] Failed to install navigate listener: {:?}", e);
        }
        if let Err(e) = web::install_load_page(manager.clone()) {
            log_error!("[App] Failed to install window.loadPage: {:?}", e);
        }

        web::register_auth_gate(AuthGate::new(manager));
    });
}

#[component]
pub fn AppShell() -> impl IntoView {
    let sidebar_ref = NodeRef::<html::Div>::new();
    let root_ref = NodeRef::<html::Div>::new();

    // 两个容器都挂载后启动一次
    Effect::new(move |started: Option<bool>| {
        if started == Some(true) {
            return true;
        }
        match (root_ref.get(), sidebar_ref.get()) {
            (Some(root), Some(sidebar)) => {
                start(root.into(), sidebar.into());
                true
            }
            _ => false,
        }
    });

    view! {
        <div class="app-layout">
            <div id="sidebar-container" node_ref=sidebar_ref></div>
            <div id="app-root" node_ref=root_ref></div>
        </div>
    }
}
