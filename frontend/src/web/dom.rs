//! 浏览器 DOM 宿主
//!
//! 元素查找限定在根容器内；样式与脚本元素挂在 `<head>` 下。

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use futures::future::LocalBoxFuture;
use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, HtmlLinkElement, HtmlScriptElement};

use crate::error::NavError;
use crate::host::{AssetId, Container, DomHost, ListenerId, TimerId};
use crate::log::{log_error, log_warn};

struct BrowserListener {
    target: Element,
    event: String,
    closure: Closure<dyn Fn(web_sys::Event)>,
}

pub struct BrowserDom {
    document: Document,
    root: HtmlElement,
    sidebar: HtmlElement,
    next_id: Cell<u32>,
    assets: RefCell<HashMap<u32, Element>>,
    listeners: RefCell<HashMap<u32, BrowserListener>>,
    /// 与回调共享，触发后由回调自行移除
    timers: Rc<RefCell<HashMap<u32, Timeout>>>,
}

impl BrowserDom {
    pub fn new(root: HtmlElement, sidebar: HtmlElement) -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self {
            document,
            root,
            sidebar,
            next_id: Cell::new(1),
            assets: RefCell::new(HashMap::new()),
            listeners: RefCell::new(HashMap::new()),
            timers: Rc::new(RefCell::new(HashMap::new())),
        })
    }

    fn next_id(&self) -> u32 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    fn container(&self, container: Container) -> &HtmlElement {
        match container {
            Container::Root => &self.root,
            Container::Sidebar => &self.sidebar,
        }
    }

    fn element(&self, id: &str) -> Option<Element> {
        self.root
            .query_selector(&format!("#{}", id))
            .ok()
            .flatten()
    }

    /// 创建资源元素并挂到 `<head>`，失败时只记录日志
    fn mount_asset(&self, element: Result<Element, JsValue>, url: &str) -> AssetId {
        let id = self.next_id();
        let mounted = element.and_then(|el| {
            let head = self
                .document
                .head()
                .ok_or_else(|| JsValue::from_str("document has no <head>"))?;
            head.append_child(&el)?;
            Ok(el)
        });
        match mounted {
            Ok(el) => {
                self.assets.borrow_mut().insert(id, el);
            }
            Err(e) => log_warn!("[Loader] Failed to attach {}: {:?}", url, e),
        }
        AssetId(id)
    }

    fn install_listener(
        &self,
        id: &str,
        event: &str,
        closure: Closure<dyn Fn(web_sys::Event)>,
    ) -> Option<ListenerId> {
        let target = self.element(id)?;
        target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .ok()?;

        let listener_id = self.next_id();
        self.listeners.borrow_mut().insert(
            listener_id,
            BrowserListener {
                target,
                event: event.to_string(),
                closure,
            },
        );
        Some(ListenerId(listener_id))
    }
}

impl DomHost for BrowserDom {
    fn set_container_html(&self, container: Container, html: &str) {
        self.container(container).set_inner_html(html);
    }

    fn root_fragment_id(&self) -> Option<String> {
        self.root
            .first_element_child()
            .map(|el| el.id())
            .filter(|id| !id.is_empty())
    }

    fn set_root_busy(&self, busy: bool) {
        let result = if busy {
            self.root
                .set_attribute("inert", "")
                .and_then(|_| self.root.set_attribute("aria-busy", "true"))
        } else {
            self.root
                .remove_attribute("inert")
                .and_then(|_| self.root.remove_attribute("aria-busy"))
        };
        if let Err(e) = result {
            log_warn!("[Lifecycle] Failed to toggle busy state: {:?}", e);
        }
    }

    fn set_sidebar_visible(&self, visible: bool) {
        self.sidebar.set_hidden(!visible);
    }

    fn attach_stylesheet(&self, href: &str) -> AssetId {
        let link = self
            .document
            .create_element("link")
            .and_then(|el| el.dyn_into::<HtmlLinkElement>().map_err(JsValue::from))
            .map(|link| {
                link.set_rel("stylesheet");
                link.set_href(href);
                link.unchecked_into::<Element>()
            });
        self.mount_asset(link, href)
    }

    fn attach_script(&self, src: &str, is_module: bool) -> AssetId {
        let script = self
            .document
            .create_element("script")
            .and_then(|el| el.dyn_into::<HtmlScriptElement>().map_err(JsValue::from))
            .map(|script| {
                if is_module {
                    script.set_type("module");
                }
                script.set_src(src);
                script.unchecked_into::<Element>()
            });
        self.mount_asset(script, src)
    }

    fn detach_asset(&self, asset: AssetId) {
        let removed = self.assets.borrow_mut().remove(&asset.0);
        if let Some(el) = removed {
            el.remove();
        }
    }

    fn has_element(&self, id: &str) -> bool {
        self.element(id).is_some()
    }

    fn set_text(&self, id: &str, text: &str) -> bool {
        self.element(id)
            .map(|el| el.set_text_content(Some(text)))
            .is_some()
    }

    fn set_inner_html(&self, id: &str, html: &str) -> bool {
        self.element(id).map(|el| el.set_inner_html(html)).is_some()
    }

    fn set_attribute(&self, id: &str, name: &str, value: &str) -> bool {
        self.element(id)
            .is_some_and(|el| el.set_attribute(name, value).is_ok())
    }

    fn set_class(&self, id: &str, class: &str, enabled: bool) -> bool {
        self.element(id)
            .is_some_and(|el| el.class_list().toggle_with_force(class, enabled).is_ok())
    }

    fn set_hidden(&self, id: &str, hidden: bool) -> bool {
        self.element(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            .map(|el| el.set_hidden(hidden))
            .is_some()
    }

    fn add_listener(&self, id: &str, event: &str, callback: Rc<dyn Fn()>) -> Option<ListenerId> {
        let closure = Closure::<dyn Fn(web_sys::Event)>::new(move |_: web_sys::Event| callback());
        self.install_listener(id, event, closure)
    }

    fn add_child_listener(
        &self,
        id: &str,
        event: &str,
        class: &str,
        data_key: &str,
        callback: Rc<dyn Fn(String)>,
    ) -> Option<ListenerId> {
        let class = class.to_string();
        let attr = format!("data-{}", data_key);
        let closure = Closure::<dyn Fn(web_sys::Event)>::new(move |event: web_sys::Event| {
            let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                return;
            };
            if !target.class_list().contains(&class) {
                return;
            }
            if let Some(value) = target.get_attribute(&attr) {
                callback(value);
            }
        });
        self.install_listener(id, event, closure)
    }

    fn remove_listener(&self, listener: ListenerId) {
        let removed = self.listeners.borrow_mut().remove(&listener.0);
        if let Some(l) = removed {
            let _ = l
                .target
                .remove_event_listener_with_callback(&l.event, l.closure.as_ref().unchecked_ref());
        }
    }

    fn mark_children(
        &self,
        id: &str,
        class: &str,
        data_key: &str,
        value: &str,
        marker: &str,
    ) -> bool {
        let Some(children) = self
            .element(id)
            .and_then(|el| el.query_selector_all(&format!(".{}", class)).ok())
        else {
            return false;
        };
        let attr = format!("data-{}", data_key);
        for i in 0..children.length() {
            let Some(child) = children.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let matched = child.get_attribute(&attr).as_deref() == Some(value);
            let _ = child.class_list().toggle_with_force(marker, matched);
        }
        true
    }

    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerId {
        let id = self.next_id();
        let timers = self.timers.clone();
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        let timeout = Timeout::new(millis, move || {
            // 回调执行期间不能 drop 自身，移出后交给 forget
            let fired = timers.borrow_mut().remove(&id);
            if let Some(timeout) = fired {
                let _ = timeout.forget();
            }
            callback();
        });
        self.timers.borrow_mut().insert(id, timeout);
        TimerId(id)
    }

    fn clear_timeout(&self, timer: TimerId) {
        let removed = self.timers.borrow_mut().remove(&timer.0);
        if let Some(timeout) = removed {
            let _ = timeout.cancel();
        }
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }

    fn report(&self, error: &NavError) {
        log_error!("[Lifecycle] {}", error);
    }
}
