//! 页面作用域
//!
//! 控制器拿到的唯一 DOM 入口。所有操作都限定在当前片段内，
//! 经由作用域注册的监听器与定时器在 `dispose` 时统一撤销；
//! 撤销之后作用域上的写操作、导航请求都变为空操作，
//! 仍在运行的异步任务因此无法污染下一个页面。

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use wardrobe_shared::{AuthUser, PageName, PageParams};

use crate::auth::Session;
use crate::backend::WardrobeBackend;
use crate::config::AppConfig;
use crate::error::{NavError, NavResult};
use crate::host::{DomHost, ListenerId, TimerId};
use crate::lifecycle::Navigator;

/// 作用域依赖（由生命周期管理器注入）
#[derive(Clone)]
pub struct ScopeDeps {
    pub dom: Rc<dyn DomHost>,
    pub backend: Rc<dyn WardrobeBackend>,
    pub navigator: Navigator,
    pub session: Session,
    pub config: Rc<AppConfig>,
}

struct ScopeInner {
    page: PageName,
    deps: ScopeDeps,
    active: Cell<bool>,
    listeners: RefCell<Vec<ListenerId>>,
    timers: RefCell<Vec<TimerId>>,
}

#[derive(Clone)]
pub struct PageScope {
    inner: Rc<ScopeInner>,
}

impl PageScope {
    pub(crate) fn new(page: PageName, deps: ScopeDeps) -> Self {
        Self {
            inner: Rc::new(ScopeInner {
                page,
                deps,
                active: Cell::new(true),
                listeners: RefCell::new(Vec::new()),
                timers: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn page(&self) -> PageName {
        self.inner.page
    }

    pub fn is_active(&self) -> bool {
        self.inner.active.get()
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.deps.config
    }

    pub fn backend(&self) -> Rc<dyn WardrobeBackend> {
        self.inner.deps.backend.clone()
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.inner.deps.session.current()
    }

    fn dom(&self) -> Option<&dyn DomHost> {
        self.is_active().then(|| self.inner.deps.dom.as_ref())
    }

    /// 确认片段包含本页面的根元素
    pub fn require_root(&self) -> NavResult<()> {
        let root_id = self.inner.page.fragment_id();
        if self.has_element(&root_id) {
            Ok(())
        } else {
            Err(NavError::contract_violation(format!(
                "Fragment has no #{} root element",
                root_id
            ))
            .in_op_with("scope.require_root", self.inner.page.as_str()))
        }
    }

    // --- 片段内元素操作 ---

    pub fn has_element(&self, id: &str) -> bool {
        self.dom().is_some_and(|dom| dom.has_element(id))
    }

    pub fn set_text(&self, id: &str, text: &str) -> bool {
        self.dom().is_some_and(|dom| dom.set_text(id, text))
    }

    pub fn set_inner_html(&self, id: &str, html: &str) -> bool {
        self.dom().is_some_and(|dom| dom.set_inner_html(id, html))
    }

    pub fn set_attribute(&self, id: &str, name: &str, value: &str) -> bool {
        self.dom().is_some_and(|dom| dom.set_attribute(id, name, value))
    }

    pub fn set_class(&self, id: &str, class: &str, enabled: bool) -> bool {
        self.dom().is_some_and(|dom| dom.set_class(id, class, enabled))
    }

    pub fn set_hidden(&self, id: &str, hidden: bool) -> bool {
        self.dom().is_some_and(|dom| dom.set_hidden(id, hidden))
    }

    /// 只给 `data-{data_key}` 等于 `value` 的子元素加上 `marker`
    pub fn mark_children(
        &self,
        id: &str,
        class: &str,
        data_key: &str,
        value: &str,
        marker: &str,
    ) -> bool {
        self.dom()
            .is_some_and(|dom| dom.mark_children(id, class, data_key, value, marker))
    }

    // --- 可撤销的注册 ---

    /// 绑定事件监听器；元素不存在时返回 false
    pub fn on<F>(&self, id: &str, event: &str, callback: F) -> bool
    where
        F: Fn() + 'static,
    {
        let Some(dom) = self.dom() else {
            return false;
        };
        match dom.add_listener(id, event, Rc::new(callback)) {
            Some(listener) => {
                self.inner.listeners.borrow_mut().push(listener);
                true
            }
            None => false,
        }
    }

    /// 委托监听容器内带 `class` 的子元素，回调收到子元素的 `data-{data_key}` 值
    pub fn on_child<F>(
        &self,
        id: &str,
        event: &str,
        class: &str,
        data_key: &str,
        callback: F,
    ) -> bool
    where
        F: Fn(String) + 'static,
    {
        let Some(dom) = self.dom() else {
            return false;
        };
        match dom.add_child_listener(id, event, class, data_key, Rc::new(callback)) {
            Some(listener) => {
                self.inner.listeners.borrow_mut().push(listener);
                true
            }
            None => false,
        }
    }

    /// 启动一次性定时器，页面离开时自动清除
    pub fn set_timeout<F>(&self, delay: Duration, callback: F)
    where
        F: FnOnce() + 'static,
    {
        let Some(dom) = self.dom() else {
            return;
        };
        let guard = self.clone();
        let timer = dom.set_timeout(
            delay,
            Box::new(move || {
                if guard.is_active() {
                    callback();
                }
            }),
        );
        self.inner.timers.borrow_mut().push(timer);
    }

    /// 派发异步任务；任务内通过作用域进行的写操作在页面离开后失效
    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + 'static,
    {
        if let Some(dom) = self.dom() {
            dom.spawn(Box::pin(task));
        }
    }

    /// 请求导航（不等待完成）
    pub fn request(&self, page: PageName, params: PageParams) {
        if self.is_active() {
            self.inner.deps.navigator.request(page, params);
        }
    }

    #[cfg(test)]
    pub(crate) fn registered_listeners(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// 撤销全部注册，可重复调用
    pub(crate) fn dispose(&self) {
        if !self.inner.active.replace(false) {
            return;
        }
        let dom = &self.inner.deps.dom;
        for listener in self.inner.listeners.borrow_mut().drain(..) {
            dom.remove_listener(listener);
        }
        for timer in self.inner.timers.borrow_mut().drain(..) {
            dom.clear_timeout(timer);
        }
    }
}
