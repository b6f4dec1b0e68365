//! 页面生命周期管理器 - 核心引擎
//!
//! 单线程协作式状态机：`Empty -> Transitioning -> Displayed -> Transitioning ...`
//!
//! 一次切换的流程：
//! 清理旧页面 -> 移除旧资源 -> 布局分类 -> 挂载样式 -> 加载片段 -> 预取数据 -> 初始化控制器
//!
//! 并发策略：FIFO 串行化。切换进行中发起的导航进入队列，
//! 在当前切换结束后依次执行，不合并也不丢弃。

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::panic::AssertUnwindSafe;
use std::rc::{Rc, Weak};

use futures::FutureExt;
use futures::channel::oneshot;
use wardrobe_shared::{PageName, PageParams};

use crate::auth::Session;
use crate::backend::WardrobeBackend;
use crate::config::AppConfig;
use crate::error::{NavError, NavErrorKind};
use crate::host::{Container, DomHost, FragmentFetcher};
use crate::loader::{ResourceLoader, ScriptHandle, StylesheetHandle};
use crate::log::log_info;
use crate::prefetch;
use crate::registry::{ControllerRegistry, NullController, PageController};
use crate::scope::{PageScope, ScopeDeps};

/// 管理器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// 尚未显示任何页面
    Empty,
    /// 切换进行中
    Transitioning {
        from: Option<PageName>,
        to: PageName,
    },
    /// 页面已显示且空闲
    Displayed(PageName),
}

impl LifecycleState {
    pub fn page(&self) -> Option<PageName> {
        match self {
            Self::Empty => None,
            Self::Transitioning { from, .. } => *from,
            Self::Displayed(page) => Some(*page),
        }
    }
}

/// 外部协作方（由调用方注入）
#[derive(Clone)]
pub struct LifecycleDeps {
    pub dom: Rc<dyn DomHost>,
    pub fetcher: Rc<dyn FragmentFetcher>,
    pub backend: Rc<dyn WardrobeBackend>,
    pub session: Session,
}

/// 当前页面挂载的样式与脚本
struct LoadedAssets {
    stylesheet: Option<StylesheetHandle>,
    script: Option<ScriptHandle>,
}

/// 当前显示的页面，清理句柄 = 控制器 cleanup + 作用域撤销
struct ActivePage {
    name: PageName,
    controller: Box<dyn PageController>,
    scope: PageScope,
    assets: LoadedAssets,
}

struct NavigationRequest {
    page: PageName,
    params: PageParams,
    done: Option<oneshot::Sender<()>>,
}

struct Shared {
    dom: Rc<dyn DomHost>,
    loader: ResourceLoader,
    backend: Rc<dyn WardrobeBackend>,
    session: Session,
    registry: ControllerRegistry,
    config: Rc<AppConfig>,
    navigator: Navigator,

    state: Cell<LifecycleState>,
    active: RefCell<Option<ActivePage>>,
    /// auth-layout 样式，在连续的认证流程页面之间保留
    layout: RefCell<Option<StylesheetHandle>>,
    queue: RefCell<VecDeque<NavigationRequest>>,
    driving: Cell<bool>,
    live_scopes: Cell<usize>,
}

impl Shared {
    fn report(&self, error: NavError) {
        self.dom.report(&error);
    }

    fn enqueue(self: &Rc<Self>, request: NavigationRequest) {
        self.queue.borrow_mut().push_back(request);
        if !self.driving.replace(true) {
            let shared = self.clone();
            self.dom.spawn(Box::pin(async move { shared.drain().await }));
        }
    }

    /// 依次执行队列中的导航，直到队列为空
    async fn drain(self: Rc<Self>) {
        loop {
            let next = self.queue.borrow_mut().pop_front();
            let Some(request) = next else {
                break;
            };
            self.transition(request.page, request.params).await;
            if let Some(done) = request.done {
                let _ = done.send(());
            }
        }
        self.driving.set(false);
    }

    async fn transition(&self, page: PageName, params: PageParams) {
        let from = self.state.get().page();
        self.state
            .set(LifecycleState::Transitioning { from, to: page });
        self.dom.set_root_busy(true);
        log_info!(
            "[Lifecycle] {} -> {}",
            from.map(|p| p.as_str()).unwrap_or("(none)"),
            page
        );

        // --- Step 1: 清理旧页面并移除其资源 ---
        let outgoing = self.active.borrow_mut().take();
        if let Some(outgoing) = outgoing {
            self.tear_down(outgoing);
        }

        // --- Step 2: 布局分类 ---
        if page.is_auth_flow() {
            let mut layout = self.layout.borrow_mut();
            if layout.is_none() {
                *layout = Some(
                    self.loader
                        .attach_stylesheet(&self.config.layout_stylesheet_path()),
                );
            }
            self.dom.set_sidebar_visible(false);
        } else {
            let layout = self.layout.borrow_mut().take();
            if let Some(layout) = layout {
                self.loader.detach_stylesheet(layout);
            }
            self.dom.set_sidebar_visible(true);
        }

        // --- Step 3: 页面样式、脚本与片段 ---
        let stylesheet = self
            .loader
            .attach_stylesheet(&self.config.page_stylesheet_path(page));
        let script = self
            .config
            .page_script_path(page)
            .map(|src| self.loader.attach_script(&src, true));

        let fragment = self.config.fragment_path(page);
        if let Err(e) = self.loader.load_fragment(&fragment, Container::Root).await {
            self.report(e.in_op_with("lifecycle.transition", page.as_str()));
        }

        let scope = PageScope::new(
            page,
            ScopeDeps {
                dom: self.dom.clone(),
                backend: self.backend.clone(),
                navigator: self.navigator.clone(),
                session: self.session.clone(),
                config: self.config.clone(),
            },
        );
        self.live_scopes.set(self.live_scopes.get() + 1);

        // --- Step 4: 预取用户数据（控制器假定资料已经渲染） ---
        if page.needs_user_data() {
            if let Some(user) = self.session.current() {
                if let Err(e) = prefetch::paint_user_profile(&scope, &user).await {
                    self.report(e.in_op_with("lifecycle.transition", page.as_str()));
                }
            }
        }

        // --- Step 5: 解析并初始化控制器 ---
        let controller = self.init_controller(page, &scope, &params).await;

        *self.active.borrow_mut() = Some(ActivePage {
            name: page,
            controller,
            scope,
            assets: LoadedAssets {
                stylesheet: Some(stylesheet),
                script,
            },
        });
        self.state.set(LifecycleState::Displayed(page));
        self.dom.set_root_busy(false);
    }

    /// 初始化失败时返回空控制器，页面保持无交互但应用继续运行
    async fn init_controller(
        &self,
        page: PageName,
        scope: &PageScope,
        params: &PageParams,
    ) -> Box<dyn PageController> {
        let mut controller = match self.registry.resolve(page) {
            Ok(controller) => controller,
            Err(e) => {
                self.report(e.in_op_with("lifecycle.init", page.as_str()));
                return Box::new(NullController::new(page));
            }
        };

        let outcome = AssertUnwindSafe(controller.init(scope, params))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(())) => controller,
            Ok(Err(e)) => {
                self.report(e.in_op_with("lifecycle.init", page.as_str()));
                Box::new(NullController::new(page))
            }
            Err(panic) => {
                self.report(
                    NavError::init(panic_message(panic.as_ref()))
                        .in_op_with("lifecycle.init", page.as_str()),
                );
                Box::new(NullController::new(page))
            }
        }
    }

    /// 运行旧页面的清理句柄；任何失败都只记录，不阻塞导航
    fn tear_down(&self, outgoing: ActivePage) {
        let ActivePage {
            name,
            mut controller,
            scope,
            assets,
        } = outgoing;

        match std::panic::catch_unwind(AssertUnwindSafe(|| controller.cleanup())) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => self.report(
                e.reclassify(NavErrorKind::Cleanup)
                    .in_op_with("lifecycle.cleanup", name.as_str()),
            ),
            Err(panic) => self.report(
                NavError::cleanup(panic_message(panic.as_ref()))
                    .in_op_with("lifecycle.cleanup", name.as_str()),
            ),
        }

        scope.dispose();
        self.live_scopes.set(self.live_scopes.get() - 1);

        if let Some(script) = assets.script {
            self.loader.detach_script(script);
        }
        if let Some(stylesheet) = assets.stylesheet {
            self.loader.detach_stylesheet(stylesheet);
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        format!("panicked: {}", msg)
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        format!("panicked: {}", msg)
    } else {
        "panicked".to_string()
    }
}

// =========================================================
// 导航句柄
// =========================================================

/// 导航句柄
///
/// 控制器、定时器、DOM 事件通过它发起导航。只持有弱引用，
/// 管理器销毁后调用为空操作。
#[derive(Clone)]
pub struct Navigator {
    shared: Weak<Shared>,
}

impl Navigator {
    /// 发起导航，不等待完成
    pub fn request(&self, page: PageName, params: PageParams) {
        if let Some(shared) = self.shared.upgrade() {
            shared.enqueue(NavigationRequest {
                page,
                params,
                done: None,
            });
        }
    }

    /// 发起导航并等待其完成
    ///
    /// 空闲时在当前任务中直接驱动队列；忙碌时排队等待。
    /// 不可在控制器 `init` 内 await，否则会等待自身所在的切换。
    pub async fn navigate(&self, page: PageName, params: PageParams) {
        let Some(shared) = self.shared.upgrade() else {
            return;
        };
        let (done, finished) = oneshot::channel();
        shared.queue.borrow_mut().push_back(NavigationRequest {
            page,
            params,
            done: Some(done),
        });

        if !shared.driving.replace(true) {
            shared.clone().drain().await;
        }
        let _ = finished.await;
    }
}

// =========================================================
// 管理器
// =========================================================

/// 页面生命周期管理器
///
/// 根容器、侧边栏、当前样式/脚本槽位只由管理器修改。
#[derive(Clone)]
pub struct PageLifecycleManager {
    shared: Rc<Shared>,
}

impl PageLifecycleManager {
    pub fn new(deps: LifecycleDeps, registry: ControllerRegistry, config: AppConfig) -> Self {
        let shared = Rc::new_cyclic(|weak: &Weak<Shared>| Shared {
            loader: ResourceLoader::new(deps.dom.clone(), deps.fetcher.clone()),
            dom: deps.dom,
            backend: deps.backend,
            session: deps.session,
            registry,
            config: Rc::new(config),
            navigator: Navigator {
                shared: weak.clone(),
            },
            state: Cell::new(LifecycleState::Empty),
            active: RefCell::new(None),
            layout: RefCell::new(None),
            queue: RefCell::new(VecDeque::new()),
            driving: Cell::new(false),
            live_scopes: Cell::new(0),
        });
        Self { shared }
    }

    pub fn navigator(&self) -> Navigator {
        self.shared.navigator.clone()
    }

    pub fn config(&self) -> &AppConfig {
        &self.shared.config
    }

    pub fn session(&self) -> &Session {
        &self.shared.session
    }

    /// 导航到指定页面并等待切换完成
    pub async fn navigate_to(&self, page: PageName, params: PageParams) {
        self.navigator().navigate(page, params).await;
    }

    pub fn state(&self) -> LifecycleState {
        self.shared.state.get()
    }

    pub fn current_page(&self) -> Option<PageName> {
        self.shared.active.borrow().as_ref().map(|a| a.name)
    }

    /// 当前显示页面的作用域
    pub fn active_scope(&self) -> Option<PageScope> {
        self.shared
            .active
            .borrow()
            .as_ref()
            .map(|a| a.scope.clone())
    }

    /// 由根容器中片段的根元素 id 反推页面
    pub fn fragment_page(&self) -> Option<PageName> {
        self.shared
            .dom
            .root_fragment_id()
            .and_then(|id| PageName::from_fragment_id(&id))
    }

    /// 当前存活的作用域数量（清理句柄），任意时刻至多为 1
    pub fn live_scopes(&self) -> usize {
        self.shared.live_scopes.get()
    }

    /// 是否有切换在进行或排队
    pub fn is_busy(&self) -> bool {
        self.shared.driving.get()
    }

    /// 加载常驻侧边栏：片段、样式、脚本
    pub async fn mount_sidebar(&self) {
        let config = &self.shared.config;
        let loader = &self.shared.loader;
        if let Err(e) = loader
            .load_fragment(&config.sidebar_fragment_path(), Container::Sidebar)
            .await
        {
            self.shared.report(e.in_op("lifecycle.mount_sidebar"));
        }
        // 常驻资源，句柄不再需要
        let _ = loader.attach_stylesheet(&config.sidebar_stylesheet_path());
        let _ = loader.attach_script(&config.sidebar_script_path(), true);
    }
}
