//! 宿主抽象层
//!
//! 生命周期管理器与页面控制器只通过这里的 trait 接触浏览器：
//! - `DomHost`: 持久容器、样式/脚本元素、片段内元素、监听器、定时器、任务派发
//! - `FragmentFetcher`: 按路径获取文本资源
//!
//! wasm32 下由 `web` 模块提供实现；测试中使用本文件末尾的 Mock。

use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::LocalBoxFuture;

use crate::error::{NavError, NavResult};

/// 由管理器独占的持久容器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Container {
    /// 页面片段的根容器
    Root,
    /// 常驻侧边栏容器
    Sidebar,
}

/// 已挂载的 `<link>` / `<script>` 元素句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u32);

/// 抽象 DOM 接口
///
/// 元素级操作（`has_element` 到 `add_listener`）只在根容器内查找，
/// 控制器因此无法触及片段以外的元素。
pub trait DomHost {
    // --- 持久容器 ---

    fn set_container_html(&self, container: Container, html: &str);
    /// 根容器第一个子元素的 id
    fn root_fragment_id(&self) -> Option<String>;
    /// 切换期间禁止根容器交互
    fn set_root_busy(&self, busy: bool);
    fn set_sidebar_visible(&self, visible: bool);

    // --- 样式与脚本 ---

    fn attach_stylesheet(&self, href: &str) -> AssetId;
    fn attach_script(&self, src: &str, is_module: bool) -> AssetId;
    /// 移除元素；已移除时为空操作
    fn detach_asset(&self, asset: AssetId);

    // --- 片段内元素 ---

    fn has_element(&self, id: &str) -> bool;
    fn set_text(&self, id: &str, text: &str) -> bool;
    fn set_inner_html(&self, id: &str, html: &str) -> bool;
    fn set_attribute(&self, id: &str, name: &str, value: &str) -> bool;
    fn set_class(&self, id: &str, class: &str, enabled: bool) -> bool;
    fn set_hidden(&self, id: &str, hidden: bool) -> bool;
    fn add_listener(&self, id: &str, event: &str, callback: Rc<dyn Fn()>) -> Option<ListenerId>;
    /// 事件委托：容器内带 `class` 的子元素触发事件时，回调收到其 `data-{data_key}` 值
    fn add_child_listener(
        &self,
        id: &str,
        event: &str,
        class: &str,
        data_key: &str,
        callback: Rc<dyn Fn(String)>,
    ) -> Option<ListenerId>;
    fn remove_listener(&self, listener: ListenerId);
    /// 容器内带 `class` 的子元素中，`data-{data_key}` 等于 `value` 的加上 `marker`，其余移除
    fn mark_children(
        &self,
        id: &str,
        class: &str,
        data_key: &str,
        value: &str,
        marker: &str,
    ) -> bool;

    // --- 调度 ---

    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerId;
    fn clear_timeout(&self, timer: TimerId);
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);

    /// 诊断日志出口
    fn report(&self, error: &NavError);
}

/// 抽象资源获取接口
#[async_trait(?Send)]
pub trait FragmentFetcher {
    /// 获取文本内容；非 2xx 与网络错误都返回 `FragmentLoad`
    async fn fetch_text(&self, path: &str) -> NavResult<String>;
}

// =========================================================
// 测试环境实现 (Mock)
// =========================================================
