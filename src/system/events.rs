use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tracing::debug;

use crate::lifecycle::VisibilityState;
use crate::system::{TaskbarEdge, TaskbarGeometry};

/// 组件之间传递的事件
#[derive(Debug, Clone, PartialEq)]
pub enum PopupEvent {
    /// 热键或激活源请求显示弹出窗口
    ShowRequested,
    /// 请求切换显示状态
    ToggleRequested,
    /// 弹出窗口获得激活，请求宿主把焦点交给它
    FocusRequested,
    /// 请求弹出窗口放弃焦点（隐藏）
    UnfocusRequested,
    TaskbarEdgeChanged(TaskbarEdge),
    TaskbarSizeChanged(TaskbarGeometry),
    /// 可见状态发生变化
    VisibilityChanged(VisibilityState),
}

/// 发布/订阅事件总线
///
/// 每个订阅者拥有独立的无界队列：所有存活的订阅者都会收到每个事件，
/// 同一发布者的事件保持先后顺序，不同发布者之间不保证顺序。
#[derive(Debug, Clone, Default)]
pub struct EventDispatcher {
    subscribers: Arc<Mutex<Vec<mpsc::UnboundedSender<PopupEvent>>>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册新的订阅者
    pub fn subscribe(&self) -> EventSubscription {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.lock().push(sender);
        EventSubscription { receiver }
    }

    /// 发布事件，返回收到事件的订阅者数量
    ///
    /// 已经关闭的订阅者会在这里被移除。
    pub fn publish(&self, event: PopupEvent) -> usize {
        let mut subscribers = self.lock();
        subscribers.retain(|sender| sender.send(event.clone()).is_ok());
        debug!("发布事件 {:?} -> {} 个订阅者", event, subscribers.len());
        subscribers.len()
    }

    /// 当前订阅者数量
    pub fn subscriber_count(&self) -> usize {
        let mut subscribers = self.lock();
        subscribers.retain(|sender| !sender.is_closed());
        subscribers.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<mpsc::UnboundedSender<PopupEvent>>> {
        self.subscribers.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// 事件订阅句柄，丢弃即取消订阅
#[derive(Debug)]
pub struct EventSubscription {
    receiver: mpsc::UnboundedReceiver<PopupEvent>,
}

impl EventSubscription {
    /// 非阻塞地取出下一个事件（供 UI 线程每帧调用）
    pub fn try_next(&mut self) -> Option<PopupEvent> {
        self.receiver.try_recv().ok()
    }

    /// 等待下一个事件
    pub async fn next(&mut self) -> Option<PopupEvent> {
        self.receiver.recv().await
    }

    /// 取出所有已排队的事件
    pub fn drain(&mut self) -> Vec<PopupEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.try_next() {
            events.push(event);
        }
        events
    }
}
