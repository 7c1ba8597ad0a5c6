use crate::*;
use crate::config::PopupConfig;
use crate::lifecycle::{FrameClock, LifecycleBuilder, LifecycleController};
use crate::system::{
    EventDispatcher, EventSubscription, SearchHistory, TaskbarGeometry, TaskbarMonitor,
    probe_taskbar, watch_taskbar,
};
use crate::widget::PopupWidget;

use anyhow::Context as _;
use std::sync::Arc;
use std::thread;
use tokio::sync::watch;
use tracing::{error, info, warn};
use winit::event::ElementState;
use winit::event_loop::ControlFlow;
use winit::keyboard::{Key, NamedKey};

/// 应用程序主结构体
pub struct App {
    config: PopupConfig,
    dispatcher: EventDispatcher,
    inbox: EventSubscription,
    /// 控制器创建前暂存的任务栏快照接收器
    taskbar: Option<watch::Receiver<TaskbarGeometry>>,
    controller: Option<LifecycleController<PopupWidget>>,
    clock: FrameClock,
    startup_error: Option<anyhow::Error>,
}

impl App {
    pub fn new(config: PopupConfig) -> Self {
        let dispatcher = EventDispatcher::new();
        let inbox = dispatcher.subscribe();

        let (monitor, taskbar) = TaskbarMonitor::new(dispatcher.clone());
        // 先同步探测一次，第一次显示时就能用上真实的任务栏信息
        monitor.poll(probe_taskbar);
        let monitor = Arc::new(monitor);

        let app = Self {
            config,
            dispatcher,
            inbox,
            taskbar: Some(taskbar),
            controller: None,
            clock: FrameClock::new(Instant::now()),
            startup_error: None,
        };

        app.start_background_services(monitor);
        app
    }

    /// 事件总线，热键等激活源通过它发送显示请求
    pub fn dispatcher(&self) -> EventDispatcher {
        self.dispatcher.clone()
    }

    /// 取出启动阶段的错误
    pub fn take_startup_error(&mut self) -> Option<anyhow::Error> {
        self.startup_error.take()
    }

    /// 在后台线程中轮询任务栏
    fn start_background_services(&self, monitor: Arc<TaskbarMonitor>) {
        let interval = self.config.taskbar_poll_interval();
        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(e) => {
                    error!("创建 tokio 运行时失败，任务栏变化将不会被检测: {}", e);
                    return;
                }
            };
            runtime.block_on(watch_taskbar(monitor, interval, probe_taskbar));
        });
    }

    /// 创建窗口和控制器
    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let taskbar = self
            .taskbar
            .take()
            .context("任务栏快照接收器已被占用")?;

        let mut widget = PopupWidget::new();
        widget
            .initialize(event_loop, &self.config)
            .context("初始化弹出窗口失败")?;

        let controller = LifecycleBuilder::new()
            .with_config(self.config.clone())
            .with_history(SearchHistory::new(self.config.history_limit))
            .build(widget, taskbar, self.dispatcher.clone())
            .context("创建生命周期控制器失败")?;

        info!("弹出窗口已就绪，动画策略: {}", controller.strategy_name());
        self.controller = Some(controller);
        Ok(())
    }

    fn handle_key(controller: &mut LifecycleController<PopupWidget>, event: &winit::event::KeyEvent) {
        if event.state != ElementState::Pressed {
            return;
        }

        let changed = match &event.logical_key {
            Key::Named(NamedKey::Escape) => {
                controller.hide();
                false
            }
            Key::Named(NamedKey::Backspace) => controller.surface_mut().backspace(),
            _ => match &event.text {
                Some(text) => controller.surface_mut().type_text(text),
                None => false,
            },
        };

        if changed {
            let term = controller.surface().search_term().to_string();
            controller.set_search_term(term);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.controller.is_some() || self.startup_error.is_some() {
            return;
        }

        if let Err(e) = self.initialize(event_loop) {
            self.startup_error = Some(e);
            event_loop.exit();
            return;
        }

        if self.config.show_on_startup {
            if let Some(controller) = self.controller.as_mut() {
                controller.show();
            }
        }

        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + self.config.frame_interval()));
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(controller) = self.controller.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = controller.surface_mut().draw_content() {
                    warn!("绘制失败: {}", e);
                }
            }
            WindowEvent::Focused(true) => {
                controller.surface_mut().set_focused(true);
                controller.handle_activated();
            }
            WindowEvent::Focused(false) => {
                controller.surface_mut().set_focused(false);
                // 只有一个窗口，失去焦点即焦点离开了本程序
                controller.on_focus_lost(false);
            }
            WindowEvent::Resized(size) => {
                let resized = controller
                    .geometry()
                    .map(|geometry| geometry.width.round() as u32 != size.width || geometry.height.round() as u32 != size.height)
                    .unwrap_or(false);
                if resized {
                    controller.remember_size(size.width as f64, size.height as f64);
                }
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                controller.surface_mut().refresh_screen_size();
                controller.relayout();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                Self::handle_key(controller, &event);
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(controller) = self.controller.as_mut() else {
            return;
        };

        controller.process_events(&mut self.inbox);

        let now = Instant::now();
        self.clock.drive(controller, now);

        // 动画期间按帧间隔唤醒，否则只需要定期检查总线
        let wait = if controller.is_animating() {
            self.config.frame_interval()
        } else {
            self.config.taskbar_poll_interval()
        };
        event_loop.set_control_flow(ControlFlow::WaitUntil(now + wait));
    }
}
