use std::time::{Duration, Instant};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::animation::{AnimationRun, AnimationStrategy, Direction, Frame, select_strategy};
use crate::config::{ActivationMode, PopupConfig};
use crate::errors::PopupResult;
use crate::geometry::{self, PopupGeometry, ScreenSize};
use crate::system::{
    EventDispatcher, EventSubscription, HistoryRecorder, OsVersionProbe, PopupEvent,
    SearchHistory, SystemVersionProbe, TaskbarEdge, TaskbarGeometry,
};

/// 弹出窗口的可见状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisibilityState {
    #[default]
    Hidden,
    Showing,
    Visible,
    Hiding,
}

impl VisibilityState {
    /// 是否处于进入或退出动画中
    pub fn is_transitioning(self) -> bool {
        matches!(self, VisibilityState::Showing | VisibilityState::Hiding)
    }
}

/// 渲染表面（外部协作方）
///
/// 控制器只通过这个接口操作真实窗口：每帧下发几何信息和透明度，
/// 只在显示前和隐藏完成时调用真正的显示/隐藏。
pub trait PopupSurface {
    /// 当前屏幕尺寸
    fn screen_size(&self) -> ScreenSize;

    /// 应用一帧动画
    fn apply_frame(&mut self, frame: &Frame);

    /// 真正显示窗口，activate 为 true 时同时激活
    fn show(&mut self, activate: bool);

    /// 真正隐藏窗口
    fn hide(&mut self);

    fn set_topmost(&mut self, topmost: bool);

    /// 窗口当前是否为活动窗口
    fn is_active(&self) -> bool;

    /// 把焦点交给搜索框
    fn focus_search_box(&mut self);
}

/// 停靠位置：静止时的几何信息和对应的任务栏边
#[derive(Debug, Clone, Copy, PartialEq)]
struct Placement {
    edge: TaskbarEdge,
    geometry: PopupGeometry,
}

/// 弹出窗口生命周期控制器
///
/// 拥有唯一的可见状态。`show`/`hide` 只负责启动转换，
/// 状态推进、真正隐藏和置顶都在 [`LifecycleController::tick`] 里完成。
pub struct LifecycleController<S: PopupSurface> {
    surface: S,
    strategy: Box<dyn AnimationStrategy>,
    taskbar: watch::Receiver<TaskbarGeometry>,
    dispatcher: EventDispatcher,
    history: Box<dyn HistoryRecorder>,
    config: PopupConfig,
    state: VisibilityState,
    run: Option<AnimationRun>,
    placement: Option<Placement>,
    /// 动画期间任务栏发生了变化，进入 Visible 后重新布局
    layout_stale: bool,
    requested_size: (f64, f64),
    search_term: String,
}

impl<S: PopupSurface> LifecycleController<S> {
    pub fn state(&self) -> VisibilityState {
        self.state
    }

    pub fn is_animating(&self) -> bool {
        self.run.is_some()
    }

    /// 静止时的窗口几何信息（尚未显示过时为 None）
    pub fn geometry(&self) -> Option<PopupGeometry> {
        self.placement.map(|placement| placement.geometry)
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn config(&self) -> &PopupConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// 显示弹出窗口
    pub fn show(&mut self) {
        match self.state {
            VisibilityState::Hidden => self.begin_entrance(),
            VisibilityState::Hiding if self.config.interrupt_transitions => {
                self.reverse(Direction::Enter)
            }
            VisibilityState::Showing | VisibilityState::Visible => {
                if self.config.activation_mode == ActivationMode::Icon && self.surface.is_active() {
                    self.surface.focus_search_box();
                }
                debug!("忽略显示请求，当前状态: {:?}", self.state);
            }
            VisibilityState::Hiding => debug!("忽略显示请求，正在隐藏"),
        }
    }

    /// 隐藏弹出窗口
    pub fn hide(&mut self) {
        match self.state {
            VisibilityState::Visible => self.begin_exit(),
            VisibilityState::Showing if self.config.interrupt_transitions => {
                self.reverse(Direction::Exit)
            }
            _ => debug!("忽略隐藏请求，当前状态: {:?}", self.state),
        }
    }

    /// 可见时隐藏，否则显示
    pub fn toggle(&mut self) {
        if self.state == VisibilityState::Visible {
            self.hide();
        } else {
            self.show();
        }
    }

    /// 推进动画，elapsed 为距离上一帧的时间
    pub fn tick(&mut self, elapsed: Duration) {
        let Some(run) = self.run.as_mut() else {
            return;
        };

        let frame = run.advance(elapsed);
        let complete = run.is_complete();
        self.surface.apply_frame(&frame);

        if complete {
            self.finish();
        }
    }

    /// 处理总线上的事件
    pub fn handle_event(&mut self, event: &PopupEvent) {
        match event {
            PopupEvent::ShowRequested => self.show(),
            PopupEvent::ToggleRequested => self.toggle(),
            PopupEvent::UnfocusRequested => self.hide(),
            PopupEvent::TaskbarSizeChanged(_) => self.relayout(),
            // 停靠边变化之后总会跟着一个尺寸变化事件
            PopupEvent::TaskbarEdgeChanged(_)
            | PopupEvent::FocusRequested
            | PopupEvent::VisibilityChanged(_) => {}
        }
    }

    /// 处理所有已排队的事件，返回处理的数量
    pub fn process_events(&mut self, subscription: &mut EventSubscription) -> usize {
        let mut handled = 0;
        while let Some(event) = subscription.try_next() {
            self.handle_event(&event);
            handled += 1;
        }
        handled
    }

    /// 窗口被激活
    pub fn handle_activated(&mut self) {
        if self.config.activation_mode == ActivationMode::Icon {
            self.surface.focus_search_box();
        }
        self.dispatcher.publish(PopupEvent::FocusRequested);
    }

    /// 键盘焦点离开窗口，inside_app 表示焦点仍在本程序内
    pub fn on_focus_lost(&mut self, inside_app: bool) {
        if !inside_app {
            self.hide();
        }
    }

    /// 记住用户调整后的窗口尺寸，之后的布局都以它为请求尺寸
    pub fn remember_size(&mut self, width: f64, height: f64) -> bool {
        if self.state != VisibilityState::Visible || !width.is_finite() || !height.is_finite() {
            return false;
        }
        if width <= 0.0 || height <= 0.0 {
            return false;
        }

        self.requested_size = (width, height);
        debug!("记住弹出窗口尺寸: {}x{}", width, height);
        true
    }

    /// 按最新的任务栏信息重新布局
    ///
    /// 可见时立即生效；动画中则在进入 Visible 后生效；隐藏时留给下一次显示。
    pub fn relayout(&mut self) {
        if self.state.is_transitioning() {
            self.layout_stale = true;
            return;
        }

        if self.state != VisibilityState::Visible {
            return;
        }

        let placement = self.compute_placement();
        if self.placement != Some(placement) {
            info!("任务栏变化，重新布局: {:?}", placement.geometry);
            self.surface
                .apply_frame(&Frame::settled(placement.edge, placement.geometry));
            self.placement = Some(placement);
        }
        self.layout_stale = false;
    }

    fn compute_placement(&self) -> Placement {
        let taskbar = *self.taskbar.borrow();
        let screen = self.surface.screen_size();
        let (width, height) = self.requested_size;
        Placement {
            edge: taskbar.edge,
            geometry: geometry::compute(screen.width, screen.height, taskbar, width, height),
        }
    }

    fn begin_entrance(&mut self) {
        let placement = self.compute_placement();
        let run = self
            .strategy
            .entrance(placement.geometry, placement.edge, self.config.timing());

        // 先把窗口摆到起始帧，再真正显示，避免闪现在终点
        self.surface.apply_frame(&run.frame());
        self.surface
            .show(self.config.activation_mode == ActivationMode::Icon);
        // 提到最前后立即取消置顶
        self.surface.set_topmost(true);
        self.surface.set_topmost(false);
        if let Some(topmost) = run.start_topmost() {
            self.surface.set_topmost(topmost);
        }

        debug!(
            "开始进入动画: {} {:?} {:?}",
            self.strategy.name(),
            placement.edge,
            placement.geometry
        );
        self.placement = Some(placement);
        self.layout_stale = false;
        self.run = Some(run);
        self.set_state(VisibilityState::Showing);
    }

    fn begin_exit(&mut self) {
        self.record_history();

        let placement = match self.placement {
            Some(placement) => placement,
            None => self.compute_placement(),
        };
        let run = self
            .strategy
            .exit(placement.geometry, placement.edge, self.config.timing());
        if let Some(topmost) = run.start_topmost() {
            self.surface.set_topmost(topmost);
        }

        debug!("开始退出动画: {} {:?}", self.strategy.name(), placement.edge);
        self.run = Some(run);
        self.set_state(VisibilityState::Hiding);
    }

    /// 从当前帧反向
    fn reverse(&mut self, direction: Direction) {
        let (Some(current), Some(placement)) = (self.run.as_ref().map(AnimationRun::frame), self.placement)
        else {
            return;
        };

        let timing = self.config.timing();
        let (mut run, state) = match direction {
            Direction::Enter => (
                self.strategy.entrance(placement.geometry, placement.edge, timing),
                VisibilityState::Showing,
            ),
            Direction::Exit => {
                self.record_history();
                (
                    self.strategy.exit(placement.geometry, placement.edge, timing),
                    VisibilityState::Hiding,
                )
            }
        };
        run.rebase(&current);
        if let Some(topmost) = run.start_topmost() {
            self.surface.set_topmost(topmost);
        }

        debug!("动画反向: {:?} -> {:?}", self.state, state);
        self.run = Some(run);
        self.set_state(state);
    }

    fn finish(&mut self) {
        let Some(run) = self.run.take() else {
            return;
        };

        if run.direction() == Direction::Exit {
            self.surface.hide();
        }
        if let Some(topmost) = run.complete_topmost() {
            self.surface.set_topmost(topmost);
        }

        match run.direction() {
            Direction::Enter => {
                self.set_state(VisibilityState::Visible);
                if self.layout_stale {
                    self.relayout();
                }
            }
            Direction::Exit => self.set_state(VisibilityState::Hidden),
        }
    }

    fn record_history(&mut self) {
        if let Err(e) = self.history.record(&self.search_term) {
            warn!("记录搜索历史失败: {}", e);
        }
    }

    fn set_state(&mut self, state: VisibilityState) {
        if self.state == state {
            return;
        }
        info!("可见状态: {:?} -> {:?}", self.state, state);
        self.state = state;
        self.dispatcher.publish(PopupEvent::VisibilityChanged(state));
    }
}

/// 驱动控制器的帧时钟
///
/// 只在动画连续运行时累计时间。空闲期间新开始的动画第一帧从零开始，
/// 不会把空闲的时间算进动画里。
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    last: Instant,
    running: bool,
}

impl FrameClock {
    pub fn new(now: Instant) -> Self {
        Self {
            last: now,
            running: false,
        }
    }

    /// 距离上一帧应推进的时长
    pub fn elapsed(&self, now: Instant) -> Duration {
        if self.running {
            now.saturating_duration_since(self.last)
        } else {
            Duration::ZERO
        }
    }

    /// 推进控制器一帧，返回本帧使用的时长
    pub fn drive<S: PopupSurface>(
        &mut self,
        controller: &mut LifecycleController<S>,
        now: Instant,
    ) -> Duration {
        let elapsed = self.elapsed(now);
        controller.tick(elapsed);
        self.last = now;
        self.running = controller.is_animating();
        elapsed
    }
}

/// 生命周期控制器构造器
pub struct LifecycleBuilder {
    config: PopupConfig,
    history: Option<Box<dyn HistoryRecorder>>,
    os_probe: Box<dyn OsVersionProbe>,
}

impl Default for LifecycleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleBuilder {
    pub fn new() -> Self {
        Self {
            config: PopupConfig::default(),
            history: None,
            os_probe: Box::new(SystemVersionProbe),
        }
    }

    pub fn with_config(mut self, config: PopupConfig) -> Self {
        self.config = config;
        self
    }

    /// 指定搜索历史记录器，默认使用内存中的 [`SearchHistory`]
    pub fn with_history(mut self, history: impl HistoryRecorder + 'static) -> Self {
        self.history = Some(Box::new(history));
        self
    }

    pub fn with_os_probe(mut self, probe: impl OsVersionProbe + 'static) -> Self {
        self.os_probe = Box::new(probe);
        self
    }

    /// 校验配置并创建控制器，动画策略在这里按系统版本确定
    pub fn build<S: PopupSurface>(
        self,
        surface: S,
        taskbar: watch::Receiver<TaskbarGeometry>,
        dispatcher: EventDispatcher,
    ) -> PopupResult<LifecycleController<S>> {
        self.config.validate()?;

        let version = self.os_probe.version();
        let strategy = select_strategy(version);
        info!("系统版本 {}，使用 {} 动画", version, strategy.name());

        let limit = self.config.history_limit;
        let history = self
            .history
            .unwrap_or_else(|| Box::new(SearchHistory::new(limit)));
        let requested_size = (self.config.popup_width, self.config.popup_height);

        Ok(LifecycleController {
            surface,
            strategy,
            taskbar,
            dispatcher,
            history,
            config: self.config,
            state: VisibilityState::Hidden,
            run: None,
            placement: None,
            layout_stale: false,
            requested_size,
            search_term: String::new(),
        })
    }
}
