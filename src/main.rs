use anyhow::Context;
use taskbar_popup::{App, EventLoop, PopupConfig, bootstrap};
use tracing::warn;

/// 程序入口点
fn main() -> anyhow::Result<()> {
    // 配置有误时回退到默认配置，保证日志可以先初始化
    let (config, config_error) = match PopupConfig::load_or_default() {
        Ok(config) => (config, None),
        Err(e) => (PopupConfig::default(), Some(e)),
    };

    bootstrap::init_logging(&config.log_level);
    if let Some(e) = config_error {
        warn!("配置文件无效，使用默认配置: {}", e);
    }

    if let Err(e) = run(config) {
        bootstrap::report_startup_failure(&e);
        return Err(e);
    }

    Ok(())
}

fn run(config: PopupConfig) -> anyhow::Result<()> {
    let event_loop = EventLoop::new().context("创建事件循环失败")?;

    let mut app = App::new(config);
    event_loop.run_app(&mut app).context("运行应用失败")?;

    if let Some(e) = app.take_startup_error() {
        return Err(e);
    }

    Ok(())
}
