use anyhow::Result;
use rolls_live_senate::utils::logging;
use rolls_live_senate::{report_fatal, App, Config, LogReporter, RunOptions};
use tracing::error;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 加载配置
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            // 配置不可用，按默认级别输出日志
            logging::init(false);
            error!("❌ 配置加载失败: {}", e);
            return Err(e.into());
        }
    };

    // 初始化日志
    logging::init(config.verbose_logging);

    // 数据库就绪之前的报告只能写日志
    let fallback = LogReporter::new(&config.report_source);

    let options = match RunOptions::from_env() {
        Ok(options) => options,
        Err(e) => {
            error!("❌ 运行参数解析失败: {}", e);
            report_fatal(&fallback, &e).await;
            return Err(e.into());
        }
    };

    // 初始化并运行
    let app = match App::initialize(config).await {
        Ok(app) => app,
        Err(e) => {
            error!("❌ 初始化失败: {}", e);
            report_fatal(&fallback, &e).await;
            return Err(e.into());
        }
    };

    if let Err(e) = app.run(options).await {
        error!("❌ 运行失败: {}", e);
        report_fatal(app.reporter(), &e).await;
        return Err(e.into());
    }

    Ok(())
}
