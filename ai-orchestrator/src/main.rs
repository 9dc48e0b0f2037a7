use ai_orchestrator::Orchestrator;
use clap::Parser;
use common::config::AppConfig;
use common::service::shutdown_signal;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "ai-orchestrator", version, about = "AI Orchestrator Service")]
struct Args {
    /// 配置文件路径，默认读取 ./config/config.yaml（不存在时使用内置默认值）
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    // 加载配置
    let config = Arc::new(AppConfig::from_file(args.config.as_deref())?);

    // 初始化日志
    common::logging::init_from_config(&config.log)?;

    info!("正在启动 AI Orchestrator 服务...");

    let orchestrator = Orchestrator::from_config(config)?;

    // 先绑定监听，再注册，最后开始处理请求
    let listener = orchestrator.bind()?;
    orchestrator.run(listener, shutdown_signal()).await?;

    info!("AI Orchestrator 服务已关闭");
    Ok(())
}
