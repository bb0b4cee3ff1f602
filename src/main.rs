use anyhow::Result;
use canvas_quiz_import::utils::logging;
use canvas_quiz_import::{App, Cli, Config};
use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let config = Config::load(&cli.config_file_name)?;

    // 初始化日志
    logging::init(cli.verbose || config.verbose_logging);

    // 初始化并运行应用
    let mut operator = cli.operator();
    App::initialize(config, &cli.pl_repo, cli.import_options(), cli.selection())?
        .run(&mut operator)
        .await?;

    Ok(())
}
