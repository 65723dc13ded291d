use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use wrap_snake::audio::{AudioSink, Silent, TerminalBell};
use wrap_snake::game::GameConfig;
use wrap_snake::logger;
use wrap_snake::modes::HumanMode;

#[derive(Parser)]
#[command(name = "wrap_snake")]
#[command(version, about = "Snake on a wrap-around board with obstacles")]
struct Cli {
    /// JSON file with game settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Board width in cells
    #[arg(long)]
    width: Option<i32>,

    /// Board height in cells
    #[arg(long)]
    height: Option<i32>,

    /// Milliseconds between game ticks
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Treat the cell the tail is leaving as solid
    #[arg(long)]
    strict_tail: bool,

    /// Disable the terminal bell
    #[arg(long)]
    mute: bool,

    /// Log file (defaults to wrap_snake.log in the temp directory)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_json_file(path)?,
            None => GameConfig::default(),
        };

        config.set_cells(self.width, self.height)?;
        if let Some(tick_ms) = self.tick_ms {
            config.tick_interval_ms = tick_ms;
        }
        if self.strict_tail {
            config.strict_tail_collision = true;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = cli.log_file.clone().unwrap_or_else(logger::default_log_path);
    logger::init(&log_path)?;

    let config = cli.game_config()?;
    log::info!("starting with {:?}", config);

    let audio: Box<dyn AudioSink> = if cli.mute {
        Box::new(Silent)
    } else {
        Box::new(TerminalBell::new())
    };

    let mut human_mode = HumanMode::new(config, audio)?;
    human_mode.run().await?;

    Ok(())
}
