use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use docchat::connector::adapter::DEFAULT_HOST;
use docchat::{AllowList, Commands, Container, ContainerConfig, Router};

#[derive(Parser)]
#[command(name = "docchat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Ollama server address
    #[arg(long, global = true, env = "OLLAMA_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Models offered for documents (comma-separated)
    #[arg(long, global = true, value_delimiter = ',')]
    text_models: Option<Vec<String>>,

    /// Models offered for images (comma-separated)
    #[arg(long, global = true, value_delimiter = ',')]
    vision_models: Option<Vec<String>>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let text_models = match cli.text_models {
        Some(names) => AllowList::new(names),
        None => AllowList::text_default(),
    };
    let vision_models = match cli.vision_models {
        Some(names) => AllowList::new(names),
        None => AllowList::vision_default(),
    };

    let container = Container::new(ContainerConfig {
        host: cli.host,
        text_models,
        vision_models,
    });

    match cli.command {
        Commands::Chat { file, model } => {
            docchat::cli::repl::run(&container, file, model).await?;
        }
        command => {
            let router = Router::new(&container);
            let output = router.route(command).await?;
            println!("{}", output);
        }
    }

    Ok(())
}
