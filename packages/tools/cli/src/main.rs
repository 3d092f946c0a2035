//! rds CLI
//!
//! Rails 프로젝트의 `db/*schema.rb`를 읽어 테이블/컬럼 트리를 보여주는 도구입니다.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod context;
mod discover;

use config::CliConfig;

#[derive(Parser)]
#[command(name = "rds")]
#[command(author, version, about = "rds - Rails DB schema explorer", long_about = None)]
struct Cli {
    /// Workspace root (defaults to the current directory)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Schema to activate (identifier, path suffix, or file name)
    #[arg(long, global = true)]
    schema: Option<String>,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// List discovered schema files
    Schemas,

    /// Show all tables of the active schema
    Tables {
        /// Show columns under each table
        #[arg(long, short)]
        expand: bool,
    },

    /// Filter tables by table or column name
    Search {
        term: String,

        /// Show columns under each table
        #[arg(long, short)]
        expand: bool,
    },

    /// Show the table matching a model file
    Reveal { file: PathBuf },

    /// Print the declaration line of a table (path:line)
    Locate { table: String },

    /// Print a `table.column` reference
    Reference {
        column: String,

        /// Owning table (defaults to the first table having the column)
        #[arg(long)]
        table: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // 로깅 초기화 (stdout은 출력 전용이므로 stderr로)
    let default_filter = if cli.verbose {
        "rds=debug,rds_core=debug"
    } else {
        "rds=info,rds_core=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // 설정 로드
    let config = CliConfig::load()?;

    // 컨텍스트 결정 (CLI 옵션 > 환경변수/설정)
    let ctx = context::resolve_context(cli.root, cli.schema, cli.format, &config)?;

    // 명령 실행
    match cli.command {
        Commands::Schemas => commands::schemas::list(&config, &ctx),
        Commands::Tables { expand } => commands::tables::show(&config, &ctx, expand),
        Commands::Search { term, expand } => commands::search::run(&config, &ctx, &term, expand),
        Commands::Reveal { file } => commands::reveal::run(&config, &ctx, &file),
        Commands::Locate { table } => commands::locate::run(&config, &ctx, &table),
        Commands::Reference { column, table } => {
            commands::reference::run(&config, &ctx, &column, table.as_deref())
        }
    }
}
