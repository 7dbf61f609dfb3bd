/// MPX Analyzer - frequency response of the MPX conditioning chain
use clap::{Parser, Subcommand, ValueEnum};
use mpx_analyzer::{build_plot_data, grade_ripple, run, write_plot_data, AnalyzerConfig};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mpx-analyzer")]
#[command(about = "Frequency response and flatness analysis of the MPX filter chain", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze the configured chain and print a report
    Analyze {
        /// Configuration file path
        #[arg(short, long, env = "MPX_CONFIG")]
        config: Option<PathBuf>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Export plot series as JSON
    Export {
        /// Output file
        #[arg(short, long, default_value = "frequency_response.json")]
        output: PathBuf,
        /// Configuration file path
        #[arg(short, long, env = "MPX_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Grade a peak-to-peak ripple value in dB
    Grade {
        /// Peak-to-peak ripple; negative values are accepted here and rejected with an error
        #[arg(allow_negative_numbers = true)]
        ripple_db: f64,
    },
    /// Print the effective configuration as TOML
    Config {
        /// Configuration file path
        #[arg(short, long, env = "MPX_CONFIG")]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mpx_analyzer=info,mpx_response=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze { config, format } => {
            let config = AnalyzerConfig::load(config.as_deref())?;
            let report = run(&config)?;
            match format {
                OutputFormat::Text => print!("{}", report),
                OutputFormat::Json => println!("{}", report.to_json()?),
            }
        }
        Commands::Export { output, config } => {
            let config = AnalyzerConfig::load(config.as_deref())?;
            let data = build_plot_data(&config)?;
            write_plot_data(&data, &output)?;
        }
        Commands::Grade { ripple_db } => {
            let grade = grade_ripple(ripple_db)?;
            info!("Graded {} dB", ripple_db);
            println!("Measured Ripple: {:.4} dB", ripple_db);
            println!("Quality Rating: {}", grade);
        }
        Commands::Config { config } => {
            let config = AnalyzerConfig::load(config.as_deref())?;
            config.validate()?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
