use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use fxdash::core::log::init_logging;
use fxdash::core::{Amount, LookbackPeriod, Selection};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// More log output; repeat for more detail (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct PairArgs {
    /// Currency to convert from
    #[arg(short, long, default_value = "USD")]
    from: String,

    /// Currency to convert to
    #[arg(short, long, default_value = "KRW")]
    to: String,

    /// Trend lookback: 1W, 1M or 1Y
    #[arg(short, long, default_value_t = LookbackPeriod::Month)]
    period: LookbackPeriod,
}

impl PairArgs {
    fn into_selection(self, amount: &str) -> Selection {
        Selection::new(Amount::parse(amount), &self.from, &self.to, self.period)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount and show the rate trend
    Convert {
        /// Amount to convert
        #[arg(default_value = "1000")]
        amount: String,

        #[command(flatten)]
        pair: PairArgs,
    },
    /// List supported currencies
    Currencies,
    /// Interactive dashboard that updates as you edit the selection
    Watch {
        /// Initial amount
        #[arg(short, long, default_value = "1000")]
        amount: String,

        #[command(flatten)]
        pair: PairArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;

    let config_path = cli.config_path.as_deref();
    let result = match cli.command {
        Some(Commands::Setup) => fxdash::cli::setup::setup(),
        Some(Commands::Convert { amount, pair }) => {
            let command = fxdash::AppCommand::Convert(pair.into_selection(&amount));
            fxdash::run_command(command, config_path).await
        }
        Some(Commands::Currencies) => {
            fxdash::run_command(fxdash::AppCommand::Currencies, config_path).await
        }
        Some(Commands::Watch { amount, pair }) => {
            let command = fxdash::AppCommand::Watch(pair.into_selection(&amount));
            fxdash::run_command(command, config_path).await
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
