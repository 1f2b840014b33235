use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::{info, Level};

use ibeacon::{decode_payload, BeaconConfig, ConsoleRadio, IBeaconEncoder};

#[derive(Parser)]
#[command(name = "ibeacond")]
#[command(about = "iBeacon broadcaster - encode and advertise an iBeacon payload", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (defaults to beacon.json in the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode the payload and start advertising until Ctrl-C
    Start(BeaconArgs),
    /// Print the payload without broadcasting
    Encode(BeaconArgs),
    /// Print the fields of a hex payload
    Decode {
        /// 50-character hex payload
        payload: String,
    },
}

#[derive(Args, Default)]
struct BeaconArgs {
    /// Beacon UUID, 32 hex characters
    #[arg(short, long)]
    uuid: Option<String>,

    /// Major identifier
    #[arg(short = 'M', long)]
    major: Option<u16>,

    /// Minor identifier
    #[arg(short = 'm', long)]
    minor: Option<u16>,

    /// Calibrated RSSI at 1 m, in dBm (e.g. -59)
    #[arg(short, long, allow_negative_numbers = true)]
    tx_power: Option<i8>,

    /// Name shown in radio log lines
    #[arg(short, long)]
    radio_name: Option<String>,
}

impl From<BeaconArgs> for BeaconConfig {
    fn from(args: BeaconArgs) -> Self {
        BeaconConfig {
            uuid: args.uuid,
            major: args.major,
            minor: args.minor,
            tx_power: args.tx_power,
            radio_name: args.radio_name,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .init();

    match cli.command {
        Some(Commands::Start(args)) => {
            let config = resolve_config(cli.config, args)?;
            run_beacon(config).await?;
        }
        None => {
            let config = resolve_config(cli.config, BeaconArgs::default())?;
            run_beacon(config).await?;
        }
        Some(Commands::Encode(args)) => {
            let config = resolve_config(cli.config, args)?;
            let payload = config.identity()?.payload()?;
            println!("{}", payload);
        }
        Some(Commands::Decode { payload }) => {
            let identity = decode_payload(&payload)?;
            println!("uuid:     {}", identity.uuid);
            println!("major:    {}", identity.major);
            println!("minor:    {}", identity.minor);
            println!("tx_power: {} dBm", identity.tx_power);
        }
    }

    Ok(())
}

fn resolve_config(
    path: Option<PathBuf>,
    args: BeaconArgs,
) -> Result<BeaconConfig, ibeacon::ConfigError> {
    let file = BeaconConfig::load_or_default(path.as_deref())?;
    Ok(file.merge(args.into()))
}

async fn run_beacon(config: BeaconConfig) -> Result<(), Box<dyn std::error::Error>> {
    let identity = config.identity()?;
    info!("📡 iBeacon");
    info!("   {}", identity);

    let mut encoder = IBeaconEncoder::new(ConsoleRadio::new(config.radio_name()));
    encoder.broadcast_identity(&identity)?;

    info!("Advertising, press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;

    encoder.radio_mut().stop();
    Ok(())
}
