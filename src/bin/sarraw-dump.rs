//! Inspect a SAR raw product from the command line.
//!
//! ```text
//! sarraw-dump /data/s1a-iw-raw-s-vv-20231018t061532 --packet 0 --packet 10 --scan
//! ```

use std::path::PathBuf;

use clap::Parser;
use log::{debug, info};
use miette::{IntoDiagnostic, Result, WrapErr};
use serde::Serialize;

use sarraw::{Packet, PacketIndexEntry, ProductConfig, SarProduct};

#[derive(Parser, Clone, Debug)]
#[command(version, about = "Dump SAR raw product records and packet headers as JSON")]
pub struct Cli {
    #[clap(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity<clap_verbosity_flag::InfoLevel>,

    /// Product path prefix, without the `-annot.dat` / `-index.dat` / `.dat` suffixes
    pub prefix: PathBuf,

    /// JSON file overriding file suffixes and inter-packet padding
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the index entry and packet headers of this packet (repeatable)
    #[arg(short, long = "packet")]
    pub packets: Vec<usize>,

    /// Walk the whole data file sequentially and report the packet count
    #[arg(long, default_value_t = false)]
    pub scan: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Summary {
    annotations: usize,
    indices: usize,
    data_bytes: u64,
    first_sensing_time: Option<String>,
    last_sensing_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scanned_packets: Option<usize>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PacketDump<'a> {
    index: usize,
    entry: &'a PacketIndexEntry,
    packet: &'a Packet,
    signal_type: String,
    polarisation: String,
    baq_mode: String,
    number_of_samples: u32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();

    let config = match &cli.config {
        Some(path) => ProductConfig::from_json_file(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Loading config {}", path.display()))?,
        None => ProductConfig::default(),
    };
    debug!("Using {:?}", config);

    let mut product = SarProduct::with_config(&cli.prefix, config);
    product
        .init()
        .into_diagnostic()
        .wrap_err_with(|| format!("Opening product {}", cli.prefix.display()))?;

    let annotations = product.annotations().into_diagnostic()?;
    let scanned_packets = if cli.scan {
        let packets = product.read_all().into_diagnostic()?;
        info!("Sequential scan decoded {} packets", packets.len());
        Some(packets.len())
    } else {
        None
    };

    let summary = Summary {
        annotations: annotations.len(),
        indices: product.packet_count().into_diagnostic()?,
        data_bytes: product.data_len().into_diagnostic()?,
        first_sensing_time: annotations.first().map(|a| a.sensing_time.to_string()),
        last_sensing_time: annotations.last().map(|a| a.sensing_time.to_string()),
        scanned_packets,
    };
    print_json(&summary)?;

    let indices = product.indices().into_diagnostic()?;
    for &index in &cli.packets {
        let packet = product
            .read_packet_at(index)
            .into_diagnostic()
            .wrap_err_with(|| format!("Reading packet {}", index))?;
        let secondary = &packet.secondary_header;
        print_json(&PacketDump {
            index,
            entry: &indices[index],
            packet: &packet,
            signal_type: secondary.signal_type().to_string(),
            polarisation: secondary.polarisation().to_string(),
            baq_mode: format!("{:?}", secondary.baq_mode()),
            number_of_samples: secondary.number_of_samples(),
        })?;
    }

    product.dispose().into_diagnostic()?;
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{}", json);
    Ok(())
}
