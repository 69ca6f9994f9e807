//! # IMU Packet Inspector
//!
//! Validates and decodes IMU telemetry packets captured as hex text.
//!
//! Usage:
//!
//! ```text
//! imu-prot [config.toml] [capture.hex]
//! ```
//!
//! Without a capture path (in the arguments or the `[input]` config section)
//! packets are read from standard input. Each packet produces one table row
//! on standard output; diagnostics go to standard error.

use anyhow::Result;
use tokio::io::{AsyncBufRead, BufReader};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use imu_prot::config::Config;
use imu_prot::imu::identity::IdentityAssembler;
use imu_prot::imu::protocol::{Axis, ImuPacket, Verdict, PACKET_SIZE};
use imu_prot::imu::{crc, decoder, validator};
use imu_prot::input::{HexPacket, HexPacketReader};
use imu_prot::telemetry::{TelemetryEntry, TelemetryLogger};

/// Column titles matching [`format_row`]
const TABLE_HEADER: &str = "Header Seq  ~Seq  Temp[C]       GyroX      GyroY      GyroZ      \
                            AcclX      AcclY      AcclZ  CRC32      Check      Result";

/// Per-run packet counters
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct Summary {
    ok: u64,
    bad_header: u64,
    bad_sequencer: u64,
    bad_crc: u64,
    malformed: u64,
}

impl Summary {
    fn record(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Ok => self.ok += 1,
            Verdict::BadHeader => self.bad_header += 1,
            Verdict::BadSequencer => self.bad_sequencer += 1,
            Verdict::BadCrc => self.bad_crc += 1,
        }
    }

    fn total(&self) -> u64 {
        self.ok + self.bad_header + self.bad_sequencer + self.bad_crc + self.malformed
    }
}

/// Main entry point for the packet inspector
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Load configuration (first argument, defaults otherwise)
///    - Set up logging with tracing subscriber
///    - Open the capture file or standard input
///
/// 2. **Main Loop**
///    - Read one hex packet per line
///    - Validate, decode and print a table row
///    - Feed valid packets to the identity assembler and telemetry log
///    - Handle Ctrl+C for graceful shutdown
///
/// 3. **Shutdown**
///    - Log per-verdict totals
#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    let mut config = match args.get(1) {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(capture) = args.get(2) {
        config.input.path = capture.clone();
    }

    // Initialize logging
    let level: tracing::Level = config.logging.level.parse()?;
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("IMU packet inspector v{} starting...", env!("CARGO_PKG_VERSION"));

    let summary = if config.input.path.is_empty() {
        info!("Reading packets from standard input");
        run(BufReader::new(tokio::io::stdin()), &config).await?
    } else {
        info!("Reading packets from {}", config.input.path);
        let file = tokio::fs::File::open(&config.input.path).await?;
        run(BufReader::new(file), &config).await?
    };

    info!(
        "Processed {} packets: {} ok, {} bad header, {} bad sequencer, {} bad CRC, {} malformed",
        summary.total(),
        summary.ok,
        summary.bad_header,
        summary.bad_sequencer,
        summary.bad_crc,
        summary.malformed
    );

    Ok(())
}

/// Process every packet from `reader` until end of input or Ctrl+C
async fn run<R: AsyncBufRead + Unpin>(reader: R, config: &Config) -> Result<Summary> {
    let mut reader = HexPacketReader::new(reader);
    let mut telemetry = if config.telemetry.enabled {
        Some(TelemetryLogger::new(&config.telemetry)?)
    } else {
        None
    };
    let mut identity = IdentityAssembler::new();
    let mut summary = Summary::default();

    println!("{}", TABLE_HEADER);

    loop {
        let next = tokio::select! {
            next = reader.next_packet() => next,
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                break;
            }
        };

        let packet = match next {
            Ok(Some(packet)) => packet,
            Ok(None) => break,
            Err(e) => {
                warn!("Skipping line {}: {}", reader.line(), e);
                summary.malformed += 1;
                continue;
            }
        };

        let Some(verdict) = inspect(&packet, config, &mut identity, telemetry.as_mut())? else {
            summary.malformed += 1;
            continue;
        };
        summary.record(verdict);

        if !verdict.is_ok() && config.input.stop_on_error {
            warn!("Stopping at line {}: {}", packet.line, verdict);
            break;
        }
    }

    if let Some(logger) = telemetry.as_mut() {
        logger.flush()?;
    }

    Ok(summary)
}

/// Validate, decode and report one packet
///
/// Returns `None` if the bytes cannot hold a packet.
fn inspect(
    packet: &HexPacket,
    config: &Config,
    identity: &mut IdentityAssembler,
    telemetry: Option<&mut TelemetryLogger>,
) -> Result<Option<Verdict>> {
    let view = match ImuPacket::new(&packet.bytes) {
        Ok(view) => view,
        Err(e) => {
            warn!("Line {}: {}", packet.line, e);
            return Ok(None);
        }
    };
    if packet.bytes.len() > PACKET_SIZE {
        debug!(
            "Line {}: ignoring {} trailing bytes",
            packet.line,
            packet.bytes.len() - PACKET_SIZE
        );
    }

    let verdict = validator::validate(&view);
    let record = decoder::decode(&view);
    let calculated_crc = crc::crc32(view.crc_covered());

    println!("{}", format_row(&record, calculated_crc, verdict));

    if verdict.is_ok() {
        let was_complete = identity.is_complete();
        identity.ingest(record.sequencer, record.identity_word);

        if !was_complete && identity.is_complete() {
            let block = identity.block();
            info!(
                "Device identity: serial {}, firmware {}, built {}, hardware type 0x{:04X}, {} Hz",
                block.human_serial(),
                block.firmware_version(),
                block.build_date(),
                block.hardware_type(),
                block.packet_rate()
            );
        }
    } else {
        debug!("Line {}: {}", packet.line, verdict);
    }

    if let Some(logger) = telemetry {
        if verdict.is_ok() || config.telemetry.include_invalid {
            logger.log(&TelemetryEntry::new(packet.line, verdict, record))?;
        }
    }

    Ok(Some(verdict))
}

/// Format one table row
fn format_row(record: &decoder::PacketRecord, calculated_crc: u32, verdict: Verdict) -> String {
    let mut row = format!(
        "0x{:04X} 0x{:02X} 0x{:02X} {:8.2}  ",
        record.header, record.sequencer, record.sequencer_complement, record.temperature
    );

    for axis in Axis::ALL {
        row.push_str(&format!(" {:10.3}", record.gyro.get(axis)));
    }
    for axis in Axis::ALL {
        row.push_str(&format!(" {:10.3}", record.accel.get(axis)));
    }

    row.push_str(&format!(
        "  0x{:08X} 0x{:08X} ({}) {}",
        record.crc,
        calculated_crc,
        verdict.code(),
        verdict
    ));

    row
}
