//! `sigmadsp`: command-line access to a SigmaDSP over Linux `i2c-dev`.
//!
//! ```text
//! USAGE:
//!   sigmadsp read <addr8> <reg> <count>            Read <count> bytes from <reg>
//!   sigmadsp write <addr8> <reg> <bytes>...        Block write starting at <reg>
//!   sigmadsp volume <addr8> <reg> <0-100>          Write a gain word for a volume
//! ```
//!
//! Addresses are the 8-bit write addresses from the datasheet (e.g. `0x70`); registers
//! and data bytes are hexadecimal.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sigmadsp::linux::{self, LinuxInterface};
use sigmadsp::params::{DeviceAddress, FixedPointFormat, WordSize};
use sigmadsp::{transfer, volume, BusHandle};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sigmadsp", about = "SigmaDSP register access over I2C", version)]
struct Cli {
    /// I2C bus number (/dev/i2c-N).
    #[arg(long, default_value_t = linux::DEFAULT_BUS)]
    bus: u8,
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Read a block of bytes starting at a register.
    Read {
        /// 8-bit device address (e.g. 70).
        #[arg(value_parser = parse_address)]
        address: DeviceAddress,
        /// Register address (e.g. f405).
        #[arg(value_parser = parse_register)]
        register: u16,
        /// Number of bytes to read.
        count: usize,
    },
    /// Write bytes starting at a register, auto-incrementing per word.
    Write {
        /// 8-bit device address (e.g. 70).
        #[arg(value_parser = parse_address)]
        address: DeviceAddress,
        /// Register address (e.g. f402).
        #[arg(value_parser = parse_register)]
        register: u16,
        /// Register word size in bytes: 2 (control) or 4 (memory).
        #[arg(long, default_value = "4", value_parser = parse_word_size)]
        word_size: WordSize,
        /// Data bytes (e.g. 00 01).
        #[arg(value_parser = parse_byte, required = true)]
        bytes: Vec<u8>,
    },
    /// Write the gain word for a volume (0-100, 1 dB per step).
    Volume {
        /// 8-bit device address (e.g. 70).
        #[arg(value_parser = parse_address)]
        address: DeviceAddress,
        /// Parameter register of the gain cell.
        #[arg(value_parser = parse_register)]
        register: u16,
        /// Volume between 0 and 100.
        volume: f64,
        /// Parameter format: q8.24 (ADAU145x) or q5.23 (ADAU144x).
        #[arg(long, default_value = "q8.24", value_parser = parse_format)]
        format: FixedPointFormat,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut bus = BusHandle::closed();
    linux::open_handle(&mut bus, cli.bus)
        .with_context(|| format!("failed to open /dev/i2c-{}", cli.bus))?;

    let result = match cli.command {
        Cmd::Read {
            address,
            register,
            count,
        } => cmd_read(&mut bus, address, register, count),
        Cmd::Write {
            address,
            register,
            word_size,
            bytes,
        } => cmd_write(&mut bus, address, register, word_size, &bytes),
        Cmd::Volume {
            address,
            register,
            volume,
            format,
        } => cmd_volume(&mut bus, address, register, volume, format),
    };

    bus.close();
    result
}

fn cmd_read(
    bus: &mut BusHandle<LinuxInterface>,
    address: DeviceAddress,
    register: u16,
    count: usize,
) -> Result<()> {
    info!(address = address.get(), register, count, "read");
    let data = transfer::read_block(bus, address, register, count)
        .with_context(|| format!("failed to read {count} bytes at {register:#06x}"))?;

    // Control registers are 2 bytes wide, memory cells 4.
    let group = if count == 2 { 2 } else { 4 };
    for word in data.chunks(group) {
        let line: Vec<String> = word.iter().map(|b| format!("{b:#04x}")).collect();
        println!("RECV: {}", line.join(" "));
    }

    Ok(())
}

fn cmd_write(
    bus: &mut BusHandle<LinuxInterface>,
    address: DeviceAddress,
    register: u16,
    word_size: WordSize,
    bytes: &[u8],
) -> Result<()> {
    info!(address = address.get(), register, len = bytes.len(), "write");
    transfer::write_block(bus, address, register, word_size, bytes)
        .with_context(|| format!("failed to write {} bytes at {register:#06x}", bytes.len()))?;
    Ok(())
}

fn cmd_volume(
    bus: &mut BusHandle<LinuxInterface>,
    address: DeviceAddress,
    register: u16,
    level: f64,
    format: FixedPointFormat,
) -> Result<()> {
    let word = volume::volume_to_bytes(level, format)
        .with_context(|| format!("volume {level} must be between 0 and 100"))?;
    info!(address = address.get(), register, ?word, "volume");

    transfer::write_block(bus, address, register, WordSize::Memory, &word)
        .with_context(|| format!("failed to write gain at {register:#06x}"))?;
    println!(
        "SENT: {}",
        word.iter()
            .map(|b| format!("{b:#04x}"))
            .collect::<Vec<_>>()
            .join(" ")
    );
    Ok(())
}

fn parse_hex(value: &str) -> Result<u32, String> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    u32::from_str_radix(digits, 16).map_err(|err| format!("invalid hex value `{value}`: {err}"))
}

fn parse_address(value: &str) -> Result<DeviceAddress, String> {
    let raw = parse_hex(value)?;
    u8::try_from(raw)
        .map(DeviceAddress::from_8bit)
        .map_err(|_| format!("address `{value}` does not fit in 8 bits"))
}

fn parse_register(value: &str) -> Result<u16, String> {
    let raw = parse_hex(value)?;
    u16::try_from(raw).map_err(|_| format!("register `{value}` does not fit in 16 bits"))
}

fn parse_byte(value: &str) -> Result<u8, String> {
    let raw = parse_hex(value)?;
    u8::try_from(raw).map_err(|_| format!("byte `{value}` does not fit in 8 bits"))
}

fn parse_word_size(value: &str) -> Result<WordSize, String> {
    match value {
        "2" => Ok(WordSize::Control),
        "4" => Ok(WordSize::Memory),
        _ => Err(format!("word size must be 2 or 4, got `{value}`")),
    }
}

fn parse_format(value: &str) -> Result<FixedPointFormat, String> {
    match value.to_ascii_lowercase().as_str() {
        "q5.23" | "5.23" => Ok(FixedPointFormat::Q5_23),
        "q8.24" | "8.24" => Ok(FixedPointFormat::Q8_24),
        _ => Err(format!("format must be q5.23 or q8.24, got `{value}`")),
    }
}
