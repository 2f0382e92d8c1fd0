//! CLI argument parsing

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Parse a string as a hex or decimal u32
pub fn parse_hex_u32(s: &str) -> Result<u32, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex value: {}", e))
    } else {
        s.parse::<u32>().map_err(|e| format!("Invalid number: {}", e))
    }
}

/// Parse a memory offset (hex or decimal, at most 0xFFFF)
fn parse_offset(s: &str) -> Result<u16, String> {
    let value = parse_hex_u32(s)?;
    u16::try_from(value).map_err(|_| format!("Offset 0x{:X} does not fit in 16 bits", value))
}

const BACKEND_HELP: &str = "Backend to use, as name[:key=value,...] (see list-backends)";

#[derive(Parser)]
#[command(name = "fram")]
#[command(author, version, about = "I2C FRAM (MB85RC) tool", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Access width for peek and poke
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Width {
    /// 8 bits
    #[default]
    Byte,
    /// 16 bits, big-endian
    Word,
    /// 32 bits, big-endian
    Long,
}

/// Single-bit operation
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitOp {
    /// Print the bit
    Read,
    /// Set the bit to 1
    Set,
    /// Clear the bit to 0
    Clear,
    /// Flip the bit and print its new state
    Toggle,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect the chip and print a one-line summary
    Probe {
        /// Backend to use
        #[arg(short, long, help = BACKEND_HELP)]
        backend: String,
    },

    /// Show identification and configuration details
    Info {
        /// Backend to use
        #[arg(short, long, help = BACKEND_HELP)]
        backend: String,
    },

    /// Read memory contents to file
    Read {
        /// Backend to use
        #[arg(short, long, help = BACKEND_HELP)]
        backend: String,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Start offset (hex or decimal)
        #[arg(long, value_parser = parse_offset, default_value = "0")]
        offset: u16,

        /// Number of bytes (default: up to the end of the chip)
        #[arg(long, value_parser = parse_hex_u32)]
        length: Option<u32>,
    },

    /// Write file to memory
    Write {
        /// Backend to use
        #[arg(short, long, help = BACKEND_HELP)]
        backend: String,

        /// Input file path
        #[arg(short, long)]
        input: PathBuf,

        /// Start offset (hex or decimal)
        #[arg(long, value_parser = parse_offset, default_value = "0")]
        offset: u16,

        /// Skip read-back verification
        #[arg(long)]
        no_verify: bool,
    },

    /// Verify memory contents against file
    Verify {
        /// Backend to use
        #[arg(short, long, help = BACKEND_HELP)]
        backend: String,

        /// Input file path to verify against
        #[arg(short, long)]
        input: PathBuf,

        /// Start offset (hex or decimal)
        #[arg(long, value_parser = parse_offset, default_value = "0")]
        offset: u16,
    },

    /// Write 0x00 to every byte of the chip
    Erase {
        /// Backend to use
        #[arg(short, long, help = BACKEND_HELP)]
        backend: String,
    },

    /// Read one value
    Peek {
        /// Backend to use
        #[arg(short, long, help = BACKEND_HELP)]
        backend: String,

        /// Offset (hex or decimal)
        #[arg(value_parser = parse_offset)]
        offset: u16,

        /// Access width
        #[arg(short, long, value_enum, default_value_t = Width::Byte)]
        width: Width,
    },

    /// Write one value
    Poke {
        /// Backend to use
        #[arg(short, long, help = BACKEND_HELP)]
        backend: String,

        /// Offset (hex or decimal)
        #[arg(value_parser = parse_offset)]
        offset: u16,

        /// Value (hex or decimal)
        #[arg(value_parser = parse_hex_u32)]
        value: u32,

        /// Access width
        #[arg(short, long, value_enum, default_value_t = Width::Byte)]
        width: Width,
    },

    /// Read or modify a single bit
    Bit {
        /// Backend to use
        #[arg(short, long, help = BACKEND_HELP)]
        backend: String,

        /// Operation
        #[arg(value_enum)]
        op: BitOp,

        /// Offset of the byte (hex or decimal)
        #[arg(value_parser = parse_offset)]
        offset: u16,

        /// Bit position, 0 = LSB
        bit: u8,
    },

    /// Write protection operations
    #[command(subcommand)]
    Wp(WpCommands),

    /// List supported backends
    ListBackends,
}

/// Write protection subcommands
#[derive(Subcommand)]
pub enum WpCommands {
    /// Show the WP line state
    Status {
        /// Backend to use
        #[arg(short, long, help = BACKEND_HELP)]
        backend: String,
    },

    /// Drive WP high, blocking writes
    Enable {
        /// Backend to use
        #[arg(short, long, help = BACKEND_HELP)]
        backend: String,
    },

    /// Drive WP low, allowing writes
    Disable {
        /// Backend to use
        #[arg(short, long, help = BACKEND_HELP)]
        backend: String,
    },
}

impl Commands {
    /// Backend string of commands that talk to a chip
    pub fn backend(&self) -> Option<&str> {
        match self {
            Commands::Probe { backend }
            | Commands::Info { backend }
            | Commands::Read { backend, .. }
            | Commands::Write { backend, .. }
            | Commands::Verify { backend, .. }
            | Commands::Erase { backend }
            | Commands::Peek { backend, .. }
            | Commands::Poke { backend, .. }
            | Commands::Bit { backend, .. } => Some(backend.as_str()),
            Commands::Wp(
                WpCommands::Status { backend }
                | WpCommands::Enable { backend }
                | WpCommands::Disable { backend },
            ) => Some(backend.as_str()),
            Commands::ListBackends => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(parse_hex_u32("0x7FFF"), Ok(0x7FFF));
        assert_eq!(parse_hex_u32("100"), Ok(100));
        assert!(parse_hex_u32("0xZZ").is_err());
        assert_eq!(parse_offset("0xFFFF"), Ok(0xFFFF));
        assert!(parse_offset("0x10000").is_err());
    }

    #[test]
    fn test_backend_of_nested_command() {
        let cli = Cli::parse_from(["fram", "wp", "enable", "-b", "dummy:wp=on"]);
        assert_eq!(cli.command.backend(), Some("dummy:wp=on"));

        let cli = Cli::parse_from(["fram", "list-backends"]);
        assert_eq!(cli.command.backend(), None);
    }

    #[test]
    fn test_man_page_renders() {
        let mut page = Vec::new();
        clap_mangen::Man::new(Cli::command())
            .render(&mut page)
            .unwrap();
        let page = String::from_utf8(page).unwrap();
        assert!(page.contains("fram"));
        assert!(page.contains("list-backends"));
    }

    #[test]
    fn test_peek_width() {
        let cli = Cli::parse_from(["fram", "peek", "-b", "dummy", "0x10", "-w", "word"]);
        match cli.command {
            Commands::Peek { offset, width, .. } => {
                assert_eq!(offset, 0x10);
                assert_eq!(width, Width::Word);
            }
            _ => panic!("expected peek"),
        }
    }
}
