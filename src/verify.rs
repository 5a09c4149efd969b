//! Coarse binary format sniffing.
//!
//! A minimal defence against a corrupted or mismatched download
//! masquerading as the right asset: the located file must carry the
//! magic bytes of a native executable for the host OS. This is format
//! sniffing only, not checksum or signature verification.

use crate::error::{InstallerError, Result};
use crate::locate::LocatedBinary;
use crate::platform::HostOs;
use std::fmt;
use std::io::Read;

const ELF_MAGIC: [u8; 4] = [0x7f, b'E', b'L', b'F'];

// Thin Mach-O magics, 32- and 64-bit, both byte orders.
const MACHO_MAGICS: [[u8; 4]; 4] = [
    [0xfe, 0xed, 0xfa, 0xce],
    [0xce, 0xfa, 0xed, 0xfe],
    [0xfe, 0xed, 0xfa, 0xcf],
    [0xcf, 0xfa, 0xed, 0xfe],
];

// Fat (multi-architecture) Mach-O magics, both byte orders.
const FAT_MAGICS: [[u8; 4]; 2] = [[0xca, 0xfe, 0xba, 0xbe], [0xbe, 0xba, 0xfe, 0xca]];

/// The binary format identified by sniffing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryFormat {
    /// An ELF executable (Linux).
    Elf,
    /// A Mach-O executable (macOS). `universal` is true for fat
    /// binaries; a single-architecture Mach-O is still accepted.
    MachO {
        /// Whether the file is a multi-architecture (fat) binary.
        universal: bool,
    },
}

impl fmt::Display for BinaryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Elf => write!(f, "ELF executable"),
            Self::MachO { universal: true } => write!(f, "universal Mach-O executable"),
            Self::MachO { universal: false } => write!(f, "Mach-O executable"),
        }
    }
}

/// Verify that the located binary has the expected format for `os`.
///
/// On macOS a fat binary is the expected shipment and is reported as
/// such, but a thin Mach-O passes too.
///
/// # Errors
///
/// Returns [`InstallerError::InvalidBinaryFormat`] when the magic bytes
/// do not identify an executable of the host's native format, and I/O
/// errors if the file cannot be read.
pub fn verify_format(binary: &LocatedBinary, os: HostOs) -> Result<BinaryFormat> {
    let magic = read_magic(binary)?;
    let identified = identify(magic);

    let expected = match os {
        HostOs::Linux => "ELF",
        HostOs::MacOs => "Mach-O",
    };

    match (os, identified) {
        (HostOs::Linux, Some(format @ BinaryFormat::Elf))
        | (HostOs::MacOs, Some(format @ BinaryFormat::MachO { .. })) => Ok(format),
        _ => Err(InstallerError::InvalidBinaryFormat {
            path: binary.path().to_owned(),
            expected,
            found: format_magic(magic),
        }),
    }
}

/// Read the first four bytes of the file; a shorter file cannot be a
/// valid executable.
fn read_magic(binary: &LocatedBinary) -> Result<[u8; 4]> {
    let mut file = std::fs::File::open(binary.path())?;
    let mut magic = [0u8; 4];
    file.read_exact(&mut magic)
        .map_err(|_| InstallerError::InvalidBinaryFormat {
            path: binary.path().to_owned(),
            expected: "native",
            found: "fewer than 4 bytes".to_owned(),
        })?;
    Ok(magic)
}

/// Identify a format from magic bytes, if any.
fn identify(magic: [u8; 4]) -> Option<BinaryFormat> {
    if magic == ELF_MAGIC {
        Some(BinaryFormat::Elf)
    } else if FAT_MAGICS.contains(&magic) {
        Some(BinaryFormat::MachO { universal: true })
    } else if MACHO_MAGICS.contains(&magic) {
        Some(BinaryFormat::MachO { universal: false })
    } else {
        None
    }
}

fn format_magic(magic: [u8; 4]) -> String {
    magic
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}
