//! Byte order policy applied to every slot of a layout.

use core::fmt;

/// Byte order of every slot in a compiled layout.
///
/// There is no alignment or padding under any policy; `Native` differs from
/// `Little` or `Big` only in which one it resolves to on the host.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ByteOrder {
    /// Byte order of the host.
    #[default]
    Native,
    Little,
    Big,
    /// Big-endian, under its conventional name for protocol headers.
    Network,
}

impl ByteOrder {
    /// Whether slots are decoded least-significant byte first.
    pub const fn is_little_endian(self) -> bool {
        match self {
            Self::Native => cfg!(target_endian = "little"),
            Self::Little => true,
            Self::Big | Self::Network => false,
        }
    }

    /// The single-character token prefixing a pattern.
    pub const fn token(self) -> char {
        match self {
            Self::Native => '=',
            Self::Little => '<',
            Self::Big => '>',
            Self::Network => '!',
        }
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => f.write_str("native"),
            Self::Little => f.write_str("little-endian"),
            Self::Big => f.write_str("big-endian"),
            Self::Network => f.write_str("network"),
        }
    }
}
