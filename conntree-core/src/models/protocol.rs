//! Protocol identifiers carried by connection nodes.

use serde::{Deserialize, Serialize};

/// Protocol type identifier
///
/// Only used for display and for the protocol sort key; the tree core never
/// talks to a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolType {
    /// SSH protocol
    Ssh,
    /// RDP protocol
    Rdp,
    /// VNC protocol
    Vnc,
    /// HTTP(S) proxy or web endpoint
    Http,
    /// SMB file share
    Smb,
    /// MySQL database
    Mysql,
}

impl ProtocolType {
    /// Returns the protocol identifier as a lowercase string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ssh => "ssh",
            Self::Rdp => "rdp",
            Self::Vnc => "vnc",
            Self::Http => "http",
            Self::Smb => "smb",
            Self::Mysql => "mysql",
        }
    }
}

impl std::fmt::Display for ProtocolType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ssh => write!(f, "SSH"),
            Self::Rdp => write!(f, "RDP"),
            Self::Vnc => write!(f, "VNC"),
            Self::Http => write!(f, "HTTP"),
            Self::Smb => write!(f, "SMB"),
            Self::Mysql => write!(f, "MySQL"),
        }
    }
}
