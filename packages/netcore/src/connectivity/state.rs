use core::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum ConnectivityState {
    #[default]
    Disconnected = 0,
    Connecting = 1,
    Connected = 2,
}

impl ConnectivityState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "Disconnected",
            Self::Connecting => "Connecting",
            Self::Connected => "Connected",
        }
    }

    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }

    pub(crate) const fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::Connecting,
            2 => Self::Connected,
            _ => Self::Disconnected,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkEvent {
    /// Radio and interface came up; nothing associated yet.
    LinkStarted,
    /// Station lost its association. `reason` is the raw 802.11 / driver code.
    LinkLost { reason: u8 },
    AddressAssigned { address: [u8; 4] },
}

impl LinkEvent {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LinkStarted => "link_started",
            Self::LinkLost { .. } => "link_lost",
            Self::AddressAssigned { .. } => "address_assigned",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkAction {
    Connect,
    Reconnect { attempt: u32 },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LinkSnapshot {
    pub state: ConnectivityState,
    pub address: Option<[u8; 4]>,
    pub reconnect_attempts: u32,
}

/// Dotted-quad formatting for log lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ipv4Octets(pub [u8; 4]);

impl fmt::Display for Ipv4Octets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "{a}.{b}.{c}.{d}")
    }
}
