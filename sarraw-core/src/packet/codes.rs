//! Typed views of enumerated header codes.
//!
//! Every view keeps an `Unknown(raw)` fallback so that decoding never
//! rejects a value; the raw field stays the source of truth.

use serde::Serialize;

/// Space packet type (primary header, first identifier bit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PacketType {
    Telemetry,
    Telecommand,
}

impl PacketType {
    pub fn from_value(v: u16) -> Self {
        if v & 1 == 0 {
            PacketType::Telemetry
        } else {
            PacketType::Telecommand
        }
    }
}

/// Segmentation of a packet within a user data sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SequenceFlags {
    Continuation,
    First,
    Last,
    Unsegmented,
}

impl SequenceFlags {
    pub fn from_value(v: u16) -> Self {
        match v & 0b11 {
            0 => SequenceFlags::Continuation,
            1 => SequenceFlags::First,
            2 => SequenceFlags::Last,
            _ => SequenceFlags::Unsegmented,
        }
    }
}

/// Instrument test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TestMode {
    Default,
    ContingencyRxmOperational,
    ContingencyRxmBypassed,
    Operational,
    Bypass,
    Unknown(u8),
}

impl TestMode {
    pub fn from_value(v: u8) -> Self {
        match v {
            0 => TestMode::Default,
            4 => TestMode::ContingencyRxmOperational,
            5 => TestMode::ContingencyRxmBypassed,
            6 => TestMode::Operational,
            7 => TestMode::Bypass,
            _ => TestMode::Unknown(v),
        }
    }
}

/// On-board compression mode of the user data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BaqMode {
    Bypass,
    Baq3Bit,
    Baq4Bit,
    Baq5Bit,
    FdbaqMode0,
    FdbaqMode1,
    FdbaqMode2,
    Unknown(u8),
}

impl BaqMode {
    pub fn from_value(v: u8) -> Self {
        match v {
            0 => BaqMode::Bypass,
            3 => BaqMode::Baq3Bit,
            4 => BaqMode::Baq4Bit,
            5 => BaqMode::Baq5Bit,
            12 => BaqMode::FdbaqMode0,
            13 => BaqMode::FdbaqMode1,
            14 => BaqMode::FdbaqMode2,
            _ => BaqMode::Unknown(v),
        }
    }

    /// Fixed bits per sample for plain BAQ modes, `None` for bypass,
    /// FDBAQ and unknown modes.
    pub fn bits_per_sample(&self) -> Option<u8> {
        match self {
            BaqMode::Baq3Bit => Some(3),
            BaqMode::Baq4Bit => Some(4),
            BaqMode::Baq5Bit => Some(5),
            _ => None,
        }
    }
}

/// Transmit/receive polarisation (3-bit code)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Polarisation {
    /// H transmit only
    H,
    HH,
    HV,
    /// H transmit, V+H receive
    HVH,
    /// V transmit only
    V,
    VH,
    VV,
    /// V transmit, V+H receive
    VVH,
}

impl Polarisation {
    pub fn from_value(v: u8) -> Self {
        match v & 0b111 {
            0 => Polarisation::H,
            1 => Polarisation::HH,
            2 => Polarisation::HV,
            3 => Polarisation::HVH,
            4 => Polarisation::V,
            5 => Polarisation::VH,
            6 => Polarisation::VV,
            _ => Polarisation::VVH,
        }
    }
}

impl std::fmt::Display for Polarisation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Polarisation::H => write!(f, "H"),
            Polarisation::HH => write!(f, "HH"),
            Polarisation::HV => write!(f, "HV"),
            Polarisation::HVH => write!(f, "H(V+H)"),
            Polarisation::V => write!(f, "V"),
            Polarisation::VH => write!(f, "VH"),
            Polarisation::VV => write!(f, "VV"),
            Polarisation::VVH => write!(f, "V(V+H)"),
        }
    }
}

/// What the echo window contains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SignalType {
    Echo,
    Noise,
    TxCal,
    RxCal,
    EpdnCal,
    TaCal,
    ApdnCal,
    TxHCalIso,
    Unknown(u8),
}

impl SignalType {
    pub fn from_value(v: u8) -> Self {
        match v {
            0 => SignalType::Echo,
            1 => SignalType::Noise,
            8 => SignalType::TxCal,
            9 => SignalType::RxCal,
            10 => SignalType::EpdnCal,
            11 => SignalType::TaCal,
            12 => SignalType::ApdnCal,
            15 => SignalType::TxHCalIso,
            _ => SignalType::Unknown(v),
        }
    }

    pub fn is_calibration(&self) -> bool {
        !matches!(
            self,
            SignalType::Echo | SignalType::Noise | SignalType::Unknown(_)
        )
    }
}

impl std::fmt::Display for SignalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalType::Echo => write!(f, "echo"),
            SignalType::Noise => write!(f, "noise"),
            SignalType::TxCal => write!(f, "tx cal"),
            SignalType::RxCal => write!(f, "rx cal"),
            SignalType::EpdnCal => write!(f, "epdn cal"),
            SignalType::TaCal => write!(f, "ta cal"),
            SignalType::ApdnCal => write!(f, "apdn cal"),
            SignalType::TxHCalIso => write!(f, "txh cal iso"),
            SignalType::Unknown(v) => write!(f, "unknown ({})", v),
        }
    }
}
