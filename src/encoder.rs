//! Register layouts for the bit-timing registers of common controllers.
//!
//! ```rust
//! use can_bit_timing::bittiming::BitTiming;
//! use can_bit_timing::encoder::Encoder;
//!
//! let bt = BitTiming {
//!     prop_seg: 6,
//!     phase_seg1: 7,
//!     phase_seg2: 2,
//!     sjw: 1,
//!     brp: 1,
//!     tq_ns: 125,
//!     bitrate: 500_000,
//!     sample_point: 875,
//! };
//! assert_eq!(Encoder::Sja1000.encode(&bt).to_string(), "0x00 0x1c");
//! ```

use std::fmt;

use crate::bittiming::BitTiming;

/// Width of a register word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Width {
    U8,
    U16,
    U32,
}

impl Width {
    pub fn bytes(self) -> usize {
        match self {
            Width::U8 => 1,
            Width::U16 => 2,
            Width::U32 => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Register {
    pub name: &'static str,
    pub value: u32,
    pub width: Width,
}

impl Register {
    const fn new(name: &'static str, value: u32, width: Width) -> Self {
        let value = match width {
            Width::U8 => value & 0xff,
            Width::U16 => value & 0xffff,
            Width::U32 => value,
        };
        Self { name, value, width }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.width {
            Width::U8 => write!(f, "0x{:02x}", self.value),
            Width::U16 => write!(f, "0x{:04x}", self.value),
            Width::U32 => write!(f, "0x{:08x}", self.value),
        }
    }
}

/// The register words of one controller, in the order the data sheet lists them.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Registers {
    pub registers: Vec<Register>,
}

impl Registers {
    /// All words concatenated, each in big-endian byte order.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.registers
            .iter()
            .flat_map(|r| {
                let be = r.value.to_be_bytes();
                be[be.len() - r.width.bytes()..].to_vec()
            })
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.registers
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.value)
    }
}

impl fmt::Display for Registers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, register) in self.registers.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", register)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Registers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.registers.iter().map(|r| r.name).collect();
        f.debug_struct("Registers")
            .field("names", &names)
            .field("data", &hex::encode(self.to_bytes()))
            .finish()
    }
}

/// Bit-timing register layout of a controller family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Encoder {
    /// Renesas R-Car CAN, `CiBCR`.
    RcarCan,
    /// Microchip MCP2510/MCP2515, `CNF1`..`CNF3`.
    Mcp251x,
    /// Microchip MCP2517FD/MCP2518FD, `NBTCFG`.
    Mcp251xfd,
    /// ST bxCAN, `CAN_BTR`.
    Bxcan,
    /// Atmel AT91, `CAN_BR`.
    At91,
    /// Bosch C_CAN, `BTR` and `BRPEXT`.
    CCan,
    /// NXP FlexCAN, `CAN_CTRL`.
    Flexcan,
    /// Bosch M_CAN, `NBTP`.
    Mcan,
    /// NXP SJA1000, `BTR0` and `BTR1`.
    Sja1000,
    /// TI High End CAN Controller, `CANBTC`.
    TiHecc,
}

impl Encoder {
    /// Column header for the register words, as wide as [`Registers`]' `Display`.
    pub fn header(self) -> String {
        match self {
            Encoder::RcarCan => format!("{:>10}", "CiBCR"),
            Encoder::Mcp251x => "CNF1 CNF2 CNF3".to_string(),
            Encoder::Mcp251xfd => format!("{:>10}", "NBTCFG"),
            Encoder::Bxcan => format!("{:>10}", "CAN_BTR"),
            Encoder::At91 => format!("{:>10}", "CAN_BR"),
            Encoder::CCan => format!("{:>13}", "BTR BRPEXT"),
            Encoder::Flexcan => format!("{:>10}", "CAN_CTRL"),
            Encoder::Mcan => format!("{:>10}", "NBTP"),
            Encoder::Sja1000 => format!("{:>9}", "BTR0 BTR1"),
            Encoder::TiHecc => format!("{:>10}", "CANBTC"),
        }
    }

    /// Packs `bt` into the register words of this controller.
    ///
    /// Fields are stored minus one. Values that don't fit their field are
    /// truncated, so encode only timings checked against the controller's limits.
    pub fn encode(self, bt: &BitTiming) -> Registers {
        let brp = bt.brp.wrapping_sub(1);
        let sjw = bt.sjw.wrapping_sub(1);
        let prop_seg = bt.prop_seg.wrapping_sub(1);
        let phase_seg1 = bt.phase_seg1.wrapping_sub(1);
        let phase_seg2 = bt.phase_seg2.wrapping_sub(1);
        let tseg1 = bt.tseg1().wrapping_sub(1);

        let registers = match self {
            Encoder::RcarCan => {
                let bcr = ((tseg1 & 0x0f) << 20)
                    | ((brp & 0x3ff) << 8)
                    | ((sjw & 0x3) << 4)
                    | (phase_seg2 & 0x07);
                vec![Register::new("CiBCR", bcr << 8, Width::U32)]
            }
            Encoder::Mcp251x => vec![
                Register::new("CNF1", (sjw << 6) | brp, Width::U8),
                Register::new("CNF2", 0x80 | (phase_seg1 << 3) | prop_seg, Width::U8),
                Register::new("CNF3", phase_seg2, Width::U8),
            ],
            Encoder::Mcp251xfd => {
                let nbtcfg = (brp << 24) | (tseg1 << 16) | (phase_seg2 << 8) | sjw;
                vec![Register::new("NBTCFG", nbtcfg, Width::U32)]
            }
            Encoder::Bxcan => {
                let btr = (brp & 0x3ff)
                    | ((tseg1 & 0xf) << 16)
                    | ((phase_seg2 & 0x7) << 20)
                    | ((sjw & 0x3) << 24);
                vec![Register::new("CAN_BTR", btr, Width::U32)]
            }
            Encoder::At91 => {
                let br = phase_seg2
                    | (phase_seg1 << 4)
                    | (prop_seg << 8)
                    | (sjw << 12)
                    | (brp << 16);
                vec![Register::new("CAN_BR", br, Width::U32)]
            }
            Encoder::CCan => {
                let btr = (brp & 0x3f)
                    | ((sjw & 0x3) << 6)
                    | ((tseg1 & 0xf) << 8)
                    | ((phase_seg2 & 0x7) << 12);
                let brpext = (brp >> 6) & 0xf;
                vec![
                    Register::new("BTR", btr, Width::U16),
                    Register::new("BRPEXT", brpext, Width::U16),
                ]
            }
            Encoder::Flexcan => {
                let ctrl = (brp << 24)
                    | (sjw << 22)
                    | (phase_seg1 << 19)
                    | (phase_seg2 << 16)
                    | prop_seg;
                vec![Register::new("CAN_CTRL", ctrl, Width::U32)]
            }
            Encoder::Mcan => {
                let nbtp = ((brp & 0x1ff) << 16)
                    | ((sjw & 0x7f) << 25)
                    | ((tseg1 & 0xff) << 8)
                    | (phase_seg2 & 0x7f);
                vec![Register::new("NBTP", nbtp, Width::U32)]
            }
            Encoder::Sja1000 => vec![
                Register::new("BTR0", (brp & 0x3f) | ((sjw & 0x3) << 6), Width::U8),
                Register::new("BTR1", (tseg1 & 0xf) | ((phase_seg2 & 0x7) << 4), Width::U8),
            ],
            Encoder::TiHecc => {
                let canbtc = (phase_seg2 & 0x7)
                    | ((tseg1 & 0xf) << 3)
                    | ((sjw & 0x3) << 8)
                    | ((brp & 0xff) << 16);
                vec![Register::new("CANBTC", canbtc, Width::U32)]
            }
        };

        Registers { registers }
    }
}
