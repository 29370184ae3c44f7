//! Frame flag bytes
//!
//! Each content byte of a page is a `BASE` pattern ORed with flags from one
//! category. The values are fixed by the sign firmware.

use std::ops::{BitOr, BitOrAssign};

macro_rules! flag_byte {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(u8);

        impl $name {
            /// Raw byte value as sent on the wire
            pub const fn bits(self) -> u8 {
                self.0
            }

            /// True if every bit of `other` is set in `self`
            pub const fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }
        }

        impl BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }

        impl From<$name> for u8 {
            fn from(flags: $name) -> u8 {
                flags.0
            }
        }
    };
}

flag_byte!(
    /// First content byte: how the sign should treat the frame
    SerialStatus
);

impl SerialStatus {
    /// Fixed high bits of the byte
    pub const BASE: Self = Self(0b1100_0000);
    /// Interrupt flag
    pub const INTERRUPT: Self = Self(0b0000_0010);
    /// More pages follow; the sign waits before showing the new set
    pub const MORE_PAGES: Self = Self(0b0000_0100);
    /// Ask the sign to answer with `ACK`
    pub const ACK_WANTED: Self = Self(0b0000_1000);
    /// Schedule flag
    pub const SCHEDULE: Self = Self(0b0001_0000);
}

flag_byte!(
    /// Page timing: display mode and duration in seconds
    Tempo
);

impl Tempo {
    /// Fixed high bits of the byte
    pub const BASE: Self = Self(0b1100_0000);
    /// Show for the duration field; no bits of its own
    pub const TIMER: Self = Self(0b0000_0000);
    /// Display mode: always on
    pub const ALWAYS_ON: Self = Self(0b0010_0000);
    /// Display mode: always off
    pub const ALWAYS_OFF: Self = Self(0b0001_0000);

    /// Duration field; only the low nibble is transmitted
    pub const fn duration(seconds: u8) -> Self {
        Self(seconds & 0x0f)
    }
}

flag_byte!(
    /// Page function: transition effect and live-data display
    Function
);

impl Function {
    /// Fixed high bits of the byte
    pub const BASE: Self = Self(0b1100_0000);
    /// Display the sign's clock
    pub const TIME: Self = Self(0b0001_0000);
    /// Display the sign's temperature sensor
    pub const TEMPERATURE: Self = Self(0b0010_0000);

    /// Transition field; only the low nibble is transmitted
    pub const fn transition(code: u8) -> Self {
        Self(code & 0x0f)
    }
}

flag_byte!(
    /// Page layout: joined lines, centering, inversion
    PageStatus
);

impl PageStatus {
    /// Fixed high bit of the byte
    pub const BASE: Self = Self(0b1000_0000);
    /// Join lines 1 and 2
    pub const JOIN_12: Self = Self(0b0000_0001);
    /// Join lines 3 and 4
    pub const JOIN_34: Self = Self(0b0000_0010);
    /// Join lines 5 and 6
    pub const JOIN_56: Self = Self(0b0000_0100);
    /// Join lines 7 and 8
    pub const JOIN_78: Self = Self(0b0000_1000);
    /// Center text horizontally
    pub const CENTER: Self = Self(0b0001_0000);
    /// Use the foreign character set
    pub const FOREIGN: Self = Self(0b0010_0000);
    /// Invert the display
    pub const INVERT: Self = Self(0b0100_0000);
}
