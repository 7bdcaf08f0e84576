// src/engine/header.rs
//
// Header codec: the fixed 8-byte header in front of every image.
//
// | offset | field  | meaning                                     |
// |--------|--------|---------------------------------------------|
// | 0      | marker | 0x4949 little-endian, 0x4d4d big-endian     |
// | 2      | width  | pixel columns, > 0                          |
// | 4      | height | pixel rows, > 0                             |
// | 6      | format | packed channel / bit-depth / reserved bits  |

use crate::error::ImgFlipError;

type HeaderResult<T> = std::result::Result<T, ImgFlipError>;

pub const HEADER_LEN: usize = 8;
pub const MARKER_LITTLE: u16 = 0x4949;
pub const MARKER_BIG: u16 = 0x4d4d;

const CHANNEL_MASK: u16 = 0b11;
const DEPTH_SHIFT: u16 = 2;
const DEPTH_MASK: u16 = 0b111;
const RESERVED_SHIFT: u16 = 5;

/// Byte order of the multi-byte header fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    /// Detect the byte order from the marker. Both sentinels are byte
    /// palindromes, so the marker reads the same in either order.
    pub fn detect(marker: u16) -> HeaderResult<Self> {
        match marker {
            MARKER_LITTLE => Ok(Self::Little),
            MARKER_BIG => Ok(Self::Big),
            other => Err(ImgFlipError::invalid_marker(other)),
        }
    }

    pub fn marker(self) -> u16 {
        match self {
            Self::Little => MARKER_LITTLE,
            Self::Big => MARKER_BIG,
        }
    }

    fn read_u16(self, bytes: [u8; 2]) -> u16 {
        match self {
            Self::Little => u16::from_le_bytes(bytes),
            Self::Big => u16::from_be_bytes(bytes),
        }
    }

    fn write_u16(self, value: u16) -> [u8; 2] {
        match self {
            Self::Little => value.to_le_bytes(),
            Self::Big => value.to_be_bytes(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Little => "little",
            Self::Big => "big",
        }
    }
}

/// Packed format word, already normalized to host order.
///
/// bits 0-1: channel code (00 -> 1, 10 -> 3, 11 -> 4)
/// bits 2-4: bit-depth code (000 -> 1, 011 -> 8, 100 -> 16)
/// bits 5-15: reserved, must be zero
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FormatWord(pub u16);

impl FormatWord {
    pub fn raw(self) -> u16 {
        self.0
    }

    pub fn reserved_bits_unset(self) -> bool {
        self.0 >> RESERVED_SHIFT == 0
    }

    pub fn channel_count(self) -> HeaderResult<u8> {
        match self.0 & CHANNEL_MASK {
            0b00 => Ok(1),
            0b10 => Ok(3),
            0b11 => Ok(4),
            code => Err(ImgFlipError::invalid_channel_code(code)),
        }
    }

    pub fn bits_per_channel(self) -> HeaderResult<u8> {
        match (self.0 >> DEPTH_SHIFT) & DEPTH_MASK {
            0b000 => Ok(1),
            0b011 => Ok(8),
            0b100 => Ok(16),
            code => Err(ImgFlipError::invalid_bit_depth_code(code)),
        }
    }
}

/// Validated header. Width, height and format are in host order; the
/// original on-disk order is kept in `byte_order` for re-encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Header {
    pub byte_order: ByteOrder,
    pub width: u16,
    pub height: u16,
    pub format: FormatWord,
}

impl Header {
    /// Decode and validate the 8 header bytes.
    ///
    /// Checks run in order: marker, zero dimensions, reserved bits,
    /// channel code, bit-depth code.
    pub fn parse(bytes: &[u8]) -> HeaderResult<Self> {
        let bytes: &[u8; HEADER_LEN] = bytes
            .get(..HEADER_LEN)
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| ImgFlipError::truncated_header(bytes.len()))?;

        let byte_order = ByteOrder::detect(u16::from_le_bytes([bytes[0], bytes[1]]))?;
        let width = byte_order.read_u16([bytes[2], bytes[3]]);
        let height = byte_order.read_u16([bytes[4], bytes[5]]);
        let format = FormatWord(byte_order.read_u16([bytes[6], bytes[7]]));

        if width == 0 || height == 0 {
            return Err(ImgFlipError::zero_dimension(width, height));
        }
        if !format.reserved_bits_unset() {
            return Err(ImgFlipError::reserved_bits_set(format.raw()));
        }
        format.channel_count()?;
        format.bits_per_channel()?;

        Ok(Self {
            byte_order,
            width,
            height,
            format,
        })
    }

    /// Serialize back to the original on-disk byte order.
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let order = self.byte_order;
        let mut out = [0u8; HEADER_LEN];
        out[0..2].copy_from_slice(&order.marker().to_le_bytes());
        out[2..4].copy_from_slice(&order.write_u16(self.width));
        out[4..6].copy_from_slice(&order.write_u16(self.height));
        out[6..8].copy_from_slice(&order.write_u16(self.format.raw()));
        out
    }

    pub fn channels(&self) -> u8 {
        // Validated in parse(); the fallback is unreachable for parsed headers.
        self.format.channel_count().unwrap_or(0)
    }

    pub fn bits_per_channel(&self) -> u8 {
        self.format.bits_per_channel().unwrap_or(0)
    }

    /// Bytes per pixel for whole-byte storage.
    ///
    /// 1-bit depth is a legal header value but cannot be stored one pixel per
    /// byte run, so it is rejected here rather than yielding zero.
    pub fn bytes_per_pixel(&self) -> HeaderResult<u32> {
        let bits = self.format.bits_per_channel()?;
        if bits < 8 {
            return Err(ImgFlipError::unsupported_bit_depth(bits));
        }
        let channels = self.format.channel_count()?;
        Ok(u32::from(channels) * u32::from(bits / 8))
    }

    /// Exact payload length in bytes that must follow the header.
    pub fn payload_len(&self) -> HeaderResult<u64> {
        Ok(u64::from(self.width) * u64::from(self.height) * u64::from(self.bytes_per_pixel()?))
    }
}
