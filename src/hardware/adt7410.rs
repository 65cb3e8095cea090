//! ADT7410 temperature word decoding (13-bit mode, 0.0625 °C per LSB).

const LSB_CELSIUS: f64 = 0.0625;
const SIGN_BIT: u16 = 0x1000;
const MASK_13: u16 = 0x1fff;

/// Convert the word returned by an SMBus "read word" into °C.
///
/// SMBus delivers the low byte first while the sensor sends MSB first,
/// so the bytes are swapped before dropping the three flag bits.
pub fn decode_word(word: u16) -> f64 {
    let raw = word.swap_bytes() >> 3;
    if raw & SIGN_BIT == 0 {
        raw as f64 * LSB_CELSIUS
    } else {
        -(((!raw & MASK_13) + 1) as f64) * LSB_CELSIUS
    }
}
