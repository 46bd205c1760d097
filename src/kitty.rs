//! Kitty graphics protocol output.
//!
//! Frames are transmitted as base64-encoded raw RGBA (`f=32`) under a fixed
//! image id so each animation frame replaces the previous one. `q=2` keeps
//! the terminal from answering every transmission.
//!
//! Protocol reference: <https://sw.kovidgoyal.net/kitty/graphics-protocol/>.

use crate::render::Frame;
use std::io::{self, Write};

/// Image id used for every frame; deleting it clears the animation.
const IMAGE_ID: u32 = 1;

const ESC: &str = "\x1b";

/// Encodes bytes as standard base64 with `=` padding.
///
/// None of the example stacks pull in a base64 crate for this one payload
/// path, so the 6-bit packer lives here.
#[must_use]
pub fn base64_encode(data: &[u8]) -> String {
    const LOOKUP: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

    let mut out = String::with_capacity((data.len() + 2) / 3 * 4);
    for chunk in data.chunks(3) {
        let b0 = chunk[0] as u32;
        let b1 = chunk.get(1).copied().unwrap_or(0) as u32;
        let b2 = chunk.get(2).copied().unwrap_or(0) as u32;
        let triple = (b0 << 16) | (b1 << 8) | b2;

        out.push(LOOKUP[(triple >> 18) as usize & 0x3f] as char);
        out.push(LOOKUP[(triple >> 12) as usize & 0x3f] as char);
        out.push(if chunk.len() > 1 {
            LOOKUP[(triple >> 6) as usize & 0x3f] as char
        } else {
            '='
        });
        out.push(if chunk.len() > 2 {
            LOOKUP[triple as usize & 0x3f] as char
        } else {
            '='
        });
    }
    out
}

/// Transmits and displays a frame at the given 1-based terminal column.
///
/// The previous frame with the same image id is deleted first, so animation
/// never stacks images.
///
/// # Errors
///
/// Propagates any write failure on `out`.
pub fn display_frame<W: Write>(out: &mut W, frame: &Frame, col_offset: u16) -> io::Result<()> {
    let payload = base64_encode(frame.pixels());

    // Delete the previous image, park the cursor, then transmit + display.
    write!(out, "{ESC}_Ga=d,d=i,i={IMAGE_ID};{ESC}\\")?;
    write!(out, "{ESC}[1;{col_offset}H")?;
    write!(
        out,
        "{ESC}_Ga=T,f=32,s={},v={},i={IMAGE_ID},q=2;{payload}{ESC}\\",
        frame.width, frame.height
    )?;
    out.flush()
}

/// Deletes the animation image, leaving the terminal clean.
///
/// # Errors
///
/// Propagates any write failure on `out`.
pub fn clear_graphics<W: Write>(out: &mut W) -> io::Result<()> {
    write!(out, "{ESC}_Ga=d,d=i,i={IMAGE_ID};{ESC}\\")?;
    out.flush()
}
