//! Synthetic font metrics.
//!
//! The engine `reset`s a TFM file for every font a document mentions.
//! Nothing real backs those reads here: any `.tfm` name that was not
//! seeded into the store resolves to a metric image synthesized from the
//! name alone, so repeated runs see identical bytes.
//!
//! The image is a structurally valid TFM file. TFM is big-endian
//! throughout: a 12-halfword header (`lf lh bc ec nw nh nd ni nl nk ne
//! np`) whose counts must satisfy
//! `lf = 6 + lh + (ec-bc+1) + nw + nh + nd + ni + nl + nk + ne + np`,
//! then the header block (checksum, design size), one char_info word per
//! character, the dimension arrays (index 0 is the mandatory zero word)
//! and the fontdimen parameters. Dimensions are fix_words: 32-bit fixed
//! point with a 20-bit fraction, relative to the design size.

/// Printable ASCII coverage.
const FIRST_CHAR: u8 = 32;
const LAST_CHAR: u8 = 126;

/// Design size used when the name carries no trailing size digits.
const DEFAULT_DESIGN_SIZE: u32 = 10;

/// fix_word 1.0.
const FIX_ONE: u32 = 1 << 20;

/// Shared character dimensions, in ems.
const CHAR_WIDTH: u32 = FIX_ONE / 2;
const CHAR_HEIGHT: u32 = FIX_ONE * 11 / 16;
const CHAR_DEPTH: u32 = FIX_ONE * 3 / 16;

/// The seven standard fontdimen parameters after the slant.
const SPACE: u32 = FIX_ONE / 3;
const SPACE_STRETCH: u32 = FIX_ONE / 6;
const SPACE_SHRINK: u32 = FIX_ONE / 9;
const X_HEIGHT: u32 = FIX_ONE * 2 / 5;
const QUAD: u32 = FIX_ONE;
const EXTRA_SPACE: u32 = FIX_ONE / 10;

/// True if a normalized name asks for font metrics.
pub fn is_font_metric(name: &str) -> bool {
    name.ends_with(".tfm")
}

/// Synthesize the metric image for `name`. Deterministic: the same name
/// always yields the same bytes.
pub fn synthesize(name: &str) -> Vec<u8> {
    let lh: u16 = 2;
    let bc = u16::from(FIRST_CHAR);
    let ec = u16::from(LAST_CHAR);
    let (nw, nh, nd, ni): (u16, u16, u16, u16) = (2, 2, 2, 1);
    let (nl, nk, ne): (u16, u16, u16) = (0, 0, 0);
    let np: u16 = 7;
    let chars = ec - bc + 1;
    let lf = 6 + lh + chars + nw + nh + nd + ni + nl + nk + ne + np;

    let mut image = Vec::with_capacity(usize::from(lf) * 4);
    for half in [lf, lh, bc, ec, nw, nh, nd, ni, nl, nk, ne, np] {
        image.extend_from_slice(&half.to_be_bytes());
    }

    // Header block: checksum word, then the design size.
    push_word(&mut image, checksum(name));
    push_word(&mut image, design_size_points(name) << 20);

    // char_info: every character shares width 1, height 1, depth 1, no
    // italic correction, no lig/kern tag.
    for _ in 0..chars {
        image.extend_from_slice(&[1, 0x11, 0, 0]);
    }

    // Dimension arrays: width, height, depth (zero word + shared value),
    // italic (zero word only).
    for word in [0, CHAR_WIDTH, 0, CHAR_HEIGHT, 0, CHAR_DEPTH, 0] {
        push_word(&mut image, word);
    }

    // fontdimen 1..7: slant, space, stretch, shrink, x-height, quad,
    // extra space.
    for word in [0, SPACE, SPACE_STRETCH, SPACE_SHRINK, X_HEIGHT, QUAD, EXTRA_SPACE] {
        push_word(&mut image, word);
    }

    debug_assert_eq!(image.len(), usize::from(lf) * 4);
    image
}

fn push_word(image: &mut Vec<u8>, word: u32) {
    image.extend_from_slice(&word.to_be_bytes());
}

/// Stable checksum derived from the font name (FNV-1a).
fn checksum(name: &str) -> u32 {
    let mut hash: u32 = 0x811c_9dc5;
    for byte in name.bytes() {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(0x0100_0193);
    }
    hash
}

/// Design size in points, read from trailing digits of the base name
/// (`cmr10` → 10, `cmbx12` → 12). Names without one design at 10 pt.
fn design_size_points(name: &str) -> u32 {
    let base = name.strip_suffix(".tfm").unwrap_or(name);
    let digits = base.bytes().rev().take_while(u8::is_ascii_digit).count();
    base[base.len() - digits..]
        .parse()
        .ok()
        .filter(|size| (1..=255).contains(size))
        .unwrap_or(DEFAULT_DESIGN_SIZE)
}
