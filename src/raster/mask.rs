//! Bit-packed validity masks and density weights.

use crate::error::WarpError;

const WORD_BITS: usize = 32;

#[inline]
fn word_and_bit(offset: usize) -> (usize, u32) {
    (offset >> 5, 1u32 << (offset & 0x1f))
}

/// One validity bit per pixel, packed 32 pixels per word.
///
/// Bit `offset & 31` of word `offset >> 5` is set when the pixel is valid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidityMask {
    words: Vec<u32>,
    len: usize,
}

impl ValidityMask {
    /// Number of words needed to hold `len` pixels.
    pub const fn word_count(len: usize) -> usize {
        len.div_ceil(WORD_BITS)
    }

    /// A mask with every pixel invalid.
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; Self::word_count(len)],
            len,
        }
    }

    /// A mask with every pixel valid. Padding bits past `len` stay clear.
    pub fn all_valid(len: usize) -> Self {
        let mut mask = Self {
            words: vec![u32::MAX; Self::word_count(len)],
            len,
        };
        mask.clear_padding();
        mask
    }

    /// Wrap existing mask words covering `len` pixels. Bits past `len` in the
    /// last word are cleared.
    pub fn from_words(words: Vec<u32>, len: usize) -> Result<Self, WarpError> {
        let expected = Self::word_count(len);
        if words.len() != expected {
            return Err(WarpError::Config(format!(
                "mask for {len} pixels needs {expected} words, got {}",
                words.len()
            )));
        }
        let mut mask = Self { words, len };
        mask.clear_padding();
        Ok(mask)
    }

    fn clear_padding(&mut self) {
        let tail = self.len % WORD_BITS;
        if tail != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1u32 << tail) - 1;
            }
        }
    }

    /// Number of pixels covered.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Offsets past the end of the mask read as invalid.
    #[inline]
    pub fn is_valid(&self, offset: usize) -> bool {
        if offset >= self.len {
            return false;
        }
        let (word, bit) = word_and_bit(offset);
        self.words[word] & bit != 0
    }

    #[inline]
    pub fn set_valid(&mut self, offset: usize) {
        if offset < self.len {
            let (word, bit) = word_and_bit(offset);
            self.words[word] |= bit;
        }
    }

    #[inline]
    pub fn set_invalid(&mut self, offset: usize) {
        if offset < self.len {
            let (word, bit) = word_and_bit(offset);
            self.words[word] &= !bit;
        }
    }

    pub fn count_valid(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }
}

impl FromIterator<bool> for ValidityMask {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut words = Vec::new();
        let mut len = 0;
        for valid in iter {
            let (word, bit) = word_and_bit(len);
            if word == words.len() {
                words.push(0);
            }
            if valid {
                words[word] |= bit;
            }
            len += 1;
        }
        Self { words, len }
    }
}

/// An absent mask means every pixel is valid.
#[inline]
pub fn is_valid(mask: Option<&ValidityMask>, offset: usize) -> bool {
    mask.map_or(true, |m| m.is_valid(offset))
}

/// Density weight at `offset`, 1.0 when no density array is given.
#[inline]
pub fn density_at(density: Option<&[f32]>, offset: usize) -> f64 {
    density
        .and_then(|d| d.get(offset))
        .map_or(1.0, |&d| f64::from(d))
}

/// Combine a new contribution into an accumulated density:
/// `1 - (1 - new) * (1 - old)`.
#[inline]
pub fn overlay_density(density: &mut [f32], offset: usize, value: f64) {
    if let Some(slot) = density.get_mut(offset) {
        let old = f64::from(*slot);
        *slot = (1.0 - (1.0 - value) * (1.0 - old)).clamp(0.0, 1.0) as f32;
    }
}
