use std::fmt;

/// Borrowed UTF-16LE text straight out of a tile's character blob.
///
/// Code units are kept as raw byte pairs so the view works at any offset.
/// Nothing is decoded until the caller asks for it.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct Utf16Str<'a> {
    units: &'a [[u8; 2]],
}

impl<'a> Utf16Str<'a> {
    #[inline]
    pub fn from_units(units: &'a [[u8; 2]]) -> Self {
        Self { units }
    }

    /// Length in code units.
    #[inline]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    #[inline]
    pub fn code_units(&self) -> impl Iterator<Item = u16> + 'a {
        self.units.iter().map(|u| u16::from_le_bytes(*u))
    }

    pub fn chars(&self) -> impl Iterator<Item = char> + 'a {
        char::decode_utf16(self.code_units()).map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    /// Compares against `prefix` without decoding or allocating.
    pub fn starts_with(&self, prefix: &str) -> bool {
        let mut units = self.code_units();
        prefix
            .encode_utf16()
            .all(|expected| units.next() == Some(expected))
    }

    pub fn eq_str(&self, other: &str) -> bool {
        self.code_units().eq(other.encode_utf16())
    }

    /// Decodes to an owned string, replacing unpaired surrogates.
    pub fn to_string_lossy(&self) -> String {
        self.chars().collect()
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.units)
    }
}

impl fmt::Display for Utf16Str<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;
        for c in self.chars() {
            f.write_char(c)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Utf16Str<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_string_lossy())
    }
}

#[cfg(test)]
pub(crate) fn encode_units(s: &str) -> Vec<[u8; 2]> {
    s.encode_utf16().map(u16::to_le_bytes).collect()
}
