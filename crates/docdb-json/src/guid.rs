//! 128-bit GUID value with canonical `8-4-4-4-12` text form.

use std::fmt;

/// Positions of the dashes in the canonical 36 character form.
const DASHES: [usize; 4] = [8, 13, 18, 23];

pub(crate) const GUID_TEXT_LEN: usize = 36;

/// Letter case of a canonical GUID string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GuidCase {
    Lower,
    Upper,
}

/// A GUID stored as its 16 octets in textual order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Guid(pub [u8; 16]);

impl Guid {
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Guid(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Parses the canonical `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx` form in
    /// any letter case.
    pub fn parse(text: &str) -> Option<Guid> {
        parse_canonical(text.as_bytes()).map(|(guid, _)| guid)
    }

    /// Formats the GUID in canonical form with the requested letter case.
    pub(crate) fn format(&self, case: GuidCase) -> String {
        let digits: &[u8; 16] = match case {
            GuidCase::Lower => b"0123456789abcdef",
            GuidCase::Upper => b"0123456789ABCDEF",
        };
        let mut out = String::with_capacity(GUID_TEXT_LEN);
        for (i, byte) in self.0.iter().enumerate() {
            if matches!(i, 4 | 6 | 8 | 10) {
                out.push('-');
            }
            out.push(digits[(byte >> 4) as usize] as char);
            out.push(digits[(byte & 0x0f) as usize] as char);
        }
        out
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(GuidCase::Lower))
    }
}

/// Parses a canonical GUID and reports the letter case it was written in.
///
/// Strings with no letters report [`GuidCase::Lower`]; strings mixing upper
/// and lower case letters report `None` as the case.
pub(crate) fn parse_canonical(text: &[u8]) -> Option<(Guid, Option<GuidCase>)> {
    if text.len() != GUID_TEXT_LEN {
        return None;
    }
    let mut bytes = [0u8; 16];
    let mut has_lower = false;
    let mut has_upper = false;
    let mut nibble = 0usize;
    for (i, &ch) in text.iter().enumerate() {
        if DASHES.contains(&i) {
            if ch != b'-' {
                return None;
            }
            continue;
        }
        let value = match ch {
            b'0'..=b'9' => ch - b'0',
            b'a'..=b'f' => {
                has_lower = true;
                ch - b'a' + 10
            }
            b'A'..=b'F' => {
                has_upper = true;
                ch - b'A' + 10
            }
            _ => return None,
        };
        let slot = &mut bytes[nibble / 2];
        if nibble % 2 == 0 {
            *slot = value << 4;
        } else {
            *slot |= value;
        }
        nibble += 1;
    }
    let case = match (has_lower, has_upper) {
        (true, true) => None,
        (false, true) => Some(GuidCase::Upper),
        _ => Some(GuidCase::Lower),
    };
    Some((Guid(bytes), case))
}
