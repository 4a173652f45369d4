//! Metadata account binary decoding
//!
//! Decodes the fixed on-chain layout of a token metadata account:
//! a one-byte discriminant, two 32-byte keys (update authority, mint),
//! then three length-prefixed UTF-8 fields (name, symbol, uri). This is
//! deliberately not a general-purpose deserializer; only the subset the
//! known layout needs is implemented.

use crate::error::DecodeError;

/// Discriminant tag for a v1 metadata account
pub const METADATA_ACCOUNT_TAG: u8 = 4;

/// Field caps from the on-chain layout
pub const MAX_NAME_LEN: usize = 200;
pub const MAX_SYMBOL_LEN: usize = 200;
pub const MAX_URI_LEN: usize = 1000;

/// URI schemes the pipeline will follow
const ALLOWED_SCHEMES: [&str; 4] = ["https://", "http://", "ar://", "ipfs://"];

/// Fields of the metadata account, used to attribute decode failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataField {
    Name,
    Symbol,
    Uri,
}

impl MetadataField {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Symbol => "symbol",
            Self::Uri => "uri",
        }
    }

    const fn cap(&self) -> usize {
        match self {
            Self::Name => MAX_NAME_LEN,
            Self::Symbol => MAX_SYMBOL_LEN,
            Self::Uri => MAX_URI_LEN,
        }
    }
}

impl std::fmt::Display for MetadataField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded name/symbol/uri triple from an on-chain metadata account
///
/// Ephemeral: recomputed on every fetch, never persisted standalone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataAccount {
    pub name: String,
    pub symbol: String,
    pub uri: String,
}

/// Decode a metadata account buffer
///
/// Decoding never partially succeeds: either all three fields decode and
/// the uri passes scheme validation, or the call fails with an error
/// naming the offending field.
///
/// # Errors
/// - [`DecodeError::BadDiscriminant`] if the first byte is not the
///   metadata account tag
/// - [`DecodeError::TruncatedBuffer`] if the buffer ends inside a field
/// - [`DecodeError::LengthOverflow`] if a length prefix exceeds its cap
/// - [`DecodeError::InvalidUriScheme`] if the uri scheme is not allowed
pub fn decode_metadata_account(data: &[u8]) -> Result<MetadataAccount, DecodeError> {
    let mut cursor = Cursor::new(data);

    let tag = cursor.read_u8(MetadataField::Name)?;
    if tag != METADATA_ACCOUNT_TAG {
        return Err(DecodeError::BadDiscriminant {
            expected: METADATA_ACCOUNT_TAG,
            found: tag,
        });
    }

    // Update authority and mint keys precede the string fields
    cursor.skip(64, MetadataField::Name)?;

    let name = cursor.read_string(MetadataField::Name)?;
    let symbol = cursor.read_string(MetadataField::Symbol)?;
    let uri = cursor.read_string(MetadataField::Uri)?;

    let uri = trim_padding(&uri);
    if !ALLOWED_SCHEMES.iter().any(|scheme| uri.starts_with(scheme)) {
        return Err(DecodeError::InvalidUriScheme { uri });
    }

    Ok(MetadataAccount {
        name: trim_padding(&name),
        symbol: trim_padding(&symbol),
        uri,
    })
}

/// Strip trailing NUL padding and surrounding whitespace
fn trim_padding(s: &str) -> String {
    s.trim_end_matches('\0').trim().to_string()
}

struct Cursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.offset)
    }

    fn read_u8(&mut self, field: MetadataField) -> Result<u8, DecodeError> {
        let byte = *self
            .data
            .get(self.offset)
            .ok_or(DecodeError::TruncatedBuffer {
                field,
                needed: 1,
                remaining: 0,
            })?;
        self.offset += 1;
        Ok(byte)
    }

    fn skip(&mut self, count: usize, field: MetadataField) -> Result<(), DecodeError> {
        if self.remaining() < count {
            return Err(DecodeError::TruncatedBuffer {
                field,
                needed: count,
                remaining: self.remaining(),
            });
        }
        self.offset += count;
        Ok(())
    }

    /// Read a 4-byte little-endian length prefix followed by that many
    /// UTF-8 bytes, enforcing the field's cap.
    fn read_string(&mut self, field: MetadataField) -> Result<String, DecodeError> {
        if self.remaining() < 4 {
            return Err(DecodeError::TruncatedBuffer {
                field,
                needed: 4,
                remaining: self.remaining(),
            });
        }
        let len_bytes: [u8; 4] = self.data[self.offset..self.offset + 4]
            .try_into()
            .expect("slice is 4 bytes");
        let len = u32::from_le_bytes(len_bytes) as usize;
        self.offset += 4;

        if len > field.cap() {
            return Err(DecodeError::LengthOverflow {
                field,
                length: len,
                cap: field.cap(),
            });
        }
        if self.remaining() < len {
            return Err(DecodeError::TruncatedBuffer {
                field,
                needed: len,
                remaining: self.remaining(),
            });
        }

        let bytes = &self.data[self.offset..self.offset + len];
        self.offset += len;
        String::from_utf8(bytes.to_vec()).map_err(|_| DecodeError::InvalidUtf8 { field })
    }
}
