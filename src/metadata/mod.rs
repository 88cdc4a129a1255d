//! On-chain token metadata
//!
//! The content cell is `0x00` (on-chain marker) followed by a dictionary from
//! field key to value cell. Each value cell is `0x00` (snake marker) and the
//! field's text bytes in snake format.
//!
//! Two key layouts are in use by deployed minters and both are supported:
//! - [`KeyVariant::FullKey`]: the field name as ASCII, zero-padded to 32 bytes
//! - [`KeyVariant::HashedKey`]: SHA-256 of the field name as a 256-bit integer

pub mod snake;

use crate::cell::{Builder, Cell};
use crate::dict::{Dictionary, DictionaryKey};
use crate::errors::{CodecError, CodecResult};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

pub const ONCHAIN_CONTENT_PREFIX: u8 = 0x00;
pub const SNAKE_PREFIX: u8 = 0x00;

/// Key width of the content dictionary for both variants
pub const KEY_BITS: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataField {
    Name,
    Description,
    Image,
    Symbol,
}

/// Text encoding a field's bytes are written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Ascii,
}

impl MetadataField {
    pub const ALL: [MetadataField; 4] = [
        MetadataField::Name,
        MetadataField::Description,
        MetadataField::Image,
        MetadataField::Symbol,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MetadataField::Name => "name",
            MetadataField::Description => "description",
            MetadataField::Image => "image",
            MetadataField::Symbol => "symbol",
        }
    }

    /// `image` is a URL and is stored as ASCII; everything else is UTF-8
    pub fn encoding(&self) -> TextEncoding {
        match self {
            MetadataField::Image => TextEncoding::Ascii,
            _ => TextEncoding::Utf8,
        }
    }

    pub fn full_key(&self) -> Vec<u8> {
        let mut key = self.name().as_bytes().to_vec();
        key.resize(KEY_BITS / 8, 0);
        key
    }

    pub fn hashed_key(&self) -> BigUint {
        BigUint::from_bytes_be(&Sha256::digest(self.name().as_bytes()))
    }

    fn from_full_key(key: &[u8]) -> Option<Self> {
        let end = key.iter().rposition(|&byte| byte != 0).map_or(0, |i| i + 1);
        Self::ALL
            .into_iter()
            .find(|field| field.name().as_bytes() == &key[..end])
    }

    fn from_hashed_key(key: &BigUint) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| &field.hashed_key() == key)
    }

    fn encode_text(&self, text: &str) -> CodecResult<Vec<u8>> {
        if self.encoding() == TextEncoding::Ascii && !text.is_ascii() {
            return Err(CodecError::InvalidText {
                field: self.name(),
                reason: "value must be ASCII".to_string(),
            });
        }
        Ok(text.as_bytes().to_vec())
    }

    fn decode_text(&self, bytes: Vec<u8>) -> CodecResult<String> {
        if self.encoding() == TextEncoding::Ascii && !bytes.is_ascii() {
            return Err(CodecError::InvalidText {
                field: self.name(),
                reason: "value is not ASCII".to_string(),
            });
        }
        String::from_utf8(bytes).map_err(|e| CodecError::InvalidText {
            field: self.name(),
            reason: e.to_string(),
        })
    }
}

impl FromStr for MetadataField {
    type Err = CodecError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.name() == key)
            .ok_or_else(|| CodecError::UnsupportedKey(key.to_string()))
    }
}

impl fmt::Display for MetadataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum KeyVariant {
    #[serde(rename = "full")]
    FullKey,
    #[default]
    #[serde(rename = "hashed")]
    HashedKey,
}

impl FromStr for KeyVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(KeyVariant::FullKey),
            "hashed" => Ok(KeyVariant::HashedKey),
            _ => Err(format!("unknown key variant '{}', expected full or hashed", s)),
        }
    }
}

impl fmt::Display for KeyVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyVariant::FullKey => f.write_str("full"),
            KeyVariant::HashedKey => f.write_str("hashed"),
        }
    }
}

/// Jetton metadata; an absent field is not written at all
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

impl TokenMetadata {
    /// Build from loosely-typed key/value pairs
    ///
    /// Keys outside the schema fail with [`CodecError::UnsupportedKey`];
    /// empty values are dropped.
    pub fn from_pairs<I, K, V>(pairs: I) -> CodecResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut metadata = Self::default();
        for (key, value) in pairs {
            let field: MetadataField = key.as_ref().parse()?;
            let value: String = value.into();
            metadata.set(field, (!value.is_empty()).then_some(value));
        }
        Ok(metadata)
    }

    pub fn get(&self, field: MetadataField) -> Option<&str> {
        match field {
            MetadataField::Name => self.name.as_deref(),
            MetadataField::Description => self.description.as_deref(),
            MetadataField::Image => self.image.as_deref(),
            MetadataField::Symbol => self.symbol.as_deref(),
        }
    }

    pub fn set(&mut self, field: MetadataField, value: Option<String>) {
        let slot = match field {
            MetadataField::Name => &mut self.name,
            MetadataField::Description => &mut self.description,
            MetadataField::Image => &mut self.image,
            MetadataField::Symbol => &mut self.symbol,
        };
        *slot = value;
    }

    /// Present, non-empty fields in schema order
    pub fn fields(&self) -> impl Iterator<Item = (MetadataField, &str)> + '_ {
        MetadataField::ALL.into_iter().filter_map(move |field| {
            self.get(field)
                .filter(|value| !value.is_empty())
                .map(|value| (field, value))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.fields().next().is_none()
    }

    pub fn encode(&self, variant: KeyVariant) -> CodecResult<Cell> {
        debug!(
            "Encoding metadata with {} keys: {} fields",
            variant,
            self.fields().count()
        );
        let mut builder = Builder::new();
        builder.store_uint(u64::from(ONCHAIN_CONTENT_PREFIX), 8)?;
        match variant {
            KeyVariant::FullKey => {
                let dict = self.build_dict(MetadataField::full_key)?;
                builder.store_dict(Some(&dict))?;
            }
            KeyVariant::HashedKey => {
                let dict = self.build_dict(MetadataField::hashed_key)?;
                builder.store_dict(Some(&dict))?;
            }
        }
        Ok(builder.finalize())
    }

    fn build_dict<K: DictionaryKey>(
        &self,
        key_of: impl Fn(&MetadataField) -> K,
    ) -> CodecResult<Dictionary<K>> {
        let mut dict = Dictionary::new(KEY_BITS);
        for (field, value) in self.fields() {
            let bytes = field.encode_text(value)?;
            let mut cell = Builder::new();
            cell.store_uint(u64::from(SNAKE_PREFIX), 8)?;
            snake::store_snake_bytes(&mut cell, &bytes)?;
            dict.set(key_of(&field), cell.finalize())?;
        }
        Ok(dict)
    }

    /// Parse a content cell
    ///
    /// Dictionary keys that do not name a schema field are skipped.
    pub fn decode(cell: &Cell, variant: KeyVariant) -> CodecResult<Self> {
        let mut slice = cell.parse();
        if slice.remaining_bits() < 8 {
            return Err(CodecError::ExpectedOnchainMarker { found: None });
        }
        let marker = slice.load_uint(8)? as u8;
        if marker != ONCHAIN_CONTENT_PREFIX {
            return Err(CodecError::ExpectedOnchainMarker {
                found: Some(marker),
            });
        }

        let mut metadata = Self::default();
        let mut skipped = 0usize;
        match variant {
            KeyVariant::FullKey => {
                let dict: Dictionary<Vec<u8>> = slice.load_dict(KEY_BITS)?;
                for (key, value) in &dict {
                    match MetadataField::from_full_key(key) {
                        Some(field) => metadata.set(field, Some(read_value(field, value)?)),
                        None => skipped += 1,
                    }
                }
            }
            KeyVariant::HashedKey => {
                let dict: Dictionary<BigUint> = slice.load_dict(KEY_BITS)?;
                for (key, value) in &dict {
                    match MetadataField::from_hashed_key(key) {
                        Some(field) => metadata.set(field, Some(read_value(field, value)?)),
                        None => skipped += 1,
                    }
                }
            }
        }
        debug!(
            "Decoded metadata with {} keys ({} unknown keys skipped)",
            variant, skipped
        );
        Ok(metadata)
    }
}

fn read_value(field: MetadataField, cell: &Cell) -> CodecResult<String> {
    let mut slice = cell.parse();
    let prefix = slice.load_uint(8)? as u8;
    if prefix != SNAKE_PREFIX {
        return Err(CodecError::UnsupportedValueFormat { found: prefix });
    }
    let bytes = snake::load_snake_bytes(&mut slice)?;
    field.decode_text(bytes)
}

/// Validate and encode loosely-typed pairs in one step
pub fn encode_pairs<I, K, V>(pairs: I, variant: KeyVariant) -> CodecResult<Cell>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    TokenMetadata::from_pairs(pairs)?.encode(variant)
}
