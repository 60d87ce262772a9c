//! Type definitions for the pointer classifier
//! Address families, token standards and per-address classification results

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use super::errors::{AppError, ErrorCode};
use crate::utils::constants::{
    CW_PREFIX, CW_MIN_LEN, EVM_ADDRESS_LEN, EVM_PREFIX, FACTORY_PREFIX, IBC_PREFIX,
};

// ============================================
// Pointer Types
// ============================================

/// On-chain token standards understood by the pointer registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PointerType {
    Erc20,
    Erc721,
    Erc1155,
    Cw20,
    Cw721,
    Cw1155,
    Native,
}

impl PointerType {
    /// Integer code used by the chain REST endpoints
    pub const fn code(&self) -> u8 {
        match self {
            Self::Erc20 => 0,
            Self::Erc721 => 1,
            Self::Native => 2,
            Self::Cw20 => 3,
            Self::Cw721 => 4,
            Self::Erc1155 => 5,
            Self::Cw1155 => 6,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Erc20 => "ERC20",
            Self::Erc721 => "ERC721",
            Self::Erc1155 => "ERC1155",
            Self::Cw20 => "CW20",
            Self::Cw721 => "CW721",
            Self::Cw1155 => "CW1155",
            Self::Native => "NATIVE",
        }
    }
}

impl fmt::Display for PointerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================
// Address Families
// ============================================

/// Syntactic family of an address, decided purely from its shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    /// `0x` + 40 hex characters
    Evm,
    /// `sei1` bech32 contract address
    CosmWasm,
    /// `ibc/{HASH}` bank denom
    NativeIbc,
    /// `factory/{creator}/{subdenom}` bank denom
    NativeFactory,
    Unknown,
}

impl AddressFamily {
    /// Tag an address by prefix and family-specific shape
    pub fn detect(address: &str) -> Self {
        if is_evm_shape(address) {
            Self::Evm
        } else if is_cw_shape(address) {
            Self::CosmWasm
        } else if is_ibc_shape(address) {
            Self::NativeIbc
        } else if is_factory_shape(address) {
            Self::NativeFactory
        } else {
            Self::Unknown
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Self::NativeIbc | Self::NativeFactory)
    }

    /// EVM and CosmWasm addresses are case-insensitive; denoms are not
    pub fn is_case_insensitive(&self) -> bool {
        matches!(self, Self::Evm | Self::CosmWasm)
    }
}

fn is_evm_shape(address: &str) -> bool {
    address.len() == EVM_ADDRESS_LEN
        && address
            .strip_prefix(EVM_PREFIX)
            .is_some_and(|hex| hex.chars().all(|c| c.is_ascii_hexdigit()))
}

fn is_cw_shape(address: &str) -> bool {
    address.len() >= CW_MIN_LEN
        && address.strip_prefix(CW_PREFIX).is_some_and(|rest| {
            !rest.is_empty()
                && rest
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        })
}

fn is_ibc_shape(address: &str) -> bool {
    address.strip_prefix(IBC_PREFIX).is_some_and(|hash| {
        !hash.is_empty()
            && hash
                .chars()
                .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
    })
}

fn is_factory_shape(address: &str) -> bool {
    let Some(rest) = address.strip_prefix(FACTORY_PREFIX) else {
        return false;
    };
    let mut segments = rest.split('/');
    match (segments.next(), segments.next(), segments.next()) {
        (Some(creator), Some(subdenom), None) => is_cw_shape(creator) && !subdenom.is_empty(),
        _ => false,
    }
}

// ============================================
// Classification Result
// ============================================

/// Value reported in the `pointerType` field: a token standard, or the
/// address family when no relationship was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetType {
    Standard(PointerType),
    Evm,
    Cw,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard(pointer_type) => pointer_type.as_str(),
            Self::Evm => "EVM",
            Self::Cw => "CW",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AssetType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Which side of a pointer relationship an address sits on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetRole {
    /// Canonical representation, optionally with a registered pointer
    Base { pointer_address: Option<String> },
    /// Synthetic pointer to an asset living in another family
    Pointer { pointee_address: String },
}

/// Successful classification of one address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub address: String,
    pub pointer_type: AssetType,
    pub role: AssetRole,
}

impl Classification {
    pub fn base(address: impl Into<String>, pointer_type: AssetType, pointer: Option<String>) -> Self {
        Self {
            address: address.into(),
            pointer_type,
            role: AssetRole::Base {
                pointer_address: pointer,
            },
        }
    }

    pub fn pointer(address: impl Into<String>, pointer_type: AssetType, pointee: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            pointer_type,
            role: AssetRole::Pointer {
                pointee_address: pointee.into(),
            },
        }
    }

    pub fn is_base_asset(&self) -> bool {
        matches!(self.role, AssetRole::Base { .. })
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self.role, AssetRole::Pointer { .. })
    }

    /// Registered pointer for a base asset, empty otherwise
    pub fn pointer_address(&self) -> &str {
        match &self.role {
            AssetRole::Base {
                pointer_address: Some(pointer),
            } => pointer,
            _ => "",
        }
    }

    /// Canonical target of a pointer, empty otherwise
    pub fn pointee_address(&self) -> &str {
        match &self.role {
            AssetRole::Pointer { pointee_address } => pointee_address,
            AssetRole::Base { .. } => "",
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClassificationWire<'a> {
    address: &'a str,
    is_base_asset: bool,
    is_pointer: bool,
    pointer_type: AssetType,
    pointer_address: &'a str,
    pointee_address: &'a str,
}

impl Serialize for Classification {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ClassificationWire {
            address: &self.address,
            is_base_asset: self.is_base_asset(),
            is_pointer: self.is_pointer(),
            pointer_type: self.pointer_type,
            pointer_address: self.pointer_address(),
            pointee_address: self.pointee_address(),
        }
        .serialize(serializer)
    }
}

/// Per-address failure; replaces every classification field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressFailure {
    pub address: String,
    pub error: String,
    pub error_code: ErrorCode,
}

impl AddressFailure {
    pub fn new(address: impl Into<String>, error: &AppError) -> Self {
        Self {
            address: address.into(),
            error: error.message.clone(),
            error_code: error.code,
        }
    }
}

/// Outcome for one requested address
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AddressReport {
    Classified(Classification),
    Failed(AddressFailure),
}

impl AddressReport {
    pub fn address(&self) -> &str {
        match self {
            Self::Classified(c) => &c.address,
            Self::Failed(f) => &f.address,
        }
    }

    pub fn classification(&self) -> Option<&Classification> {
        match self {
            Self::Classified(c) => Some(c),
            Self::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&AddressFailure> {
        match self {
            Self::Classified(_) => None,
            Self::Failed(f) => Some(f),
        }
    }
}

// ============================================
// Callers
// ============================================

/// Authorization level of an inbound caller, decides the batch cap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallerTier {
    Anonymous,
    Trusted,
}
