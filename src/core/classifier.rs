//! Address Classifier
//!
//! Maps an address to a [`ResolutionPlan`]: the fixed, ordered list of
//! registry lookups to try and the type to report when none of them hit.
//! Pure logic, no I/O.

use alloy_primitives::Address;

use crate::models::{AddressFamily, AppError, AppResult, AssetType, Classification, PointerType};
use crate::providers::{LookupDirection, LookupQuery, PointerRecord};
use crate::utils::constants::NATIVE_GAS_DENOM;

/// One registry lookup in a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub direction: LookupDirection,
    pub pointer_type: PointerType,
}

impl Candidate {
    /// "Is the address a pointer of this type?"
    const fn pointee_of(pointer_type: PointerType) -> Self {
        Self {
            direction: LookupDirection::PointeeByPointer,
            pointer_type,
        }
    }

    /// "Is there a pointer of this type registered against the address?"
    const fn pointer_of(pointer_type: PointerType) -> Self {
        Self {
            direction: LookupDirection::PointerByPointee,
            pointer_type,
        }
    }

    pub fn query<'a>(&self, address: &'a str) -> LookupQuery<'a> {
        LookupQuery {
            direction: self.direction,
            pointer_type: self.pointer_type,
            address,
        }
    }
}

// ============================================
// Candidate Lists (priority order)
// ============================================

const COSMWASM_CANDIDATES: &[Candidate] = &[
    Candidate::pointee_of(PointerType::Erc20),
    Candidate::pointee_of(PointerType::Erc721),
    Candidate::pointee_of(PointerType::Erc1155),
    Candidate::pointer_of(PointerType::Erc20),
    Candidate::pointer_of(PointerType::Erc721),
    Candidate::pointer_of(PointerType::Erc1155),
    Candidate::pointer_of(PointerType::Cw20),
    Candidate::pointer_of(PointerType::Cw721),
    Candidate::pointer_of(PointerType::Cw1155),
];

const EVM_CANDIDATES: &[Candidate] = &[
    Candidate::pointee_of(PointerType::Cw20),
    Candidate::pointee_of(PointerType::Cw721),
    Candidate::pointee_of(PointerType::Cw1155),
    Candidate::pointee_of(PointerType::Native),
    Candidate::pointer_of(PointerType::Erc20),
    Candidate::pointer_of(PointerType::Erc721),
    Candidate::pointer_of(PointerType::Erc1155),
];

const NATIVE_CANDIDATES: &[Candidate] = &[Candidate::pointer_of(PointerType::Native)];

/// Per-family resolution policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionPlan {
    /// The EVM null address: fixed pointer to the gas denom, no lookups
    NativeGas,
    /// IBC and factory denoms: always a base asset
    Native,
    CosmWasm,
    Evm,
}

impl ResolutionPlan {
    /// Pick the plan for an address. `None` for unrecognized shapes.
    pub fn for_address(address: &str) -> Option<Self> {
        match AddressFamily::detect(address) {
            AddressFamily::Evm if is_null_address(address) => Some(Self::NativeGas),
            AddressFamily::Evm => Some(Self::Evm),
            AddressFamily::CosmWasm => Some(Self::CosmWasm),
            AddressFamily::NativeIbc | AddressFamily::NativeFactory => Some(Self::Native),
            AddressFamily::Unknown => None,
        }
    }

    pub fn candidates(&self) -> &'static [Candidate] {
        match self {
            Self::NativeGas => &[],
            Self::Native => NATIVE_CANDIDATES,
            Self::CosmWasm => COSMWASM_CANDIDATES,
            Self::Evm => EVM_CANDIDATES,
        }
    }

    /// Type reported for a base asset with no known pointer
    pub fn fallback_type(&self) -> AssetType {
        match self {
            Self::NativeGas | Self::Native => AssetType::Standard(PointerType::Native),
            Self::CosmWasm => AssetType::Cw,
            Self::Evm => AssetType::Evm,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NativeGas => "native-gas",
            Self::Native => "native",
            Self::CosmWasm => "cosmwasm",
            Self::Evm => "evm",
        }
    }

    /// Turn the winning lookup (if any) into a classification.
    ///
    /// `hit` must be the first positive candidate in priority order.
    pub fn interpret(
        &self,
        address: &str,
        hit: Option<(Candidate, &PointerRecord)>,
    ) -> AppResult<Classification> {
        if *self == Self::NativeGas {
            return Ok(Classification::pointer(
                address,
                AssetType::Standard(PointerType::Native),
                NATIVE_GAS_DENOM,
            ));
        }

        let Some((candidate, record)) = hit else {
            return Ok(Classification::base(address, self.fallback_type(), None));
        };

        let counterpart = record.counterpart(candidate.direction).ok_or_else(|| {
            AppError::malformed_record(
                address,
                format!(
                    "{} lookup for {} reported exists without an address",
                    candidate.direction.address_param(),
                    candidate.pointer_type
                ),
            )
        })?;

        let pointer_type = match (self, candidate.direction) {
            (Self::Native, _) => PointerType::Native,
            (_, LookupDirection::PointeeByPointer)
                if AddressFamily::detect(counterpart).is_native() =>
            {
                PointerType::Native
            }
            _ => candidate.pointer_type,
        };

        Ok(match candidate.direction {
            LookupDirection::PointeeByPointer => {
                Classification::pointer(address, AssetType::Standard(pointer_type), counterpart)
            }
            LookupDirection::PointerByPointee => Classification::base(
                address,
                AssetType::Standard(pointer_type),
                Some(counterpart.to_string()),
            ),
        })
    }
}

fn is_null_address(address: &str) -> bool {
    address
        .parse::<Address>()
        .map(|parsed| parsed.is_zero())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CW_ADDR: &str = "sei1msjly0e2v5u99z53vqre47ltv0fsfa6h9fzrljuvp0e5zg76x7fswxcxjl";
    const EVM_ADDR: &str = "0x809FF4801aA5bDb33045d1fEC810D082490D63a4";
    const IBC_DENOM: &str = "ibc/CA6FBFAF399474A06263E10D0CE5AEBBE15189D6D4B2DD9ADE61007E68EB9DB0";

    fn found(pointer: Option<&str>, pointee: Option<&str>) -> PointerRecord {
        PointerRecord {
            exists: true,
            pointer: pointer.map(String::from),
            pointee: pointee.map(String::from),
            version: Some(1),
        }
    }

    #[test]
    fn test_plan_selection() {
        assert_eq!(ResolutionPlan::for_address(EVM_ADDR), Some(ResolutionPlan::Evm));
        assert_eq!(ResolutionPlan::for_address(CW_ADDR), Some(ResolutionPlan::CosmWasm));
        assert_eq!(ResolutionPlan::for_address(IBC_DENOM), Some(ResolutionPlan::Native));
        assert_eq!(
            ResolutionPlan::for_address("0x0000000000000000000000000000000000000000"),
            Some(ResolutionPlan::NativeGas)
        );
        assert_eq!(ResolutionPlan::for_address("nonsense"), None);
    }

    #[test]
    fn test_pointer_checks_come_before_base_checks() {
        for plan in [ResolutionPlan::CosmWasm, ResolutionPlan::Evm] {
            let first_base = plan
                .candidates()
                .iter()
                .position(|c| c.direction == LookupDirection::PointerByPointee)
                .unwrap();
            assert!(plan.candidates()[first_base..]
                .iter()
                .all(|c| c.direction == LookupDirection::PointerByPointee));
        }
        assert!(ResolutionPlan::NativeGas.candidates().is_empty());
        assert_eq!(ResolutionPlan::Native.candidates().len(), 1);
    }

    #[test]
    fn test_cosmwasm_priority_order() {
        let order: Vec<_> = ResolutionPlan::CosmWasm
            .candidates()
            .iter()
            .map(|c| c.pointer_type)
            .collect();
        assert_eq!(
            order,
            vec![
                PointerType::Erc20,
                PointerType::Erc721,
                PointerType::Erc1155,
                PointerType::Erc20,
                PointerType::Erc721,
                PointerType::Erc1155,
                PointerType::Cw20,
                PointerType::Cw721,
                PointerType::Cw1155,
            ]
        );
    }

    #[test]
    fn test_native_gas_is_fixed() {
        let c = ResolutionPlan::NativeGas
            .interpret("0x0000000000000000000000000000000000000000", None)
            .unwrap();
        assert!(c.is_pointer());
        assert_eq!(c.pointer_type.as_str(), "NATIVE");
        assert_eq!(c.pointee_address(), "usei");
    }

    #[test]
    fn test_no_hit_falls_back_to_family() {
        let cw = ResolutionPlan::CosmWasm.interpret(CW_ADDR, None).unwrap();
        assert!(cw.is_base_asset());
        assert_eq!(cw.pointer_type, AssetType::Cw);

        let evm = ResolutionPlan::Evm.interpret(EVM_ADDR, None).unwrap();
        assert_eq!(evm.pointer_type, AssetType::Evm);

        let native = ResolutionPlan::Native.interpret(IBC_DENOM, None).unwrap();
        assert_eq!(native.pointer_type.as_str(), "NATIVE");
        assert_eq!(native.pointer_address(), "");
    }

    #[test]
    fn test_pointee_hit_makes_pointer() {
        let record = found(None, Some(EVM_ADDR));
        let c = ResolutionPlan::CosmWasm
            .interpret(CW_ADDR, Some((Candidate::pointee_of(PointerType::Erc20), &record)))
            .unwrap();
        assert!(c.is_pointer());
        assert_eq!(c.pointer_type.as_str(), "ERC20");
        assert_eq!(c.pointee_address(), EVM_ADDR);
        assert_eq!(c.pointer_address(), "");
    }

    #[test]
    fn test_pointer_hit_makes_base() {
        let record = found(Some(CW_ADDR), None);
        let c = ResolutionPlan::Evm
            .interpret(EVM_ADDR, Some((Candidate::pointer_of(PointerType::Erc20), &record)))
            .unwrap();
        assert!(c.is_base_asset());
        assert_eq!(c.pointer_type.as_str(), "ERC20");
        assert_eq!(c.pointer_address(), CW_ADDR);
    }

    #[test]
    fn test_native_pointee_overrides_type() {
        let record = found(None, Some(IBC_DENOM));
        let c = ResolutionPlan::Evm
            .interpret(EVM_ADDR, Some((Candidate::pointee_of(PointerType::Cw20), &record)))
            .unwrap();
        assert_eq!(c.pointer_type.as_str(), "NATIVE");
        assert_eq!(c.pointee_address(), IBC_DENOM);
    }

    #[test]
    fn test_exists_without_counterpart_is_malformed() {
        let record = found(None, None);
        let err = ResolutionPlan::CosmWasm
            .interpret(CW_ADDR, Some((Candidate::pointee_of(PointerType::Erc721), &record)))
            .unwrap_err();
        assert_eq!(err.code, crate::models::ErrorCode::AddressMalformedRemoteRecord);
    }
}
