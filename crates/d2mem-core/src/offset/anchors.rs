use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::memory::ReadMemory;
use crate::offset::{CodeSignature, resolve_signature};

/// Signatures for the two anchor addresses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorSignatures {
    pub unit_hash_table: CodeSignature,
    pub ui_settings: CodeSignature,
}

impl Default for AnchorSignatures {
    fn default() -> Self {
        builtin_signatures()
    }
}

/// Signatures matching the supported client build
pub fn builtin_signatures() -> AnchorSignatures {
    AnchorSignatures {
        // lea rcx, [rip + UnitHashTable]; mov edx, ecx
        unit_hash_table: CodeSignature::new("48 8D ?? ?? ?? ?? ?? 8B D1", 3, 7),
        // test bpl, bpl; sete byte ptr [rip + UiSettings]
        ui_settings: CodeSignature::new("40 84 ED 0F 94 05", 6, 9),
    }
}

/// Absolute addresses resolved from code signatures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnchorAddresses {
    pub unit_hash_table: u64,
    pub ui_settings: u64,
}

/// Resolve both anchors against the target's main module.
pub fn resolve_anchors<R: ReadMemory + ?Sized>(
    reader: &R,
    signatures: &AnchorSignatures,
) -> Result<AnchorAddresses> {
    debug!("Resolving anchor addresses via signatures...");
    let unit_hash_table = resolve_signature(reader, &signatures.unit_hash_table)?;
    debug!("  UnitHashTable: 0x{:X}", unit_hash_table);
    let ui_settings = resolve_signature(reader, &signatures.ui_settings)?;
    debug!("  UiSettings: 0x{:X}", ui_settings);

    Ok(AnchorAddresses {
        unit_hash_table,
        ui_settings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::memory::MockMemoryBuilder;

    const BASE: u64 = 0x1_4000_0000;

    fn code_image(table: u64, ui: u64) -> Vec<u8> {
        let mut image = vec![0x90u8; 0x400];

        let hit = 0x100usize;
        let disp = (table as i64 - (BASE + hit as u64 + 7) as i64) as i32;
        image[hit..hit + 3].copy_from_slice(&[0x48, 0x8D, 0x0D]);
        image[hit + 3..hit + 7].copy_from_slice(&disp.to_le_bytes());
        image[hit + 7..hit + 9].copy_from_slice(&[0x8B, 0xD1]);

        let hit = 0x200usize;
        let disp = (ui as i64 - (BASE + hit as u64 + 9) as i64) as i32;
        image[hit..hit + 6].copy_from_slice(&[0x40, 0x84, 0xED, 0x0F, 0x94, 0x05]);
        image[hit + 6..hit + 10].copy_from_slice(&disp.to_le_bytes());

        image
    }

    #[test]
    fn test_resolve_anchors_with_builtin_signatures() {
        let table = BASE + 0x20_AF660;
        let ui = BASE + 0x20_BF310;
        let reader = MockMemoryBuilder::new()
            .module(BASE, &code_image(table, ui))
            .build();

        let anchors = resolve_anchors(&reader, &builtin_signatures()).unwrap();
        assert_eq!(anchors.unit_hash_table, table);
        assert_eq!(anchors.ui_settings, ui);
    }

    #[test]
    fn test_resolve_anchors_reports_missing_signature() {
        let reader = MockMemoryBuilder::new()
            .module(BASE, &[0x90u8; 0x400])
            .build();

        let err = resolve_anchors(&reader, &builtin_signatures()).unwrap_err();
        assert!(matches!(err, Error::PatternNotFound(_)));
    }

    #[test]
    fn test_default_signatures_are_builtin() {
        assert_eq!(AnchorSignatures::default(), builtin_signatures());
    }
}
