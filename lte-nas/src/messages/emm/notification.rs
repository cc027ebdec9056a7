//! CS Service Notification message (3GPP TS 24.301 Section 8.2.9)

use bytes::{Buf, BufMut};

use crate::codec::{check_mandatory_length, encode_optional, NasDecode, NasEncode, NasResult};
use crate::enums::EmmMessageType;
use crate::ies::{Cli, LcsClientIdentity, LcsIndicator, PagingIdentity, SsCode};
use crate::messages::{keep_first, next_iei, presence_mask_of, unexpected_iei, EmmMessageBody};

/// IEI values for CS Service Notification optional IEs
pub mod cs_service_notification_iei {
    /// CLI
    pub const CLI: u8 = 0x60;
    /// SS code
    pub const SS_CODE: u8 = 0x61;
    /// LCS indicator
    pub const LCS_INDICATOR: u8 = 0x62;
    /// LCS client identity
    pub const LCS_CLIENT_IDENTITY: u8 = 0x63;
}

/// Presence mask bits of [`CsServiceNotification`]
pub mod cs_service_notification_presence {
    #![allow(missing_docs)]
    pub const CLI: u32 = 1 << 0;
    pub const SS_CODE: u32 = 1 << 1;
    pub const LCS_INDICATOR: u32 = 1 << 2;
    pub const LCS_CLIENT_IDENTITY: u32 = 1 << 3;
}

/// CS Service Notification message (network to UE)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CsServiceNotification {
    /// Paging identity (mandatory, V)
    pub paging_identity: PagingIdentity,
    /// CLI (TLV, IEI 0x60)
    pub cli: Option<Cli>,
    /// SS code (TV, IEI 0x61)
    pub ss_code: Option<SsCode>,
    /// LCS indicator (TV, IEI 0x62)
    pub lcs_indicator: Option<LcsIndicator>,
    /// LCS client identity (TLV, IEI 0x63)
    pub lcs_client_identity: Option<LcsClientIdentity>,
}

impl EmmMessageBody for CsServiceNotification {
    const MESSAGE_TYPE: EmmMessageType = EmmMessageType::CsServiceNotification;
    const NAME: &'static str = "CS Service Notification";

    fn decode_body<B: Buf>(buf: &mut B) -> NasResult<Self> {
        use cs_service_notification_iei as iei;

        check_mandatory_length(buf, 1)?;
        let mut msg = Self {
            paging_identity: PagingIdentity::nas_decode(buf)?,
            ..Default::default()
        };

        while let Some((raw, key)) = next_iei(buf) {
            match key {
                iei::CLI => keep_first(&mut msg.cli, Self::NAME, raw, Cli::nas_decode(buf)?),
                iei::SS_CODE => keep_first(
                    &mut msg.ss_code,
                    Self::NAME,
                    raw,
                    SsCode::nas_decode(buf)?,
                ),
                iei::LCS_INDICATOR => keep_first(
                    &mut msg.lcs_indicator,
                    Self::NAME,
                    raw,
                    LcsIndicator::nas_decode(buf)?,
                ),
                iei::LCS_CLIENT_IDENTITY => {
                    keep_first(
                        &mut msg.lcs_client_identity,
                        Self::NAME,
                        raw,
                        LcsClientIdentity::nas_decode(buf)?,
                    )
                }
                _ => return Err(unexpected_iei(Self::NAME, raw)),
            }
        }

        Ok(msg)
    }

    fn encode_body<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        use cs_service_notification_iei as iei;

        self.paging_identity.nas_encode(buf)?;
        encode_optional(buf, iei::CLI, &self.cli)?;
        encode_optional(buf, iei::SS_CODE, &self.ss_code)?;
        encode_optional(buf, iei::LCS_INDICATOR, &self.lcs_indicator)?;
        encode_optional(buf, iei::LCS_CLIENT_IDENTITY, &self.lcs_client_identity)
    }

    fn presence_mask(&self) -> u32 {
        use cs_service_notification_presence as p;

        presence_mask_of(&[
            (self.cli.is_some(), p::CLI),
            (self.ss_code.is_some(), p::SS_CODE),
            (self.lcs_indicator.is_some(), p::LCS_INDICATOR),
            (self.lcs_client_identity.is_some(), p::LCS_CLIENT_IDENTITY),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cs_service_notification_with_cli() {
        let data = [0x01, 0x60, 0x04, 0x91, 0x21, 0x43, 0xF5, 0x62, 0x01];
        let msg = CsServiceNotification::decode_body(&mut &data[..]).unwrap();
        assert!(msg.paging_identity.tmsi);
        assert_eq!(msg.cli.as_ref().map(|c| c.0.len()), Some(4));
        assert_eq!(msg.lcs_indicator, Some(LcsIndicator(LcsIndicator::MT_LR)));
        assert!(msg.ss_code.is_none());

        let mut out = Vec::new();
        msg.encode_body(&mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_cs_service_notification_empty() {
        assert!(CsServiceNotification::decode_body(&mut &[0u8; 0][..]).is_err());
    }
}
