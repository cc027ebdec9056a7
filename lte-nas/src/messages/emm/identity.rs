//! Identity Messages (3GPP TS 24.301 Sections 8.2.18, 8.2.19)

use bytes::{Buf, BufMut};

use crate::codec::{
    check_mandatory_length, read_u8, InformationElement1, NasDecode, NasEncode, NasResult,
};
use crate::enums::EmmMessageType;
use crate::ies::{IdentityType2, MobileIdentity};
use crate::messages::EmmMessageBody;

/// Identity Request message (network to UE)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IdentityRequest {
    /// Identity type (mandatory, Type 1, low nibble; high nibble spare)
    pub identity_type: IdentityType2,
}

impl IdentityRequest {
    /// Request the given identity
    pub fn new(identity_type: IdentityType2) -> Self {
        Self { identity_type }
    }
}

impl EmmMessageBody for IdentityRequest {
    const MESSAGE_TYPE: EmmMessageType = EmmMessageType::IdentityRequest;
    const NAME: &'static str = "Identity Request";

    fn decode_body<B: Buf>(buf: &mut B) -> NasResult<Self> {
        check_mandatory_length(buf, 1)?;
        Ok(Self::new(IdentityType2::decode(read_u8(buf)? & 0x0F)?))
    }

    fn encode_body<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        buf.put_u8(self.identity_type.encode());
        Ok(())
    }
}

/// Identity Response message (UE to network)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IdentityResponse {
    /// Mobile identity (mandatory, LV)
    pub mobile_identity: MobileIdentity,
}

impl EmmMessageBody for IdentityResponse {
    const MESSAGE_TYPE: EmmMessageType = EmmMessageType::IdentityResponse;
    const NAME: &'static str = "Identity Response";

    fn decode_body<B: Buf>(buf: &mut B) -> NasResult<Self> {
        check_mandatory_length(buf, 2)?;
        Ok(Self {
            mobile_identity: MobileIdentity::nas_decode(buf)?,
        })
    }

    fn encode_body<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        self.mobile_identity.nas_encode(buf)
    }
}
