//! ESM Status message (3GPP TS 24.301 Section 8.3.15)

use bytes::{Buf, BufMut};

use crate::codec::{check_mandatory_length, NasDecode, NasEncode, NasResult};
use crate::enums::{EsmCause, EsmMessageType};
use crate::messages::EsmMessageBody;

/// ESM Status message (both directions)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EsmStatus {
    /// ESM cause (mandatory, V)
    pub esm_cause: EsmCause,
}

impl EsmStatus {
    /// Report `esm_cause` to the peer
    pub fn new(esm_cause: EsmCause) -> Self {
        Self { esm_cause }
    }
}

impl EsmMessageBody for EsmStatus {
    const MESSAGE_TYPE: EsmMessageType = EsmMessageType::EsmStatus;
    const NAME: &'static str = "ESM Status";

    fn decode_body<B: Buf>(buf: &mut B) -> NasResult<Self> {
        check_mandatory_length(buf, 1)?;
        Ok(Self::new(EsmCause::nas_decode(buf)?))
    }

    fn encode_body<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        self.esm_cause.nas_encode(buf)
    }
}
