//! Authentication Messages (3GPP TS 24.301 Sections 8.2.5 - 8.2.8)
//!
//! - Authentication Request - network to UE
//! - Authentication Response - UE to network
//! - Authentication Reject - network to UE
//! - Authentication Failure - UE to network

use bytes::{Buf, BufMut};

use crate::codec::{
    check_mandatory_length, encode_optional, read_u8, InformationElement1, NasDecode, NasEncode,
    NasResult,
};
use crate::enums::{EmmCause, EmmMessageType};
use crate::ies::{
    AuthenticationFailureParameter, AuthenticationParameterAutn, AuthenticationParameterRand,
    AuthenticationResponseParameter, NasKeySetIdentifier,
};
use crate::messages::{keep_first, next_iei, presence_mask_of, unexpected_iei, EmmMessageBody};

// ============================================================================
// Authentication Request (3GPP TS 24.301 Section 8.2.7)
// ============================================================================

/// Authentication Request message (network to UE)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthenticationRequest {
    /// NAS key set identifier ASME (mandatory, Type 1, low nibble; high nibble spare)
    pub nas_key_set_identifier: NasKeySetIdentifier,
    /// Authentication parameter RAND (mandatory, V)
    pub rand: AuthenticationParameterRand,
    /// Authentication parameter AUTN (mandatory, LV)
    pub autn: AuthenticationParameterAutn,
}

impl AuthenticationRequest {
    /// Key set identifier, RAND and a full AUTN
    pub const MIN_LEN: usize = 1 + 16 + 1 + AuthenticationParameterAutn::LEN;
}

impl EmmMessageBody for AuthenticationRequest {
    const MESSAGE_TYPE: EmmMessageType = EmmMessageType::AuthenticationRequest;
    const NAME: &'static str = "Authentication Request";

    fn decode_body<B: Buf>(buf: &mut B) -> NasResult<Self> {
        check_mandatory_length(buf, Self::MIN_LEN)?;
        Ok(Self {
            nas_key_set_identifier: NasKeySetIdentifier::decode(read_u8(buf)? & 0x0F)?,
            rand: AuthenticationParameterRand::nas_decode(buf)?,
            autn: AuthenticationParameterAutn::nas_decode(buf)?,
        })
    }

    fn encode_body<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        buf.put_u8(self.nas_key_set_identifier.encode());
        self.rand.nas_encode(buf)?;
        self.autn.nas_encode(buf)
    }
}

// ============================================================================
// Authentication Response (3GPP TS 24.301 Section 8.2.8)
// ============================================================================

/// Authentication Response message (UE to network)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthenticationResponse {
    /// Authentication response parameter RES (mandatory, LV)
    pub authentication_response_parameter: AuthenticationResponseParameter,
}

impl EmmMessageBody for AuthenticationResponse {
    const MESSAGE_TYPE: EmmMessageType = EmmMessageType::AuthenticationResponse;
    const NAME: &'static str = "Authentication Response";

    fn decode_body<B: Buf>(buf: &mut B) -> NasResult<Self> {
        check_mandatory_length(buf, 1)?;
        Ok(Self {
            authentication_response_parameter: AuthenticationResponseParameter::nas_decode(buf)?,
        })
    }

    fn encode_body<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        self.authentication_response_parameter.nas_encode(buf)
    }
}

// ============================================================================
// Authentication Reject (3GPP TS 24.301 Section 8.2.6)
// ============================================================================

/// Authentication Reject message (network to UE)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuthenticationReject;

impl EmmMessageBody for AuthenticationReject {
    const MESSAGE_TYPE: EmmMessageType = EmmMessageType::AuthenticationReject;
    const NAME: &'static str = "Authentication Reject";

    fn decode_body<B: Buf>(_buf: &mut B) -> NasResult<Self> {
        Ok(Self)
    }

    fn encode_body<B: BufMut>(&self, _buf: &mut B) -> NasResult<()> {
        Ok(())
    }
}

// ============================================================================
// Authentication Failure (3GPP TS 24.301 Section 8.2.5)
// ============================================================================

/// IEI values for Authentication Failure optional IEs
pub mod authentication_failure_iei {
    /// Authentication failure parameter
    pub const AUTHENTICATION_FAILURE_PARAMETER: u8 = 0x30;
}

/// Presence mask bits of [`AuthenticationFailure`]
pub mod authentication_failure_presence {
    #![allow(missing_docs)]
    pub const AUTHENTICATION_FAILURE_PARAMETER: u32 = 1 << 0;
}

/// Authentication Failure message (UE to network)
///
/// A synch failure carries the AUTS in the authentication failure parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationFailure {
    /// EMM cause (mandatory, V)
    pub emm_cause: EmmCause,
    /// Authentication failure parameter (TLV, IEI 0x30)
    pub authentication_failure_parameter: Option<AuthenticationFailureParameter>,
}

impl AuthenticationFailure {
    /// Create a failure carrying only the cause
    pub fn new(emm_cause: EmmCause) -> Self {
        Self {
            emm_cause,
            authentication_failure_parameter: None,
        }
    }
}

impl EmmMessageBody for AuthenticationFailure {
    const MESSAGE_TYPE: EmmMessageType = EmmMessageType::AuthenticationFailure;
    const NAME: &'static str = "Authentication Failure";

    fn decode_body<B: Buf>(buf: &mut B) -> NasResult<Self> {
        check_mandatory_length(buf, 1)?;
        let mut msg = Self::new(EmmCause::nas_decode(buf)?);

        while let Some((raw, key)) = next_iei(buf) {
            match key {
                authentication_failure_iei::AUTHENTICATION_FAILURE_PARAMETER => {
                    keep_first(
                        &mut msg.authentication_failure_parameter,
                        Self::NAME,
                        raw,
                        AuthenticationFailureParameter::nas_decode(buf)?,
                    )
                }
                _ => return Err(unexpected_iei(Self::NAME, raw)),
            }
        }

        Ok(msg)
    }

    fn encode_body<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        self.emm_cause.nas_encode(buf)?;
        encode_optional(
            buf,
            authentication_failure_iei::AUTHENTICATION_FAILURE_PARAMETER,
            &self.authentication_failure_parameter,
        )
    }

    fn presence_mask(&self) -> u32 {
        presence_mask_of(&[(
            self.authentication_failure_parameter.is_some(),
            authentication_failure_presence::AUTHENTICATION_FAILURE_PARAMETER,
        )])
    }
}
