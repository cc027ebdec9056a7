//! EPS NAS messages
//!
//! This module contains the EMM (3GPP TS 24.301 Section 8.2) and ESM
//! (Section 8.3) message codecs and the dispatch that picks one from a PDU.
//!
//! Every message body decodes its mandatory IEs in order, then walks the
//! optional IEs until the buffer is exhausted. Optional IEs are keyed by
//! their IEI after [`normalize_iei`]; an IEI the message does not define
//! ends the decode with [`NasError::UnexpectedIei`], and a repeated IEI is
//! decoded and dropped so the first occurrence stands. Encoding writes the
//! mandatory IEs and then each present optional IE in the order of the
//! message's presence mask bits.
//!
//! ## Message Categories
//!
//! - EMM messages - [`emm`]
//! - ESM messages - [`esm`]

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::codec::{
    check_capacity, check_message_type, check_not_empty, normalize_iei, peek_u8, NasError,
    NasResult,
};
use crate::enums::{EmmMessageType, EsmMessageType, ProtocolDiscriminator, SecurityHeaderType};
use crate::header::{peek_first_octet, EmmHeader, EsmHeader, SecurityProtectedHeader};

pub mod emm;
pub mod esm;

pub use emm::*;
pub use esm::*;

/// Body of a plain EMM message, after the 2-octet header
pub trait EmmMessageBody: Sized {
    /// Message type octet
    const MESSAGE_TYPE: EmmMessageType;
    /// Human readable message name
    const NAME: &'static str;

    /// Decode the IEs following the header
    fn decode_body<B: Buf>(buf: &mut B) -> NasResult<Self>;

    /// Encode the IEs following the header
    fn encode_body<B: BufMut>(&self, buf: &mut B) -> NasResult<()>;

    /// One bit per optional IE present
    fn presence_mask(&self) -> u32 {
        0
    }
}

/// Body of a plain ESM message, after the 3-octet header
pub trait EsmMessageBody: Sized {
    /// Message type octet
    const MESSAGE_TYPE: EsmMessageType;
    /// Human readable message name
    const NAME: &'static str;

    /// Decode the IEs following the header
    fn decode_body<B: Buf>(buf: &mut B) -> NasResult<Self>;

    /// Encode the IEs following the header
    fn encode_body<B: BufMut>(&self, buf: &mut B) -> NasResult<()>;

    /// One bit per optional IE present
    fn presence_mask(&self) -> u32 {
        0
    }
}

// ============================================================================
// Optional IE walk
// ============================================================================

/// Consume the next IEI, returning it with its dispatch key.
pub(crate) fn next_iei<B: Buf>(buf: &mut B) -> Option<(u8, u8)> {
    let iei = peek_u8(buf)?;
    buf.advance(1);
    Some((iei, normalize_iei(iei)))
}

/// Error for an IEI the message does not define.
pub(crate) fn unexpected_iei(message: &'static str, iei: u8) -> NasError {
    tracing::warn!(msg = message, iei, "unexpected IEI");
    NasError::UnexpectedIei {
        expected: None,
        actual: iei,
    }
}

/// Store a decoded optional IE unless an earlier occurrence was kept.
pub(crate) fn keep_first<T>(slot: &mut Option<T>, message: &'static str, iei: u8, value: T) {
    if slot.is_some() {
        tracing::warn!(msg = message, iei, "repeated IEI ignored");
        return;
    }
    *slot = Some(value);
}

/// Fold `(present, bit)` pairs into a presence mask.
pub(crate) fn presence_mask_of(bits: &[(bool, u32)]) -> u32 {
    bits.iter()
        .filter(|(present, _)| *present)
        .fold(0, |mask, (_, bit)| mask | bit)
}

fn emit<B: BufMut>(buf: &mut B, scratch: &[u8]) -> NasResult<usize> {
    check_capacity(buf, scratch.len())?;
    buf.put_slice(scratch);
    Ok(scratch.len())
}

// ============================================================================
// EMM dispatch
// ============================================================================

macro_rules! emm_messages {
    ($($variant:ident),* $(,)?) => {
        /// Any plain EMM message
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum EmmMessage {
            $(
                #[allow(missing_docs)]
                $variant($variant),
            )*
            /// Service Request, which carries its own short header
            ServiceRequest(ServiceRequest),
        }

        impl EmmMessage {
            /// Message type octet, `None` for Service Request
            pub fn message_type(&self) -> Option<EmmMessageType> {
                match self {
                    $(EmmMessage::$variant(_) => Some(<$variant as EmmMessageBody>::MESSAGE_TYPE),)*
                    EmmMessage::ServiceRequest(_) => None,
                }
            }

            /// Message name
            pub fn name(&self) -> &'static str {
                match self {
                    $(EmmMessage::$variant(_) => <$variant as EmmMessageBody>::NAME,)*
                    EmmMessage::ServiceRequest(_) => ServiceRequest::NAME,
                }
            }

            /// Presence mask of the optional IEs
            pub fn presence_mask(&self) -> u32 {
                match self {
                    $(EmmMessage::$variant(m) => m.presence_mask(),)*
                    EmmMessage::ServiceRequest(_) => 0,
                }
            }

            fn decode_body<B: Buf>(message_type: EmmMessageType, buf: &mut B) -> NasResult<Self> {
                // The first body registered for a type wins, so the UE
                // originating Detach Request shadows the network one.
                $(
                    if message_type == <$variant as EmmMessageBody>::MESSAGE_TYPE {
                        return $variant::decode_body(buf).map(EmmMessage::$variant);
                    }
                )*
                Err(NasError::WrongMessageType(message_type.into()))
            }

            fn encode_into<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
                match self {
                    $(
                        EmmMessage::$variant(m) => {
                            EmmHeader::new(<$variant as EmmMessageBody>::MESSAGE_TYPE).encode(buf);
                            m.encode_body(buf)
                        }
                    )*
                    EmmMessage::ServiceRequest(m) => m.encode(buf),
                }
            }
        }

        $(
            impl From<$variant> for EmmMessage {
                fn from(m: $variant) -> Self {
                    EmmMessage::$variant(m)
                }
            }
        )*
    };
}

emm_messages!(
    AttachRequest,
    AttachAccept,
    AttachComplete,
    AttachReject,
    DetachRequest,
    NetworkDetachRequest,
    DetachAccept,
    TrackingAreaUpdateRequest,
    TrackingAreaUpdateAccept,
    TrackingAreaUpdateComplete,
    TrackingAreaUpdateReject,
    ExtendedServiceRequest,
    ServiceReject,
    GutiReallocationCommand,
    GutiReallocationComplete,
    AuthenticationRequest,
    AuthenticationResponse,
    AuthenticationReject,
    AuthenticationFailure,
    IdentityRequest,
    IdentityResponse,
    SecurityModeCommand,
    SecurityModeComplete,
    SecurityModeReject,
    EmmStatus,
    EmmInformation,
    DownlinkNasTransport,
    UplinkNasTransport,
    CsServiceNotification,
    DownlinkGenericNasTransport,
    UplinkGenericNasTransport,
);

impl From<ServiceRequest> for EmmMessage {
    fn from(m: ServiceRequest) -> Self {
        EmmMessage::ServiceRequest(m)
    }
}

impl EmmMessage {
    /// Encode into a new vector
    pub fn to_vec(&self) -> NasResult<Vec<u8>> {
        let mut buf = Vec::new();
        self.encode_into(&mut buf)?;
        Ok(buf)
    }
}

/// Reject a security protected header before the message type is read.
fn expect_plain_emm(first: u8) -> NasResult<()> {
    let sht = first >> 4;
    let is_emm = first & 0x0F == u8::from(ProtocolDiscriminator::EpsMobilityManagement);
    if is_emm && sht != u8::from(SecurityHeaderType::NotProtected) {
        return Err(NasError::value(format!(
            "security header type 0x{sht:X} on a plain EMM message"
        )));
    }
    Ok(())
}

/// Decode a plain EMM message, returning it with the octets consumed.
pub fn decode_emm_message(data: &[u8]) -> NasResult<(EmmMessage, usize)> {
    check_not_empty(data)?;
    let mut buf = data;
    let message = if data[0] >> 4 == u8::from(SecurityHeaderType::ServiceRequest) {
        EmmMessage::ServiceRequest(ServiceRequest::decode(&mut buf)?)
    } else {
        expect_plain_emm(data[0])?;
        let header = EmmHeader::decode(&mut buf)?;
        EmmMessage::decode_body(header.message_type, &mut buf)?
    };
    let consumed = data.len() - buf.len();
    tracing::debug!(
        msg = message.name(),
        len = consumed,
        presence = message.presence_mask(),
        "decoded EMM message"
    );
    Ok((message, consumed))
}

/// Decode a plain EMM PDU as the message `T`.
///
/// The dispatch in [`decode_emm_message`] picks one body per message type;
/// this entry point is how a caller reads the other one, such as
/// [`NetworkDetachRequest`].
pub fn decode_emm<T: EmmMessageBody>(data: &[u8]) -> NasResult<(T, usize)> {
    check_not_empty(data)?;
    expect_plain_emm(data[0])?;
    let mut buf = data;
    let header = EmmHeader::decode(&mut buf)?;
    check_message_type(T::MESSAGE_TYPE.into(), header.message_type.into())?;
    let body = T::decode_body(&mut buf)?;
    let consumed = data.len() - buf.len();
    tracing::debug!(
        msg = T::NAME,
        len = consumed,
        presence = body.presence_mask(),
        "decoded EMM message"
    );
    Ok((body, consumed))
}

/// Encode a plain EMM message, returning the octets written.
pub fn encode_emm_message<B: BufMut>(message: &EmmMessage, buf: &mut B) -> NasResult<usize> {
    let mut scratch = BytesMut::new();
    message.encode_into(&mut scratch)?;
    tracing::debug!(
        msg = message.name(),
        len = scratch.len(),
        presence = message.presence_mask(),
        "encoded EMM message"
    );
    emit(buf, &scratch)
}

// ============================================================================
// ESM dispatch
// ============================================================================

macro_rules! esm_messages {
    ($($variant:ident),* $(,)?) => {
        /// Body of any plain ESM message
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum EsmBody {
            $(
                #[allow(missing_docs)]
                $variant($variant),
            )*
        }

        impl EsmBody {
            /// Message type octet
            pub fn message_type(&self) -> EsmMessageType {
                match self {
                    $(EsmBody::$variant(_) => <$variant as EsmMessageBody>::MESSAGE_TYPE,)*
                }
            }

            /// Message name
            pub fn name(&self) -> &'static str {
                match self {
                    $(EsmBody::$variant(_) => <$variant as EsmMessageBody>::NAME,)*
                }
            }

            /// Presence mask of the optional IEs
            pub fn presence_mask(&self) -> u32 {
                match self {
                    $(EsmBody::$variant(m) => m.presence_mask(),)*
                }
            }

            fn decode_body<B: Buf>(message_type: EsmMessageType, buf: &mut B) -> NasResult<Self> {
                $(
                    if message_type == <$variant as EsmMessageBody>::MESSAGE_TYPE {
                        return $variant::decode_body(buf).map(EsmBody::$variant);
                    }
                )*
                Err(NasError::WrongMessageType(message_type.into()))
            }

            fn encode_body<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
                match self {
                    $(EsmBody::$variant(m) => m.encode_body(buf),)*
                }
            }
        }

        $(
            impl From<$variant> for EsmBody {
                fn from(m: $variant) -> Self {
                    EsmBody::$variant(m)
                }
            }
        )*
    };
}

esm_messages!(
    ActivateDefaultEpsBearerContextRequest,
    ActivateDefaultEpsBearerContextAccept,
    ActivateDefaultEpsBearerContextReject,
    ActivateDedicatedEpsBearerContextRequest,
    ActivateDedicatedEpsBearerContextAccept,
    ActivateDedicatedEpsBearerContextReject,
    ModifyEpsBearerContextRequest,
    ModifyEpsBearerContextAccept,
    ModifyEpsBearerContextReject,
    DeactivateEpsBearerContextRequest,
    DeactivateEpsBearerContextAccept,
    PdnConnectivityRequest,
    PdnConnectivityReject,
    PdnDisconnectRequest,
    PdnDisconnectReject,
    BearerResourceAllocationRequest,
    BearerResourceAllocationReject,
    BearerResourceModificationRequest,
    BearerResourceModificationReject,
    EsmInformationRequest,
    EsmInformationResponse,
    EsmStatus,
);

/// Plain ESM message: header fields plus body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EsmMessage {
    /// EPS bearer identity (0 when no bearer is assigned)
    pub eps_bearer_identity: u8,
    /// Procedure transaction identity
    pub pti: u8,
    /// Message body
    pub body: EsmBody,
}

impl EsmMessage {
    /// Create a message
    pub fn new(eps_bearer_identity: u8, pti: u8, body: impl Into<EsmBody>) -> Self {
        Self {
            eps_bearer_identity,
            pti,
            body: body.into(),
        }
    }

    /// Message name
    pub fn name(&self) -> &'static str {
        self.body.name()
    }

    /// Header of the message
    pub fn header(&self) -> EsmHeader {
        EsmHeader::new(self.eps_bearer_identity, self.pti, self.body.message_type())
    }

    fn encode_into<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        self.header().encode(buf);
        self.body.encode_body(buf)
    }

    /// Encode into a new vector
    pub fn to_vec(&self) -> NasResult<Vec<u8>> {
        let mut buf = Vec::new();
        self.encode_into(&mut buf)?;
        Ok(buf)
    }
}

/// Decode a plain ESM message, returning it with the octets consumed.
pub fn decode_esm_message(data: &[u8]) -> NasResult<(EsmMessage, usize)> {
    check_not_empty(data)?;
    let mut buf = data;
    let header = EsmHeader::decode(&mut buf)?;
    let body = EsmBody::decode_body(header.message_type, &mut buf)?;
    let consumed = data.len() - buf.len();
    tracing::debug!(
        msg = body.name(),
        ebi = header.eps_bearer_identity,
        pti = header.pti,
        len = consumed,
        presence = body.presence_mask(),
        "decoded ESM message"
    );
    Ok((
        EsmMessage {
            eps_bearer_identity: header.eps_bearer_identity,
            pti: header.pti,
            body,
        },
        consumed,
    ))
}

/// Decode a plain ESM PDU as the message `T`, returning its header too.
pub fn decode_esm<T: EsmMessageBody>(data: &[u8]) -> NasResult<(EsmHeader, T, usize)> {
    check_not_empty(data)?;
    let mut buf = data;
    let header = EsmHeader::decode(&mut buf)?;
    check_message_type(T::MESSAGE_TYPE.into(), header.message_type.into())?;
    let body = T::decode_body(&mut buf)?;
    Ok((header, body, data.len() - buf.len()))
}

/// Encode a plain ESM message, returning the octets written.
pub fn encode_esm_message<B: BufMut>(message: &EsmMessage, buf: &mut B) -> NasResult<usize> {
    let mut scratch = BytesMut::new();
    message.encode_into(&mut scratch)?;
    tracing::debug!(
        msg = message.name(),
        len = scratch.len(),
        presence = message.body.presence_mask(),
        "encoded ESM message"
    );
    emit(buf, &scratch)
}

// ============================================================================
// NAS dispatch
// ============================================================================

/// Security protected EMM PDU
///
/// `payload` is the octet string after the sequence number and is what gets
/// re-encoded. `inner` holds the decoded plain message when the payload is
/// not ciphered and unwrapping was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedNasMessage {
    /// Security protected header
    pub header: SecurityProtectedHeader,
    /// Protected (possibly ciphered) plain NAS message
    pub payload: Bytes,
    /// Decoded plain message
    pub inner: Option<Box<NasMessage>>,
}

/// Any NAS PDU handled by the codec
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NasMessage {
    /// Plain EMM message
    Emm(EmmMessage),
    /// Plain ESM message
    Esm(EsmMessage),
    /// Security protected EMM PDU
    Protected(ProtectedNasMessage),
}

impl NasMessage {
    /// Message name
    pub fn name(&self) -> &'static str {
        match self {
            NasMessage::Emm(m) => m.name(),
            NasMessage::Esm(m) => m.name(),
            NasMessage::Protected(_) => "Security protected NAS message",
        }
    }

    /// Encode into a new vector
    pub fn to_vec(&self) -> NasResult<Vec<u8>> {
        let mut buf = Vec::new();
        encode_nas_message(self, &mut buf)?;
        Ok(buf)
    }
}

/// Decode any NAS PDU, unwrapping integrity protected plain messages.
pub fn decode_nas_message(data: &[u8]) -> NasResult<(NasMessage, usize)> {
    decode_nas(data, true)
}

pub(crate) fn decode_nas(data: &[u8], unwrap_protected: bool) -> NasResult<(NasMessage, usize)> {
    let (pd, high_nibble) = peek_first_octet(data)?;
    match pd {
        ProtocolDiscriminator::EpsSessionManagement => {
            decode_esm_message(data).map(|(m, n)| (NasMessage::Esm(m), n))
        }
        ProtocolDiscriminator::EpsMobilityManagement => {
            let plain = high_nibble == u8::from(SecurityHeaderType::NotProtected)
                || high_nibble == u8::from(SecurityHeaderType::ServiceRequest);
            if plain {
                return decode_emm_message(data).map(|(m, n)| (NasMessage::Emm(m), n));
            }

            let mut buf = data;
            let header = SecurityProtectedHeader::decode(&mut buf)?;
            let payload = Bytes::copy_from_slice(buf);
            let inner = if unwrap_protected && !header.security_header_type.is_ciphered() {
                let (inner, _) = decode_nas(&payload, false)?;
                if matches!(inner, NasMessage::Protected(_)) {
                    return Err(NasError::value("nested security protected header"));
                }
                Some(Box::new(inner))
            } else {
                None
            };
            tracing::debug!(
                header = ?header.security_header_type,
                len = data.len(),
                unwrapped = inner.is_some(),
                "decoded security protected message"
            );
            Ok((
                NasMessage::Protected(ProtectedNasMessage {
                    header,
                    payload,
                    inner,
                }),
                data.len(),
            ))
        }
    }
}

/// Encode any NAS PDU, returning the octets written.
pub fn encode_nas_message<B: BufMut>(message: &NasMessage, buf: &mut B) -> NasResult<usize> {
    match message {
        NasMessage::Emm(m) => encode_emm_message(m, buf),
        NasMessage::Esm(m) => encode_esm_message(m, buf),
        NasMessage::Protected(p) => {
            let mut scratch = BytesMut::with_capacity(SecurityProtectedHeader::SIZE + p.payload.len());
            p.header.encode(&mut scratch);
            scratch.put_slice(&p.payload);
            emit(buf, &scratch)
        }
    }
}
