//! PDN Connectivity messages (3GPP TS 24.301 Sections 8.3.19, 8.3.20)
//!
//! A PDN Connectivity Request travels inside the ESM message container of
//! an Attach Request for the initial default bearer.

use bytes::{Buf, BufMut};

use crate::codec::{
    check_mandatory_length, encode_optional, encode_optional_ie1, read_u8, InformationElement1,
    NasDecode, NasResult,
};
use crate::enums::EsmMessageType;
use crate::ies::{
    AccessPointName, DeviceProperties, EsmInformationTransferFlag,
    ExtendedProtocolConfigurationOptions, PdnType, ProtocolConfigurationOptions, RequestType,
};
use crate::messages::{keep_first, next_iei, presence_mask_of, unexpected_iei, EsmMessageBody};

/// IEI values for PDN Connectivity Request optional IEs
pub mod pdn_connectivity_request_iei {
    /// ESM information transfer flag (half-octet)
    pub const ESM_INFORMATION_TRANSFER_FLAG: u8 = 0xD0;
    /// Access point name
    pub const ACCESS_POINT_NAME: u8 = 0x28;
    /// Protocol configuration options
    pub const PROTOCOL_CONFIGURATION_OPTIONS: u8 = 0x27;
    /// Device properties (half-octet)
    pub const DEVICE_PROPERTIES: u8 = 0xC0;
    /// Extended protocol configuration options
    pub const EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS: u8 = 0x7B;
}

/// Presence mask bits of [`PdnConnectivityRequest`]
pub mod pdn_connectivity_request_presence {
    #![allow(missing_docs)]
    pub const ESM_INFORMATION_TRANSFER_FLAG: u32 = 1 << 0;
    pub const ACCESS_POINT_NAME: u32 = 1 << 1;
    pub const PROTOCOL_CONFIGURATION_OPTIONS: u32 = 1 << 2;
    pub const DEVICE_PROPERTIES: u32 = 1 << 3;
    pub const EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS: u32 = 1 << 4;
}

/// PDN Connectivity Request message (UE to network)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdnConnectivityRequest {
    /// Request type (mandatory, Type 1, low nibble)
    pub request_type: RequestType,
    /// PDN type (mandatory, Type 1, high nibble)
    pub pdn_type: PdnType,
    /// ESM information transfer flag (TV, IEI 0xD-)
    pub esm_information_transfer_flag: Option<EsmInformationTransferFlag>,
    /// Access point name (TLV, IEI 0x28)
    pub access_point_name: Option<AccessPointName>,
    /// Protocol configuration options (TLV, IEI 0x27)
    pub protocol_configuration_options: Option<ProtocolConfigurationOptions>,
    /// Device properties (TV, IEI 0xC-)
    pub device_properties: Option<DeviceProperties>,
    /// Extended protocol configuration options (TLV-E, IEI 0x7B)
    pub extended_protocol_configuration_options: Option<ExtendedProtocolConfigurationOptions>,
}

impl Default for PdnConnectivityRequest {
    fn default() -> Self {
        Self::new(RequestType(RequestType::INITIAL_REQUEST), PdnType::Ipv4)
    }
}

impl PdnConnectivityRequest {
    /// Create a request without optional IEs
    pub fn new(request_type: RequestType, pdn_type: PdnType) -> Self {
        Self {
            request_type,
            pdn_type,
            esm_information_transfer_flag: None,
            access_point_name: None,
            protocol_configuration_options: None,
            device_properties: None,
            extended_protocol_configuration_options: None,
        }
    }
}

impl EsmMessageBody for PdnConnectivityRequest {
    const MESSAGE_TYPE: EsmMessageType = EsmMessageType::PdnConnectivityRequest;
    const NAME: &'static str = "PDN Connectivity Request";

    fn decode_body<B: Buf>(buf: &mut B) -> NasResult<Self> {
        use pdn_connectivity_request_iei as iei;

        check_mandatory_length(buf, 1)?;
        let octet = read_u8(buf)?;
        let mut msg = Self::new(
            RequestType::decode(octet & 0x0F)?,
            PdnType::decode(octet >> 4)?,
        );

        while let Some((raw, key)) = next_iei(buf) {
            match key {
                iei::ESM_INFORMATION_TRANSFER_FLAG => {
                    keep_first(
                        &mut msg.esm_information_transfer_flag,
                        Self::NAME,
                        raw,
                        EsmInformationTransferFlag::decode(raw & 0x0F)?,
                    )
                }
                iei::ACCESS_POINT_NAME => {
                    keep_first(
                        &mut msg.access_point_name,
                        Self::NAME,
                        raw,
                        AccessPointName::nas_decode(buf)?,
                    )
                }
                iei::PROTOCOL_CONFIGURATION_OPTIONS => {
                    keep_first(
                        &mut msg.protocol_configuration_options,
                        Self::NAME,
                        raw,
                        ProtocolConfigurationOptions::nas_decode(buf)?,
                    )
                }
                iei::DEVICE_PROPERTIES => {
                    keep_first(
                        &mut msg.device_properties,
                        Self::NAME,
                        raw,
                        DeviceProperties::decode(raw & 0x0F)?,
                    )
                }
                iei::EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS => {
                    keep_first(
                        &mut msg.extended_protocol_configuration_options,
                        Self::NAME,
                        raw,
                        ExtendedProtocolConfigurationOptions::nas_decode(buf)?,
                    )
                }
                _ => return Err(unexpected_iei(Self::NAME, raw)),
            }
        }

        Ok(msg)
    }

    fn encode_body<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        use pdn_connectivity_request_iei as iei;

        buf.put_u8((self.pdn_type.encode() << 4) | self.request_type.encode());
        encode_optional_ie1(
            buf,
            iei::ESM_INFORMATION_TRANSFER_FLAG,
            &self.esm_information_transfer_flag,
        )?;
        encode_optional(buf, iei::ACCESS_POINT_NAME, &self.access_point_name)?;
        encode_optional(
            buf,
            iei::PROTOCOL_CONFIGURATION_OPTIONS,
            &self.protocol_configuration_options,
        )?;
        encode_optional_ie1(buf, iei::DEVICE_PROPERTIES, &self.device_properties)?;
        encode_optional(
            buf,
            iei::EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS,
            &self.extended_protocol_configuration_options,
        )
    }

    fn presence_mask(&self) -> u32 {
        use pdn_connectivity_request_presence as p;

        presence_mask_of(&[
            (
                self.esm_information_transfer_flag.is_some(),
                p::ESM_INFORMATION_TRANSFER_FLAG,
            ),
            (self.access_point_name.is_some(), p::ACCESS_POINT_NAME),
            (
                self.protocol_configuration_options.is_some(),
                p::PROTOCOL_CONFIGURATION_OPTIONS,
            ),
            (self.device_properties.is_some(), p::DEVICE_PROPERTIES),
            (
                self.extended_protocol_configuration_options.is_some(),
                p::EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS,
            ),
        ])
    }
}

back_off_reject!(
    /// PDN Connectivity Reject message (network to UE)
    PdnConnectivityReject,
    PdnConnectivityReject,
    "PDN Connectivity Reject"
);
