//! NAS Transport Messages (3GPP TS 24.301 Sections 8.2.12, 8.2.30, 8.2.31, 8.2.32)
//!
//! SMS travels in the plain NAS transports; LPP and location services
//! payloads use the generic variants.

use bytes::{Buf, BufMut};

use crate::codec::{check_mandatory_length, encode_optional, NasDecode, NasEncode, NasResult};
use crate::enums::EmmMessageType;
use crate::ies::{
    AdditionalInformation, GenericMessageContainer, GenericMessageContainerType,
    NasMessageContainer,
};
use crate::messages::{keep_first, next_iei, presence_mask_of, unexpected_iei, EmmMessageBody};

/// Implements a transport whose only IE is a NAS message container.
macro_rules! nas_transport {
    ($(#[$doc:meta])* $name:ident, $kind:ident, $label:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Default)]
        pub struct $name {
            /// NAS message container (mandatory, LV)
            pub nas_message_container: NasMessageContainer,
        }

        impl $name {
            /// Wrap an SMS payload
            pub fn new(nas_message_container: NasMessageContainer) -> Self {
                Self { nas_message_container }
            }
        }

        impl EmmMessageBody for $name {
            const MESSAGE_TYPE: EmmMessageType = EmmMessageType::$kind;
            const NAME: &'static str = $label;

            fn decode_body<B: Buf>(buf: &mut B) -> NasResult<Self> {
                check_mandatory_length(buf, 3)?;
                Ok(Self::new(NasMessageContainer::nas_decode(buf)?))
            }

            fn encode_body<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
                self.nas_message_container.nas_encode(buf)
            }
        }
    };
}

nas_transport!(
    /// Downlink NAS Transport message (network to UE)
    DownlinkNasTransport,
    DownlinkNasTransport,
    "Downlink NAS Transport"
);

nas_transport!(
    /// Uplink NAS Transport message (UE to network)
    UplinkNasTransport,
    UplinkNasTransport,
    "Uplink NAS Transport"
);

/// IEI values for the generic NAS transports
pub mod generic_nas_transport_iei {
    /// Additional information
    pub const ADDITIONAL_INFORMATION: u8 = 0x65;
}

/// Presence mask bits of the generic NAS transports
pub mod generic_nas_transport_presence {
    #![allow(missing_docs)]
    pub const ADDITIONAL_INFORMATION: u32 = 1 << 0;
}

/// Implements a generic transport: container type, container, then an
/// optional additional information IE.
macro_rules! generic_nas_transport {
    ($(#[$doc:meta])* $name:ident, $kind:ident, $label:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Default)]
        pub struct $name {
            /// Generic message container type (mandatory, V)
            pub generic_message_container_type: GenericMessageContainerType,
            /// Generic message container (mandatory, LV-E)
            pub generic_message_container: GenericMessageContainer,
            /// Additional information (TLV, IEI 0x65)
            pub additional_information: Option<AdditionalInformation>,
        }

        impl EmmMessageBody for $name {
            const MESSAGE_TYPE: EmmMessageType = EmmMessageType::$kind;
            const NAME: &'static str = $label;

            fn decode_body<B: Buf>(buf: &mut B) -> NasResult<Self> {
                check_mandatory_length(buf, 3)?;
                let mut msg = Self {
                    generic_message_container_type: GenericMessageContainerType::nas_decode(buf)?,
                    generic_message_container: GenericMessageContainer::nas_decode(buf)?,
                    additional_information: None,
                };

                while let Some((raw, key)) = next_iei(buf) {
                    match key {
                        generic_nas_transport_iei::ADDITIONAL_INFORMATION => {
                            keep_first(
                                &mut msg.additional_information,
                                Self::NAME,
                                raw,
                                AdditionalInformation::nas_decode(buf)?,
                            )
                        }
                        _ => return Err(unexpected_iei(Self::NAME, raw)),
                    }
                }

                Ok(msg)
            }

            fn encode_body<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
                self.generic_message_container_type.nas_encode(buf)?;
                self.generic_message_container.nas_encode(buf)?;
                encode_optional(
                    buf,
                    generic_nas_transport_iei::ADDITIONAL_INFORMATION,
                    &self.additional_information,
                )
            }

            fn presence_mask(&self) -> u32 {
                presence_mask_of(&[(
                    self.additional_information.is_some(),
                    generic_nas_transport_presence::ADDITIONAL_INFORMATION,
                )])
            }
        }
    };
}

generic_nas_transport!(
    /// Downlink Generic NAS Transport message (network to UE)
    DownlinkGenericNasTransport,
    DownlinkGenericNasTransport,
    "Downlink Generic NAS Transport"
);

generic_nas_transport!(
    /// Uplink Generic NAS Transport message (UE to network)
    UplinkGenericNasTransport,
    UplinkGenericNasTransport,
    "Uplink Generic NAS Transport"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uplink_nas_transport_sms() {
        let data = [0x04, 0x09, 0x01, 0x41, 0x00];
        let msg = UplinkNasTransport::decode_body(&mut &data[..]).unwrap();
        assert_eq!(msg.nas_message_container.0.len(), 4);

        let mut out = Vec::new();
        msg.encode_body(&mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_downlink_nas_transport_container_too_short() {
        assert!(DownlinkNasTransport::decode_body(&mut &[0x01u8, 0x09, 0x00][..]).is_err());
    }

    #[test]
    fn test_downlink_generic_nas_transport_lpp() {
        let msg = DownlinkGenericNasTransport {
            generic_message_container_type: GenericMessageContainerType(
                GenericMessageContainerType::LPP,
            ),
            generic_message_container: GenericMessageContainer::from(vec![0x92, 0x2B, 0x08]),
            additional_information: Some(AdditionalInformation::from(vec![0x01, 0x02])),
        };

        let mut out = Vec::new();
        msg.encode_body(&mut out).unwrap();
        assert_eq!(
            out,
            vec![0x01, 0x00, 0x03, 0x92, 0x2B, 0x08, 0x65, 0x02, 0x01, 0x02]
        );
        assert_eq!(msg.presence_mask(), generic_nas_transport_presence::ADDITIONAL_INFORMATION);
        assert_eq!(
            DownlinkGenericNasTransport::decode_body(&mut out.as_slice()).unwrap(),
            msg
        );
    }

    #[test]
    fn test_uplink_generic_nas_transport_rejects_unknown_iei() {
        let data = [0x02, 0x00, 0x01, 0xAA, 0x66, 0x01, 0x00];
        assert!(UplinkGenericNasTransport::decode_body(&mut &data[..]).is_err());
    }
}
