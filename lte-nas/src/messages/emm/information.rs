//! EMM Information message (3GPP TS 24.301 Section 8.2.13)

use bytes::{Buf, BufMut};

use crate::codec::{encode_optional, NasDecode, NasResult};
use crate::enums::EmmMessageType;
use crate::ies::{DaylightSavingTime, NetworkName, TimeZone, TimeZoneAndTime};
use crate::messages::{keep_first, next_iei, presence_mask_of, unexpected_iei, EmmMessageBody};

/// IEI values for EMM Information optional IEs
pub mod emm_information_iei {
    /// Full name for network
    pub const FULL_NAME_FOR_NETWORK: u8 = 0x43;
    /// Short name for network
    pub const SHORT_NAME_FOR_NETWORK: u8 = 0x45;
    /// Local time zone
    pub const LOCAL_TIME_ZONE: u8 = 0x46;
    /// Universal time and local time zone
    pub const UNIVERSAL_TIME_AND_LOCAL_TIME_ZONE: u8 = 0x47;
    /// Network daylight saving time
    pub const NETWORK_DAYLIGHT_SAVING_TIME: u8 = 0x49;
}

/// Presence mask bits of [`EmmInformation`]
pub mod emm_information_presence {
    #![allow(missing_docs)]
    pub const FULL_NAME_FOR_NETWORK: u32 = 1 << 0;
    pub const SHORT_NAME_FOR_NETWORK: u32 = 1 << 1;
    pub const LOCAL_TIME_ZONE: u32 = 1 << 2;
    pub const UNIVERSAL_TIME_AND_LOCAL_TIME_ZONE: u32 = 1 << 3;
    pub const NETWORK_DAYLIGHT_SAVING_TIME: u32 = 1 << 4;
}

/// EMM Information message (network to UE)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EmmInformation {
    /// Full name for network (TLV, IEI 0x43)
    pub full_name_for_network: Option<NetworkName>,
    /// Short name for network (TLV, IEI 0x45)
    pub short_name_for_network: Option<NetworkName>,
    /// Local time zone (TV, IEI 0x46)
    pub local_time_zone: Option<TimeZone>,
    /// Universal time and local time zone (TV, IEI 0x47)
    pub universal_time_and_local_time_zone: Option<TimeZoneAndTime>,
    /// Network daylight saving time (TLV, IEI 0x49)
    pub network_daylight_saving_time: Option<DaylightSavingTime>,
}

impl EmmMessageBody for EmmInformation {
    const MESSAGE_TYPE: EmmMessageType = EmmMessageType::EmmInformation;
    const NAME: &'static str = "EMM Information";

    fn decode_body<B: Buf>(buf: &mut B) -> NasResult<Self> {
        use emm_information_iei as iei;

        let mut msg = Self::default();
        while let Some((raw, key)) = next_iei(buf) {
            match key {
                iei::FULL_NAME_FOR_NETWORK => {
                    keep_first(
                        &mut msg.full_name_for_network,
                        Self::NAME,
                        raw,
                        NetworkName::nas_decode(buf)?,
                    )
                }
                iei::SHORT_NAME_FOR_NETWORK => {
                    keep_first(
                        &mut msg.short_name_for_network,
                        Self::NAME,
                        raw,
                        NetworkName::nas_decode(buf)?,
                    )
                }
                iei::LOCAL_TIME_ZONE => keep_first(
                    &mut msg.local_time_zone,
                    Self::NAME,
                    raw,
                    TimeZone::nas_decode(buf)?,
                ),
                iei::UNIVERSAL_TIME_AND_LOCAL_TIME_ZONE => {
                    keep_first(
                        &mut msg.universal_time_and_local_time_zone,
                        Self::NAME,
                        raw,
                        TimeZoneAndTime::nas_decode(buf)?,
                    )
                }
                iei::NETWORK_DAYLIGHT_SAVING_TIME => {
                    keep_first(
                        &mut msg.network_daylight_saving_time,
                        Self::NAME,
                        raw,
                        DaylightSavingTime::nas_decode(buf)?,
                    )
                }
                _ => return Err(unexpected_iei(Self::NAME, raw)),
            }
        }
        Ok(msg)
    }

    fn encode_body<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        use emm_information_iei as iei;

        encode_optional(buf, iei::FULL_NAME_FOR_NETWORK, &self.full_name_for_network)?;
        encode_optional(buf, iei::SHORT_NAME_FOR_NETWORK, &self.short_name_for_network)?;
        encode_optional(buf, iei::LOCAL_TIME_ZONE, &self.local_time_zone)?;
        encode_optional(
            buf,
            iei::UNIVERSAL_TIME_AND_LOCAL_TIME_ZONE,
            &self.universal_time_and_local_time_zone,
        )?;
        encode_optional(
            buf,
            iei::NETWORK_DAYLIGHT_SAVING_TIME,
            &self.network_daylight_saving_time,
        )
    }

    fn presence_mask(&self) -> u32 {
        use emm_information_presence as p;

        presence_mask_of(&[
            (self.full_name_for_network.is_some(), p::FULL_NAME_FOR_NETWORK),
            (self.short_name_for_network.is_some(), p::SHORT_NAME_FOR_NETWORK),
            (self.local_time_zone.is_some(), p::LOCAL_TIME_ZONE),
            (
                self.universal_time_and_local_time_zone.is_some(),
                p::UNIVERSAL_TIME_AND_LOCAL_TIME_ZONE,
            ),
            (self.network_daylight_saving_time.is_some(), p::NETWORK_DAYLIGHT_SAVING_TIME),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lte_common::OctetString;

    #[test]
    fn test_emm_information_names_and_time() {
        let msg = EmmInformation {
            full_name_for_network: Some(NetworkName {
                coding_scheme: 0,
                add_ci: false,
                spare_bits_in_last_octet: 1,
                text: OctetString::from_slice(&[0xD4, 0x32, 0x9B, 0x5D, 0x06]),
            }),
            local_time_zone: Some(TimeZone(0x40)),
            universal_time_and_local_time_zone: Some(TimeZoneAndTime {
                year: 26,
                month: 10,
                day: 14,
                hour: 9,
                minute: 30,
                second: 5,
                time_zone: TimeZone(0x40),
            }),
            network_daylight_saving_time: Some(DaylightSavingTime { value: 1 }),
            ..Default::default()
        };

        let mut out = Vec::new();
        msg.encode_body(&mut out).unwrap();
        assert_eq!(&out[..3], &[0x43, 0x06, 0x81]);
        assert_eq!(&out[8..10], &[0x46, 0x40]);
        assert_eq!(&out[10..], &[0x47, 0x62, 0x01, 0x41, 0x90, 0x03, 0x50, 0x40, 0x49, 0x01, 0x01]);

        let decoded = EmmInformation::decode_body(&mut out.as_slice()).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_emm_information_unknown_iei() {
        assert!(EmmInformation::decode_body(&mut &[0x44u8, 0x00][..]).is_err());
    }
}
