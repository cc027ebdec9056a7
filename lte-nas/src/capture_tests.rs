//! NAS Message Capture Tests
//!
//! PDUs taken from S1AP traces of commercial handsets attaching to a test
//! network (PLMN 001/01), checked field by field and re-encoded byte-exact.

#[cfg(test)]
mod tests {
    use crate::enums::SecurityHeaderType;
    use crate::ies::pco::pco_id;
    use crate::ies::{EpsAttachType, EpsMobileIdentity, EpsQualityOfService, PdnType};
    use crate::messages::attach_request_presence as p;
    use crate::messages::{
        decode_esm_message, decode_nas_message, EmmMessage, EmmMessageBody, EsmBody, NasMessage,
    };
    use crate::NasDecode;
    use lte_common::Plmn;

    fn capture(s: &str) -> Vec<u8> {
        hex::decode(s.split_whitespace().collect::<String>()).unwrap()
    }

    // ========================================================================
    // Attach Request (3GPP TS 24.301 Section 8.2.4)
    // ========================================================================

    /// Combined attach with IMSI and no optional IEs
    const ATTACH_REQUEST_IMSI: &str = "07 41 72 08 09 10 10 00 00 00 00 10 02 e0 e0 00 04 02 01 d0 11";

    /// Attach with old GUTI, full PDN connectivity PCO and the usual set of
    /// 2G/3G capability IEs a multi-RAT handset sends
    const ATTACH_REQUEST_GUTI: &str = "
        07 41 71
        0b f6 00 f1 10 80 01 02 c0 00 0a 5e
        05 f0 f0 c0 c0 19
        00 20 02 01 d0 11 27 1a 80
              80 21 10 01 00 00 10 81 06 00 00 00 00 83 06 00 00 00 00
              00 0d 00
              00 0a 00
        52 00 f1 10 00 01
        5c 0a 00
        31 03 e5 e0 3e
        13 00 f1 10 00 01
        11 03 57 58 a6
        20 04 60 14 04 ef
        40 08 04 02 60 04 00 02 1f 02
        5d 01 03
        e0";

    #[test]
    fn test_attach_request_imsi_capture() {
        let data = capture(ATTACH_REQUEST_IMSI);
        let (msg, consumed) = decode_nas_message(&data).unwrap();
        assert_eq!(consumed, data.len());

        let NasMessage::Emm(EmmMessage::AttachRequest(req)) = &msg else {
            panic!("expected Attach Request, got {msg:?}");
        };
        assert_eq!(req.eps_attach_type, EpsAttachType::CombinedEpsImsiAttach);
        assert!(req.nas_key_set_identifier.is_no_key());
        assert_eq!(
            req.eps_mobile_identity,
            EpsMobileIdentity::Imsi("001010000000001".into())
        );
        assert_eq!(req.ue_network_capability.eea, 0xE0);
        assert_eq!(req.ue_network_capability.eia, 0xE0);
        assert!(req.ue_network_capability.umts.is_none());

        let (esm, _) = decode_esm_message(req.esm_message_container.0.data()).unwrap();
        let EsmBody::PdnConnectivityRequest(pdn) = &esm.body else {
            panic!("expected PDN Connectivity Request, got {esm:?}");
        };
        assert_eq!(esm.pti, 1);
        assert_eq!(pdn.pdn_type, PdnType::Ipv4);
        assert!(pdn.protocol_configuration_options.is_none());

        assert_eq!(msg.to_vec().unwrap(), data);
    }

    #[test]
    fn test_attach_request_guti_capture() {
        let data = capture(ATTACH_REQUEST_GUTI);
        let (msg, consumed) = decode_nas_message(&data).unwrap();
        assert_eq!(consumed, data.len());

        let NasMessage::Emm(EmmMessage::AttachRequest(req)) = &msg else {
            panic!("expected Attach Request, got {msg:?}");
        };
        assert_eq!(req.eps_attach_type, EpsAttachType::EpsAttach);
        let EpsMobileIdentity::Guti(guti) = &req.eps_mobile_identity else {
            panic!("expected GUTI");
        };
        assert_eq!(guti.plmn, Plmn::new(1, 1, false));
        assert_eq!(guti.mme_group_id, 0x8001);
        assert_eq!(guti.mme_code, 0x02);
        assert_eq!(guti.m_tmsi, 0xC000_0A5E);

        let umts = req.ue_network_capability.umts.unwrap();
        assert_eq!(umts.uea, 0xC0);
        assert!(umts.ucs2);
        assert_eq!(req.ue_network_capability.features.data(), &[0x19]);

        assert_eq!(
            req.presence_mask(),
            p::LAST_VISITED_REGISTERED_TAI
                | p::DRX_PARAMETER
                | p::MS_NETWORK_CAPABILITY
                | p::OLD_LOCATION_AREA_IDENTIFICATION
                | p::MS_CLASSMARK_2
                | p::MS_CLASSMARK_3
                | p::SUPPORTED_CODECS
                | p::VOICE_DOMAIN_PREFERENCE
                | p::OLD_GUTI_TYPE
        );
        assert_eq!(req.last_visited_registered_tai.unwrap().tac, 1);
        assert_eq!(req.drx_parameter.unwrap().split_pg_cycle_code, 0x0A);
        let msnc = req.ms_network_capability.as_ref().unwrap();
        assert!(msnc.gea1);
        assert!(!msnc.short);
        assert_eq!(msnc.extended_gea, 0x30);
        assert_eq!(msnc.extension.data(), &[0x3E]);
        assert!(req.ms_classmark_2.unwrap().cm3);
        assert_eq!(req.supported_codecs.as_ref().unwrap().codecs.len(), 2);
        assert_eq!(req.voice_domain_preference.unwrap().voice_domain_preference, 3);
        assert!(!req.old_guti_type.unwrap().mapped);

        let (esm, used) = decode_esm_message(req.esm_message_container.0.data()).unwrap();
        assert_eq!(used, 0x20);
        let EsmBody::PdnConnectivityRequest(pdn) = &esm.body else {
            panic!("expected PDN Connectivity Request, got {esm:?}");
        };
        let pco = pdn.protocol_configuration_options.as_ref().unwrap();
        assert_eq!(pco.options.len(), 3);
        assert_eq!(pco.find(pco_id::IPCP).unwrap().contents.len(), 16);
        assert!(pco.find(pco_id::DNS_SERVER_IPV4).unwrap().contents.is_empty());
        assert!(pco.find(pco_id::IP_ADDRESS_ALLOCATION_VIA_NAS).is_some());

        assert_eq!(msg.to_vec().unwrap(), data);
    }

    #[test]
    fn test_attach_request_capture_truncation() {
        let data = capture(ATTACH_REQUEST_GUTI);
        // Cutting inside any IE fails; cutting between optional IEs leaves a
        // shorter but valid message.
        let boundaries = [55, 61, 64, 69, 75, 80, 86, 96, 99, data.len()];
        for cut in 2..data.len() {
            let result = decode_nas_message(&data[..cut]);
            if boundaries.contains(&cut) {
                let (_, consumed) = result.unwrap();
                assert_eq!(consumed, cut);
            } else {
                assert!(result.is_err(), "decoded with {cut} octets");
            }
        }
    }

    // ========================================================================
    // Authentication and security mode
    // ========================================================================

    #[test]
    fn test_authentication_request_capture() {
        let data = capture(
            "07 52 00
             d0 a1 c5 21 9b 4f 84 1e 3e 5c 30 42 aa 19 70 2b
             10 a8 e6 4a 36 2c 15 80 00 43 9d 3b 9c 49 6f 3a 7c",
        );
        let (msg, _) = decode_nas_message(&data).unwrap();
        let NasMessage::Emm(EmmMessage::AuthenticationRequest(req)) = &msg else {
            panic!("expected Authentication Request, got {msg:?}");
        };
        assert_eq!(req.nas_key_set_identifier.ksi, 0);
        assert_eq!(req.rand.0[0], 0xD0);
        assert_eq!(req.autn.value.len(), 16);
        // AMF with the separation bit set
        assert_eq!(&req.autn.value.data()[6..8], &[0x80, 0x00]);
        assert_eq!(msg.to_vec().unwrap(), data);
    }

    #[test]
    fn test_security_mode_complete_protected_capture() {
        let data = capture("47 6a 1b 3c 9d 00 07 5e");
        let (msg, consumed) = decode_nas_message(&data).unwrap();
        assert_eq!(consumed, data.len());

        let NasMessage::Protected(protected) = &msg else {
            panic!("expected protected message, got {msg:?}");
        };
        assert_eq!(
            protected.header.security_header_type,
            SecurityHeaderType::IntegrityProtectedAndCipheredWithNewSecurityContext
        );
        assert_eq!(protected.header.mac, 0x6A1B_3C9D);
        assert_eq!(protected.header.sequence_number, 0);
        // Ciphered payloads stay opaque
        assert!(protected.inner.is_none());
        assert_eq!(&protected.payload[..], &[0x07, 0x5E]);
        assert_eq!(msg.to_vec().unwrap(), data);

        let integrity_only = capture("37 6a 1b 3c 9d 00 07 5e");
        let (msg, _) = decode_nas_message(&integrity_only).unwrap();
        let NasMessage::Protected(protected) = &msg else {
            panic!("expected protected message, got {msg:?}");
        };
        assert!(matches!(
            protected.inner.as_deref(),
            Some(NasMessage::Emm(EmmMessage::SecurityModeComplete(_)))
        ));
        assert_eq!(msg.to_vec().unwrap(), integrity_only);
    }

    // ========================================================================
    // EPS quality of service (3GPP TS 24.301 Section 9.9.4.3)
    // ========================================================================

    #[test]
    fn test_eps_qos_capture_table() {
        // (content, QCI, max UL, max DL, GBR UL, GBR DL) in kbps
        let table: &[(&str, u8, u64, u64, u64, u64)] = &[
            ("05 01 40 40 40 40", 1, 64, 64, 64, 64),
            ("05 02 7f 7f 68 68", 2, 568, 568, 384, 384),
            ("05 05 ff ff ff ff", 5, 0, 0, 0, 0),
            ("05 01 fe fe 01 01", 1, 8_640, 8_640, 1, 1),
            ("09 01 fe fe 01 01 4a 4a 00 00", 1, 16_000, 16_000, 1, 1),
            ("09 01 fe fe 01 01 ba ba 00 00", 1, 128_000, 128_000, 1, 1),
            (
                "0d 01 fe fe fe fe fa fa fa fa f6 f6 f6 f6",
                1,
                10_000_000,
                10_000_000,
                10_000_000,
                10_000_000,
            ),
        ];

        for &(bytes, qci, mul, mdl, gul, gdl) in table {
            let data = capture(bytes);
            let mut buf = data.as_slice();
            let qos = EpsQualityOfService::nas_decode(&mut buf).unwrap();
            assert!(buf.is_empty(), "{bytes}");
            assert_eq!(qos.qci, qci, "{bytes}");
            assert_eq!(qos.max_uplink_kbps(), Some(mul), "{bytes}");
            assert_eq!(qos.max_downlink_kbps(), Some(mdl), "{bytes}");
            assert_eq!(qos.guaranteed_uplink_kbps(), Some(gul), "{bytes}");
            assert_eq!(qos.guaranteed_downlink_kbps(), Some(gdl), "{bytes}");

            let mut out = Vec::new();
            crate::NasEncode::nas_encode(&qos, &mut out).unwrap();
            assert_eq!(out, data, "{bytes}");
        }
    }

    #[test]
    fn test_eps_qos_non_gbr_capture() {
        let qos = EpsQualityOfService::nas_decode(&mut &[0x01u8, 0x09][..]).unwrap();
        assert_eq!(qos.qci, 9);
        assert_eq!(qos.max_uplink_kbps(), None);
    }
}
