//! EPS bearer management integration tests (TS 24.301 Section 6.4, 6.5)
//!
//! Dedicated bearer setup, modification and release, UE requested bearer
//! resource allocation, ESM information retrieval and PDN disconnection.

use lte_nas::ies::tft::{direction, PacketFilterList};
use lte_nas::ies::{
    AccessPointName, ApnAggregateMaximumBitRate, EpsQualityOfService, GprsTimer3,
    LinkedEpsBearerIdentity, PacketFilter, PacketFilterComponent, TftOperationCode,
    TrafficFlowTemplate,
};
use lte_nas::{
    ActivateDedicatedEpsBearerContextAccept, ActivateDedicatedEpsBearerContextRequest,
    BearerResourceAllocationReject, BearerResourceAllocationRequest,
    DeactivateEpsBearerContextAccept, DeactivateEpsBearerContextRequest, EsmBody, EsmCause,
    EsmInformationRequest, EsmInformationResponse, EsmMessage, EsmStatus,
    ModifyEpsBearerContextAccept, ModifyEpsBearerContextRequest, NasMessage,
    PdnDisconnectRequest,
};

use crate::test_utils::{assert_round_trip, encode_and_reparse, init_test_logging, pdu, TestResult};

/// SIP signalling towards the P-CSCF
fn sip_tft() -> TrafficFlowTemplate {
    TrafficFlowTemplate {
        operation: TftOperationCode::CreateNewTft,
        packet_filters: PacketFilterList::Filters(vec![PacketFilter {
            direction: direction::BIDIRECTIONAL,
            identifier: 1,
            evaluation_precedence: 0x10,
            components: vec![
                PacketFilterComponent::Ipv4RemoteAddress {
                    addr: [10, 10, 0, 5],
                    mask: [255, 255, 255, 255],
                },
                PacketFilterComponent::ProtocolNextHeader(17),
                PacketFilterComponent::SingleRemotePort(5060),
            ],
        }]),
        parameters: Vec::new(),
    }
}

fn esm(message: EsmMessage) -> NasMessage {
    NasMessage::Esm(message)
}

#[test]
fn test_dedicated_bearer_setup() -> TestResult {
    init_test_logging();
    let request = ActivateDedicatedEpsBearerContextRequest::new(
        LinkedEpsBearerIdentity(5),
        EpsQualityOfService::with_bit_rates_kbps(1, 128, 128, 128, 128),
        sip_tft(),
    );
    let wire = encode_and_reparse(&esm(EsmMessage::new(6, 0, request)))?;
    // EBI 6, network initiated (PTI 0), linked EBI 5
    assert_eq!(&wire[..4], &[0x62, 0x00, 0xC5, 0x05]);

    let NasMessage::Esm(decoded) = assert_round_trip(&wire)? else {
        return Err("expected ESM message".into());
    };
    let EsmBody::ActivateDedicatedEpsBearerContextRequest(request) = decoded.body else {
        return Err("expected Activate Dedicated EPS Bearer Context Request".into());
    };
    assert_eq!(request.eps_qos.guaranteed_uplink_kbps(), Some(128));
    let PacketFilterList::Filters(filters) = &request.tft.packet_filters else {
        return Err("expected packet filters".into());
    };
    assert_eq!(filters[0].components.len(), 3);

    let accept = esm(EsmMessage::new(6, 0, ActivateDedicatedEpsBearerContextAccept::default()));
    assert_eq!(encode_and_reparse(&accept)?, vec![0x62, 0x00, 0xC6]);
    Ok(())
}

#[test]
fn test_bearer_modification() -> TestResult {
    let request = ModifyEpsBearerContextRequest {
        new_eps_qos: Some(EpsQualityOfService::new(8)),
        apn_ambr: Some(ApnAggregateMaximumBitRate::from_kbps(200_000, 100_000)),
        ..Default::default()
    };
    let wire = encode_and_reparse(&esm(EsmMessage::new(5, 0, request)))?;
    assert_eq!(&wire[..7], &[0x52, 0x00, 0xC9, 0x5B, 0x01, 0x08, 0x5E]);

    let accept = esm(EsmMessage::new(5, 0, ModifyEpsBearerContextAccept::default()));
    assert_eq!(encode_and_reparse(&accept)?, vec![0x52, 0x00, 0xCA]);
    Ok(())
}

#[test]
fn test_bearer_release() -> TestResult {
    let mut request = DeactivateEpsBearerContextRequest::new(EsmCause::RegularDeactivation);
    request.t3396_value = Some(GprsTimer3::new(1, 1));
    let wire = encode_and_reparse(&esm(EsmMessage::new(6, 0, request)))?;
    assert_eq!(wire, pdu("62 00 cd 24 37 01 21")?);

    let NasMessage::Esm(EsmMessage {
        body: EsmBody::DeactivateEpsBearerContextRequest(decoded),
        ..
    }) = assert_round_trip(&wire)?
    else {
        return Err("expected Deactivate EPS Bearer Context Request".into());
    };
    assert_eq!(decoded.t3396_value.and_then(|t| t.seconds()), Some(3600));

    let accept = esm(EsmMessage::new(6, 0, DeactivateEpsBearerContextAccept::default()));
    assert_eq!(encode_and_reparse(&accept)?, vec![0x62, 0x00, 0xCE]);
    Ok(())
}

#[test]
fn test_ue_requested_bearer_resource_allocation() -> TestResult {
    let request = BearerResourceAllocationRequest {
        linked_eps_bearer_identity: LinkedEpsBearerIdentity(5),
        traffic_flow_aggregate: sip_tft(),
        required_traffic_flow_qos: EpsQualityOfService::with_bit_rates_kbps(1, 64, 64, 64, 64),
        ..Default::default()
    };
    let wire = encode_and_reparse(&esm(EsmMessage::new(0, 7, request)))?;
    assert_eq!(&wire[..4], &[0x02, 0x07, 0xD4, 0x05]);

    let mut reject = BearerResourceAllocationReject::new(EsmCause::InsufficientResources);
    reject.back_off_timer = Some(GprsTimer3::new(5, 2));
    let wire = encode_and_reparse(&esm(EsmMessage::new(0, 7, reject)))?;
    assert_eq!(wire, pdu("02 07 d5 1a 37 01 a2")?);
    Ok(())
}

#[test]
fn test_esm_information_and_pdn_disconnect() -> TestResult {
    let request = esm(EsmMessage::new(0, 1, EsmInformationRequest));
    assert_eq!(encode_and_reparse(&request)?, vec![0x02, 0x01, 0xD9]);

    let response = EsmInformationResponse {
        access_point_name: Some(AccessPointName::new("ims")),
        ..Default::default()
    };
    let wire = encode_and_reparse(&esm(EsmMessage::new(0, 1, response)))?;
    assert_eq!(wire, pdu("02 01 da 28 04 03 69 6d 73")?);

    let disconnect = esm(EsmMessage::new(0, 2, PdnDisconnectRequest::new(5)));
    assert_eq!(encode_and_reparse(&disconnect)?, vec![0x02, 0x02, 0xD2, 0x05]);

    let status = esm(EsmMessage::new(5, 3, EsmStatus::new(EsmCause::InvalidEpsBearerIdentity)));
    assert_eq!(encode_and_reparse(&status)?, vec![0x52, 0x03, 0xE8, 0x2B]);
    Ok(())
}
