//! Attach procedure integration tests
//!
//! Walks the EPS attach message sequence (TS 24.301 Section 5.5.1) through
//! the top-level dispatch, with the ESM messages piggybacked in the EMM
//! containers.

use lte_nas::ies::{EpsMobileIdentity, IdentityType2, MobileIdentity, PdnAddress};
use lte_nas::{
    decode_esm_message, AuthenticationResponse, EmmMessage, EsmBody, IdentityRequest,
    IdentityResponse, NasMessage,
};

use crate::test_fixtures::{
    attach_accept, attach_complete, attach_request, default_bearer_request, TestSubscriber,
};
use crate::test_utils::{assert_round_trip, encode_and_reparse, init_test_logging, pdu, TestResult};

#[test]
fn test_attach_request_carries_pdn_connectivity() -> TestResult {
    init_test_logging();
    let sub = TestSubscriber::default();

    let wire = encode_and_reparse(&NasMessage::Emm(attach_request(&sub)?.into()))?;
    assert_eq!(&wire[..3], &[0x07, 0x41, 0x71]);

    let NasMessage::Emm(EmmMessage::AttachRequest(request)) = assert_round_trip(&wire)? else {
        return Err("expected Attach Request".into());
    };
    assert_eq!(request.eps_mobile_identity, EpsMobileIdentity::Imsi(sub.imsi.clone()));

    let (esm, _) = decode_esm_message(request.esm_message_container.0.data())?;
    let EsmBody::PdnConnectivityRequest(pdn) = esm.body else {
        return Err("expected PDN Connectivity Request".into());
    };
    assert_eq!(esm.pti, 1);
    assert_eq!(pdn.access_point_name.map(|a| a.value), Some(sub.apn));
    Ok(())
}

#[test]
fn test_identity_and_authentication_exchange() -> TestResult {
    init_test_logging();

    let request = NasMessage::Emm(IdentityRequest::new(IdentityType2::Imsi).into());
    assert_eq!(encode_and_reparse(&request)?, vec![0x07, 0x55, 0x01]);

    let response = NasMessage::Emm(
        IdentityResponse {
            mobile_identity: MobileIdentity::Imsi("001010000000001".into()),
        }
        .into(),
    );
    encode_and_reparse(&response)?;

    // RES of 8 octets
    let res = pdu("07 53 08 2b 4f 6e 19 a0 02 c3 7d")?;
    let NasMessage::Emm(EmmMessage::AuthenticationResponse(AuthenticationResponse {
        authentication_response_parameter,
    })) = assert_round_trip(&res)?
    else {
        return Err("expected Authentication Response".into());
    };
    assert_eq!(authentication_response_parameter.0.len(), 8);
    Ok(())
}

#[test]
fn test_attach_accept_with_default_bearer() -> TestResult {
    init_test_logging();
    let sub = TestSubscriber::default();
    let bearer = default_bearer_request(&sub, 5, 1);
    let accept = attach_accept(&sub, &bearer)?;

    let wire = encode_and_reparse(&NasMessage::Emm(accept.into()))?;
    let NasMessage::Emm(EmmMessage::AttachAccept(accept)) = assert_round_trip(&wire)? else {
        return Err("expected Attach Accept".into());
    };
    assert_eq!(accept.guti, Some(sub.guti()));
    assert_eq!(accept.t3412_value.seconds(), Some(30 * 60));

    let (esm, consumed) = decode_esm_message(accept.esm_message_container.0.data())?;
    assert_eq!(consumed, accept.esm_message_container.0.len());
    assert_eq!(esm, bearer);
    assert_eq!(esm.eps_bearer_identity, 5);
    let EsmBody::ActivateDefaultEpsBearerContextRequest(request) = &esm.body else {
        return Err("expected Activate Default EPS Bearer Context Request".into());
    };
    assert_eq!(request.pdn_address, PdnAddress::Ipv4(sub.ipv4));
    let ambr = request.apn_ambr.ok_or("APN-AMBR missing")?;
    assert_eq!(ambr.downlink_kbps(), 100_000);
    assert_eq!(ambr.uplink_kbps(), 50_000);
    Ok(())
}

#[test]
fn test_attach_complete_with_default_bearer_accept() -> TestResult {
    let complete = attach_complete(5, 1)?;
    let wire = encode_and_reparse(&NasMessage::Emm(complete.into()))?;
    // Attach Complete, 3 octet container: EBI 5, PTI 1, type 0xC2
    assert_eq!(wire, pdu("07 43 00 03 52 01 c2")?);
    Ok(())
}

#[test]
fn test_attach_for_other_subscribers() -> TestResult {
    for (imsi, mcc, mnc) in [
        ("001010000000001", 1, 1),
        ("310150123456789", 310, 150),
        ("262019876543210", 262, 1),
    ] {
        let sub = TestSubscriber::default().with_imsi(imsi).with_plmn(mcc, mnc);
        encode_and_reparse(&NasMessage::Emm(attach_request(&sub)?.into()))?;
        let bearer = default_bearer_request(&sub, 5, 1);
        encode_and_reparse(&NasMessage::Emm(attach_accept(&sub, &bearer)?.into()))?;
    }
    Ok(())
}
