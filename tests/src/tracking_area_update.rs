//! Tracking area update integration tests (TS 24.301 Section 5.5.3)

use lte_common::Plmn;
use lte_nas::ies::{
    EmergencyNumber, EmergencyNumberList, EpsBearerContextStatus, EpsUpdateResult, GprsTimer,
    PlmnList, TrackingAreaIdentity, TrackingAreaIdentityList,
};
use lte_nas::{
    EmmCause, EmmMessage, NasMessage, TrackingAreaUpdateAccept, TrackingAreaUpdateComplete,
    TrackingAreaUpdateReject,
};

use crate::test_fixtures::{periodic_tau_request, TestSubscriber};
use crate::test_utils::{assert_round_trip, encode_and_reparse, init_test_logging, pdu, TestResult};

#[test]
fn test_periodic_tau_request_layout() -> TestResult {
    init_test_logging();
    let sub = TestSubscriber::default();
    let request = periodic_tau_request(&sub, &[5]);

    let wire = encode_and_reparse(&NasMessage::Emm(request.into()))?;
    assert_eq!(
        wire,
        pdu("07 48 03
             0b f6 00 f1 10 80 01 01 c0 00 00 01
             52 00 f1 10 00 01
             57 02 20 00")?
    );
    Ok(())
}

#[test]
fn test_tau_request_reports_bearer_status() -> TestResult {
    let sub = TestSubscriber::default();
    let wire = NasMessage::Emm(periodic_tau_request(&sub, &[5, 6, 9]).into()).to_vec()?;

    let NasMessage::Emm(EmmMessage::TrackingAreaUpdateRequest(request)) = assert_round_trip(&wire)?
    else {
        return Err("expected Tracking Area Update Request".into());
    };
    let status = request
        .eps_bearer_context_status
        .ok_or("bearer context status missing")?;
    for ebi in 0..16 {
        assert_eq!(status.is_active(ebi), [5, 6, 9].contains(&ebi), "EBI {ebi}");
    }
    assert_eq!(request.old_guti, sub.guti());
    Ok(())
}

#[test]
fn test_tau_accept_with_new_tai_list() -> TestResult {
    init_test_logging();
    let plmn = Plmn::new(1, 1, false);
    let accept = TrackingAreaUpdateAccept {
        eps_update_result: EpsUpdateResult::TaUpdated,
        t3412_value: Some(GprsTimer::new(1, 30)),
        guti: Some(TestSubscriber::default().guti()),
        tai_list: Some(TrackingAreaIdentityList::single(TrackingAreaIdentity::new(plmn, 2))),
        eps_bearer_context_status: Some(EpsBearerContextStatus(0x0020)),
        equivalent_plmns: Some(PlmnList {
            plmns: vec![Plmn::new(1, 2, false), Plmn::new(310, 150, true)],
        }),
        emergency_number_list: Some(EmergencyNumberList {
            numbers: vec![
                EmergencyNumber {
                    service_category: 0x01,
                    digits: "112".into(),
                },
                EmergencyNumber {
                    service_category: 0x1F,
                    digits: "911".into(),
                },
            ],
        }),
        ..Default::default()
    };

    let wire = encode_and_reparse(&NasMessage::Emm(accept.into()))?;
    assert_eq!(&wire[..4], &[0x07, 0x49, 0x00, 0x5A]);

    let NasMessage::Emm(EmmMessage::TrackingAreaUpdateAccept(accept)) = assert_round_trip(&wire)?
    else {
        return Err("expected Tracking Area Update Accept".into());
    };
    let tai_list = accept.tai_list.ok_or("TAI list missing")?;
    assert!(tai_list.contains(&TrackingAreaIdentity::new(plmn, 2)));
    assert!(!tai_list.contains(&TrackingAreaIdentity::new(plmn, 1)));
    assert_eq!(accept.equivalent_plmns.map(|l| l.plmns.len()), Some(2));
    Ok(())
}

#[test]
fn test_tau_complete_and_reject() -> TestResult {
    let complete = NasMessage::Emm(TrackingAreaUpdateComplete.into());
    assert_eq!(encode_and_reparse(&complete)?, vec![0x07, 0x4A]);

    let reject = NasMessage::Emm(TrackingAreaUpdateReject::new(EmmCause::ImplicitlyDetached).into());
    assert_eq!(encode_and_reparse(&reject)?, vec![0x07, 0x4B, 0x0A]);

    // Reject with T3346 of 1 minute
    let NasMessage::Emm(EmmMessage::TrackingAreaUpdateReject(reject)) =
        assert_round_trip(&pdu("07 4b 16 5f 01 21")?)?
    else {
        return Err("expected Tracking Area Update Reject".into());
    };
    assert_eq!(reject.emm_cause, EmmCause::Congestion);
    assert_eq!(reject.t3346_value.and_then(|t| t.0.seconds()), Some(60));
    Ok(())
}
