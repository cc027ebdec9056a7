//! Test fixtures for message flows
//!
//! Builders for the messages a UE and an MME exchange during attach, tracking
//! area update and bearer setup, parameterized by a [`TestSubscriber`].

use std::net::Ipv4Addr;

use lte_common::Plmn;
use lte_nas::ies::{
    AccessPointName, ApnAggregateMaximumBitRate, EpsAttachResult, EpsAttachType,
    EpsBearerContextStatus, EpsMobileIdentity, EpsQualityOfService, EpsUpdateType,
    EpsUpdateTypeValue, EsmMessageContainer, GprsTimer, Guti, NasKeySetIdentifier, PdnAddress,
    PdnType, RequestType, TrackingAreaIdentity, TrackingAreaIdentityList, UeNetworkCapability,
};
use lte_nas::{
    ActivateDefaultEpsBearerContextAccept, ActivateDefaultEpsBearerContextRequest, AttachAccept,
    AttachComplete, AttachRequest, EsmMessage, NasResult, PdnConnectivityRequest,
    TrackingAreaUpdateRequest,
};

/// Subscriber and serving network used by the scenario tests
#[derive(Debug, Clone)]
pub struct TestSubscriber {
    /// IMSI digits
    pub imsi: String,
    /// Serving PLMN
    pub plmn: Plmn,
    /// Serving tracking area code
    pub tac: u16,
    /// MME group ID assigned in the GUTI
    pub mme_group_id: u16,
    /// MME code assigned in the GUTI
    pub mme_code: u8,
    /// M-TMSI assigned in the GUTI
    pub m_tmsi: u32,
    /// APN requested for the default bearer
    pub apn: String,
    /// IPv4 address assigned to the default bearer
    pub ipv4: Ipv4Addr,
}

impl Default for TestSubscriber {
    fn default() -> Self {
        Self {
            imsi: "001010000000001".to_string(),
            plmn: Plmn::new(1, 1, false),
            tac: 1,
            mme_group_id: 0x8001,
            mme_code: 1,
            m_tmsi: 0xC000_0001,
            apn: "internet".to_string(),
            ipv4: Ipv4Addr::new(10, 45, 0, 2),
        }
    }
}

impl TestSubscriber {
    /// Use another IMSI
    pub fn with_imsi(mut self, imsi: &str) -> Self {
        self.imsi = imsi.to_string();
        self
    }

    /// Use another serving PLMN
    pub fn with_plmn(mut self, mcc: u16, mnc: u16) -> Self {
        self.plmn = Plmn::new(mcc, mnc, mnc >= 100);
        self
    }

    /// GUTI the MME assigns
    pub fn guti(&self) -> EpsMobileIdentity {
        EpsMobileIdentity::Guti(Guti {
            plmn: self.plmn,
            mme_group_id: self.mme_group_id,
            mme_code: self.mme_code,
            m_tmsi: self.m_tmsi,
        })
    }

    /// Serving TAI
    pub fn tai(&self) -> TrackingAreaIdentity {
        TrackingAreaIdentity::new(self.plmn, self.tac)
    }
}

/// Wrap an ESM message as the container carried in an EMM message
pub fn esm_container(esm: &EsmMessage) -> NasResult<EsmMessageContainer> {
    Ok(EsmMessageContainer::from(esm.to_vec()?))
}

/// Initial PDN Connectivity Request for IPv4 with the subscriber's APN
pub fn pdn_connectivity_request(sub: &TestSubscriber, pti: u8) -> EsmMessage {
    let mut request = PdnConnectivityRequest::new(
        RequestType(RequestType::INITIAL_REQUEST),
        PdnType::Ipv4,
    );
    request.access_point_name = Some(AccessPointName::new(sub.apn.clone()));
    EsmMessage::new(0, pti, request)
}

/// Attach Request with IMSI identity and a piggybacked PDN connectivity request
pub fn attach_request(sub: &TestSubscriber) -> NasResult<AttachRequest> {
    Ok(AttachRequest::new(
        EpsAttachType::EpsAttach,
        NasKeySetIdentifier::no_key(),
        EpsMobileIdentity::Imsi(sub.imsi.clone()),
        UeNetworkCapability::new(0xE0, 0xE0),
        esm_container(&pdn_connectivity_request(sub, 1))?,
    ))
}

/// Default bearer activation answering the PDN connectivity request
pub fn default_bearer_request(sub: &TestSubscriber, ebi: u8, pti: u8) -> EsmMessage {
    let mut request = ActivateDefaultEpsBearerContextRequest::new(
        EpsQualityOfService::new(9),
        AccessPointName::new(sub.apn.clone()),
        PdnAddress::Ipv4(sub.ipv4),
    );
    request.apn_ambr = Some(ApnAggregateMaximumBitRate::from_kbps(100_000, 50_000));
    EsmMessage::new(ebi, pti, request)
}

/// Attach Accept carrying the default bearer activation
pub fn attach_accept(sub: &TestSubscriber, esm: &EsmMessage) -> NasResult<AttachAccept> {
    Ok(AttachAccept {
        eps_attach_result: EpsAttachResult::EpsOnly,
        t3412_value: GprsTimer::new(1, 30),
        tai_list: TrackingAreaIdentityList::single(sub.tai()),
        esm_message_container: esm_container(esm)?,
        guti: Some(sub.guti()),
        ..Default::default()
    })
}

/// Attach Complete carrying the default bearer accept
pub fn attach_complete(ebi: u8, pti: u8) -> NasResult<AttachComplete> {
    let accept = EsmMessage::new(ebi, pti, ActivateDefaultEpsBearerContextAccept::default());
    Ok(AttachComplete {
        esm_message_container: esm_container(&accept)?,
    })
}

/// Periodic TAU Request from an attached UE with `active_ebis` up
pub fn periodic_tau_request(sub: &TestSubscriber, active_ebis: &[u8]) -> TrackingAreaUpdateRequest {
    let mut request = TrackingAreaUpdateRequest::new(
        EpsUpdateType {
            active: false,
            value: EpsUpdateTypeValue::PeriodicUpdating,
        },
        NasKeySetIdentifier::native(0),
        sub.guti(),
    );
    let mut status = EpsBearerContextStatus::default();
    for &ebi in active_ebis {
        status.set_active(ebi);
    }
    request.eps_bearer_context_status = Some(status);
    request.last_visited_registered_tai = Some(sub.tai());
    request
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscriber_builders() {
        let sub = TestSubscriber::default().with_imsi("310150123456789").with_plmn(310, 150);
        assert_eq!(sub.imsi, "310150123456789");
        assert!(sub.plmn.long_mnc);
        let EpsMobileIdentity::Guti(guti) = sub.guti() else {
            panic!("expected GUTI");
        };
        assert_eq!(guti.plmn, Plmn::new(310, 150, true));
    }

    #[test]
    fn test_esm_container_encodes_message() {
        let sub = TestSubscriber::default();
        let container = esm_container(&pdn_connectivity_request(&sub, 1)).unwrap();
        // EBI 0, PD 2, PTI 1, PDN Connectivity Request, IPv4 initial request
        assert_eq!(&container.0.data()[..4], &[0x02, 0x01, 0xD0, 0x11]);
    }
}
