//! Truncation and corruption sweeps
//!
//! Every prefix of a valid PDU must either fail cleanly or decode to a
//! message that ends exactly at an IE boundary. Corrupted length octets must
//! never make a decoder read past the buffer.

use lte_nas::{decode_esm_message, decode_nas_message, NasMessage};

use crate::test_fixtures::{
    attach_accept, attach_complete, attach_request, default_bearer_request, periodic_tau_request,
    pdn_connectivity_request, TestSubscriber,
};
use crate::test_utils::{decodable_prefixes, init_test_logging, pdu, TestResult};

/// Valid PDUs covering both protocol discriminators and a range of IE types
fn corpus() -> TestResult<Vec<Vec<u8>>> {
    let sub = TestSubscriber::default();
    let bearer = default_bearer_request(&sub, 5, 1);
    let mut pdus = vec![
        NasMessage::Emm(attach_request(&sub)?.into()).to_vec()?,
        NasMessage::Emm(attach_accept(&sub, &bearer)?.into()).to_vec()?,
        NasMessage::Emm(attach_complete(5, 1)?.into()).to_vec()?,
        NasMessage::Emm(periodic_tau_request(&sub, &[5]).into()).to_vec()?,
        NasMessage::Esm(bearer).to_vec()?,
        NasMessage::Esm(pdn_connectivity_request(&sub, 3)).to_vec()?,
    ];
    // Security Mode Command, EEA0/EIA2, KSI 0, replayed capabilities
    pdus.push(pdu("07 5d 02 00 02 e0 e0")?);
    // Identity Response with IMEISV
    pdus.push(pdu("07 56 09 33 55 55 55 55 55 55 55 f5")?);
    // Service Request
    pdus.push(pdu("c7 05 12 34")?);
    Ok(pdus)
}

#[test]
fn test_every_prefix_fails_or_stops_on_a_boundary() -> TestResult {
    init_test_logging();
    for data in corpus()? {
        for cut in decodable_prefixes(&data) {
            let (_, consumed) = decode_nas_message(&data[..cut])?;
            assert_eq!(consumed, cut, "{} cut at {cut}", hex::encode(&data));
        }
        let (_, consumed) = decode_nas_message(&data)?;
        assert_eq!(consumed, data.len());
    }
    Ok(())
}

#[test]
fn test_mandatory_only_messages_reject_every_prefix() -> TestResult {
    for data in [
        pdu("07 43 00 03 52 01 c2")?,
        pdu("07 5d 02 00 02 e0 e0")?,
        pdu("62 00 cd 24")?,
        pdu("02 02 d2 05")?,
    ] {
        assert!(
            decodable_prefixes(&data).is_empty(),
            "{} decoded from a prefix",
            hex::encode(&data)
        );
    }
    Ok(())
}

#[test]
fn test_truncation_errors_map_to_legacy_codes() -> TestResult {
    let data = NasMessage::Emm(attach_request(&TestSubscriber::default())?.into()).to_vec()?;
    for cut in 0..data.len() {
        if let Err(err) = decode_nas_message(&data[..cut]) {
            assert!((-10..=-1).contains(&err.code()), "{err} at {cut}");
        }
    }
    assert_eq!(decode_nas_message(&[]).map(|_| ()).unwrap_err().code(), -1);
    Ok(())
}

#[test]
fn test_corrupted_octets_never_panic() -> TestResult {
    for data in corpus()? {
        for index in 0..data.len() {
            for value in [0x00, 0x01, 0x7F, 0x80, 0xFE, 0xFF] {
                let mut corrupted = data.clone();
                corrupted[index] = value;
                if let Ok((_, consumed)) = decode_nas_message(&corrupted) {
                    assert!(consumed <= corrupted.len());
                }
            }
        }
    }
    Ok(())
}

#[test]
fn test_esm_prefixes_stop_after_the_mandatory_part() -> TestResult {
    let sub = TestSubscriber::default();
    let esm = pdn_connectivity_request(&sub, 1).to_vec()?;
    for cut in 0..esm.len() {
        if let Ok((message, consumed)) = decode_esm_message(&esm[..cut]) {
            // Only the optional APN may be dropped from the end
            assert_eq!((cut, consumed), (4, 4));
            assert_eq!(message.pti, 1);
        }
    }
    Ok(())
}
