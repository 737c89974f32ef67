//! Live update reconciliation tests for claims_store

use chrono::Duration;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::ClaimId;
use domain_claims::{Claim, ClaimError, ClaimStatus, LineItem, Priority};

use claims_store::{
    ClaimCollection, ClaimField, ClaimUpdateEvent, ReconcileError, ReconcileOutcome, Reconciler,
};
use test_utils::{
    assert_charged_amounts_consistent, claim_status_strategy, priority_strategy, ClaimFixtures,
    TemporalFixtures, TestClaimBuilder,
};

fn id(raw: &str) -> ClaimId {
    ClaimId::new(raw).unwrap()
}

fn collection(claims: Vec<Claim>) -> ClaimCollection {
    let mut collection = ClaimCollection::new();
    collection.replace(claims).unwrap();
    collection
}

fn apply(
    reconciler: &mut Reconciler,
    collection: &mut ClaimCollection,
    event: ClaimUpdateEvent,
) -> Result<ReconcileOutcome, ReconcileError> {
    reconciler.apply_event(collection, event)
}

fn event_json(json: &str) -> ClaimUpdateEvent {
    serde_json::from_str(json).unwrap()
}

fn coded_claim() -> Claim {
    TestClaimBuilder::new()
        .with_id("d1")
        .with_diagnoses(&["E11.9", "I10"], Some("E11.9"))
        .with_line_item("99213", 1, dec!(75.00))
        .build()
}

// ============================================================================
// Merge Tests
// ============================================================================

mod merge_tests {
    use super::*;

    #[test]
    fn test_only_named_fields_merge() {
        let mut claims = collection(ClaimFixtures::submitted_and_approved());
        let mut reconciler = Reconciler::new();

        let event = event_json(
            r#"{"claim_id":"c1","status":"validating","priority":"urgent","updated_fields":["priority"]}"#,
        );
        let outcome = apply(&mut reconciler, &mut claims, event).unwrap();

        assert_eq!(outcome, ReconcileOutcome::Applied { fields: vec![ClaimField::Priority] });
        let claim = claims.get(&id("c1")).unwrap();
        assert_eq!(claim.priority, Priority::Urgent);
        assert_eq!(claim.status, ClaimStatus::Submitted);
    }

    #[test]
    fn test_applied_lists_only_fields_that_differed() {
        let mut claims = collection(ClaimFixtures::submitted_and_approved());
        let mut reconciler = Reconciler::new();

        let event = event_json(
            r#"{"claim_id":"c1","status":"submitted","priority":"high","updated_fields":["status","priority"]}"#,
        );
        let outcome = apply(&mut reconciler, &mut claims, event).unwrap();

        assert_eq!(outcome, ReconcileOutcome::Applied { fields: vec![ClaimField::Priority] });
    }

    #[test]
    fn test_updated_at_follows_event_time() {
        let mut claims = collection(ClaimFixtures::submitted_and_approved());
        let mut reconciler = Reconciler::new();
        let at = TemporalFixtures::base_time() + Duration::hours(2);

        let event = ClaimUpdateEvent::status(id("c1"), ClaimStatus::Validating).at(at);
        apply(&mut reconciler, &mut claims, event).unwrap();

        assert_eq!(claims.get(&id("c1")).unwrap().updated_at, at);
    }

    #[test]
    fn test_line_items_replace_and_recompute_charges() {
        let mut claims = collection(vec![coded_claim()]);
        let mut reconciler = Reconciler::new();

        // charged_amount on the wire is ignored and recomputed.
        let event = event_json(
            r#"{"claim_id":"d1","line_items":[
                {"procedure_code":"99214","quantity":2,"unit_price":"120.00","charged_amount":"1.00"},
                {"procedure_code":"36415","quantity":3,"unit_price":"9.50"}
            ],"updated_fields":["lineItems"]}"#,
        );
        apply(&mut reconciler, &mut claims, event).unwrap();

        let claim = claims.get(&id("d1")).unwrap();
        assert_charged_amounts_consistent(claim);
        assert_eq!(claim.line_items[0].charged_amount(), dec!(240.00));
        assert_eq!(claim.total_charged().unwrap().amount(), dec!(268.50));
    }

    #[test]
    fn test_diagnosis_codes_and_primary_merge_together() {
        let mut claims = collection(vec![coded_claim()]);
        let mut reconciler = Reconciler::new();

        let event = event_json(
            r#"{"claim_id":"d1","diagnosis_codes":["I10","z00.00"],"primary_diagnosis":"Z00.00",
                "updated_fields":["diagnosis_codes","primary_diagnosis"]}"#,
        );
        let outcome = apply(&mut reconciler, &mut claims, event).unwrap();

        assert_eq!(
            outcome,
            ReconcileOutcome::Applied {
                fields: vec![ClaimField::DiagnosisCodes, ClaimField::PrimaryDiagnosis]
            }
        );
        let diagnoses = &claims.get(&id("d1")).unwrap().diagnoses;
        assert_eq!(diagnoses.codes().collect::<Vec<_>>(), vec!["I10", "Z00.00"]);
        assert_eq!(diagnoses.primary(), Some("Z00.00"));
    }

    #[test]
    fn test_dropping_the_primary_code_is_rejected() {
        let mut claims = collection(vec![coded_claim()]);
        let mut reconciler = Reconciler::new();
        let before = claims.get(&id("d1")).cloned();

        let event = event_json(
            r#"{"claim_id":"d1","diagnosis_codes":["I10"],"updated_fields":["diagnosis_codes"]}"#,
        );
        let result = apply(&mut reconciler, &mut claims, event);

        assert_eq!(
            result,
            Err(ReconcileError::Rejected {
                claim_id: id("d1"),
                source: ClaimError::PrimaryDiagnosisNotListed("E11.9".to_string()),
            })
        );
        assert_eq!(claims.get(&id("d1")).cloned(), before);
    }

    #[test]
    fn test_primary_named_without_value_clears_it() {
        let mut claims = collection(vec![coded_claim()]);
        let mut reconciler = Reconciler::new();

        let event = event_json(r#"{"claim_id":"d1","updated_fields":["primary_diagnosis"]}"#);
        apply(&mut reconciler, &mut claims, event).unwrap();

        assert_eq!(claims.get(&id("d1")).unwrap().diagnoses.primary(), None);
    }
}

// ============================================================================
// Rejection Tests
// ============================================================================

mod rejection_tests {
    use super::*;

    #[test]
    fn test_rejected_patch_changes_nothing() {
        let mut claims = collection(ClaimFixtures::submitted_and_approved());
        let mut reconciler = Reconciler::new();
        let revision = claims.revision();

        // Priority is legal, status is not; neither may land.
        let event = event_json(
            r#"{"claim_id":"c2","status":"submitted","priority":"urgent","updated_fields":["priority","status"]}"#,
        );
        assert!(apply(&mut reconciler, &mut claims, event).is_err());

        let claim = claims.get(&id("c2")).unwrap();
        assert_eq!(claim.priority, Priority::Normal);
        assert_eq!(claim.status, ClaimStatus::Approved);
        assert_eq!(claims.revision(), revision);
        assert_eq!(reconciler.stats().rejected, 1);
    }

    #[test]
    fn test_overflowing_line_item_fails_to_parse() {
        let json = r#"{"claim_id":"d1","line_items":[
            {"procedure_code":"99213","quantity":4000000000,"unit_price":"70000000000000000000000000000"}
        ],"updated_fields":["line_items"]}"#;

        assert!(serde_json::from_str::<ClaimUpdateEvent>(json).is_err());
    }

    #[test]
    fn test_overflowing_total_charged_is_rejected() {
        let mut claims = collection(vec![coded_claim()]);
        let mut reconciler = Reconciler::new();
        let before = claims.get(&id("d1")).unwrap().clone();

        let mut event = ClaimUpdateEvent::status(id("d1"), ClaimStatus::Submitted);
        event.status = None;
        event.line_items = Some(vec![
            LineItem::new("99213", 1, Decimal::MAX).unwrap(),
            LineItem::new("99214", 1, Decimal::MAX).unwrap(),
        ]);
        event.updated_fields = vec!["line_items".to_string()];

        let result = apply(&mut reconciler, &mut claims, event);
        assert!(matches!(
            result,
            Err(ReconcileError::Rejected { source: ClaimError::Money(_), .. })
        ));
        assert_eq!(claims.get(&id("d1")).unwrap(), &before);
    }

    #[test]
    fn test_tracking_number_cannot_move_between_claims() {
        let mut claims = collection(vec![
            TestClaimBuilder::new().with_id("a").with_tracking_number("TRK-1").build(),
            TestClaimBuilder::new().with_id("b").build(),
        ]);
        let mut reconciler = Reconciler::new();

        let event = event_json(
            r#"{"claim_id":"b","tracking_number":"TRK-1","updated_fields":["tracking_number"]}"#,
        );
        assert_eq!(
            apply(&mut reconciler, &mut claims, event),
            Err(ReconcileError::DuplicateTrackingNumber {
                tracking_number: "TRK-1".to_string(),
                owner: id("a"),
            })
        );
        assert_eq!(claims.get(&id("b")).unwrap().tracking_number, None);
    }

    #[test]
    fn test_assigned_tracking_number_is_immutable() {
        let mut claims = collection(ClaimFixtures::submitted_and_approved());
        let mut reconciler = Reconciler::new();

        let event = event_json(
            r#"{"claim_id":"c1","tracking_number":"TRK-9999","updated_fields":["tracking_number"]}"#,
        );
        assert!(matches!(
            apply(&mut reconciler, &mut claims, event),
            Err(ReconcileError::Rejected {
                source: ClaimError::TrackingNumberReassigned { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_new_tracking_number_is_indexed() {
        let mut claims = collection(vec![TestClaimBuilder::new().with_id("b").build()]);
        let mut reconciler = Reconciler::new();

        let event = event_json(
            r#"{"claim_id":"b","tracking_number":" TRK-55 ","updated_fields":["tracking_number"]}"#,
        );
        apply(&mut reconciler, &mut claims, event).unwrap();

        assert_eq!(claims.tracking_owner("TRK-55"), Some(&id("b")));
    }

    #[test]
    fn test_denial_after_appeal_is_final() {
        let mut claims = collection(vec![TestClaimBuilder::new()
            .with_id("x")
            .with_status(ClaimStatus::Appealed)
            .build()]);
        let mut reconciler = Reconciler::new();

        apply(&mut reconciler, &mut claims, ClaimUpdateEvent::status(id("x"), ClaimStatus::Denied))
            .unwrap();
        let result =
            apply(&mut reconciler, &mut claims, ClaimUpdateEvent::status(id("x"), ClaimStatus::Appealed));

        assert!(matches!(result, Err(ReconcileError::Rejected { .. })));
        assert!(claims.get(&id("x")).unwrap().is_final());
    }
}

// ============================================================================
// Ordering Tests
// ============================================================================

mod ordering_tests {
    use super::*;

    #[test]
    fn test_unknown_claim_is_not_found() {
        let mut claims = collection(ClaimFixtures::submitted_and_approved());
        let mut reconciler = Reconciler::new();

        let outcome = apply(
            &mut reconciler,
            &mut claims,
            ClaimUpdateEvent::status(id("zz"), ClaimStatus::Validating),
        );
        assert_eq!(outcome, Ok(ReconcileOutcome::NotFound));
        assert_eq!(claims.len(), 2);
    }

    #[test]
    fn test_event_older_than_claim_is_stale() {
        let mut claims = collection(ClaimFixtures::submitted_and_approved());
        let mut reconciler = Reconciler::new();

        let newer = TemporalFixtures::base_time() + Duration::minutes(10);
        let older = TemporalFixtures::base_time() + Duration::minutes(5);

        let first = ClaimUpdateEvent::status(id("c1"), ClaimStatus::Validating).at(newer);
        apply(&mut reconciler, &mut claims, first).unwrap();

        let late = ClaimUpdateEvent::status(id("c1"), ClaimStatus::Processing).at(older);
        assert_eq!(apply(&mut reconciler, &mut claims, late), Ok(ReconcileOutcome::Stale));
        assert_eq!(claims.get(&id("c1")).unwrap().status, ClaimStatus::Validating);
    }

    #[test]
    fn test_duplicate_delivery_is_a_no_op() {
        let mut claims = collection(ClaimFixtures::submitted_and_approved());
        let mut reconciler = Reconciler::new();
        let at = TemporalFixtures::base_time() + Duration::minutes(1);
        let event = ClaimUpdateEvent::status(id("c1"), ClaimStatus::Validating).at(at);

        apply(&mut reconciler, &mut claims, event.clone()).unwrap();
        let once = claims.get(&id("c1")).cloned();
        let revision = claims.revision();

        assert_eq!(apply(&mut reconciler, &mut claims, event), Ok(ReconcileOutcome::Unchanged));
        assert_eq!(claims.get(&id("c1")).cloned(), once);
        assert_eq!(claims.revision(), revision);

        let stats = reconciler.stats();
        assert_eq!((stats.applied, stats.unchanged), (1, 1));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

mod property_tests {
    use super::*;

    proptest! {
        #[test]
        fn applying_twice_equals_applying_once(
            status in claim_status_strategy(),
            priority in priority_strategy(),
            quantity in 1u32..10,
            minutes in 0i64..120,
        ) {
            let mut claims = collection(ClaimFixtures::numbered(9));
            let mut reconciler = Reconciler::new();
            let target = ClaimFixtures::numbered_claim(4).id;

            let mut event = ClaimUpdateEvent::status(target.clone(), status)
                .at(TemporalFixtures::base_time() + Duration::minutes(minutes));
            event.priority = Some(priority);
            event.line_items = Some(vec![LineItem::new("99213", quantity, dec!(80.00)).unwrap()]);
            event.updated_fields = vec![
                "status".to_string(),
                "priority".to_string(),
                "line_items".to_string(),
            ];

            let first = apply(&mut reconciler, &mut claims, event.clone());
            let once = claims.get(&target).cloned();

            let second = apply(&mut reconciler, &mut claims, event);
            prop_assert_eq!(claims.get(&target).cloned(), once);

            match first {
                Ok(ReconcileOutcome::Applied { .. }) | Ok(ReconcileOutcome::Unchanged) => {
                    prop_assert_eq!(second, Ok(ReconcileOutcome::Unchanged));
                }
                other => prop_assert_eq!(second, other),
            }
        }

        #[test]
        fn every_edit_path_keeps_charges_consistent(
            quantity in 0u32..50,
            cents in 0i64..1_000_000,
        ) {
            let mut claims = collection(vec![coded_claim()]);
            let mut reconciler = Reconciler::new();

            let mut event = ClaimUpdateEvent::status(id("d1"), ClaimStatus::Submitted);
            event.line_items = Some(vec![
                LineItem::new("A", quantity, rust_decimal::Decimal::new(cents, 2)).unwrap(),
                LineItem::new("B", 1, dec!(12.34)).unwrap(),
            ]);
            event.updated_fields = vec!["line_items".to_string()];
            apply(&mut reconciler, &mut claims, event).unwrap();

            test_utils::assert_charged_amounts_consistent(claims.get(&id("d1")).unwrap());
        }
    }
}
