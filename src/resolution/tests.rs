use super::*;
use crate::association::AssociationIndex;
use crate::particle::ParticleRecord;
use proptest::prelude::*;

fn mom(px: f32, py: f32, pz: f32) -> ParticleRecord {
    ParticleRecord::from_momentum(px, py, pz)
}

#[test]
fn test_identical_momenta_give_zero_resolution() {
    let reco = vec![mom(3.0, 4.0, 0.0)];
    let truth = vec![mom(3.0, 4.0, 0.0)];
    let assoc = AssociationIndex::from_columns(&[0], &[0]).unwrap();

    assert_eq!(reco[0].p(), 5.0);
    let values = extract(&reco, &reco, &assoc, &truth, Quantity::P);
    assert_eq!(values, vec![0.0]);
}

#[test]
fn test_relative_momentum_resolution() {
    let reco = vec![mom(0.0, 0.0, 10.5)];
    let truth = vec![mom(0.0, 0.0, 10.0)];
    let assoc = AssociationIndex::from_columns(&[0], &[0]).unwrap();

    let values = extract(&reco, &reco, &assoc, &truth, Quantity::P);
    assert!((values[0] - 0.05).abs() < 1e-6);
}

#[test]
fn test_inverse_pt_difference_is_not_normalized() {
    let reco = vec![mom(4.0, 0.0, 1.0)];
    let truth = vec![mom(5.0, 0.0, 1.0)];
    let assoc = AssociationIndex::from_columns(&[0], &[0]).unwrap();

    let values = extract(&reco, &reco, &assoc, &truth, Quantity::InvPt);
    assert!((values[0] - (0.25 - 0.2)).abs() < 1e-6);
}

#[test]
fn test_inverse_p_difference() {
    let reco = vec![mom(0.0, 0.0, 40.0)];
    let truth = vec![mom(0.0, 0.0, 50.0)];
    let assoc = AssociationIndex::from_columns(&[0], &[0]).unwrap();

    let values = extract(&reco, &reco, &assoc, &truth, Quantity::InvP);
    assert!((values[0] - 0.005).abs() < 1e-7);
}

#[test]
fn test_truth_pt_below_threshold_is_sentinel() {
    let reco = vec![mom(1.0, 0.0, 2.0)];
    let truth = vec![mom(0.0005, 0.0, 2.0)];
    let assoc = AssociationIndex::from_columns(&[0], &[0]).unwrap();

    let values = extract(&reco, &reco, &assoc, &truth, Quantity::Pt);
    assert_eq!(values, vec![SENTINEL]);
    assert_eq!(SENTINEL, -998.0);
}

#[test]
fn test_reco_guard_depends_on_quantity() {
    // reco pt is zero, truth is healthy
    let reco = vec![mom(0.0, 0.0, 5.0)];
    let truth = vec![mom(1.0, 0.0, 5.0)];
    let assoc = AssociationIndex::from_columns(&[0], &[0]).unwrap();

    let pt = extract(&reco, &reco, &assoc, &truth, Quantity::Pt);
    assert_eq!(pt, vec![-1.0]);

    let inv_pt = extract(&reco, &reco, &assoc, &truth, Quantity::InvPt);
    assert_eq!(inv_pt, vec![SENTINEL]);
}

#[test]
fn test_unmatched_particle_is_sentinel() {
    let full = vec![mom(1.0, 1.0, 1.0)];
    let selected = vec![mom(2.0, 2.0, 2.0)];
    let truth = vec![mom(1.0, 1.0, 1.0)];
    let assoc = AssociationIndex::from_columns(&[0], &[0]).unwrap();

    let values = extract(&selected, &full, &assoc, &truth, Quantity::P);
    assert_eq!(values, vec![SENTINEL]);
}

#[test]
fn test_missing_association_is_sentinel() {
    let full = vec![mom(1.0, 1.0, 1.0), mom(2.0, 2.0, 2.0)];
    let truth = vec![mom(1.0, 1.0, 1.0)];
    let assoc = AssociationIndex::from_columns(&[0], &[0]).unwrap();

    let values = extract(&full, &full, &assoc, &truth, Quantity::P);
    assert_eq!(values[0], 0.0);
    assert_eq!(values[1], SENTINEL);
}

#[test]
fn test_truth_index_out_of_range_is_sentinel() {
    let full = vec![mom(1.0, 1.0, 1.0), mom(2.0, 2.0, 2.0)];
    let truth = vec![mom(1.0, 1.0, 1.0)];
    let assoc = AssociationIndex::from_columns(&[0, 1], &[-1, 4]).unwrap();

    let values = extract(&full, &full, &assoc, &truth, Quantity::P);
    assert_eq!(values, vec![SENTINEL, SENTINEL]);
}

#[test]
fn test_first_position_wins_on_duplicate_momenta() {
    // Two reco particles share a momentum; the selected one resolves to position 0.
    let full = vec![mom(0.0, 0.0, 10.0), mom(0.0, 0.0, 10.0)];
    let selected = vec![full[1]];
    let truth = vec![mom(0.0, 0.0, 10.0), mom(0.0, 0.0, 20.0)];
    let assoc = AssociationIndex::from_columns(&[0, 1], &[0, 1]).unwrap();

    for lookup in [PositionLookup::LinearScan, PositionLookup::Hashed] {
        let values = extract_with(lookup, &selected, &full, &assoc, &truth, Quantity::P);
        assert_eq!(values, vec![0.0]);
    }
}

#[test]
fn test_signed_zero_matches_in_both_lookups() {
    let full = vec![mom(-0.0, 3.0, 4.0)];
    let selected = vec![mom(0.0, 3.0, 4.0)];
    let truth = vec![mom(0.0, 3.0, 4.0)];
    let assoc = AssociationIndex::from_columns(&[0], &[0]).unwrap();

    for lookup in [PositionLookup::LinearScan, PositionLookup::Hashed] {
        let values = extract_with(lookup, &selected, &full, &assoc, &truth, Quantity::P);
        assert_eq!(values, vec![0.0]);
    }
}

#[test]
fn test_output_length_matches_selection() {
    let full = vec![mom(1.0, 0.0, 0.0)];
    let selected = vec![mom(1.0, 0.0, 0.0), mom(9.0, 9.0, 9.0), mom(1.0, 0.0, 0.0)];
    let truth = vec![mom(1.0, 0.0, 0.0)];
    let assoc = AssociationIndex::from_columns(&[0], &[0]).unwrap();

    let values = extract(&selected, &full, &assoc, &truth, Quantity::Pt);
    assert_eq!(values.len(), selected.len());
}

#[test]
fn test_select_charged_and_gather() {
    let collection = vec![
        mom(1.0, 0.0, 0.0).with_charge(1.0),
        mom(2.0, 0.0, 0.0),
        mom(3.0, 0.0, 0.0).with_charge(-1.0),
    ];

    let charged = select_charged(&collection);
    assert_eq!(charged.len(), 2);
    assert_eq!(charged[1].px, 3.0);

    let picked = gather(&[2, -1, 7, 0], &collection);
    assert_eq!(picked.len(), 2);
    assert_eq!(picked[0].px, 3.0);
    assert_eq!(picked[1].px, 1.0);
}

#[test]
fn test_inverse_energy_difference() {
    let reco = vec![
        mom(0.0, 0.0, 0.0).with_energy(40.0),
        mom(0.0, 0.0, 0.0).with_energy(10.0),
    ];
    let truth = vec![
        mom(0.0, 0.0, 0.0).with_energy(40.0).with_generator_status(1),
        mom(0.0, 0.0, 0.0).with_energy(60.0).with_generator_status(1),
        mom(0.0, 0.0, 0.0).with_energy(500.0).with_generator_status(2),
    ];

    let final_truth = final_state(&truth);
    assert_eq!(final_truth.len(), 2);

    let value = inverse_energy_difference(&reco, &final_truth);
    assert!((value - (1.0 / 50.0 - 1.0 / 100.0)).abs() < 1e-7);

    assert_eq!(inverse_energy_difference(&[], &final_truth), SENTINEL);
}

#[test]
fn test_inverse_pt_values_and_difference() {
    let reco = vec![mom(2.0, 0.0, 0.0), mom(0.0, 0.0, 1.0)];
    let gen = vec![mom(4.0, 0.0, 0.0)];

    let inv_reco = inverse_pt_values(&reco);
    assert_eq!(inv_reco, vec![0.5, 0.0]);

    let diff = pairwise_difference(&inv_reco, &inverse_pt_values(&gen));
    assert_eq!(diff, vec![0.25]);
}

#[test]
fn test_policy_keep_all() {
    let policy = SentinelPolicy::keep_all();
    let values = [0.01, SENTINEL, -0.02];
    assert_eq!(policy.apply(&values), values.to_vec());
}

#[test]
fn test_policy_event_scope_drops_whole_event() {
    let policy = SentinelPolicy::strict(0.1);
    assert!(policy.apply(&[0.01, SENTINEL]).is_empty());
    assert!(policy.apply(&[0.01, 0.5]).is_empty());
    assert_eq!(policy.apply(&[0.01, -0.02]), vec![0.01, -0.02]);
}

#[test]
fn test_policy_value_scope() {
    let policy = SentinelPolicy {
        include_sentinels: false,
        bound: None,
        scope: FilterScope::Value,
    };
    assert_eq!(policy.apply(&[0.01, SENTINEL, 3.0]), vec![0.01, 3.0]);
}

proptest! {
    #[test]
    fn prop_lookup_strategies_agree(
        momenta in prop::collection::vec((-3i8..3, -3i8..3, -3i8..3), 1..24),
        picks in prop::collection::vec(0usize..24, 0..16),
        truth_map in prop::collection::vec(-1i32..30, 24),
    ) {
        let full: Vec<ParticleRecord> = momenta
            .iter()
            .map(|&(x, y, z)| mom(x as f32, y as f32, z as f32))
            .collect();
        let selected: Vec<ParticleRecord> = picks
            .iter()
            .map(|&i| full.get(i).copied().unwrap_or_else(|| mom(100.0, 0.0, 0.0)))
            .collect();
        let reco_idx: Vec<i32> = (0..full.len() as i32).collect();
        let truth_idx: Vec<i32> = truth_map[..full.len()].to_vec();
        let assoc = AssociationIndex::from_columns(&reco_idx, &truth_idx).unwrap();
        let truth: Vec<ParticleRecord> = (0..20).map(|i| mom(1.0 + i as f32, 0.5, 2.0)).collect();

        for quantity in Quantity::ALL {
            let linear = extract_with(PositionLookup::LinearScan, &selected, &full, &assoc, &truth, quantity);
            let hashed = extract_with(PositionLookup::Hashed, &selected, &full, &assoc, &truth, quantity);
            prop_assert_eq!(linear.len(), selected.len());
            for (a, b) in linear.iter().zip(&hashed) {
                prop_assert_eq!(a.to_bits(), b.to_bits());
            }
        }
    }

    #[test]
    fn prop_degenerate_truth_is_always_sentinel(
        reco in (0.5f32..50.0, 0.5f32..50.0, -50.0f32..50.0),
        truth_z in -50.0f32..50.0,
    ) {
        let full = vec![mom(reco.0, reco.1, reco.2)];
        let truth = vec![mom(0.0, 0.0, truth_z)];
        let assoc = AssociationIndex::from_columns(&[0], &[0]).unwrap();

        for quantity in [Quantity::Pt, Quantity::InvPt] {
            let values = extract(&full, &full, &assoc, &truth, quantity);
            prop_assert_eq!(values, vec![SENTINEL]);
        }
    }
}
