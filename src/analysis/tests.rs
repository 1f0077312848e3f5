use super::*;
use crate::artifact::HistogramFile;
use crate::association::AssociationTable;
use crate::events::synthetic::{generate, SyntheticConfig};
use crate::events::{EventWriter, EventWriterConfig};
use crate::resolution::{PositionLookup, SentinelPolicy, SENTINEL};

fn muon(px: f32, py: f32, pz: f32, charge: f32) -> ParticleRecord {
    ParticleRecord::from_momentum(px, py, pz)
        .with_energy((px * px + py * py + pz * pz).sqrt())
        .with_charge(charge)
}

/// Two muons, the second one without an association entry.
fn event_with_unmatched_muon() -> Event {
    Event {
        number: 1,
        reco: vec![muon(30.0, 40.0, 0.0, -1.0), muon(-30.0, -40.0, 1.0, 1.0)],
        truth: vec![
            muon(30.0, 40.0, 0.0, -1.0).with_generator_status(1),
            muon(-30.0, -40.0, 1.0, 1.0).with_generator_status(1),
        ],
        associations: AssociationTable::new(vec![0], vec![0]).unwrap(),
        muons: vec![0, 1],
    }
}

fn histogram<'a>(histograms: &'a [Histogram1D], name: &str) -> &'a Histogram1D {
    histograms.iter().find(|h| h.name() == name).unwrap()
}

#[test]
fn test_default_booking() {
    let histograms = Analysis::new(AnalysisConfig::default()).unwrap().finish();
    let names: Vec<_> = histograms.iter().map(|h| h.name().to_string()).collect();
    assert_eq!(
        names,
        vec![
            "muons_p",
            "muons_pt",
            "muons_res_p",
            "muons_res_pt",
            "muons_res_invp",
            "qq_res",
            "reco_e_tot",
            "inv_pt",
            "inv_pt_res"
        ]
    );
    assert_eq!(histogram(&histograms, "muons_res_p").n_bins(), 10_000);
}

#[test]
fn test_binning_override_and_missing_binning() {
    let mut config = AnalysisConfig {
        quantities: vec![Quantity::InvPt],
        hadronic: false,
        ..AnalysisConfig::default()
    };
    config
        .binning
        .insert("muons_res_invpt".to_string(), Binning::new(200, -0.02, 0.02));
    let histograms = Analysis::new(config).unwrap().finish();
    assert_eq!(histogram(&histograms, "muons_res_invpt").n_bins(), 200);
    assert_eq!(histograms.len(), 3);

    let mut config = AnalysisConfig::default();
    config.binning.insert("qq_res".to_string(), Binning::new(0, 0.0, 1.0));
    assert!(matches!(
        Analysis::new(config),
        Err(AnalysisError::Histogram(_))
    ));

    assert_eq!(default_binning("unknown"), None);
}

#[test]
fn test_sentinels_are_kept_by_default() {
    let mut analysis = Analysis::new(AnalysisConfig::default()).unwrap();
    analysis.process_event(&event_with_unmatched_muon());

    let stats = analysis.stats().clone();
    assert_eq!(stats.events, 1);
    assert_eq!(stats.muon_candidates, 2);
    assert_eq!(stats.resolution_values, 6);
    assert_eq!(stats.sentinels, 3);
    assert_eq!(stats.rejected, 0);

    let histograms = analysis.finish();
    let res = histogram(&histograms, "muons_res_pt");
    assert_eq!(res.entries(), 2);
    // the sentinel is clipped into the first bin
    assert_eq!(res.contents()[0], 1.0);
    assert_eq!(histogram(&histograms, "muons_p").entries(), 2);
}

#[test]
fn test_strict_policy_drops_the_event() {
    let config = AnalysisConfig {
        policy: SentinelPolicy::strict(0.1),
        ..AnalysisConfig::default()
    };
    let mut analysis = Analysis::new(config).unwrap();
    analysis.process_event(&event_with_unmatched_muon());

    assert_eq!(analysis.stats().rejected, 6);
    let histograms = analysis.finish();
    assert_eq!(histogram(&histograms, "muons_res_p").entries(), 0);
    // kinematic histograms are filled before any filtering
    assert_eq!(histogram(&histograms, "muons_pt").entries(), 2);
}

#[test]
fn test_hadronic_histograms() {
    let mut event = event_with_unmatched_muon();
    event.truth.push(ParticleRecord::from_momentum(0.0, 0.0, 0.0).with_energy(91.0).with_generator_status(2));

    let mut analysis = Analysis::new(AnalysisConfig::default()).unwrap();
    analysis.process_event(&event);
    let histograms = analysis.finish();

    let qq = histogram(&histograms, "qq_res");
    assert_eq!(qq.entries(), 1);
    // identical final-state energies give zero
    assert_eq!(qq.find_bin(0.0), qq.contents().iter().position(|&c| c == 1.0));

    let e_tot = histogram(&histograms, "reco_e_tot");
    assert_eq!(e_tot.find_bin(100.0), e_tot.contents().iter().position(|&c| c == 1.0));

    // 1/pT = 0.02 for both charged particles, at the lower edge of inv_pt
    assert_eq!(histogram(&histograms, "inv_pt").entries(), 2);
    assert_eq!(histogram(&histograms, "inv_pt_res").entries(), 2);
}

#[test]
fn test_lookup_strategies_fill_identical_histograms() {
    let events = generate(&SyntheticConfig {
        events: 100,
        ..SyntheticConfig::default()
    })
    .unwrap();

    let fill = |lookup| {
        let mut analysis = Analysis::new(AnalysisConfig {
            lookup,
            ..AnalysisConfig::default()
        })
        .unwrap();
        for event in &events {
            analysis.process_event(event);
        }
        analysis.finish()
    };

    assert_eq!(fill(PositionLookup::LinearScan), fill(PositionLookup::Hashed));
}

#[test]
fn test_run_analysis_writes_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let events_path = dir.path().join("IDEA_2T.parquet");
    let output = dir.path().join("IDEA_2T.hist.parquet");

    let events = generate(&SyntheticConfig {
        events: 300,
        ..SyntheticConfig::default()
    })
    .unwrap();
    let mut writer = EventWriter::new_file(&events_path, "synthetic", EventWriterConfig::default()).unwrap();
    writer.write_events(&events).unwrap();
    writer.finish().unwrap();

    let run = run_analysis(&[events_path.clone()], &output, &AnalysisConfig::default()).unwrap();
    assert_eq!(run.stats.events, 300);
    assert_eq!(run.artifact.histograms_written, 9);

    let file = HistogramFile::open(&output).unwrap();
    let res = file.get("muons_res_pt").unwrap();
    assert_eq!(res.entries(), run.stats.muon_candidates);
    assert_eq!(file.source(), Some(events_path.display().to_string().as_str()));
}

#[test]
fn test_run_analysis_requires_inputs() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        run_analysis(&[], &dir.path().join("out.parquet"), &AnalysisConfig::default()),
        Err(AnalysisError::NoInputs)
    ));
    assert!(matches!(
        run_analysis(
            &[dir.path().join("missing.parquet")],
            &dir.path().join("out.parquet"),
            &AnalysisConfig::default()
        ),
        Err(AnalysisError::Event(_))
    ));
}

#[test]
fn test_config_from_toml() {
    let config: AnalysisConfig = toml::from_str(
        r#"
        quantities = ["pt", "inv_pt"]
        hadronic = false
        lookup = "hashed"

        [policy]
        include_sentinels = false
        bound = 0.1
        scope = "value"

        [binning.muons_res_pt]
        n_bins = 100
        lo = -0.02
        hi = 0.02
        "#,
    )
    .unwrap();

    assert_eq!(config.quantities, vec![Quantity::Pt, Quantity::InvPt]);
    assert!(!config.hadronic);
    assert_eq!(config.lookup, PositionLookup::Hashed);
    assert!(!config.policy.accepts(SENTINEL));
    assert_eq!(config.binning_for("muons_res_pt"), Some(Binning::new(100, -0.02, 0.02)));
    assert_eq!(config.binning_for("muons_p"), Some(Binning::new(250, 0.0, 250.0)));
}
