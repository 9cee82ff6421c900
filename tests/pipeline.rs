//! End-to-end runs with a mock predictor that returns rigidly displaced
//! windows of a known helix.

use foldit_stitch::adapters::pdb::frame_to_pdb;
use foldit_stitch::stitch::{
    LogObserver, PredictionError, StitchConfig, StitchError, StructurePipeline,
};
use foldit_stitch::types::{FrameData, PositionType};
use glam::{DMat3, DVec3};

const ALPHABET: &[u8] = b"ACDEFGHIKLMNPQRSTVWY";

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Deterministic pseudo-random sequence; long windows of it are unique.
fn random_sequence(n: usize, seed: u64) -> String {
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ALPHABET[(state >> 33) as usize % ALPHABET.len()] as char
        })
        .collect()
}

fn helix_point(i: usize) -> DVec3 {
    let t = i as f64 * 100f64.to_radians();
    DVec3::new(2.3 * t.cos(), 2.3 * t.sin(), 1.5 * i as f64)
}

/// Predicts a window by locating it in `sequence` and returning that stretch
/// of the helix, rotated and translated by an amount that depends on where
/// the window starts. Each window is centred on its own first residue, so
/// coordinates stay within PDB column widths however long the sequence is.
fn helix_predictor(
    sequence: &str,
) -> impl Fn(&str) -> Result<String, PredictionError> + Sync + '_ {
    move |window: &str| {
        let offset = sequence
            .find(window)
            .ok_or_else(|| PredictionError::new("window not in sequence"))?;
        let rotation = DMat3::from_rotation_y(offset as f64 * 0.01)
            * DMat3::from_rotation_z(0.3 + offset as f64 * 0.002);
        let shift = DVec3::new(offset as f64 * 0.1, -20.0, 5.0);

        let n = window.len();
        let frame = FrameData {
            coords: (offset..offset + n)
                .map(|i| rotation * (helix_point(i) - helix_point(offset)) + shift)
                .collect(),
            plddts: Some((0..n).map(|i| 50.0 + (i % 40) as f64).collect()),
            position_names: Some(vec!["ALA".to_string(); n]),
            chains: Some(vec!["A".to_string(); n]),
            residue_numbers: Some((1..=n as i32).collect()),
            position_types: Some(vec![PositionType::Protein; n]),
        };
        frame_to_pdb(&frame).map_err(|e| PredictionError::new(e.to_string()))
    }
}

fn assert_helix_geometry(frame: &FrameData) {
    // PDB output keeps three decimals, so allow a little rounding slack.
    for i in 1..frame.len() {
        let expected = helix_point(i).distance(helix_point(i - 1));
        let actual = frame.coords[i].distance(frame.coords[i - 1]);
        assert!(
            (expected - actual).abs() < 1e-2,
            "bond {}-{}: expected {:.3}, got {:.3}",
            i - 1,
            i,
            expected,
            actual
        );
    }
    for i in 3..frame.len() {
        let expected = helix_point(i).distance(helix_point(i - 3));
        let actual = frame.coords[i].distance(frame.coords[i - 3]);
        assert!((expected - actual).abs() < 2e-2, "i-3 distance at {}", i);
    }
}

#[test]
fn test_multi_chunk_run_restores_helix() {
    init_logging();
    let sequence = random_sequence(1000, 7);
    let predictor = helix_predictor(&sequence);

    let outcome = StructurePipeline::new(StitchConfig::new(400, 50))
        .with_observer(Box::new(LogObserver))
        .run(&sequence, &predictor)
        .unwrap();

    assert!(outcome.warnings.is_empty(), "{:?}", outcome.warnings);
    assert_eq!(outcome.frame.len(), 1000);
    assert!(outcome.frame.validate().is_ok());
    assert_helix_geometry(&outcome.frame);

    let types = outcome.frame.position_types.as_ref().unwrap();
    assert!(types.iter().all(|t| *t == PositionType::Protein));
}

#[test]
fn test_two_chunk_run_restores_helix() {
    init_logging();
    let sequence = random_sequence(500, 11);
    let predictor = helix_predictor(&sequence);

    let outcome = StructurePipeline::new(StitchConfig::new(256, 12))
        .run(&sequence, &predictor)
        .unwrap();

    assert_eq!(outcome.frame.len(), 500);
    assert_helix_geometry(&outcome.frame);
}

#[test]
fn test_short_sequence_is_single_window() {
    init_logging();
    let sequence = random_sequence(120, 3);
    let predictor = helix_predictor(&sequence);

    let outcome = StructurePipeline::new(StitchConfig::default())
        .run(&sequence, &predictor)
        .unwrap();

    assert_eq!(outcome.frame.len(), 120);
    assert_eq!(
        outcome.frame.residue_numbers.as_ref().unwrap()[119],
        120
    );
}

#[test]
fn test_predictor_failure_names_chunk() {
    init_logging();
    let sequence = random_sequence(1000, 7);
    let helix = helix_predictor(&sequence);
    let third_window = &sequence[600..];
    let predictor = |window: &str| {
        if window == third_window {
            Err(PredictionError::new("rate limited"))
        } else {
            helix(window)
        }
    };

    let err = StructurePipeline::new(StitchConfig::new(400, 50))
        .run(&sequence, &predictor)
        .unwrap_err();

    assert_eq!(
        err,
        StitchError::ChunkPredictionFailed {
            index: 2,
            reason: "Prediction failed: rate limited".to_string()
        }
    );
}

#[test]
fn test_json_payload_of_stitched_frame() {
    init_logging();
    let sequence = random_sequence(450, 5);
    let predictor = helix_predictor(&sequence);

    let outcome = StructurePipeline::new(StitchConfig::new(300, 30))
        .run(&sequence, &predictor)
        .unwrap();
    let json = outcome.frame.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["coords"].as_array().unwrap().len(), 450);
    assert_eq!(value["position_types"][0], "P");
    let plddt = value["plddts"][0].as_f64().unwrap();
    assert_eq!(plddt, plddt.round());
}
