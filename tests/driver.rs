extern crate btm_infer;
extern crate tempfile;

mod common;

use std::fs;
use std::io::Cursor;

use btm_infer::{
    infer_stream, run, ErrorClass, InferConfigBuilder, InferError, Inferencer, OutputMode, Strategy, STREAM_CHUNK,
};
use common::{two_topic_model, write_model};

const DOCS: &str = "0 1\n0\n\n5 7\n1 1 0\n1\n";

fn stream(strategy: Strategy, mode: OutputMode, input: &str) -> Result<Vec<String>, InferError> {
    let model = two_topic_model();
    let inferencer = Inferencer::new(&model, strategy);
    let mut out = Vec::new();
    let n = infer_stream(&inferencer, mode, Cursor::new(input), &mut out)?;
    let lines: Vec<String> = String::from_utf8(out).unwrap().lines().map(String::from).collect();
    assert_eq!(n, lines.len());
    Ok(lines)
}

#[test]
fn one_line_per_document() {
    for &strategy in &[Strategy::SumB, Strategy::SumW, Strategy::Mix] {
        for &mode in &[OutputMode::MaxIdx, OutputMode::Prob] {
            let lines = stream(strategy, mode, DOCS).unwrap();
            assert_eq!(lines.len(), DOCS.lines().count(), "{} {}", strategy, mode);
        }
    }
}

#[test]
fn max_idx_lines_follow_input_order() {
    let lines = stream(Strategy::SumW, OutputMode::MaxIdx, DOCS).unwrap();
    assert_eq!(lines, vec!["1", "0", "0", "0", "1", "1"]);
}

#[test]
fn prob_lines_hold_the_distribution() {
    let lines = stream(Strategy::SumW, OutputMode::Prob, DOCS).unwrap();
    let first: Vec<f64> = lines[0].split(' ').map(|v| v.parse().unwrap()).collect();
    assert_eq!(first.len(), 2);
    assert!((first[0] - 0.4747475).abs() < 1e-6);
    assert!((first[1] - 0.5252525).abs() < 1e-6);
    assert_eq!(lines[2], "0.5 0.5");
}

#[test]
fn bad_token_reports_line() {
    match stream(Strategy::SumB, OutputMode::Prob, "0 1\n0 x\n") {
        Err(InferError::ParseInt { line, position, .. }) => assert_eq!((line, position), (2, 1)),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn order_is_kept_across_chunks() {
    let n = 2 * STREAM_CHUNK + 3;
    let input: String = (0..n).map(|i| format!("{} {}\n", i % 2, i % 2)).collect();

    let lines = stream(Strategy::SumW, OutputMode::MaxIdx, &input).unwrap();
    assert_eq!(lines.len(), n);
    for (i, line) in lines.iter().enumerate() {
        assert_eq!(*line, (i % 2).to_string(), "line {}", i + 1);
    }
}

#[test]
fn bad_token_line_counts_across_chunks() {
    let mut input = "0 1\n".repeat(STREAM_CHUNK + 1);
    input.push_str("1 y\n");
    match stream(Strategy::SumW, OutputMode::Prob, &input) {
        Err(InferError::ParseInt { line, .. }) => assert_eq!(line, STREAM_CHUNK + 2),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn output_mode_names() {
    assert_eq!(OutputMode::from_name("max_idx").unwrap(), OutputMode::MaxIdx);
    assert_eq!(OutputMode::from_name("prob").unwrap(), OutputMode::Prob);
    let err = OutputMode::from_name("probs").unwrap_err();
    assert_eq!(err.class(), ErrorClass::Configuration);
}

#[test]
fn builder_defaults() {
    let config = InferConfigBuilder::new("docs.txt", "model", 20).build().unwrap();
    assert_eq!(config.strategy(), Strategy::SumB);
    assert_eq!(config.output(), OutputMode::Prob);
    assert_eq!(config.iteration(), None);
    assert!(config.output_path().ends_with("k20.pz_d"));

    assert!(matches!(
        InferConfigBuilder::new("docs.txt", "model", 0).build(),
        Err(InferError::InvalidTopicCount)
    ));
}

#[test]
fn run_writes_output_next_to_model() {
    let dir = tempfile::tempdir().unwrap();
    write_model(dir.path(), 2, ".500", "0.5 0.5\n", "0.8 0.2\n0.3 0.7\n");
    let docs = dir.path().join("docs.txt");
    fs::write(&docs, DOCS).unwrap();

    let config = InferConfigBuilder::new(&docs, dir.path(), 2)
        .strategy(Strategy::Mix)
        .output(OutputMode::MaxIdx)
        .suffix(".mix.pz_d")
        .iteration(Some(500))
        .build()
        .unwrap();

    let out_path = run(&config).unwrap();
    assert_eq!(out_path, dir.path().join("k2.mix.pz_d"));
    let written = fs::read_to_string(&out_path).unwrap();
    assert_eq!(written.lines().collect::<Vec<_>>(), vec!["1", "0", "0", "0", "1", "1"]);
}

#[test]
fn run_requires_documents() {
    let dir = tempfile::tempdir().unwrap();
    write_model(dir.path(), 2, "", "0.5 0.5\n", "0.8 0.2\n0.3 0.7\n");

    let config = InferConfigBuilder::new(dir.path().join("missing.txt"), dir.path(), 2).build().unwrap();
    let err = run(&config).unwrap_err();
    assert!(matches!(err, InferError::Open { .. }));
    assert_eq!(err.class(), ErrorClass::Io);
    assert!(!config.output_path().exists());
}
