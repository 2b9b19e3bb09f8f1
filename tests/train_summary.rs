use clap::Parser;
use genetac::cli::commands::train::{TrainArgs, execute};
use tempfile::tempdir;

fn parse_args<I, T>(args: I) -> TrainArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    TrainArgs::parse_from(args)
}

#[test]
fn summary_is_written_as_json() {
    let tmp = tempdir().unwrap();
    let summary = tmp.path().join("summary.json");

    let args = parse_args([
        "genetac-train",
        "--mode",
        "minimax",
        "--rounds",
        "2",
        "--seed",
        "3",
        "--quiet",
        "--summary",
        summary.to_str().unwrap(),
    ]);
    execute(args).expect("training with summary should succeed");

    let contents = std::fs::read_to_string(&summary).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["mode"], "minimax");
    assert_eq!(parsed["rounds"], 2);
    assert_eq!(parsed["individuals"].as_array().unwrap().len(), 2);
    assert_eq!(parsed["individuals"][0]["wins"], 0);
    assert!(parsed["best_fitness"].is_null());
}

#[test]
fn genome_directory_is_loaded_and_saved() {
    let tmp = tempdir().unwrap();
    let genomes = tmp.path().join("genomes");

    for seed in ["1", "2"] {
        let args = parse_args([
            "genetac-train",
            "--mode",
            "self-play",
            "--individuals",
            "2",
            "--rounds",
            "3",
            "--seed",
            seed,
            "--quiet",
            "--genomes",
            genomes.to_str().unwrap(),
        ]);
        execute(args).expect("training with a genome directory should succeed");
    }

    for name in ["X0.txt", "X1.txt", "BEST.txt"] {
        let path = genomes.join(name);
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(!text.is_empty(), "{} is empty", path.display());
    }
}

#[test]
fn config_file_values_are_used() {
    let tmp = tempdir().unwrap();
    let config_path = tmp.path().join("population.json");
    std::fs::write(&config_path, r#"{ "individuals": 4, "rounds": 1 }"#).unwrap();
    let summary = tmp.path().join("summary.json");

    let args = parse_args([
        "genetac-train",
        "--mode",
        "self-play",
        "--config",
        config_path.to_str().unwrap(),
        "--quiet",
        "--summary",
        summary.to_str().unwrap(),
    ]);
    execute(args).unwrap();

    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&summary).unwrap()).unwrap();
    assert_eq!(parsed["individuals"].as_array().unwrap().len(), 4);
    assert_eq!(parsed["rounds"], 1);
}
