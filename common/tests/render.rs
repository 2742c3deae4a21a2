use std::fs;

use common::{
    config::Settings,
    plot::{COMPARISON_FILENAME, PlotOutcome, SCALABILITY_FILENAME, default_plots, render_plots},
    result::{LoadError, load_results},
};

const RESULTS: &str = "\
2024-05-02T10:11:12+00:00
Running ./build/benchmarks/bitonic_benchmarks
Run on (8 X 3600 MHz CPU s)
name,iterations,real_time,cpu_time,time_unit,bytes_per_second,items_per_second,label,error_occurred,error_message,threads
\"BM_PlainBitonicSort/64\",250000,2810.1,2805.3,ns,,,,,,
\"BM_PlainBitonicSort/128\",100000,6432.9,6430.2,ns,,,,,,
\"BM_PlainBitonicSort/256\",50000,14.6,14.59,us,,,,,,
\"BM_PlainBitonicSort_BigO\",,,0.74,,,,,,,
\"BM_StdThreadBitonicSort/64/1\",10000,61000,12000,ns,,,,,,1
\"BM_StdThreadBitonicSort/64/2\",10000,65000,18000,ns,,,,,,2
\"BM_StdThreadBitonicSort/256/1\",10000,95000,30000,ns,,,,,,1
\"BM_StdThreadBitonicSort/256/2\",10000,80000,41000,ns,,,,,,2
\"BM_SIMDBitonicSort/64\",500000,1200.4,1199.9,ns,,,,,,
\"BM_SIMDBitonicSort/128\",0,0,0,ns,,,,true,\"allocation failed\",
";

fn settings(dir: &std::path::Path) -> Settings {
    Settings {
        input: dir.join("performance_results.csv"),
        output_dir: dir.join("figures"),
        ..Settings::default()
    }
}

#[test]
fn writes_both_charts() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(dir.path());
    fs::write(&settings.input, RESULTS).unwrap();

    let records = load_results(&settings.input, &settings.threaded_variant).unwrap();
    assert_eq!(records.len(), 8);

    let outcomes = render_plots(&default_plots(), &records, &settings).unwrap();
    assert_eq!(
        outcomes,
        vec![
            PlotOutcome::Written(settings.output_dir.join(COMPARISON_FILENAME)),
            PlotOutcome::Written(settings.output_dir.join(SCALABILITY_FILENAME)),
        ]
    );

    let comparison = fs::read_to_string(settings.output_dir.join(COMPARISON_FILENAME)).unwrap();
    assert!(comparison.starts_with("<svg"));
    assert!(comparison.contains("StdThread (2 thr)"));
    let scalability = fs::read_to_string(settings.output_dir.join(SCALABILITY_FILENAME)).unwrap();
    assert!(scalability.contains("StdThread Scalability (N=256)"));
}

#[test]
fn scalability_skipped_without_threaded_variant() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(dir.path());
    let plain_only = RESULTS
        .lines()
        .filter(|line| !line.contains("StdThread"))
        .collect::<Vec<_>>()
        .join("\n");
    fs::write(&settings.input, plain_only).unwrap();

    let records = load_results(&settings.input, &settings.threaded_variant).unwrap();
    let outcomes = render_plots(&default_plots(), &records, &settings).unwrap();
    assert!(matches!(outcomes[0], PlotOutcome::Written(_)));
    assert!(matches!(outcomes[1], PlotOutcome::Skipped(_)));
    assert!(!settings.output_dir.join(SCALABILITY_FILENAME).exists());
}

#[test]
fn missing_file_is_recoverable() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_results(&dir.path().join("absent.csv"), "StdThread").unwrap_err();
    assert!(matches!(err, LoadError::NotFound(_)));
    assert!(err.is_recoverable());
}

#[test]
fn header_only_file_has_no_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    fs::write(&path, "name,iterations,real_time,cpu_time,time_unit\n").unwrap();
    let err = load_results(&path, "StdThread").unwrap_err();
    assert!(matches!(err, LoadError::NoData(_)));
}
