use price_series::csv_processor;
use price_series::pipeline::{Pipeline, PipelineConfig};
use price_series::progress;
use price_series::source::{self, Retrieval};

use chrono::NaiveDate;

// Two weeks of data with a duplicate and two late rows mixed in.
const PRICES: &str = "\
Date,AAPL.Open,AAPL.High,AAPL.Low,AAPL.Close,AAPL.Volume,AAPL.Adjusted,dn,mavg,up,direction
2015-02-17,127.0,129.0,126.0,128.0,100,122.0,106.0,118.0,129.0,Increasing
2015-02-17,127.0,129.0,126.0,128.0,100,122.0,106.0,118.0,129.0,Increasing
2015-02-18,128.0,130.0,127.0,129.0,300,123.0,107.0,119.0,130.0,Increasing
2015-02-16,120.0,121.0,119.0,120.0,900,115.0,100.0,110.0,120.0,Decreasing
2015-02-19,129.0,131.0,128.0,130.0,200,124.0,108.0,120.0,131.0,Increasing
2015-02-23,130.0,133.0,129.0,132.0,400,126.0,109.0,121.0,132.0,Increasing
2015-02-15,100.0,101.0,99.0,100.0,50,95.0,90.0,95.0,100.0,Decreasing
";

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn quiet_config(output: &std::path::Path) -> PipelineConfig {
    let mut config = PipelineConfig::new(output);
    config.verify = true;
    config.preview_rows = 0;
    config
}

#[test]
fn cleans_summarizes_and_writes_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("aapl.csv");
    std::fs::write(&input, PRICES).unwrap();
    let out = dir.path().join("out");
    std::fs::create_dir(&out).unwrap();

    let report = Pipeline::new(quiet_config(&out)).run(&input).unwrap();

    assert_eq!(report.retrieval, Retrieval::Direct);
    assert_eq!(report.ticker.as_deref(), Some("AAPL"));
    assert_eq!(report.loaded, 7);
    assert_eq!(report.rejected, 3);
    assert_eq!(report.accepted(), 4);

    let close = report.close.unwrap();
    assert_eq!(close.min, 128.0);
    assert_eq!(close.max, 132.0);
    assert_eq!(close.mean, 129.75);
    assert_eq!(report.mean_volume, Some(250.0));
    assert!(report.verified_ok());

    let high = report.high_volume.unwrap();
    assert_eq!(high.path, out.join("aapl.high-volume.csv"));
    assert_eq!(high.verified, Some(true));
    let written = csv_processor::read_bars_from_path(&high.path).unwrap();
    let dates: Vec<_> = written.bars.iter().map(|b| b.date).collect();
    assert_eq!(dates, vec![d(2015, 2, 18), d(2015, 2, 23)]);
    assert_eq!(written.ticker.as_deref(), Some("AAPL"));

    let weekly = report.weekly.unwrap();
    assert_eq!(weekly.rows, 2);
    assert_eq!(weekly.verified, Some(true));
    let weeks = csv_processor::read_weekly(&weekly.path).unwrap();
    assert_eq!(weeks[0].week_ending, d(2015, 2, 22));
    assert_eq!(weeks[0].close, 129.0);
    assert_eq!(weeks[0].sessions, 3);
    assert_eq!(weeks[1].week_ending, d(2015, 3, 1));
    assert_eq!(weeks[1].volume, 400.0);
}

#[test]
fn second_run_reads_from_cache() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("aapl.csv");
    std::fs::write(&input, PRICES).unwrap();
    let mut config = quiet_config(dir.path());
    config.cache_dir = Some(dir.path().join("cache"));
    let pipeline = Pipeline::new(config);

    assert_eq!(pipeline.run(&input).unwrap().retrieval, Retrieval::Fetched);
    assert_eq!(pipeline.run(&input).unwrap().retrieval, Retrieval::Cached);
}

#[test]
fn processes_several_files_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let inputs = vec![dir.path().join("a.csv"), dir.path().join("b.csv")];
    std::fs::write(&inputs[0], PRICES).unwrap();
    std::fs::write(
        &inputs[1],
        "Date,Open,High,Low,Close,Volume\n2015-02-17,1,2,0.5,1.5,100\n",
    )
    .unwrap();

    let reports = progress::process_files(&inputs, &quiet_config(dir.path())).unwrap();

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].input, inputs[0]);
    assert_eq!(reports[1].ticker, None);
    assert_eq!(reports[1].accepted(), 1);
}

#[test]
fn unreadable_file_fails_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.csv");
    std::fs::write(&input, "Date,Open\n2015-02-17,1\n").unwrap();

    let err = progress::process_files(&[input], &quiet_config(dir.path())).unwrap_err();
    assert!(err.to_string().contains("broken.csv"));
}

#[test]
fn rerun_over_shared_directory_ignores_own_outputs() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("aapl.csv"), PRICES).unwrap();
    let config = quiet_config(dir.path());

    for _ in 0..2 {
        let inputs = source::resolve_inputs(dir.path()).unwrap();
        assert_eq!(inputs, vec![dir.path().join("aapl.csv")]);
        let reports = progress::process_files(&inputs, &config).unwrap();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].verified_ok());
    }
    assert!(!dir.path().join("aapl.high-volume.high-volume.csv").exists());
}
