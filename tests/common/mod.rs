use std::fs;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use large_file_sort::config::SortConfig;
use large_file_sort::job::JobId;
use large_file_sort::sort_key::SortKey;

/// Create an isolated input/output/tmp directory layout under ./target and
/// return a config pointing at it.
pub fn setup(name: &str) -> SortConfig {
    let root = PathBuf::from("./target/job-tests")
        .join(name)
        .join(JobId::new().as_str());
    for dir in ["input", "output", "tmp"] {
        fs::create_dir_all(root.join(dir)).unwrap_or_else(|_| {
            panic!("Failed to create test directory: {:?}", root.join(dir))
        });
    }
    let mut config = SortConfig::new(root.join("input"), root.join("output"));
    config.with_tmp_dir(root.join("tmp"));
    config
}

#[allow(dead_code)]
pub fn write_input(config: &SortConfig, job_id: &JobId, lines: &[&str]) {
    let path = config.input_path(job_id);
    let mut writer = BufWriter::new(File::create(&path).unwrap());
    for line in lines {
        writeln!(writer, "{line}").unwrap();
    }
    writer.flush().unwrap();
}

#[allow(dead_code)]
pub fn read_lines(path: &PathBuf) -> Vec<String> {
    let reader = BufReader::new(File::open(path).unwrap());
    reader.lines().map(|line| line.unwrap()).collect()
}

#[allow(dead_code)]
pub fn is_sorted_by_key(lines: &[String]) -> bool {
    lines
        .windows(2)
        .all(|pair| SortKey::from_line(&pair[0]) <= SortKey::from_line(&pair[1]))
}

/// The working directory the sorter would use for a job.
#[allow(dead_code)]
pub fn work_dir(config: &SortConfig, job_id: &JobId) -> PathBuf {
    config.tmp_dir().join(job_id.as_str())
}
