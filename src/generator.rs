use std::fs::File;
use std::io;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use anyhow::{anyhow, bail, Context};
use command_executor::command::Command;
use command_executor::shutdown_mode::ShutdownMode;
use command_executor::thread_pool_builder::ThreadPoolBuilder;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::job::JobId;

const QUEUE_SIZE: usize = 4096;

const BUILTIN_WORDS: &[&str] = &[
    "Apple", "Apricot", "Banana", "Blueberry", "Cherry", "Date", "Fig", "Grape",
    "Kiwi", "Lemon", "Lime", "Mango", "Melon", "Orange", "Papaya", "Peach",
    "Pear", "Pineapple", "Plum", "Raspberry", "Strawberry",
];

/// Source of the word payloads used in generated lines.
pub trait WordProvider {
    fn words(&self) -> Result<Vec<String>, anyhow::Error>;
}

/// The built-in word list.
#[derive(Debug, Default)]
pub struct BuiltinWords;

impl WordProvider for BuiltinWords {
    fn words(&self) -> Result<Vec<String>, anyhow::Error> {
        Ok(BUILTIN_WORDS.iter().map(|word| word.to_string()).collect())
    }
}

/// Word list loaded from a JSON file containing an array of strings.
#[derive(Debug)]
pub struct JsonWordFile {
    path: PathBuf,
}

impl JsonWordFile {
    pub fn new(path: PathBuf) -> JsonWordFile {
        JsonWordFile { path }
    }
}

impl WordProvider for JsonWordFile {
    fn words(&self) -> Result<Vec<String>, anyhow::Error> {
        let file = File::open(&self.path)
            .with_context(|| anyhow!("path: {}", self.path.display()))?;
        let words: Vec<String> = serde_json::from_reader(BufReader::new(file))
            .with_context(|| anyhow!("path: {}", self.path.display()))?;
        Ok(words)
    }
}

/// Produces input files for sort jobs: newline-delimited
/// `"<integer>. <word>"` records up to a requested total size.
///
/// Size-bounded pieces are generated concurrently into a staging directory
/// under the output directory, then concatenated in index order into
/// `file_<job id>.txt`. The staging directory is removed when generation
/// finishes, successfully or not.
pub struct Generator {
    output_dir: PathBuf,
    piece_size_mb: u64,
    tasks: usize,
    provider: Box<dyn WordProvider>,
}

impl Generator {
    /// Create a generator with 50 MB pieces, one task per available core
    /// and the built-in word list.
    pub fn new(output_dir: PathBuf) -> Generator {
        Generator {
            output_dir,
            piece_size_mb: 50,
            tasks: 0,
            provider: Box::new(BuiltinWords),
        }
    }

    /// Set the size in megabytes of the pieces generated in parallel.
    pub fn with_piece_size_mb(&mut self, piece_size_mb: u64) {
        self.piece_size_mb = piece_size_mb;
    }

    /// Set the number of concurrent generation tasks. Zero uses all cores.
    pub fn with_tasks(&mut self, tasks: usize) {
        self.tasks = tasks;
    }

    pub fn with_word_provider(&mut self, provider: Box<dyn WordProvider>) {
        self.provider = provider;
    }

    /// Generate `file_<job id>.txt` of approximately `size_mb` megabytes in
    /// the output directory and return its path.
    pub fn generate(&self, job_id: &JobId, size_mb: u64) -> Result<PathBuf, anyhow::Error> {
        let stopwatch = Instant::now();
        if self.piece_size_mb == 0 {
            bail!("piece size must be positive");
        }
        let words = Arc::new(self.provider.words()?);
        if words.is_empty() {
            bail!("word list is empty");
        }

        std::fs::create_dir_all(&self.output_dir)
            .with_context(|| anyhow!("path: {}", self.output_dir.display()))?;
        let staging = tempfile::Builder::new()
            .prefix("generate-")
            .tempdir_in(&self.output_dir)
            .with_context(|| anyhow!("path: {}", self.output_dir.display()))?;

        let total_bytes = size_mb * 1024 * 1024;
        let piece_bytes = self.piece_size_mb * 1024 * 1024;
        let full_pieces = total_bytes / piece_bytes;
        let last_piece_bytes = total_bytes % piece_bytes;
        let piece_count = full_pieces + u64::from(last_piece_bytes > 0);

        let tasks = if self.tasks == 0 {
            num_cpus::get()
        } else {
            self.tasks
        };
        let failures: Arc<Mutex<Vec<anyhow::Error>>> = Arc::new(Mutex::new(Vec::new()));

        log::info!("Start generating {piece_count} pieces on {tasks} tasks");
        let mut thread_pool_builder = ThreadPoolBuilder::new();
        let mut generating_pool = thread_pool_builder
            .with_name("generating".to_string())
            .with_tasks(tasks)
            .with_queue_size(QUEUE_SIZE)
            .with_shutdown_mode(ShutdownMode::CompletePending)
            .build()
            .unwrap();

        for index in 0..piece_count {
            let target_bytes = if index < full_pieces {
                piece_bytes
            } else {
                last_piece_bytes
            };
            let command = Box::new(GeneratePieceCommand {
                path: staging.path().join(format!("piece_{index}.txt")),
                target_bytes,
                words: words.clone(),
                failures: failures.clone(),
            });
            generating_pool.submit(command);
        }

        generating_pool.shutdown();
        generating_pool.join()?;
        if let Some(error) = failures.lock().unwrap().pop() {
            return Err(error);
        }

        let output_path = self.output_dir.join(format!("file_{job_id}.txt"));
        let mut output = File::create(&output_path)
            .with_context(|| anyhow!("path: {}", output_path.display()))?;
        for index in 0..piece_count {
            let piece_path = staging.path().join(format!("piece_{index}.txt"));
            let mut piece = File::open(&piece_path)
                .with_context(|| anyhow!("path: {}", piece_path.display()))?;
            io::copy(&mut piece, &mut output)?;
        }

        log::info!(
            "File {} generated in {:.2} seconds",
            job_id,
            stopwatch.elapsed().as_secs_f64()
        );
        Ok(output_path)
    }
}

struct GeneratePieceCommand {
    path: PathBuf,
    target_bytes: u64,
    words: Arc<Vec<String>>,
    failures: Arc<Mutex<Vec<anyhow::Error>>>,
}

impl GeneratePieceCommand {
    fn generate_piece(&self) -> Result<(), anyhow::Error> {
        let file = File::create(&self.path)
            .with_context(|| anyhow!("path: {}", self.path.display()))?;
        let mut writer = BufWriter::new(file);
        let mut rng = rand::thread_rng();
        let mut written_bytes: u64 = 0;

        while written_bytes < self.target_bytes {
            let number = rng.gen_range(1..10_000_000i64);
            let word = self
                .words
                .choose(&mut rng)
                .ok_or_else(|| anyhow!("word list is empty"))?;
            let line = format!("{number}. {word}");
            written_bytes += line.len() as u64 + 1;
            writeln!(writer, "{line}")?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl Command for GeneratePieceCommand {
    fn execute(&self) -> Result<(), anyhow::Error> {
        if let Err(error) = self.generate_piece() {
            log::error!("Failed to generate piece {}: {:#}", self.path.display(), error);
            self.failures.lock().unwrap().push(error);
        }
        Ok(())
    }
}
