use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use ragline_core::config::{Config, SearchConfig};
use ragline_engine::local::{HashEmbedder, MemoryStore, NullGenerator};
use ragline_engine::RagEngine;
use ragline_segment::SegmentConfig;

/// Counts from a directory ingest run.
struct IngestReport {
    documents: usize,
    chunks: usize,
}

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().collect();
    let prog = args.remove(0);
    if args.is_empty() {
        eprintln!("Usage: {} <ingest|query> [args...]", prog);
        std::process::exit(1);
    }
    let cmd = args.remove(0);
    (cmd, args)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let (cmd, args) = parse_args();
    match cmd.as_str() {
        "ingest" => {
            let data_dir = data_dir_from(&args, &config);
            let limit = args.get(1).and_then(|s| s.parse::<usize>().ok());
            println!("Ingesting from {}", data_dir.display());
            let engine = offline_engine();
            let report = ingest_directory(&engine, &data_dir, limit).await?;
            println!("✅ Ingest complete: {} files, {} chunks", report.documents, report.chunks);
        }
        "query" => {
            let query_text = args.first().cloned().unwrap_or_else(|| {
                eprintln!("Usage: ragline query \"<query>\" [data_dir]");
                std::process::exit(1)
            });
            let data_dir = data_dir_from(&args[1..], &config);
            let engine = offline_engine();
            let report = ingest_directory(&engine, &data_dir, None).await?;
            println!("Indexed {} files into {} chunks\n", report.documents, report.chunks);

            let search_config: SearchConfig = config.get("search").unwrap_or_default();
            let response = engine.search(&query_text, search_config).await?;

            if response.results.is_empty() {
                println!("No matches for '{}'", query_text);
            }
            for (i, r) in response.results.iter().enumerate() {
                let hit = &r.candidate.hit;
                let preview: String = hit.content.chars().take(110).collect();
                println!(
                    "{:>2}. [{:.3}] {}:{}  {}",
                    i + 1,
                    r.relevance,
                    hit.doc_id,
                    hit.seq,
                    preview.replace('\n', " ")
                );
            }
            match response.answer {
                Some(answer) => println!("\n💡 {}", answer),
                None => println!(
                    "\n(no synthesized answer — configure a text-generation backend to enable it)"
                ),
            }
        }
        other => {
            eprintln!("Unknown command '{}'. Expected ingest|query.", other);
            std::process::exit(1);
        }
    }
    Ok(())
}

fn offline_engine() -> RagEngine<MemoryStore> {
    RagEngine::new(
        MemoryStore::new(),
        Box::new(HashEmbedder::default()),
        Box::new(NullGenerator),
    )
}

fn data_dir_from(args: &[String], config: &Config) -> PathBuf {
    args.first().map(PathBuf::from).unwrap_or_else(|| {
        let dir: String = config
            .get("data.raw_txt_dir")
            .unwrap_or_else(|_| "./data/txt".to_string());
        ragline_core::config::expand_path(dir)
    })
}

async fn ingest_directory(
    engine: &RagEngine<MemoryStore>,
    data_dir: &Path,
    limit: Option<usize>,
) -> anyhow::Result<IngestReport> {
    let mut files = list_txt_files(data_dir);
    if let Some(n) = limit {
        files.truncate(n);
    }
    if files.is_empty() {
        println!("No .txt files found under {}.", data_dir.display());
        return Ok(IngestReport { documents: 0, chunks: 0 });
    }
    let segment_config: SegmentConfig = SegmentConfig::default();
    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} files {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    let mut total_chunks = 0usize;
    for file_path in &files {
        let content = fs::read_to_string(file_path)
            .or_else(|_| fs::read(file_path).map(|b| String::from_utf8_lossy(&b).to_string()))?;
        let doc_id = file_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "doc".to_string());
        let doc = engine.ingest(&doc_id, &content, &segment_config).await?;
        total_chunks += doc.chunk_count;
        pb.inc(1);
        pb.set_message(doc_id);
    }
    pb.finish_and_clear();
    Ok(IngestReport { documents: files.len(), chunks: total_chunks })
}

fn list_txt_files(root: &Path) -> Vec<PathBuf> {
    let mut txt_files = Vec::new();
    for entry in walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("txt") {
            txt_files.push(path.to_path_buf());
        }
    }
    txt_files.sort();
    txt_files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_txt_files_walks_subdirectories_and_skips_other_extensions() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("guides");
        fs::create_dir(&nested).expect("mkdir");
        fs::write(dir.path().join("water.txt"), "rain barrels").expect("write");
        fs::write(nested.join("garden.txt"), "seed saving").expect("write");
        fs::write(dir.path().join("notes.md"), "ignored").expect("write");

        let files = list_txt_files(dir.path());
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|p| p.extension().and_then(|s| s.to_str()) == Some("txt")));
    }

    #[tokio::test]
    async fn ingest_directory_reports_files_and_chunks() {
        let dir = tempfile::tempdir().expect("tempdir");
        let body = "Rain water can be collected from any clean roof surface and \
                    stored in covered barrels for months at a time.";
        fs::write(dir.path().join("water.txt"), body).expect("write");

        let engine = offline_engine();
        let report = ingest_directory(&engine, dir.path(), None).await.expect("ingest");
        assert_eq!(report.documents, 1);
        assert!(report.chunks >= 1);
    }

    #[tokio::test]
    async fn ingest_directory_on_an_empty_tree_is_a_noop() {
        let dir = tempfile::tempdir().expect("tempdir");
        let engine = offline_engine();
        let report = ingest_directory(&engine, dir.path(), None).await.expect("ingest");
        assert_eq!(report.documents, 0);
        assert_eq!(report.chunks, 0);
    }

    #[tokio::test]
    async fn ingest_file_limit_bounds_the_run() {
        let dir = tempfile::tempdir().expect("tempdir");
        let body = "Stored water keeps for about six months when the barrels \
                    stay dark, sealed, and out of direct sunlight all year.";
        fs::write(dir.path().join("a.txt"), body).expect("write");
        fs::write(dir.path().join("b.txt"), body).expect("write");

        let engine = offline_engine();
        let report = ingest_directory(&engine, dir.path(), Some(1)).await.expect("ingest");
        assert_eq!(report.documents, 1);
    }
}
