use std::path::PathBuf;

fn main() {
    let mut args = std::env::args().skip(1);
    let mut db_path: Option<PathBuf> = None;
    let mut log_dir: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--file" | "-f" => {
                db_path = args.next().map(PathBuf::from);
                if db_path.is_none() {
                    eprintln!("Error: --file requires a path argument");
                    std::process::exit(1);
                }
            }
            "--log-dir" => {
                log_dir = args.next().map(PathBuf::from);
                if log_dir.is_none() {
                    eprintln!("Error: --log-dir requires a path argument");
                    std::process::exit(1);
                }
            }
            "--help" | "-h" => {
                println!("kintree - family tree manager");
                println!();
                println!("Usage: kintree [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -f, --file <PATH>      Database file path (default: .data/kintree.db)");
                println!("      --log-dir <PATH>   Write logs to this directory instead of stderr");
                println!("  -h, --help             Show this help");
                return;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("Use --help for usage information.");
                std::process::exit(1);
            }
        }
    }

    // Keep the handle alive for the life of the process.
    let _logger = init_logging(log_dir.as_deref());

    let db_path = db_path.unwrap_or_else(|| {
        let dir = PathBuf::from(".data");
        if !dir.exists() {
            if let Err(e) = std::fs::create_dir_all(&dir) {
                eprintln!("Error: failed to create .data directory: {}", e);
                std::process::exit(1);
            }
        }
        dir.join("kintree.db")
    });

    kintree::cli::run(&db_path);
}

fn init_logging(log_dir: Option<&std::path::Path>) -> Option<flexi_logger::LoggerHandle> {
    let builder = match flexi_logger::Logger::try_with_env_or_str("info") {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Warning: logging disabled: {}", e);
            return None;
        }
    };

    let result = match log_dir {
        Some(dir) => builder
            .log_to_file(flexi_logger::FileSpec::default().directory(dir))
            .start(),
        None => builder.start(),
    };

    match result {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("Warning: logging disabled: {}", e);
            None
        }
    }
}
