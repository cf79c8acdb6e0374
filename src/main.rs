use erdgen::generate_diagrams;
use erdgen::schema::social_schema;
use std::env;
use std::fs;
use std::path::Path;
use std::process;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut out_dir = ".".to_string();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-o" | "--out-dir" => {
                i += 1;
                if i < args.len() {
                    out_dir = args[i].clone();
                }
            }
            "-h" | "--help" => {
                eprintln!("Usage: {} [options]", args[0]);
                eprintln!();
                eprintln!("Options:");
                eprintln!("  -o, --out-dir <dir>   Output directory (default: current directory)");
                process::exit(0);
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let out_dir = Path::new(&out_dir);
    if let Err(e) = fs::create_dir_all(out_dir) {
        eprintln!("Failed to create {}: {}", out_dir.display(), e);
        process::exit(1);
    }

    let schema = social_schema();
    match generate_diagrams(&schema, out_dir) {
        Ok(artifacts) => {
            for (name, artifact) in artifacts {
                println!("{}: {}", name, artifact.path.display());
            }
        }
        Err(e) => {
            eprintln!("Render failed: {}", e);
            process::exit(1);
        }
    }
}
