use std::{env, fs, process::ExitCode, time::Instant};

use esengine::{parse, ParserConfig, SourceType};

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let mut file_path = "example.js";
    let mut source_type = SourceType::Script;
    for arg in args.iter().skip(1) {
        if arg == "--module" {
            source_type = SourceType::Module;
        } else {
            file_path = arg;
        }
    }

    let code = match read_file(file_path) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let start = Instant::now();
    let (arena, output, _interner) = match parse(&code, ParserConfig { source_type }) {
        Ok(result) => result,
        Err(diagnostic) => {
            let elapsed = start.elapsed();
            eprintln!("parse failed after {elapsed:?}:\n{diagnostic}");
            return ExitCode::FAILURE;
        }
    };
    let elapsed = start.elapsed();

    eprintln!("parsed {file_path} in {elapsed:?}");
    println!("nodes: {}", arena.len());
    println!("strict: {}", output.flags.is_strict);
    println!("top-level await: {}", output.flags.has_top_level_await);
    println!("top-level functions declared: {}", output.scope_tree.top_level.children.len());

    if let Some(module_record) = &output.module_record {
        println!("requested modules: {}", module_record.requested_modules.len());
        println!("import entries: {}", module_record.import_entries.len());
        println!(
            "export entries: {}",
            module_record.local_export_entries.len()
                + module_record.indirect_export_entries.len()
                + module_record.star_export_entries.len()
        );
    }

    ExitCode::SUCCESS
}

fn read_file(file_path: &str) -> Result<String, String> {
    eprintln!("reading file: {file_path}");
    match fs::metadata(file_path) {
        Ok(metadata) => {
            if !metadata.is_file() {
                return Err(format!("{file_path} is not a file"));
            }
        }
        Err(err) => return Err(format!("error reading {file_path}: {err}")),
    }
    fs::read_to_string(file_path).map_err(|err| format!("error reading file: {err}"))
}
