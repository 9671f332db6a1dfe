//! kitbeat CLI: inspect a pattern against a drumkit.
//!
//! Usage:
//!   kb-cli path/to/drumkit.xml path/to/pattern.xml
//!   kb-cli path/to/drumkit.xml path/to/pattern.xml --save out.xml
//!
//! Set `RUST_LOG=debug` to see every note dumped as it is listed.

use env_logger::{Builder, Env};
use kb_formats::{load_drumkit_str, load_pattern_str, pattern_to_string, Drumkit};
use kb_ir::{Note, Pattern};
use std::{env, fs};

fn main() {
    Builder::from_env(Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let (Some(kit_path), Some(pattern_path)) = (args.get(1), args.get(2)) else {
        eprintln!("Usage: kb-cli <drumkit.xml> <pattern.xml> [--save output.xml]");
        std::process::exit(1);
    };

    let save_path = args
        .iter()
        .position(|a| a == "--save")
        .and_then(|i| args.get(i + 1))
        .cloned();

    let kit = read(kit_path, load_drumkit_str);
    let pattern = read(pattern_path, |xml| load_pattern_str(xml, &kit.instruments));

    println!("Kit:      {} ({} instruments)", kit.name, kit.instruments.len());
    println!("Pattern:  {} ({} ticks)", pattern.name, pattern.length);
    println!("Notes:    {}", pattern.len());
    println!();
    list_notes(&kit, &pattern);

    if let Some(path) = save_path {
        let xml = pattern_to_string(&pattern).unwrap_or_else(|e| {
            eprintln!("Failed to serialize pattern: {}", e);
            std::process::exit(1);
        });
        fs::write(&path, xml).unwrap_or_else(|e| {
            eprintln!("Failed to write {}: {}", path, e);
            std::process::exit(1);
        });
        log::info!("saved {}", path);
    }
}

fn read<T, E: std::fmt::Display>(path: &str, parse: impl FnOnce(&str) -> Result<T, E>) -> T {
    let xml = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Failed to read {}: {}", path, e);
        std::process::exit(1);
    });
    parse(&xml).unwrap_or_else(|e| {
        eprintln!("Failed to load {}: {}", path, e);
        std::process::exit(1);
    })
}

fn list_notes(kit: &Drumkit, pattern: &Pattern) {
    println!(
        "{:>5}  {:<16} {:>5} {:>4} {:>4} {:>6}",
        "Pos",
        "Instrument",
        "Key",
        "MIDI",
        "Vel",
        "Len"
    );
    for note in pattern.notes() {
        note.dump();
        let Some(instrument) = kit.instrument(note.instrument()) else {
            continue;
        };
        println!(
            "{:>5}  {:<16} {:>5} {:>4} {:>4} {:>6}{}",
            note.position(),
            instrument.name.as_str(),
            note.key_to_string(),
            note.midi_key(instrument),
            note.midi_velocity(),
            length_label(note),
            if note.note_off() { "  off" } else { "" },
        );
    }
}

fn length_label(note: &Note) -> String {
    match note.length() {
        -1 => String::from("full"),
        n => n.to_string(),
    }
}
