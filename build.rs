use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Embeds `assets/art/*.txt` (plain art) and `assets/art/*.ans` (palette-index
/// art) as `(name, contents)` tables. The name is the file stem.
fn main() {
    println!("cargo:rerun-if-changed=assets/art");

    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("art_assets.rs");
    let mut f = fs::File::create(&dest_path).unwrap();

    let art_dir = Path::new("assets").join("art");
    let mut entries: Vec<PathBuf> = if art_dir.exists() {
        fs::read_dir(&art_dir)
            .unwrap()
            .map(|res| res.unwrap().path())
            .collect()
    } else {
        Vec::new()
    };
    entries.sort();

    for (table, extension) in [("PLAIN_ART", "txt"), ("COLOR_ART", "ans")] {
        writeln!(f, "pub const {table}: &[(&str, &str)] = &[").unwrap();
        for path in entries
            .iter()
            .filter(|path| path.extension().is_some_and(|ext| ext == extension))
        {
            let name = path.file_stem().unwrap().to_string_lossy();
            let content = fs::read_to_string(path).unwrap();
            // Debug formatting yields a valid Rust string literal
            writeln!(f, "    ({:?}, {:?}),", name, content).unwrap();
        }
        writeln!(f, "];").unwrap();
    }
}
