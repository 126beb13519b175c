use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::{env, fs};

const DEFAULT_LOCALE: &str = "en-US";
const LOCALES_DIR: &str = "locales";

fn main() {
    println!("cargo:rerun-if-changed={LOCALES_DIR}");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("manifest dir"));
    let locales = read_locales(&manifest_dir.join(LOCALES_DIR));

    let mut generated = String::new();
    writeln!(generated, "pub(super) const DEFAULT_LOCALE: &str = {DEFAULT_LOCALE:?};").ok();
    writeln!(
        generated,
        "pub(super) static LOCALES: &[(&str, &[(&str, &str)])] = &["
    )
    .ok();
    for (locale, entries) in &locales {
        writeln!(generated, "    ({locale:?}, &[").ok();
        for (key, value) in entries {
            writeln!(generated, "        ({key:?}, {value:?}),").ok();
        }
        writeln!(generated, "    ]),").ok();
    }
    writeln!(generated, "];").ok();

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("out dir"));
    fs::write(out_dir.join("folio_i18n_generated.rs"), generated)
        .expect("write generated i18n table");
}

fn read_locales(dir: &Path) -> BTreeMap<String, BTreeMap<String, String>> {
    let mut locales = BTreeMap::new();
    let Ok(entries) = fs::read_dir(dir) else {
        return locales;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("toml") {
            continue;
        }
        let Some(locale) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        println!("cargo:rerun-if-changed={}", path.display());

        let raw = fs::read_to_string(&path)
            .unwrap_or_else(|error| panic!("read {}: {error}", path.display()));
        let table = raw
            .parse::<toml::Table>()
            .unwrap_or_else(|error| panic!("parse {}: {error}", path.display()));

        let mut flat = BTreeMap::new();
        flatten("", &table, &mut flat);
        locales.insert(locale.to_string(), flat);
    }
    locales
}

fn flatten(prefix: &str, table: &toml::Table, out: &mut BTreeMap<String, String>) {
    for (key, value) in table {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            toml::Value::Table(nested) => flatten(&full_key, nested, out),
            toml::Value::String(text) => {
                out.insert(full_key, text.clone());
            }
            other => panic!("locale key `{full_key}` must be a string, found {other}"),
        }
    }
}
