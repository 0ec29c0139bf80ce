use std::fs;

/// Keys `Config` reads; every one must be a string in the bundled defaults.
const REQUIRED_KEYS: &[&str] = &[
    "content_dir",
    "static_dir",
    "output_dir",
    "template",
    "base_path",
];

fn main() {
    let config_path = "src/default_config.toml";
    println!("cargo:rerun-if-changed={config_path}");

    let content = fs::read_to_string(config_path).expect("Failed to read default_config.toml");
    let table = match content.parse::<toml::Table>() {
        Ok(table) => table,
        Err(e) => panic!("Invalid default_config.toml: {e}"),
    };

    for key in REQUIRED_KEYS {
        match table.get(*key) {
            Some(toml::Value::String(_)) => {}
            Some(other) => panic!(
                "default_config.toml: `{key}` must be a string, found {}",
                other.type_str()
            ),
            None => panic!("default_config.toml: missing `{key}`"),
        }
    }

    if let Some(unknown) = table.keys().find(|k| !REQUIRED_KEYS.contains(&k.as_str())) {
        panic!("default_config.toml: unknown key `{unknown}`");
    }

    let base_path = table["base_path"].as_str().unwrap_or_default();
    if !base_path.starts_with('/') {
        panic!("default_config.toml: base_path must start with `/`, got {base_path:?}");
    }
}
