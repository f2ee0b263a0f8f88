use std::path::PathBuf;

pub fn default_styles() -> String {
    "src/public/styles/**/*".to_string()
}

pub fn default_style_bundle() -> String {
    "weel.css".to_string()
}

pub fn default_scripts() -> String {
    "src/public/javascript/**/*".to_string()
}

pub fn default_script_bundle() -> String {
    "weel.js".to_string()
}

pub fn default_pages() -> String {
    "index.html".to_string()
}

pub fn default_dist() -> PathBuf {
    PathBuf::from("dist")
}

pub fn default_readme() -> Option<PathBuf> {
    Some(PathBuf::from("README.md"))
}

pub fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

pub fn default_server_port() -> u16 {
    8080
}

pub fn default_livereload_host() -> String {
    "127.0.0.1".to_string()
}

pub fn default_livereload_port() -> u16 {
    35729
}

pub fn default_debounce_ms() -> u64 {
    100 // same-path events inside this window are dropped
}

pub fn default_watch_ignore() -> Vec<String> {
    vec![
        "node_modules".to_string(),
        "target".to_string(),
        "*.log".to_string(),
        "*.tmp".to_string(),
    ]
}

pub fn default_lower_nesting() -> bool {
    true
}

pub fn default_test_files() -> String {
    "test/**/*.js".to_string()
}

pub fn default_test_reporter() -> String {
    "spec".to_string()
}

pub fn default_test_ui() -> String {
    "bdd".to_string()
}

pub fn default_test_command() -> String {
    "mocha".to_string()
}
