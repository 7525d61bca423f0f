// src/banner.rs

/// Prints the application startup banner to the console.
pub fn print_banner() {
    let banner = r#"
 ____  ____    _      ____        _
|  _ \/ ___|  / \    / ___|  ___ | |_   _____ _ __
| | | \___ \ / _ \   \___ \ / _ \| \ \ / / _ \ '__|
| |_| |___) / ___ \   ___) | (_) | |\ V /  __/ |
|____/|____/_/   \_\ |____/ \___/|_| \_/ \___|_|

    AI-Powered Problem Solver
"#;
    println!("{}", banner);
}
