use anyhow::Result;
use std::env;
use taskdeck::config;

fn main() -> Result<()> {
    // --- HANDLE HELP FLAG ---
    let args: Vec<String> = env::args().collect();
    if args.len() > 1 && (args[1] == "--help" || args[1] == "-h") {
        println!("Taskdeck - local to-do dashboard for the terminal");
        println!("----------------------------------------");
        println!("Usage: taskdeck");
        println!();

        if let Ok(path) = config::Config::get_path_string() {
            println!("Configuration File: {}", path);
        } else {
            println!("Configuration Path: ~/.config/taskdeck/config.toml (Standard XDG)");
        }

        println!();
        println!("Config Options (all optional):");
        println!("  default_filter = \"Today\"          (filter selected on startup)");
        println!("  default_calendar_view = \"week\"    (day | week | month)");
        println!("  data_file = \"/path/to/tasks.json\" (snapshot location override)");
        println!();
        println!("Tasks are stored in a single JSON snapshot in the platform");
        println!("data directory (override with TASKDECK_DATA_DIR).");
        return Ok(());
    }
    // ------------------------

    taskdeck::tui::run()
}
