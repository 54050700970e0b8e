use std::io::Write;
use std::path::Path;

use crate::cli::output;
use crate::config::app_config::DEFAULT_CONFIG;
use crate::core::errors::{GearlogError, Result};
use crate::core::models::target::TargetType;

/// Execute the `gearlog init` command.
///
/// Creates the workspace directory with a default `config.toml`, an empty
/// audit log and one empty collection file per entity kind.
pub fn execute(verbose: bool) -> Result<()> {
    let gearlog_dir = crate::cli::context::gearlog_dir();

    if gearlog_dir.join("config.toml").exists() {
        return Err(GearlogError::InvalidConfig {
            detail: format!(
                "gearlog is already initialized ({} exists)",
                gearlog_dir.display()
            ),
        });
    }

    output::header("gearlog: initializing workspace");

    let data_dir = gearlog_dir.join("data");
    std::fs::create_dir_all(&data_dir)?;
    output::success(&format!("Created {}", gearlog_dir.display()));

    std::fs::write(gearlog_dir.join("config.toml"), DEFAULT_CONFIG)?;
    output::success("Generated config.toml with defaults");

    std::fs::write(gearlog_dir.join("audit.log"), "")?;
    for kind in TargetType::ALL {
        let path = data_dir.join(format!("{}.json", kind.collection()));
        if !path.exists() {
            std::fs::write(&path, "{}\n")?;
        }
    }
    output::success("Created empty equipment and defect collections");

    add_to_gitignore(gearlog_dir)?;

    output::success("Workspace ready.\n");
    print_next_steps(gearlog_dir, verbose);

    Ok(())
}

/// Keep the workspace out of version control unless the user opts in.
fn add_to_gitignore(gearlog_dir: &Path) -> Result<()> {
    let gitignore = Path::new(".gitignore");
    if !gitignore.exists() {
        return Ok(());
    }

    let entry = format!("{}/data/", gearlog_dir.display());
    let content = std::fs::read_to_string(gitignore)?;
    if content.lines().any(|l| l.trim() == entry) {
        return Ok(());
    }
    let mut file = std::fs::OpenOptions::new().append(true).open(gitignore)?;
    writeln!(file, "\n# gearlog: local catalog data\n{entry}")?;
    output::success(&format!("Added {entry} to .gitignore"));
    Ok(())
}

fn print_next_steps(gearlog_dir: &Path, verbose: bool) {
    println!("  Next steps:");
    println!("     1. gearlog add equipment E1 --set name=\"Tent A\"");
    println!("     2. gearlog log");
    println!("     3. gearlog restore <log-id> to undo a change");

    if verbose {
        let dir = gearlog_dir.display();
        println!();
        println!("  Files created:");
        println!("     {dir}/config.toml           workspace configuration");
        println!("     {dir}/audit.log             change history (JSON lines)");
        println!("     {dir}/data/equipment.json   equipment records");
        println!("     {dir}/data/defects.json     defect records");
    }
}
