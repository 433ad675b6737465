mod aggregate;
mod db;
mod insights;
mod models;
mod recurring;
mod run;
mod util;

use anyhow::{Context, Result};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let db_path = get_db_path()?;
    let mut db = db::Database::open(&db_path)?;
    let user_id = ensure_default_profile(&db)?;

    match args.len() {
        1 => {
            run::as_cli(
                &["finsight".into(), "--help".into()],
                &mut db,
                user_id,
            )
        }
        2.. => run::as_cli(&args, &mut db, user_id),
        _ => {
            eprintln!("Usage: finsight <command>");
            Ok(())
        }
    }
}

fn ensure_default_profile(db: &db::Database) -> Result<i64> {
    let profiles = db.get_profiles()?;
    if let Some(first) = profiles.first() {
        return first
            .id
            .ok_or_else(|| anyhow::anyhow!("Profile has no ID"));
    }
    db.insert_profile(&models::Profile::new("Default".into()))
}

fn get_db_path() -> Result<std::path::PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "finsight", "Finsight")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("finsight.db"))
}
