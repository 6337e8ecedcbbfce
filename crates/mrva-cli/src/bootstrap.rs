use anyhow::Context;
use mrva_config::MrvaConfig;

/// Load `.env` from the working directory, then the layered config.
pub fn load_config() -> anyhow::Result<MrvaConfig> {
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let env_path = cwd.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
    }

    MrvaConfig::load().context("failed to load mrva configuration")
}
