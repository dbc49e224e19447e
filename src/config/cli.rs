use crate::config::toml_config::PlacerConfig;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "sleeve-placer")]
#[command(about = "Places sleeves where linked conduits pass through walls and floors")]
pub struct CliConfig {
    /// Model snapshot (JSON) to place sleeves into
    #[arg(short, long)]
    pub model: String,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, default_value = "./output")]
    pub output_dir: String,

    /// Override the clearance added to each conduit diameter (mm)
    #[arg(long)]
    pub clearance_mm: Option<f64>,

    /// Override recognition of sleeves placed by an earlier run
    #[arg(long)]
    pub skip_existing: Option<bool>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    pub monitor: Option<bool>,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    /// Dry run - show what would be placed without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

impl CliConfig {
    /// 載入 TOML 配置 (若有指定) 並套用命令列覆蓋設定
    pub fn resolve(&self) -> Result<PlacerConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                PlacerConfig::from_file(path)?
            }
            None => PlacerConfig::default(),
        };

        if let Some(clearance) = self.clearance_mm {
            config.placement.clearance_mm = clearance;
            tracing::info!("🔧 Clearance overridden to: {} mm", clearance);
        }
        if let Some(skip) = self.skip_existing {
            config.placement.skip_existing = skip;
            tracing::info!("🔧 Skip existing overridden to: {}", skip);
        }
        if let Some(monitor) = self.monitor {
            config.monitoring.enabled = monitor;
        }

        Ok(config)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("model", &self.model)?;
        validation::validate_file_extension("model", &self.model, &["json"])?;
        validation::validate_path("output_dir", &self.output_dir)?;

        if let Some(config) = &self.config {
            validation::validate_file_extension("config", config, &["toml"])?;
        }
        if let Some(clearance) = self.clearance_mm {
            validation::validate_non_negative("clearance_mm", clearance)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::ConfigProvider;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_minimal_arguments() {
        let cli = CliConfig::try_parse_from(["sleeve-placer", "--model", "model.json"]).unwrap();

        assert_eq!(cli.model, "model.json");
        assert_eq!(cli.output_dir, "./output");
        assert!(cli.config.is_none());
        assert!(!cli.dry_run);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_overrides_apply_to_defaults() {
        let cli = CliConfig::try_parse_from([
            "sleeve-placer",
            "--model",
            "model.json",
            "--clearance-mm",
            "50",
            "--skip-existing",
            "false",
            "--monitor",
            "true",
        ])
        .unwrap();

        let config = cli.resolve().unwrap();

        assert_relative_eq!(config.clearance(), 50.0 / 304.8);
        assert!(!config.skip_existing());
        assert!(config.monitoring_enabled());
    }

    #[test]
    fn test_validation_rejects_bad_inputs() {
        let wrong_model = CliConfig::try_parse_from(["sleeve-placer", "--model", "model.rvt"]).unwrap();
        assert!(wrong_model.validate().is_err());

        let negative = CliConfig::try_parse_from([
            "sleeve-placer",
            "--model",
            "model.json",
            "--clearance-mm=-5",
        ])
        .unwrap();
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_model_is_required() {
        assert!(CliConfig::try_parse_from(["sleeve-placer"]).is_err());
    }
}
