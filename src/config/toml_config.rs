use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, SleeveError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Length unit the host model's geometry is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LengthUnit {
    #[default]
    Feet,
    Meters,
    Millimeters,
}

impl LengthUnit {
    pub fn millimeters_per_unit(self) -> f64 {
        match self {
            LengthUnit::Feet => 304.8,
            LengthUnit::Meters => 1000.0,
            LengthUnit::Millimeters => 1.0,
        }
    }

    pub fn millimeters_to_model(self, value: f64) -> f64 {
        value / self.millimeters_per_unit()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacerConfig {
    pub families: FamiliesConfig,
    pub parameters: ParametersConfig,
    pub placement: PlacementConfig,
    pub monitoring: MonitoringConfig,
    pub output: OutputConfig,
}

/// Sleeve family variant names, looked up in the host document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FamiliesConfig {
    pub wall: String,
    pub floor: String,
}

impl Default for FamiliesConfig {
    fn default() -> Self {
        Self {
            wall: "00_Гильза".to_string(),
            floor: "00_Гильза".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParametersConfig {
    pub diameter: String,
    pub source_id: String,
    pub position: String,
}

impl Default for ParametersConfig {
    fn default() -> Self {
        Self {
            diameter: "Диаметр".to_string(),
            source_id: "ConduitId".to_string(),
            position: "XYZ".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Added to every conduit's outer diameter, in millimetres.
    pub clearance_mm: f64,
    pub model_unit: LengthUnit,
    pub skip_existing: bool,
    /// Distance in model units under which an existing sleeve counts as the same one.
    pub existing_tolerance: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            clearance_mm: 100.0,
            model_unit: LengthUnit::Feet,
            skip_existing: true,
            existing_tolerance: 1e-6,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub report_file: String,
    pub summary_file: String,
    /// Model snapshot with the new sleeves, relative to the output directory.
    pub snapshot_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_file: "placed_sleeves.csv".to_string(),
            summary_file: "summary.json".to_string(),
            snapshot_file: "model.placed.json".to_string(),
        }
    }
}

impl PlacerConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SleeveError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SleeveError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SLEEVE_FAMILY})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        // 使用正規表達式匹配 ${VAR_NAME} 格式
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SleeveError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("families.wall", &self.families.wall)?;
        validation::validate_non_empty_string("families.floor", &self.families.floor)?;

        validation::validate_non_empty_string("parameters.diameter", &self.parameters.diameter)?;
        validation::validate_non_empty_string("parameters.source_id", &self.parameters.source_id)?;
        validation::validate_non_empty_string("parameters.position", &self.parameters.position)?;
        validation::validate_distinct(
            "parameters",
            &[
                self.parameters.diameter.as_str(),
                self.parameters.source_id.as_str(),
                self.parameters.position.as_str(),
            ],
        )?;

        validation::validate_non_negative("placement.clearance_mm", self.placement.clearance_mm)?;
        validation::validate_range("placement.clearance_mm", self.placement.clearance_mm, 0.0, 1000.0)?;
        validation::validate_non_negative(
            "placement.existing_tolerance",
            self.placement.existing_tolerance,
        )?;

        validation::validate_path("output.report_file", &self.output.report_file)?;
        validation::validate_file_extension("output.report_file", &self.output.report_file, &["csv"])?;
        validation::validate_path("output.summary_file", &self.output.summary_file)?;
        validation::validate_file_extension("output.summary_file", &self.output.summary_file, &["json"])?;
        validation::validate_path("output.snapshot_file", &self.output.snapshot_file)?;
        validation::validate_file_extension(
            "output.snapshot_file",
            &self.output.snapshot_file,
            &["json"],
        )?;

        Ok(())
    }

    /// 取得監控設定
    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.enabled
    }
}

impl ConfigProvider for PlacerConfig {
    fn wall_variant(&self) -> &str {
        &self.families.wall
    }

    fn floor_variant(&self) -> &str {
        &self.families.floor
    }

    fn diameter_parameter(&self) -> &str {
        &self.parameters.diameter
    }

    fn source_id_parameter(&self) -> &str {
        &self.parameters.source_id
    }

    fn position_parameter(&self) -> &str {
        &self.parameters.position
    }

    fn clearance(&self) -> f64 {
        self.placement
            .model_unit
            .millimeters_to_model(self.placement.clearance_mm)
    }

    fn skip_existing(&self) -> bool {
        self.placement.skip_existing
    }

    fn existing_tolerance(&self) -> f64 {
        self.placement.existing_tolerance
    }
}

impl Validate for PlacerConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
