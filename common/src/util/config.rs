use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub annealing: AnnealingConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnnealingConfig {
    /// Random swaps used to calibrate the starting temperature.
    #[serde(default = "default_warmup_samples")]
    pub warmup_samples: usize,
    /// Starting temperature is this multiple of the sample std deviation.
    #[serde(default = "default_temperature_scale")]
    pub temperature_scale: f64,
    #[serde(default = "default_cooling_schedule")]
    pub cooling_schedule: String,
    /// Multiplier for "geometric", decrement for "linear".
    #[serde(default = "default_cooling_rate")]
    pub cooling_rate: f64,
    #[serde(default = "default_min_temperature")]
    pub min_temperature: f64,
    #[serde(default = "default_max_moves")]
    pub max_moves: usize,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            warmup_samples: default_warmup_samples(),
            temperature_scale: default_temperature_scale(),
            cooling_schedule: default_cooling_schedule(),
            cooling_rate: default_cooling_rate(),
            min_temperature: default_min_temperature(),
            max_moves: default_max_moves(),
            seed: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_netlist_file")]
    pub netlist_file: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            netlist_file: default_netlist_file(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_placement_image")]
    pub placement_image: String,
    #[serde(default = "default_cost_plot")]
    pub cost_plot: String,
    #[serde(default = "default_image_size")]
    pub image_size: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            placement_image: default_placement_image(),
            cost_plot: default_cost_plot(),
            image_size: default_image_size(),
        }
    }
}

fn default_warmup_samples() -> usize {
    50
}

fn default_temperature_scale() -> f64 {
    20.0
}

fn default_cooling_schedule() -> String {
    "geometric".to_string()
}

fn default_cooling_rate() -> f64 {
    0.995
}

fn default_min_temperature() -> f64 {
    0.01
}

fn default_max_moves() -> usize {
    100_000
}

fn default_netlist_file() -> String {
    "inputs/sample.txt".to_string()
}

fn default_placement_image() -> String {
    "output/placed.png".to_string()
}

fn default_cost_plot() -> String {
    "output/cost.png".to_string()
}

fn default_image_size() -> u32 {
    1000
}
