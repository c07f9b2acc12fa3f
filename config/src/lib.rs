use std::fs::File;

use anyhow::Result;
use api::ApiConfig;
use backend::BackendConfig;
use log::LogConfig;
use resources::ResourcesConfig;
use serde::Deserialize;

pub mod api;
pub mod backend;
pub mod log;
pub mod resources;

#[derive(Deserialize)]
pub struct Config {
    log: LogConfig,
    api: ApiConfig,
    backend: BackendConfig,
    resources: ResourcesConfig,
}

impl Config {
    pub fn log(&self) -> &LogConfig {
        &self.log
    }

    pub fn api(&self) -> &ApiConfig {
        &self.api
    }

    pub fn backend(&self) -> &BackendConfig {
        &self.backend
    }

    pub fn resources(&self) -> &ResourcesConfig {
        &self.resources
    }
}

pub fn from_path(path: &str) -> Result<Config> {
    let file = File::open(path)?;
    Ok(serde_yaml::from_reader::<_, Config>(file)?)
}

pub fn from_yaml(contents: &str) -> Result<Config> {
    Ok(serde_yaml::from_str::<Config>(contents)?)
}
