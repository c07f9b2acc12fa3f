use serde::Deserialize;

#[derive(Deserialize)]
pub struct ResourcesConfig {
    path: String,
}

impl ResourcesConfig {
    pub fn path(&self) -> &str {
        &self.path
    }
}
