use std::fs;

pub fn get() -> String {
    let config_path = match std::env::var("RP_CONFIG_PATH") {
        Ok(path) => path,
        Err(_) => "config.yml".to_owned(),
    };

    if fs::metadata(&config_path).is_err() {
        rp_log::panic(
            None,
            format!("Config file {config_path} (set by RP_CONFIG_PATH, default config.yml) must exist"),
        );
    }

    config_path
}
