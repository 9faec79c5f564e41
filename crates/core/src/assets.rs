use once_cell::sync::Lazy;
use std::path::PathBuf;

// DEFAULT_CONFIG_DIR is a fallback, as get_config_dir checks XDG_CONFIG_HOME first
static DEFAULT_CONFIG_DIR: Lazy<PathBuf> = Lazy::new(|| {
    dirs::config_dir()
        .map(|p| p.join("hubsmoke"))
        .unwrap_or_else(|| PathBuf::from("~/.config/hubsmoke"))
});

pub fn get_config_dir() -> PathBuf {
    // Check XDG_CONFIG_HOME first, then fall back to default
    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg_config_home).join("hubsmoke")
    } else {
        DEFAULT_CONFIG_DIR.clone()
    }
}

pub fn get_default_config() -> String {
    include_str!("../data/config.yml").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to serialize tests that modify the environment
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_get_config_dir_with_xdg_set() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let tmp_dir = tempfile::tempdir().unwrap();
        let xdg_config_path = tmp_dir.path();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", xdg_config_path);
        }

        let config_dir = get_config_dir();
        assert_eq!(config_dir, xdg_config_path.join("hubsmoke"));

        unsafe {
            env::remove_var("XDG_CONFIG_HOME");
        }
    }

    #[test]
    fn test_get_config_dir_without_xdg_set() {
        let _guard = ENV_MUTEX.lock().unwrap();
        unsafe {
            env::remove_var("XDG_CONFIG_HOME");
        }
        let config_dir = get_config_dir();
        let expected = dirs::config_dir()
            .map(|p| p.join("hubsmoke"))
            .unwrap_or_else(|| PathBuf::from("~/.config/hubsmoke"));
        assert_eq!(config_dir, expected);
    }

    #[test]
    fn test_get_default_config() {
        let config = get_default_config();
        assert!(!config.is_empty());
        assert!(config.contains("server:"));
        assert!(config.contains("fixtures:"));
    }
}
