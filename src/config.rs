use crate::storage::{BackendLocal, StorageManager};
use homedir::my_home;
use serde::{Deserialize, Serialize};

const DEFAULT_BATCH_SIZE: usize = 10;
const DEFAULT_IMPORT_LIMIT: usize = 50;
const DEFAULT_ENDPOINT: &str = "http://localhost:8321/v1/classify";

/// Classification service endpoint settings. The API key is not stored here,
/// it comes from the MARKSIFT_API_KEY env var.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Optional model hint forwarded to the service as a query parameter
    #[serde(default)]
    pub model: Option<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: None,
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Entries sent to the classifier per request
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Records accepted per import; the rest are dropped with a warning
    #[serde(default = "default_import_limit")]
    pub import_limit: usize,

    #[serde(default)]
    pub classifier: ClassifierConfig,

    #[serde(skip_serializing, skip_deserializing)]
    base_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            import_limit: DEFAULT_IMPORT_LIMIT,
            classifier: ClassifierConfig::default(),
            base_path: String::new(),
        }
    }
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_import_limit() -> usize {
    DEFAULT_IMPORT_LIMIT
}

pub fn base_path() -> String {
    std::env::var("MARKSIFT_BASE_PATH").unwrap_or(format!(
        "{}/.local/share/marksift",
        my_home()
            .expect("couldnt find home dir")
            .expect("couldnt find home dir")
            .to_string_lossy()
    ))
}

impl Config {
    fn validate(&self) {
        if self.batch_size == 0 {
            panic!("batch_size must be greater than 0");
        }

        if self.import_limit == 0 {
            panic!("import_limit must be greater than 0");
        }

        if self.classifier.endpoint.trim().is_empty() {
            panic!("classifier.endpoint must not be empty");
        }
    }

    pub fn load_with(base_path: &str) -> Self {
        let store = BackendLocal::new(base_path).expect("cannot create the config directory");

        // create new if does not exist
        if !store.exists("config.yaml") {
            if let Err(err) = store.write(
                "config.yaml",
                serde_yml::to_string(&Self::default()).unwrap().as_bytes(),
            ) {
                log::warn!("failed to write default config: {err}");
            }
        }

        let config_str = String::from_utf8(store.read("config.yaml").expect("config unreadable"))
            .expect("config file is not valid utf8");
        let mut config: Self = serde_yml::from_str(&config_str).expect("config is malformed");

        config.base_path = base_path.to_string();

        config.validate();

        // resave in case config version needs an upgrade
        if config_str != serde_yml::to_string(&config).unwrap() {
            config.save();
        }

        config
    }

    pub fn save(&self) {
        let store = match BackendLocal::new(&self.base_path) {
            Ok(store) => store,
            Err(err) => {
                log::warn!("cannot open config directory: {err}");
                return;
            }
        };

        let config_str = serde_yml::to_string(&self).unwrap();
        if let Err(err) = store.write("config.yaml", config_str.as_bytes()) {
            log::warn!("failed to save config: {err}");
        }
    }
}
