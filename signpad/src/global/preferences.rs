const DOCUMENTATION: &str = r#"# Signpad preferences. You may edit this file, but be aware that formatting and comments will not
# be preserved.

# canvas_width, canvas_height: size of the drawing surface in pixels.
# cache_dir: where exported images are staged before import. Defaults to the system cache directory.
# gallery_dir: the "photo library" images are imported into. Defaults to the system pictures directory.
# media_permission: "grant", "deny", or "ask" to be prompted on the terminal for every save.
# log_level: one of "off", "error", "warn", "info", "debug", "trace".

"#;

#[must_use]
pub fn preferences_dir() -> Option<std::path::PathBuf> {
    let mut base_dir = dirs::preference_dir()?;
    base_dir.push(env!("CARGO_PKG_NAME"));
    Some(base_dir)
}

/// How the desktop host answers media library permission requests.
#[derive(Copy, Clone, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionPolicy {
    Grant,
    Deny,
    Ask,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Settings {
    pub canvas_width: u32,
    pub canvas_height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<std::path::PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gallery_dir: Option<std::path::PathBuf>,
    pub media_permission: PermissionPolicy,
    pub log_level: log::LevelFilter,
}
impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_width: 1080,
            canvas_height: 1920,
            cache_dir: None,
            gallery_dir: None,
            media_permission: PermissionPolicy::Grant,
            log_level: log::LevelFilter::Info,
        }
    }
}

pub struct Preferences {
    load_error: Option<String>,
    pub settings: Settings,
}
impl Preferences {
    const FILENAME: &'static str = "preferences.toml";
    /// Shared global preferences, loaded from the user's preference directory.
    /// (Or defaulted, if unavailable for some reason)
    #[must_use]
    pub fn get() -> &'static Self {
        static GLOBAL_PREFERENCES: std::sync::OnceLock<Preferences> = std::sync::OnceLock::new();

        GLOBAL_PREFERENCES.get_or_init(|| {
            let mut dir = preferences_dir();
            match dir.as_mut() {
                None => Self::no_path("no preferences directory"),
                Some(dir) => {
                    dir.push(Self::FILENAME);
                    Self::load_or_default(dir)
                }
            }
        })
    }
    // Logging isn't up yet when this runs, so the reason is kept for later.
    #[must_use]
    fn no_path(reason: impl Into<String>) -> Self {
        Self {
            load_error: Some(reason.into()),
            settings: Settings::default(),
        }
    }
    #[must_use]
    fn load_or_default(path: &std::path::Path) -> Self {
        let settings: anyhow::Result<Settings> = try_block::try_block! {
            let string = std::fs::read_to_string(path)?;
            Ok(Self::parse(&string)?)
        };

        match settings {
            Ok(settings) => Self {
                load_error: None,
                settings,
            },
            Err(e) => Self::no_path(format!("{path:?}: {e:#}")),
        }
    }
    pub fn parse(string: &str) -> Result<Settings, toml::de::Error> {
        toml::from_str(string)
    }
    /// Why loading the user's settings failed, if it did. This can be useful for
    /// displaying a warning.
    #[must_use]
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }
    pub fn save(&self) -> anyhow::Result<()> {
        let mut preferences =
            preferences_dir().ok_or_else(|| anyhow::anyhow!("No preferences dir found"))?;
        // Explicity do *not* create recursively. If not found, the user probably has a good reason.
        // Ignore errors (could already exist). Any real errors will be emitted by file access below.
        let _ = std::fs::DirBuilder::new().create(&preferences);

        preferences.push(Self::FILENAME);
        let mut string = toml::ser::to_string_pretty(&self.settings)?;
        // Prefix some documentation.
        string = DOCUMENTATION.to_owned() + &string;
        std::fs::write(preferences, string)?;
        Ok(())
    }
}
