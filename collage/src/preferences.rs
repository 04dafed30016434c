use collage_core::state::{
    transform::{ManipulationModes, ScalePolicy},
    ActivationBehavior, CanvasSettings,
};

const DOCUMENTATION: &str = r#"# Collage preferences. You may edit this file, but be aware that formatting and comments will not
# be preserved, and all keys and values are case sensitive.

# canvas_size = [width, height] in logical pixels. Photos outside of it are clipped from saves.
# dpi = [horizontal, vertical], recorded in saved PNGs.
# activation = "bring_to_front" | "delete", what double tapping a photo does.
# scale_policy = "unbounded" | "reject_non_positive", whether a pinch may collapse or flip a photo.
# manipulation_modes = any of "TRANSLATE_X", "TRANSLATE_Y", "ROTATE", "SCALE", "TRANSLATE_INERTIA".

"#;

#[must_use]
pub fn preferences_dir() -> Option<std::path::PathBuf> {
    let mut base_dir = dirs::preference_dir()?;
    base_dir.push(env!("CARGO_PKG_NAME"));
    Some(base_dir)
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Preferences {
    pub canvas_size: [u32; 2],
    pub dpi: [f32; 2],
    pub activation: String,
    pub scale_policy: String,
    pub manipulation_modes: Vec<String>,
}
impl Default for Preferences {
    fn default() -> Self {
        let defaults = CanvasSettings::default();
        Self {
            canvas_size: defaults.size,
            dpi: defaults.dpi,
            activation: defaults.activation.to_string(),
            scale_policy: defaults.scale_policy.to_string(),
            manipulation_modes: defaults
                .modes
                .iter_names()
                .map(|(name, _)| name.to_owned())
                .collect(),
        }
    }
}
impl Preferences {
    const FILENAME: &'static str = "preferences.toml";
    /// Load the user's preferences, or defaults if unavailable for some reason.
    #[must_use]
    pub fn load() -> Self {
        match preferences_dir() {
            None => {
                log::warn!("No preferences dir found, defaulting.");
                Self::default()
            }
            Some(mut path) => {
                path.push(Self::FILENAME);
                Self::load_or_default(&path)
            }
        }
    }
    #[must_use]
    fn load_or_default(path: &std::path::Path) -> Self {
        let preferences: anyhow::Result<Self> = try_block::try_block! {
            let string = std::fs::read_to_string(path)?;
            Ok(Self::from_toml(&string)?)
        };

        preferences.unwrap_or_else(|e| {
            log::warn!("Preferences at {path:?} weren't available, defaulting: {e}");
            Self::default()
        })
    }
    /// # Errors
    /// Malformed TOML, or values of the wrong type.
    pub fn from_toml(string: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(string)
    }
    pub fn save(&self) -> anyhow::Result<()> {
        let mut preferences =
            preferences_dir().ok_or_else(|| anyhow::anyhow!("No preferences dir found"))?;
        // Not recursive. If the parent is missing, the user probably has a good reason.
        // Already existing is fine, real errors surface on the write below.
        let _ = std::fs::DirBuilder::new().create(&preferences);

        preferences.push(Self::FILENAME);
        let string = DOCUMENTATION.to_owned() + &toml::ser::to_string_pretty(self)?;
        std::fs::write(preferences, string)?;
        Ok(())
    }
    /// Interpret into canvas settings. Unrecognized values are warned about and defaulted.
    #[must_use]
    pub fn canvas_settings(&self) -> CanvasSettings {
        let defaults = CanvasSettings::default();

        let activation = self
            .activation
            .parse::<ActivationBehavior>()
            .unwrap_or_else(|_| {
                log::warn!("Unknown activation {:?}", self.activation);
                defaults.activation
            });
        let scale_policy = self
            .scale_policy
            .parse::<ScalePolicy>()
            .unwrap_or_else(|_| {
                log::warn!("Unknown scale policy {:?}", self.scale_policy);
                defaults.scale_policy
            });
        let modes = self
            .manipulation_modes
            .iter()
            .filter_map(|name| {
                let mode = ManipulationModes::from_name(name);
                if mode.is_none() {
                    log::warn!("Unknown manipulation mode {name:?}");
                }
                mode
            })
            .fold(ManipulationModes::empty(), |acc, mode| acc | mode);

        CanvasSettings {
            size: self.canvas_size,
            dpi: self.dpi,
            activation,
            scale_policy,
            modes,
        }
    }
}
