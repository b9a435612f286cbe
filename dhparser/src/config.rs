/*!
[`ParserConfig`]: the friendlier public name for [`dhparser_parse::Config`],
an explicit value passed to each parse rather than a process-wide mutable
store, plus [`load_config`], the one place in this workspace that reads a
file; everything below this crate stays file-I/O-free and takes the value
explicitly.
*/

/// Explicit parse-time configuration: left-recursion depth, history
/// tracking, resume notices, and which stages' trees to log. A plain,
/// `Clone`, `serde`-round-trippable value passed into [`crate::parse`];
/// there is no global config singleton anywhere in this workspace.
pub type ParserConfig = dhparser_parse::Config;

/// `ParserConfig` could not be parsed from TOML.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ConfigError(#[from] toml::de::Error);

/// Load a [`ParserConfig`] from a TOML document, e.g. a config file the
/// demo binary was pointed at. Purely a convenience for driver programs;
/// the parser/transform engines never read a file themselves.
pub fn load_config(toml_source: &str) -> Result<ParserConfig, ConfigError> {
    toml::from_str(toml_source).map_err(ConfigError)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_overridden_fields_and_defaults_the_rest() {
        let config = load_config(
            r#"
            left_recursion_depth = 25
            history_tracking = true
            "#,
        )
        .unwrap();
        assert_eq!(config.left_recursion_depth, 25);
        assert!(config.history_tracking);
        assert!(!config.resume_notices);
        assert_eq!(config.mandatory_recovery_chars, 1);
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(load_config("not = [valid").is_err());
    }
}
